//! CLI module - Command-line driver for Reelvault
//!
//! This module provides a structured CLI using clap for argument parsing.
//! Every command drives the same screen holders a UI would.

mod commands;

use clap::{Parser, Subcommand};

use crate::constants::limits::DEFAULT_CLI_PAGES;
use crate::domain::MediaKind;

/// Reelvault - browse movies and TV, keep a favourites list
#[derive(Parser)]
#[command(name = "reelvault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show today's trending movies and series
    #[command(alias = "t")]
    Trending {
        /// Number of pages to load
        #[arg(long, default_value_t = DEFAULT_CLI_PAGES)]
        pages: u32,
    },

    /// Search movies (or series with --series)
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        /// Search TV series instead of movies
        #[arg(long)]
        series: bool,
        /// Number of pages to load
        #[arg(long, default_value_t = DEFAULT_CLI_PAGES)]
        pages: u32,
    },

    /// Show details about a movie or series
    #[command(alias = "i")]
    Details {
        /// Catalog ID
        id: i64,
        /// The ID refers to a TV series
        #[arg(long)]
        series: bool,
    },

    /// Create an account and sign in
    Signup {
        first_name: String,
        last_name: String,
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in to an existing account
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Request a password reset
    ResetPassword { email: String },

    /// Show the signed-in account
    Whoami,

    /// Manage favourites of the signed-in account
    #[command(alias = "fav")]
    Favourites {
        #[command(subcommand)]
        command: FavouritesCommands,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum FavouritesCommands {
    /// List favourite movies (or series with --series)
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        series: bool,
    },
    /// Add a title to favourites
    Add {
        id: i64,
        #[arg(long)]
        series: bool,
    },
    /// Remove a title from favourites
    #[command(alias = "rm")]
    Remove {
        id: i64,
        #[arg(long)]
        series: bool,
    },
}

pub(crate) const fn kind_flag(series: bool) -> MediaKind {
    if series {
        MediaKind::Series
    } else {
        MediaKind::Movie
    }
}

pub use commands::*;
