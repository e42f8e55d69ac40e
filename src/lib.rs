pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod documents;
pub mod domain;
pub mod entities;
pub mod favourites;
pub mod gateway;
pub mod models;
pub mod paging;
pub mod screens;
pub mod services;
pub mod state;
pub mod validation;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, FavouritesCommands};
pub use config::Config;
use state::AppState;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if config.general.json_logs {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    if matches!(command, Commands::Init) {
        if Config::create_default_if_missing()? {
            println!("Created config.toml with default settings.");
        } else {
            println!("config.toml already exists.");
        }
        return Ok(());
    }

    if config.tmdb.api_token.is_empty() {
        info!(
            "No TMDB token configured; set tmdb.api_token or {}",
            constants::tmdb::TOKEN_ENV_VAR
        );
    }

    let state = AppState::new(config).await?;

    match command {
        Commands::Trending { pages } => cli::cmd_trending(&state, pages).await,
        Commands::Search {
            query,
            series,
            pages,
        } => cli::cmd_search(&state, &query.join(" "), series, pages).await,
        Commands::Details { id, series } => cli::cmd_details(&state, id, series).await,
        Commands::Signup {
            first_name,
            last_name,
            email,
            password,
        } => cli::cmd_signup(&state, first_name, last_name, email, password).await,
        Commands::Login { email, password } => cli::cmd_login(&state, email, password).await,
        Commands::Logout => cli::cmd_logout(&state).await,
        Commands::ResetPassword { email } => cli::cmd_reset_password(&state, email).await,
        Commands::Whoami => cli::cmd_whoami(&state).await,
        Commands::Favourites { command } => match command {
            FavouritesCommands::List { series } => cli::cmd_favourites_list(&state, series).await,
            FavouritesCommands::Add { id, series } => {
                cli::cmd_favourites_add(&state, id, series).await
            }
            FavouritesCommands::Remove { id, series } => {
                cli::cmd_favourites_remove(&state, id, series).await
            }
        },
        Commands::Init => Ok(()),
    }
}
