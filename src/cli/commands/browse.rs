//! Trending, search and details command handlers

use super::{print_notice, print_summaries};
use crate::cli::kind_flag;
use crate::domain::{MediaId, MediaKind};
use crate::models::MediaDetail;
use crate::screens::details::DetailsEvent;
use crate::screens::search::SearchEvent;
use crate::screens::trending::TrendingEvent;
use crate::state::AppState;

pub async fn cmd_trending(state: &AppState, pages: u32) -> anyhow::Result<()> {
    let holder = state.trending_holder();

    holder.on_event(TrendingEvent::Load).await;
    for _ in 1..pages {
        if holder.state().end_reached || holder.state().error.is_some() {
            break;
        }
        holder.on_event(TrendingEvent::LoadMore).await;
    }

    let snapshot = holder.state();
    holder.detach();

    println!("Trending Today ({} titles)", snapshot.items.len());
    println!("{:-<60}", "");
    print_summaries(&snapshot.items);

    if let Some(notice) = &snapshot.error {
        println!();
        print_notice(notice);
    }

    Ok(())
}

pub async fn cmd_search(state: &AppState, query: &str, series: bool, pages: u32) -> anyhow::Result<()> {
    let holder = state.search_holder();

    holder.on_event(SearchEvent::KindChanged(kind_flag(series))).await;
    holder.on_event(SearchEvent::QueryChanged(query.to_string())).await;
    holder.on_event(SearchEvent::Submit).await;
    for _ in 1..pages {
        let results = holder.state().results;
        if results.end_reached || results.error.is_some() {
            break;
        }
        holder.on_event(SearchEvent::LoadMore).await;
    }

    let snapshot = holder.state();
    holder.detach();

    if let Some(message) = &snapshot.query_error {
        println!("{message}");
        return Ok(());
    }

    if snapshot.results.items.is_empty() && snapshot.results.error.is_none() {
        println!("No {} found matching '{}'", snapshot.kind.plural(), query.trim());
        return Ok(());
    }

    println!("Search Results:");
    println!("{:-<60}", "");
    print_summaries(&snapshot.results.items);

    if let Some(notice) = &snapshot.results.error {
        println!();
        print_notice(notice);
    }

    Ok(())
}

pub async fn cmd_details(state: &AppState, id: i64, series: bool) -> anyhow::Result<()> {
    let kind: MediaKind = kind_flag(series);
    let holder = state.details_holder(MediaId::new(id), kind).await?;

    holder.on_event(DetailsEvent::Load).await;
    let snapshot = holder.state();
    holder.detach();

    let Some(detail) = &snapshot.detail else {
        if let Some(notice) = &snapshot.error {
            print_notice(notice);
        }
        return Ok(());
    };

    let genres = detail
        .genres()
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    println!("{}", detail.title());
    println!("{:-<60}", "");

    match detail {
        MediaDetail::Movie(movie) => {
            if let Some(tagline) = &movie.tagline {
                println!("\"{tagline}\"");
            }
            println!(
                "Released: {} | Runtime: {} | Status: {}",
                movie.release_date.as_deref().unwrap_or("?"),
                movie
                    .runtime_minutes
                    .map_or_else(|| "?".to_string(), |m| format!("{m} min")),
                movie.status.as_deref().unwrap_or("?")
            );
            if movie.budget > 0 || movie.revenue > 0 {
                println!("Budget: ${} | Revenue: ${}", movie.budget, movie.revenue);
            }
        }
        MediaDetail::Series(show) => {
            println!(
                "Aired: {} – {} | Seasons: {} | Episodes: {}",
                show.first_air_date.as_deref().unwrap_or("?"),
                show.last_air_date.as_deref().unwrap_or("?"),
                show.number_of_seasons.map_or_else(|| "?".to_string(), |n| n.to_string()),
                show.number_of_episodes.map_or_else(|| "?".to_string(), |n| n.to_string()),
            );
            for season in &show.seasons {
                println!(
                    "  {} ({} eps)",
                    season.name,
                    season.episode_count.unwrap_or_default()
                );
            }
        }
    }

    println!("Rating: ★ {:.1} | Genres: {genres}", detail.vote_average());
    if let Some(url) = &snapshot.poster_url {
        println!("Poster: {url}");
    }
    if snapshot.is_favourite {
        println!("♥ In your favourites");
    }

    println!();
    match detail {
        MediaDetail::Movie(movie) => println!("{}", movie.overview),
        MediaDetail::Series(show) => println!("{}", show.overview),
    }

    Ok(())
}
