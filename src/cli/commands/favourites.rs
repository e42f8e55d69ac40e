//! Favourites command handlers

use super::print_notice;
use crate::cli::kind_flag;
use crate::domain::MediaId;
use crate::screens::details::DetailsEvent;
use crate::screens::favourites::FavouritesEvent;
use crate::state::AppState;

pub async fn cmd_favourites_list(state: &AppState, series: bool) -> anyhow::Result<()> {
    let list_type = kind_flag(series).list_type();
    let holder = state.favourites_holder().await?;

    holder.on_event(FavouritesEvent::Select(list_type)).await;
    let snapshot = holder.state();
    holder.detach();

    if snapshot.items.is_empty() && snapshot.unresolved.is_empty() {
        if let Some(notice) = &snapshot.error {
            print_notice(notice);
        } else {
            println!("No favourite {} yet.", kind_flag(series).plural());
        }
        return Ok(());
    }

    println!("Favourite {} ({} total)", kind_flag(series).plural(), snapshot.items.len());
    println!("{:-<60}", "");
    for item in &snapshot.items {
        let rating = item
            .average_rating
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
        println!("♥ {} ★ {rating}", item.name);
        println!("  ID: {}", item.id);
    }

    for name in &snapshot.unresolved {
        println!("? {name} (could not be loaded)");
    }

    if let Some(notice) = &snapshot.error {
        println!();
        print_notice(notice);
    }

    Ok(())
}

async fn toggle(state: &AppState, id: i64, series: bool, want_favourite: bool) -> anyhow::Result<()> {
    if state.favourites().await?.is_none() {
        println!("Sign in to manage favourites.");
        return Ok(());
    }

    let holder = state.details_holder(MediaId::new(id), kind_flag(series)).await?;
    holder.on_event(DetailsEvent::Load).await;

    let before = holder.state();
    let Some(detail) = &before.detail else {
        if let Some(notice) = &before.error {
            print_notice(notice);
        }
        return Ok(());
    };

    if before.is_favourite == want_favourite {
        let verb = if want_favourite { "already in" } else { "not in" };
        println!("{} is {verb} your favourites.", detail.title());
        return Ok(());
    }

    holder.on_event(DetailsEvent::ToggleFavourite).await;
    let after = holder.state();
    holder.detach();

    if let Some(notice) = &after.error {
        print_notice(notice);
    }

    match (want_favourite, after.is_favourite) {
        (true, true) => println!("Added {} to favourites.", detail.title()),
        (false, false) => println!("Removed {} from favourites.", detail.title()),
        _ => println!("Favourites unchanged for {}.", detail.title()),
    }

    Ok(())
}

pub async fn cmd_favourites_add(state: &AppState, id: i64, series: bool) -> anyhow::Result<()> {
    toggle(state, id, series, true).await
}

pub async fn cmd_favourites_remove(state: &AppState, id: i64, series: bool) -> anyhow::Result<()> {
    toggle(state, id, series, false).await
}
