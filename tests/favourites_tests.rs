//! Favourites index against the SQLite document store.

use std::sync::Arc;

use reelvault::db::Store;
use reelvault::documents::{DocumentPath, DocumentStore, SqliteDocumentStore};
use reelvault::domain::{ListType, MediaId, UserId};
use reelvault::favourites::{FavouritesIndex, UnresolvedReason};
use reelvault::models::FavouriteItem;

async fn open_store() -> (Store, std::path::PathBuf) {
    let db_path =
        std::env::temp_dir().join(format!("reelvault-favourites-{}.db", uuid::Uuid::new_v4()));
    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open store");
    (store, db_path)
}

fn movie(id: i64, name: &str) -> FavouriteItem {
    FavouriteItem::new(MediaId::new(id), name, ListType::FavouriteMovies).with_rating(7.5)
}

#[tokio::test]
async fn favourites_survive_reopening_the_database() {
    let (store, db_path) = open_store().await;
    let index = FavouritesIndex::new(
        UserId::new("u1"),
        Arc::new(SqliteDocumentStore::new(store.clone())),
    );

    index.add(&movie(101, "Movie A")).await.expect("add Movie A");
    index.add(&movie(202, "Movie B")).await.expect("add Movie B");
    drop(index);
    drop(store);

    let reopened = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to reopen store");
    let index = FavouritesIndex::new(
        UserId::new("u1"),
        Arc::new(SqliteDocumentStore::new(reopened)),
    );

    let listing = index
        .list(ListType::FavouriteMovies)
        .await
        .expect("list movies");
    assert!(listing.is_complete());
    let mut names: Vec<_> = listing.items.iter().map(|i| i.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Movie A", "Movie B"]);

    let series = index
        .list(ListType::FavouriteSeries)
        .await
        .expect("list series");
    assert!(series.items.is_empty());

    std::fs::remove_file(&db_path).ok();
}

#[tokio::test]
async fn remove_clears_both_tiers() {
    let (store, db_path) = open_store().await;
    let documents: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(store));
    let index = FavouritesIndex::new(UserId::new("u1"), Arc::clone(&documents));

    let item = movie(101, "Movie A");
    index.add(&item).await.expect("add");
    assert!(
        index
            .contains(ListType::FavouriteMovies, "Movie A", MediaId::new(101))
            .await
            .expect("contains")
    );

    index.remove(&item).await.expect("remove");
    assert!(
        !index
            .contains(ListType::FavouriteMovies, "Movie A", MediaId::new(101))
            .await
            .expect("contains")
    );

    let pointer = DocumentPath::new(["u1", "FAVOURITE_MOVIES"]).expect("pointer path");
    let fields = documents.get(&pointer).await.expect("read pointer");
    assert!(fields.is_none_or(|f| !f.contains_key("Movie A")));

    let item_path = DocumentPath::new(["u1", "FAVOURITE_MOVIES", "Movie%20A", "101"])
        .expect("item path");
    assert!(documents.get(&item_path).await.expect("read item").is_none());

    std::fs::remove_file(&db_path).ok();
}

#[tokio::test]
async fn dangling_pointer_is_reported_next_to_loaded_items() {
    let (store, db_path) = open_store().await;
    let documents: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(store));
    let index = FavouritesIndex::new(UserId::new("u1"), Arc::clone(&documents));

    index.add(&movie(101, "Movie A")).await.expect("add Movie A");
    index.add(&movie(202, "Movie B")).await.expect("add Movie B");

    let orphaned = DocumentPath::new(["u1", "FAVOURITE_MOVIES", "Movie%20B", "202"])
        .expect("item path");
    documents.delete(&orphaned).await.expect("delete item");

    let listing = index
        .list(ListType::FavouriteMovies)
        .await
        .expect("list movies");
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].name, "Movie A");
    assert_eq!(listing.unresolved.len(), 1);
    assert_eq!(listing.unresolved[0].name, "Movie B");
    assert_eq!(listing.unresolved[0].reason, UnresolvedReason::MissingItem);
    assert!(listing.error().is_some());

    std::fs::remove_file(&db_path).ok();
}

#[tokio::test]
async fn users_do_not_see_each_others_lists() {
    let (store, db_path) = open_store().await;
    let documents: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(store));
    let alice = FavouritesIndex::new(UserId::new("alice"), Arc::clone(&documents));
    let bob = FavouritesIndex::new(UserId::new("bob"), Arc::clone(&documents));

    alice.add(&movie(101, "Movie A")).await.expect("add");

    let listing = bob
        .list(ListType::FavouriteMovies)
        .await
        .expect("list movies");
    assert!(listing.items.is_empty());
    assert!(
        !bob.contains(ListType::FavouriteMovies, "Movie A", MediaId::new(101))
            .await
            .expect("contains")
    );

    std::fs::remove_file(&db_path).ok();
}
