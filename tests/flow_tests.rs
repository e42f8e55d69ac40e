//! End-to-end screen flows over a temporary database and a canned catalog.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use reelvault::clients::MediaCatalog;
use reelvault::config::{Config, StoreBackend};
use reelvault::constants::preferences::{FIRST_NAME, LAST_NAME};
use reelvault::db::Store;
use reelvault::domain::{ListType, MediaId, MediaKind};
use reelvault::gateway::HttpStatusError;
use reelvault::models::{MediaSummary, MovieDetail, SeriesDetail};
use reelvault::screens::auth::{LogInEvent, SignUpEvent};
use reelvault::screens::details::DetailsEvent;
use reelvault::screens::favourites::FavouritesEvent;
use reelvault::screens::search::SearchEvent;
use reelvault::screens::trending::TrendingEvent;
use reelvault::state::AppState;
use reelvault::validation::QUERY_EMPTY;

struct CannedCatalog {
    movies: Vec<MediaSummary>,
}

impl CannedCatalog {
    fn new() -> Self {
        let movies = [(101, "Movie A"), (202, "Movie B"), (303, "Another Movie")]
            .into_iter()
            .map(|(id, title)| MediaSummary {
                id: MediaId::new(id),
                title: title.to_string(),
                overview: format!("About {title}"),
                poster_path: Some(format!("/{id}.jpg")),
                release_or_air_date: Some("2024-05-01".to_string()),
                media_type: MediaKind::Movie,
                original_language: "en".to_string(),
                vote_average: 7.2,
            })
            .collect();
        Self { movies }
    }
}

fn not_found() -> anyhow::Error {
    HttpStatusError::new(
        404,
        r#"{"status_code":34,"status_message":"The resource you requested could not be found."}"#,
    )
    .into()
}

#[async_trait]
impl MediaCatalog for CannedCatalog {
    async fn trending(&self, page: u32) -> Result<Vec<MediaSummary>> {
        Ok(if page == 1 { self.movies.clone() } else { Vec::new() })
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MediaSummary>> {
        if page > 1 {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();
        Ok(self
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn search_series(&self, _query: &str, _page: u32) -> Result<Vec<MediaSummary>> {
        Ok(Vec::new())
    }

    async fn movie_details(&self, id: MediaId) -> Result<MovieDetail> {
        let summary = self.movies.iter().find(|m| m.id == id).ok_or_else(not_found)?;
        Ok(MovieDetail {
            id,
            title: summary.title.clone(),
            overview: summary.overview.clone(),
            poster_path: summary.poster_path.clone(),
            backdrop_path: None,
            release_date: summary.release_or_air_date.clone(),
            original_language: summary.original_language.clone(),
            vote_average: summary.vote_average,
            vote_count: 120,
            genres: Vec::new(),
            production_companies: Vec::new(),
            runtime_minutes: Some(112),
            budget: 0,
            revenue: 0,
            tagline: None,
            status: Some("Released".to_string()),
        })
    }

    async fn series_details(&self, _id: MediaId) -> Result<SeriesDetail> {
        Err(not_found())
    }
}

async fn spawn_state(backend: StoreBackend) -> (AppState, std::path::PathBuf) {
    let db_path = std::env::temp_dir().join(format!("reelvault-flow-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.store.backend = backend;

    let store = Store::new(&config.general.database_path)
        .await
        .expect("failed to open store");
    let state = AppState::from_parts(config, store, Arc::new(CannedCatalog::new()));
    (state, db_path)
}

async fn sign_up(state: &AppState, email: &str) {
    let holder = state.sign_up_holder();
    holder.on_event(SignUpEvent::FirstNameChanged("Ada".into())).await;
    holder.on_event(SignUpEvent::LastNameChanged("Lovelace".into())).await;
    holder.on_event(SignUpEvent::EmailChanged(email.into())).await;
    holder.on_event(SignUpEvent::PasswordChanged("abcd123!".into())).await;
    holder.on_event(SignUpEvent::Submit).await;

    let form = holder.state();
    assert!(!form.has_field_errors(), "unexpected field errors: {form:?}");
    assert!(form.account.is_some(), "sign-up failed: {:?}", form.error);
}

#[tokio::test]
async fn browse_and_favourite_a_movie() {
    let (state, db_path) = spawn_state(StoreBackend::Sqlite).await;
    sign_up(&state, "ada@example.com").await;

    assert_eq!(
        state.store.get_preference(FIRST_NAME).await.expect("first name"),
        Some("Ada".to_string())
    );
    assert_eq!(
        state.store.get_preference(LAST_NAME).await.expect("last name"),
        Some("Lovelace".to_string())
    );

    let trending = state.trending_holder();
    trending.on_event(TrendingEvent::Load).await;
    assert_eq!(trending.state().items.len(), 3);

    let search = state.search_holder();
    search.on_event(SearchEvent::QueryChanged("movie a".into())).await;
    search.on_event(SearchEvent::Submit).await;
    let results = search.state().results;
    assert_eq!(results.items.len(), 1);
    assert_eq!(results.items[0].id, MediaId::new(101));

    let details = state
        .details_holder(MediaId::new(101), MediaKind::Movie)
        .await
        .expect("details holder");
    details.on_event(DetailsEvent::Load).await;
    let loaded = details.state();
    assert!(loaded.detail.is_some());
    assert!(!loaded.is_favourite);
    assert!(
        loaded
            .poster_url
            .as_deref()
            .is_some_and(|url| url.ends_with("/101.jpg"))
    );

    details.on_event(DetailsEvent::ToggleFavourite).await;
    assert!(details.state().is_favourite);
    assert!(details.state().error.is_none());

    let favourites = state.favourites_holder().await.expect("favourites holder");
    favourites
        .on_event(FavouritesEvent::Select(ListType::FavouriteMovies))
        .await;
    let listed = favourites.state();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].name, "Movie A");
    assert!(listed.unresolved.is_empty());

    let item = listed.items[0].clone();
    favourites.on_event(FavouritesEvent::Remove(item)).await;
    assert!(favourites.state().items.is_empty());

    std::fs::remove_file(&db_path).ok();
}

#[tokio::test]
async fn blank_search_never_reaches_the_catalog() {
    let (state, db_path) = spawn_state(StoreBackend::Memory).await;

    let search = state.search_holder();
    search.on_event(SearchEvent::QueryChanged("   ".into())).await;
    search.on_event(SearchEvent::Submit).await;

    let snapshot = search.state();
    assert_eq!(snapshot.query_error.as_deref(), Some(QUERY_EMPTY));
    assert!(snapshot.results.items.is_empty());
    assert_eq!(snapshot.session, 0);

    std::fs::remove_file(&db_path).ok();
}

#[tokio::test]
async fn unknown_title_surfaces_a_service_error() {
    let (state, db_path) = spawn_state(StoreBackend::Memory).await;

    let details = state
        .details_holder(MediaId::new(999), MediaKind::Series)
        .await
        .expect("details holder");
    details.on_event(DetailsEvent::Load).await;

    let snapshot = details.state();
    assert!(snapshot.detail.is_none());
    let notice = snapshot.error.expect("error notice");
    assert_eq!(notice.status_code, Some(404));
    assert!(!notice.is_network);

    std::fs::remove_file(&db_path).ok();
}

#[tokio::test]
async fn favourites_follow_the_signed_in_account() {
    let (state, db_path) = spawn_state(StoreBackend::Sqlite).await;

    assert!(state.favourites_holder().await.is_err());

    sign_up(&state, "ada@example.com").await;
    let index = state
        .favourites()
        .await
        .expect("favourites")
        .expect("signed in");
    let details = state
        .details_holder(MediaId::new(202), MediaKind::Movie)
        .await
        .expect("details holder");
    details.on_event(DetailsEvent::Load).await;
    details.on_event(DetailsEvent::ToggleFavourite).await;
    assert!(details.state().is_favourite);

    state.auth.sign_out().await.expect("sign out");
    assert!(state.favourites().await.expect("favourites").is_none());

    sign_up(&state, "grace@example.com").await;
    let other = state
        .favourites()
        .await
        .expect("favourites")
        .expect("signed in");
    assert_ne!(other.user(), index.user());
    let listing = other
        .list(ListType::FavouriteMovies)
        .await
        .expect("list movies");
    assert!(listing.items.is_empty());

    let log_in = state.log_in_holder();
    log_in.on_event(LogInEvent::EmailChanged("ada@example.com".into())).await;
    log_in.on_event(LogInEvent::PasswordChanged("abcd123!".into())).await;
    log_in.on_event(LogInEvent::Submit).await;
    assert!(log_in.state().account.is_some());

    let restored = state
        .favourites()
        .await
        .expect("favourites")
        .expect("signed in");
    assert_eq!(restored.user(), index.user());
    let listing = restored
        .list(ListType::FavouriteMovies)
        .await
        .expect("list movies");
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].id, MediaId::new(202));

    std::fs::remove_file(&db_path).ok();
}
