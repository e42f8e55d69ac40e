use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use super::{ErrorNotice, Publisher};
use crate::clients::{MediaCatalog, poster_url};
use crate::constants::tmdb::DEFAULT_IMAGE_BASE_URL;
use crate::domain::{MediaId, MediaKind};
use crate::favourites::FavouritesIndex;
use crate::gateway::RemoteGateway;
use crate::models::{FavouriteItem, MediaDetail};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsState {
    pub id: MediaId,
    pub kind: MediaKind,
    pub detail: Option<MediaDetail>,
    pub poster_url: Option<String>,
    pub loading: bool,
    pub is_favourite: bool,
    /// A favourite add/remove is in flight.
    pub favourite_busy: bool,
    pub error: Option<ErrorNotice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsEvent {
    Load,
    Retry,
    ToggleFavourite,
    DismissError,
}

/// Details screen for one movie or series.
pub struct DetailsHolder {
    catalog: Arc<dyn MediaCatalog>,
    favourites: Option<Arc<FavouritesIndex>>,
    image_base_url: String,
    gateway: RemoteGateway,
    publisher: Publisher<DetailsState>,
}

impl DetailsHolder {
    /// `favourites` is `None` when nobody is signed in.
    pub fn new(
        catalog: Arc<dyn MediaCatalog>,
        favourites: Option<Arc<FavouritesIndex>>,
        id: MediaId,
        kind: MediaKind,
    ) -> Self {
        Self {
            catalog,
            favourites,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            gateway: RemoteGateway::new("tmdb"),
            publisher: Publisher::new(DetailsState {
                id,
                kind,
                detail: None,
                poster_url: None,
                loading: false,
                is_favourite: false,
                favourite_busy: false,
                error: None,
            }),
        }
    }

    #[must_use]
    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    pub fn state(&self) -> DetailsState {
        self.publisher.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailsState> {
        self.publisher.subscribe()
    }

    pub async fn on_event(&self, event: DetailsEvent) {
        if self.publisher.is_detached() {
            return;
        }

        match event {
            DetailsEvent::Load | DetailsEvent::Retry => self.load().await,
            DetailsEvent::ToggleFavourite => self.toggle_favourite().await,
            DetailsEvent::DismissError => {
                self.publisher.update(|s| s.error = None);
            }
        }
    }

    async fn load(&self) {
        let DetailsState { id, kind, loading, .. } = self.state();
        if loading {
            return;
        }
        self.publisher.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let catalog = Arc::clone(&self.catalog);
        let outcome = self
            .gateway
            .call(async move { catalog.details(id, kind).await })
            .await;

        match outcome {
            Ok(detail) => {
                let poster = poster_url(&self.image_base_url, detail.poster_path());
                let name = detail.title().to_string();
                self.publisher.update(|s| {
                    s.detail = Some(detail);
                    s.poster_url = poster;
                    s.loading = false;
                });
                self.reconcile_favourite(&name).await;
            }
            Err(failure) => {
                self.publisher.update(|s| {
                    s.loading = false;
                    s.error = Some(ErrorNotice::from(&failure));
                });
            }
        }
    }

    /// Membership shown when the details first load.
    async fn reconcile_favourite(&self, name: &str) {
        let Some(index) = &self.favourites else {
            return;
        };
        let DetailsState { id, kind, .. } = self.state();

        match index.contains(kind.list_type(), name, id).await {
            Ok(is_favourite) => {
                self.publisher.update(|s| s.is_favourite = is_favourite);
            }
            Err(err) => {
                let notice = ErrorNotice::from(&err);
                self.publisher.update(|s| s.error = Some(notice));
            }
        }
    }

    /// Re-lists the favourites after a mutation, successful or not; the title
    /// counts as a favourite only if it comes back as a resolved item.
    async fn relist_favourites(&self, index: &FavouritesIndex, item: &FavouriteItem) {
        match index.list(item.list_type).await {
            Ok(listing) => {
                let is_favourite = listing
                    .items
                    .iter()
                    .any(|listed| listed.id == item.id && listed.name == item.name);
                self.publisher.update(|s| s.is_favourite = is_favourite);
            }
            Err(err) => {
                let notice = ErrorNotice::from(&err);
                self.publisher.update(|s| s.error = Some(notice));
            }
        }
    }

    async fn toggle_favourite(&self) {
        let state = self.state();
        if state.favourite_busy {
            return;
        }
        let Some(detail) = state.detail else {
            return;
        };
        let Some(index) = &self.favourites else {
            self.publisher.update(|s| {
                s.error = Some(ErrorNotice::new("Sign in to save favourites", false));
            });
            return;
        };

        self.publisher.update(|s| {
            s.favourite_busy = true;
            s.error = None;
        });

        let item = FavouriteItem::from(&detail);
        let result = if state.is_favourite {
            index.remove(&item).await
        } else {
            index.add(&item).await
        };

        if let Err(err) = &result {
            let notice = ErrorNotice::from(err);
            self.publisher.update(|s| s.error = Some(notice));
        } else {
            info!(id = %item.id, favourite = !state.is_favourite, "Toggled favourite");
        }

        self.relist_favourites(index, &item).await;
        self.publisher.update(|s| s.favourite_busy = false);
    }

    pub fn detach(&self) {
        self.publisher.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{DocumentPath, MemoryDocumentStore, Operation};
    use crate::domain::{ListType, UserId};
    use crate::screens::fakes::{FakeCatalog, summary};

    fn catalog() -> Arc<FakeCatalog> {
        Arc::new(FakeCatalog::new(
            vec![
                summary(101, "Movie A", MediaKind::Movie),
                summary(70523, "Dark", MediaKind::Series),
            ],
            20,
        ))
    }

    fn index(store: &Arc<MemoryDocumentStore>) -> Arc<FavouritesIndex> {
        Arc::new(FavouritesIndex::new(UserId::new("u1"), store.clone()))
    }

    #[tokio::test]
    async fn loads_details_and_poster() {
        let holder = DetailsHolder::new(catalog(), None, MediaId::new(70523), MediaKind::Series)
            .with_image_base_url("https://img.test/w500");
        holder.on_event(DetailsEvent::Load).await;

        let state = holder.state();
        assert!(!state.loading);
        assert_eq!(state.detail.as_ref().map(MediaDetail::title), Some("Dark"));
        assert_eq!(state.poster_url.as_deref(), Some("https://img.test/w500/70523.jpg"));
        assert!(!state.is_favourite);
    }

    #[tokio::test]
    async fn unknown_title_reports_service_error() {
        let holder = DetailsHolder::new(catalog(), None, MediaId::new(9), MediaKind::Movie);
        holder.on_event(DetailsEvent::Load).await;

        let error = holder.state().error.unwrap();
        assert_eq!(error.status_code, Some(404));
        assert!(!error.is_network);
    }

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let store = Arc::new(MemoryDocumentStore::new());
        let index = index(&store);
        let holder = DetailsHolder::new(
            catalog(),
            Some(index.clone()),
            MediaId::new(101),
            MediaKind::Movie,
        );
        holder.on_event(DetailsEvent::Load).await;

        holder.on_event(DetailsEvent::ToggleFavourite).await;
        assert!(holder.state().is_favourite);
        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].name, "Movie A");
        assert_eq!(listing.items[0].average_rating, Some(7.0));

        holder.on_event(DetailsEvent::ToggleFavourite).await;
        let state = holder.state();
        assert!(!state.is_favourite);
        assert!(!state.favourite_busy);
        assert!(index.list(ListType::FavouriteMovies).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn failed_add_shows_error_and_reconciles() {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .fail_on(
                Operation::Set,
                &DocumentPath::new(["u1", "FAVOURITE_MOVIES"]).unwrap(),
            )
            .await;
        let holder = DetailsHolder::new(
            catalog(),
            Some(index(&store)),
            MediaId::new(101),
            MediaKind::Movie,
        );
        holder.on_event(DetailsEvent::Load).await;
        holder.on_event(DetailsEvent::ToggleFavourite).await;

        let state = holder.state();
        assert!(!state.is_favourite);
        assert!(state.error.unwrap().message.contains("Movie A"));
    }

    #[tokio::test]
    async fn failed_item_write_is_not_shown_as_favourite() {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .fail_on(
                Operation::Set,
                &DocumentPath::new(["u1", "FAVOURITE_MOVIES", "Movie%20A", "101"]).unwrap(),
            )
            .await;
        let index = index(&store);
        let holder = DetailsHolder::new(
            catalog(),
            Some(index.clone()),
            MediaId::new(101),
            MediaKind::Movie,
        );
        holder.on_event(DetailsEvent::Load).await;
        holder.on_event(DetailsEvent::ToggleFavourite).await;

        let state = holder.state();
        assert!(!state.is_favourite);
        assert!(!state.favourite_busy);
        assert!(state.error.is_some());

        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.unresolved.len(), 1);
    }

    #[tokio::test]
    async fn toggle_without_session_asks_to_sign_in() {
        let holder = DetailsHolder::new(catalog(), None, MediaId::new(101), MediaKind::Movie);
        holder.on_event(DetailsEvent::Load).await;
        holder.on_event(DetailsEvent::ToggleFavourite).await;
        assert_eq!(
            holder.state().error.unwrap().message,
            "Sign in to save favourites"
        );
    }
}
