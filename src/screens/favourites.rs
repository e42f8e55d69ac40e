use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use super::{ErrorNotice, Publisher};
use crate::domain::ListType;
use crate::favourites::FavouritesIndex;
use crate::models::FavouriteItem;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavouritesState {
    pub list_type: ListType,
    pub items: Vec<FavouriteItem>,
    /// Names of pointer entries whose item could not be loaded.
    pub unresolved: Vec<String>,
    pub loading: bool,
    pub error: Option<ErrorNotice>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavouritesEvent {
    /// Show the given list and load it.
    Select(ListType),
    Refresh,
    Remove(FavouriteItem),
    DismissError,
}

/// Favourites screen: one list at a time, rebuilt from the index after every
/// change.
pub struct FavouritesHolder {
    index: Arc<FavouritesIndex>,
    publisher: Publisher<FavouritesState>,
}

impl FavouritesHolder {
    pub fn new(index: Arc<FavouritesIndex>) -> Self {
        Self {
            index,
            publisher: Publisher::new(FavouritesState {
                list_type: ListType::FavouriteMovies,
                items: Vec::new(),
                unresolved: Vec::new(),
                loading: false,
                error: None,
            }),
        }
    }

    pub fn state(&self) -> FavouritesState {
        self.publisher.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FavouritesState> {
        self.publisher.subscribe()
    }

    pub async fn on_event(&self, event: FavouritesEvent) {
        if self.publisher.is_detached() {
            return;
        }

        match event {
            FavouritesEvent::Select(list_type) => {
                self.publisher.update(|s| {
                    if s.list_type != list_type {
                        s.items.clear();
                        s.unresolved.clear();
                    }
                    s.list_type = list_type;
                });
                self.reload(None).await;
            }
            FavouritesEvent::Refresh => self.reload(None).await,
            FavouritesEvent::Remove(item) => {
                self.publisher.update(|s| s.loading = true);
                let removal = self.index.remove(&item).await.err().map(|e| ErrorNotice::from(&e));
                self.reload(removal).await;
            }
            FavouritesEvent::DismissError => {
                self.publisher.update(|s| s.error = None);
            }
        }
    }

    /// Re-lists the selected list. `carried` is an error from the preceding
    /// mutation; it wins over a partial-list error.
    async fn reload(&self, carried: Option<ErrorNotice>) {
        let list_type = self.state().list_type;
        self.publisher.update(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.index.list(list_type).await {
            Ok(listing) => {
                let partial = listing.error().map(|e| ErrorNotice::from(&e));
                self.publisher.update(|s| {
                    if s.list_type != list_type {
                        return;
                    }
                    s.unresolved = listing.unresolved.iter().map(|u| u.name.clone()).collect();
                    s.items = listing.items;
                    s.loading = false;
                    s.error = carried.or(partial);
                });
            }
            Err(err) => {
                let notice = ErrorNotice::from(&err);
                self.publisher.update(|s| {
                    s.loading = false;
                    s.error = carried.or(Some(notice));
                });
            }
        }
    }

    pub fn detach(&self) {
        self.publisher.detach();
    }
}
