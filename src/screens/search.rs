use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use super::feed::{FeedCommand, PagedFeed};
use super::{ListSnapshot, Publisher};
use crate::clients::{MediaCatalog, SearchSource};
use crate::domain::MediaKind;
use crate::models::MediaSummary;
use crate::paging::PagedFetcher;
use crate::validation::validate_search_query;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchState {
    pub query: String,
    pub kind: MediaKind,
    /// Validation message for the query field.
    pub query_error: Option<String>,
    pub results: ListSnapshot<MediaSummary>,
    /// Id of the session the results belong to; 0 before the first search.
    pub session: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    QueryChanged(String),
    /// Switch between movie and series search, re-running the active query.
    KindChanged(MediaKind),
    Submit,
    LoadMore,
    /// Load the page before the first one shown.
    LoadPrevious,
    Refresh,
    Retry,
    Scrolled(usize),
    DismissError,
}

fn results(state: &mut SearchState) -> &mut ListSnapshot<MediaSummary> {
    &mut state.results
}

/// Search screen. Every submitted query starts a fresh paging session; pages
/// that arrive for an abandoned session are dropped.
pub struct SearchHolder {
    catalog: Arc<dyn MediaCatalog>,
    feed: PagedFeed<MediaSummary>,
    publisher: Publisher<SearchState>,
}

impl SearchHolder {
    pub fn new(catalog: Arc<dyn MediaCatalog>) -> Self {
        Self {
            catalog,
            feed: PagedFeed::new(None),
            publisher: Publisher::new(SearchState::default()),
        }
    }

    pub fn state(&self) -> SearchState {
        self.publisher.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.publisher.subscribe()
    }

    pub async fn on_event(&self, event: SearchEvent) {
        if self.publisher.is_detached() {
            return;
        }

        match event {
            SearchEvent::QueryChanged(query) => {
                self.publisher.update(|s| {
                    s.query = query;
                    s.query_error = None;
                });
            }
            SearchEvent::KindChanged(kind) => {
                if self.state().kind == kind {
                    return;
                }
                self.publisher.update(|s| s.kind = kind);
                if self.feed.has_session().await {
                    self.submit().await;
                }
            }
            SearchEvent::Submit => self.submit().await,
            SearchEvent::LoadMore => self.drive(FeedCommand::Next).await,
            SearchEvent::LoadPrevious => self.drive(FeedCommand::Previous).await,
            SearchEvent::Refresh => {
                self.drive(FeedCommand::Refresh).await;
                let session = self.feed.session().await;
                self.publisher.update(|s| s.session = session);
            }
            SearchEvent::Retry => self.drive(FeedCommand::Retry).await,
            SearchEvent::Scrolled(position) => self.feed.scrolled_to(position).await,
            SearchEvent::DismissError => {
                self.publisher.update(|s| s.results.error = None);
            }
        }
    }

    async fn submit(&self) {
        let SearchState { query, kind, .. } = self.state();

        let validation = validate_search_query(&query);
        if let Some(message) = validation.message() {
            let message = message.to_string();
            self.publisher.update(|s| s.query_error = Some(message));
            return;
        }

        let query = query.trim().to_string();
        let source = Arc::new(SearchSource::new(Arc::clone(&self.catalog), kind));
        let session = self.feed.start(PagedFetcher::new(query.clone(), source)).await;
        debug!(session, %query, %kind, "Starting search session");

        self.publisher.update(|s| {
            s.query_error = None;
            s.results = ListSnapshot::default();
            s.session = session;
        });

        self.drive(FeedCommand::First).await;
    }

    async fn drive(&self, command: FeedCommand) {
        self.feed.drive(command, &self.publisher, results).await;
    }

    pub fn detach(&self) {
        self.publisher.detach();
    }
}
