//! Paged list driver shared by the trending and search holders.
//!
//! A feed runs one [`PagedFetcher`] session at a time. Starting a new session
//! (new query, refresh) bumps the session id; loads that complete for an older
//! session are dropped instead of being applied.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use super::{ListSnapshot, Publisher, apply_page};
use crate::constants::DEFAULT_PAGE;
use crate::gateway::ApiResult;
use crate::paging::{Page, PagedFetcher, PagingState, refresh_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedCommand {
    /// First page, only if nothing was loaded yet.
    First,
    Next,
    /// The page before the first loaded one.
    Previous,
    /// Drop loaded pages and reload from the refresh key.
    Refresh,
    /// Repeat the last failed load.
    Retry,
}

struct FeedInner<T> {
    fetcher: Option<Arc<PagedFetcher<T>>>,
    paging: PagingState<T>,
    session: u64,
    loading: bool,
    failed_key: Option<u32>,
}

pub(crate) struct PagedFeed<T> {
    inner: Mutex<FeedInner<T>>,
}

impl<T: Clone + Send + 'static> PagedFeed<T> {
    pub(crate) fn new(fetcher: Option<PagedFetcher<T>>) -> Self {
        Self {
            inner: Mutex::new(FeedInner {
                fetcher: fetcher.map(Arc::new),
                paging: PagingState::default(),
                session: 0,
                loading: false,
                failed_key: None,
            }),
        }
    }

    /// Replaces the fetcher and forgets everything loaded so far.
    pub(crate) async fn start(&self, fetcher: PagedFetcher<T>) -> u64 {
        let mut inner = self.inner.lock().await;
        inner.session += 1;
        inner.fetcher = Some(Arc::new(fetcher));
        inner.paging = PagingState::default();
        inner.loading = false;
        inner.failed_key = None;
        inner.session
    }

    pub(crate) async fn session(&self) -> u64 {
        self.inner.lock().await.session
    }

    pub(crate) async fn has_session(&self) -> bool {
        self.inner.lock().await.fetcher.is_some()
    }

    pub(crate) async fn scrolled_to(&self, position: usize) {
        self.inner.lock().await.paging.anchor_position = Some(position);
    }

    async fn begin(&self, command: FeedCommand) -> Option<(u64, Arc<PagedFetcher<T>>, Option<u32>)> {
        let mut inner = self.inner.lock().await;
        let fetcher = inner.fetcher.clone()?;

        if inner.loading && command != FeedCommand::Refresh {
            return None;
        }

        let key = match command {
            FeedCommand::First => {
                if !inner.paging.pages.is_empty() {
                    return None;
                }
                None
            }
            FeedCommand::Next => Some(inner.paging.next_key()?),
            FeedCommand::Previous => Some(inner.paging.prev_key()?),
            FeedCommand::Refresh => {
                let key = refresh_key(&inner.paging);
                inner.session += 1;
                inner.paging = PagingState::default();
                key
            }
            FeedCommand::Retry => Some(inner.failed_key?),
        };

        inner.loading = true;
        inner.failed_key = None;
        Some((inner.session, fetcher, key))
    }

    async fn finish(
        &self,
        session: u64,
        key: Option<u32>,
        outcome: ApiResult<Page<T>>,
    ) -> Option<ListSnapshot<T>> {
        let mut inner = self.inner.lock().await;
        if inner.session != session {
            debug!(session, current = inner.session, "Dropping page from a superseded session");
            return None;
        }

        inner.loading = false;
        if outcome.is_err() {
            inner.failed_key = Some(key.unwrap_or(DEFAULT_PAGE));
        }
        Some(apply_page(&mut inner.paging, outcome))
    }

    /// Runs `command` and publishes the resulting list into the snapshot part
    /// selected by `list_of`.
    pub(crate) async fn drive<S: Clone>(
        &self,
        command: FeedCommand,
        publisher: &Publisher<S>,
        list_of: fn(&mut S) -> &mut ListSnapshot<T>,
    ) {
        let Some((session, fetcher, key)) = self.begin(command).await else {
            return;
        };

        publisher.update(|state| {
            let list = list_of(state);
            if command == FeedCommand::Refresh {
                list.items.clear();
            }
            list.loading = true;
            list.error = None;
        });

        let outcome = fetcher.load(key).await;

        if let Some(snapshot) = self.finish(session, key, outcome).await {
            publisher.update(|state| *list_of(state) = snapshot);
        }
    }
}
