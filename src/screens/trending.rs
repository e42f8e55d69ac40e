use std::sync::Arc;

use tokio::sync::watch;

use super::feed::{FeedCommand, PagedFeed};
use super::{ListSnapshot, Publisher};
use crate::clients::{MediaCatalog, TrendingSource};
use crate::models::MediaSummary;
use crate::paging::PagedFetcher;

pub type TrendingState = ListSnapshot<MediaSummary>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrendingEvent {
    Load,
    LoadMore,
    /// Load the page before the first one shown.
    LoadPrevious,
    Refresh,
    Retry,
    /// The user is looking at this item index; used as the refresh anchor.
    Scrolled(usize),
    DismissError,
}

fn whole(state: &mut TrendingState) -> &mut TrendingState {
    state
}

/// Home screen: today's trending movies and series.
pub struct TrendingHolder {
    feed: PagedFeed<MediaSummary>,
    publisher: Publisher<TrendingState>,
}

impl TrendingHolder {
    pub fn new(catalog: Arc<dyn MediaCatalog>) -> Self {
        let fetcher = PagedFetcher::new("", Arc::new(TrendingSource::new(catalog)));
        Self {
            feed: PagedFeed::new(Some(fetcher)),
            publisher: Publisher::new(TrendingState::default()),
        }
    }

    pub fn state(&self) -> TrendingState {
        self.publisher.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrendingState> {
        self.publisher.subscribe()
    }

    pub async fn on_event(&self, event: TrendingEvent) {
        if self.publisher.is_detached() {
            return;
        }

        match event {
            TrendingEvent::Load => self.drive(FeedCommand::First).await,
            TrendingEvent::LoadMore => self.drive(FeedCommand::Next).await,
            TrendingEvent::LoadPrevious => self.drive(FeedCommand::Previous).await,
            TrendingEvent::Refresh => self.drive(FeedCommand::Refresh).await,
            TrendingEvent::Retry => self.drive(FeedCommand::Retry).await,
            TrendingEvent::Scrolled(position) => self.feed.scrolled_to(position).await,
            TrendingEvent::DismissError => {
                self.publisher.update(|s| s.error = None);
            }
        }
    }

    async fn drive(&self, command: FeedCommand) {
        self.feed.drive(command, &self.publisher, whole).await;
    }

    pub fn detach(&self) {
        self.publisher.detach();
    }
}
