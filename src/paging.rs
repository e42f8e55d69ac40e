//! Page-number cursor adapter for paged catalog queries.
//!
//! A [`PagedFetcher`] is bound to one query string. Callers ask it for a page by
//! key and get back the items plus the keys of the neighbouring pages. Forward
//! pagination stops when a page comes back empty; the server's page count is
//! not consulted.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::constants::DEFAULT_PAGE;
use crate::gateway::{ApiResult, RemoteGateway};

/// Raw result of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
}

impl<T> PageResult<T> {
    pub const fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// A loaded page with the keys of its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
}

/// Remote capability that fetches one page of results for a query.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, query: &str, page: u32) -> anyhow::Result<PageResult<T>>;
}

/// Pagination stream for a single query.
pub struct PagedFetcher<T> {
    query: String,
    source: Arc<dyn PageSource<T>>,
    gateway: RemoteGateway,
}

impl<T> std::fmt::Debug for PagedFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedFetcher")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> PagedFetcher<T> {
    pub fn new(query: impl Into<String>, source: Arc<dyn PageSource<T>>) -> Self {
        Self {
            query: query.into(),
            source,
            gateway: RemoteGateway::new("paging"),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Loads the page addressed by `key`, or the first page when `key` is `None`.
    ///
    /// # Errors
    ///
    /// Any transport or HTTP failure is terminal for this load and is returned
    /// classified; nothing is retried.
    pub async fn load(&self, key: Option<u32>) -> ApiResult<Page<T>> {
        let page = key.unwrap_or(DEFAULT_PAGE);
        debug!(query = %self.query, page, "Loading page");

        let source = Arc::clone(&self.source);
        let query = self.query.clone();
        let result = self
            .gateway
            .call(async move { source.fetch_page(&query, page).await })
            .await?;

        let prev_key = if page == DEFAULT_PAGE {
            None
        } else {
            Some(page - 1)
        };
        let next_key = if result.items.is_empty() {
            None
        } else {
            Some(page + 1)
        };

        Ok(Page {
            items: result.items,
            prev_key,
            next_key,
        })
    }

    /// Page key to restart from after the loaded data was invalidated.
    #[must_use]
    pub fn refresh_key(&self, state: &PagingState<T>) -> Option<u32> {
        refresh_key(state)
    }
}

/// Pages loaded so far for one query, plus the position the user is looking at.
#[derive(Debug, Clone, PartialEq)]
pub struct PagingState<T> {
    pub pages: Vec<Page<T>>,
    pub anchor_position: Option<usize>,
}

impl<T> Default for PagingState<T> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            anchor_position: None,
        }
    }
}

impl<T> PagingState<T> {
    pub fn push(&mut self, page: Page<T>) {
        self.pages.push(page);
    }

    /// Adds a loaded page in key order. A page that precedes the first loaded
    /// one is prepended and the anchor shifts by its length; anything else is
    /// appended.
    pub fn insert(&mut self, page: Page<T>) {
        let precedes = self
            .pages
            .first()
            .is_some_and(|first| page_number(&page) < page_number(first));
        if !precedes {
            self.pages.push(page);
            return;
        }

        if let Some(anchor) = self.anchor_position.as_mut() {
            *anchor += page.items.len();
        }
        self.pages.insert(0, page);
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|p| p.items.iter())
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    /// Key of the page before the first loaded one; `None` when the first
    /// page is loaded or nothing is.
    #[must_use]
    pub fn prev_key(&self) -> Option<u32> {
        self.pages.first()?.prev_key
    }

    /// Key of the page after the last loaded one; `None` once the end was reached.
    #[must_use]
    pub fn next_key(&self) -> Option<u32> {
        match self.pages.last() {
            Some(page) => page.next_key,
            None => Some(DEFAULT_PAGE),
        }
    }

    #[must_use]
    pub fn end_reached(&self) -> bool {
        !self.pages.is_empty() && self.next_key().is_none()
    }

    /// The loaded page that contains `position`, or the last page when the
    /// position lies past everything loaded.
    #[must_use]
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page<T>> {
        let mut remaining = position;
        for page in &self.pages {
            if remaining < page.items.len() {
                return Some(page);
            }
            remaining -= page.items.len();
        }
        self.pages.last()
    }
}

/// Number of the page itself, recovered from its neighbour keys.
fn page_number<T>(page: &Page<T>) -> u32 {
    page.prev_key.map_or(DEFAULT_PAGE, |k| k + 1)
}

/// `prev_key + 1` of the page around the anchor, else `next_key - 1`, else `None`.
#[must_use]
pub fn refresh_key<T>(state: &PagingState<T>) -> Option<u32> {
    let anchor = state.anchor_position?;
    let page = state.closest_page_to_position(anchor)?;
    page.prev_key
        .map(|k| k + 1)
        .or_else(|| page.next_key.map(|k| k.saturating_sub(1)))
}
