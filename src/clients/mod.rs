//! Media catalog access: the [`MediaCatalog`] seam, the TMDB implementation and
//! the page sources that feed [`crate::paging::PagedFetcher`].

pub mod tmdb;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{MediaId, MediaKind};
use crate::models::{MediaDetail, MediaSummary, MovieDetail, SeriesDetail};
use crate::paging::{PageResult, PageSource};

pub use tmdb::{TmdbClient, poster_url};

/// Remote catalog of movies and series.
///
/// HTTP failures are reported as [`crate::gateway::HttpStatusError`] inside the
/// returned `anyhow::Error` so the gateway can classify them.
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    async fn trending(&self, page: u32) -> Result<Vec<MediaSummary>>;

    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MediaSummary>>;

    async fn search_series(&self, query: &str, page: u32) -> Result<Vec<MediaSummary>>;

    async fn movie_details(&self, id: MediaId) -> Result<MovieDetail>;

    async fn series_details(&self, id: MediaId) -> Result<SeriesDetail>;

    async fn details(&self, id: MediaId, kind: MediaKind) -> Result<MediaDetail> {
        match kind {
            MediaKind::Movie => self.movie_details(id).await.map(MediaDetail::Movie),
            MediaKind::Series => self.series_details(id).await.map(MediaDetail::Series),
        }
    }
}

/// Search results of one media kind, page by page.
pub struct SearchSource {
    catalog: Arc<dyn MediaCatalog>,
    kind: MediaKind,
}

impl SearchSource {
    pub fn new(catalog: Arc<dyn MediaCatalog>, kind: MediaKind) -> Self {
        Self { catalog, kind }
    }
}

#[async_trait]
impl PageSource<MediaSummary> for SearchSource {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<PageResult<MediaSummary>> {
        let items = match self.kind {
            MediaKind::Movie => self.catalog.search_movies(query, page).await?,
            MediaKind::Series => self.catalog.search_series(query, page).await?,
        };
        Ok(PageResult::new(items))
    }
}

/// Today's trending titles. The query string is ignored.
pub struct TrendingSource {
    catalog: Arc<dyn MediaCatalog>,
}

impl TrendingSource {
    pub fn new(catalog: Arc<dyn MediaCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl PageSource<MediaSummary> for TrendingSource {
    async fn fetch_page(&self, _query: &str, page: u32) -> Result<PageResult<MediaSummary>> {
        Ok(PageResult::new(self.catalog.trending(page).await?))
    }
}
