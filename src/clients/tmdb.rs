use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::MediaCatalog;
use crate::config::TmdbConfig;
use crate::domain::{MediaId, MediaKind};
use crate::gateway::HttpStatusError;
use crate::models::{
    Genre, MediaSummary, MovieDetail, ProductionCompany, SeasonSummary, SeriesDetail,
};

#[derive(Debug, Deserialize)]
struct PagedResponse<T> {
    #[serde(default)]
    page: u32,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

/// Row of `/trending`, `/search/movie` or `/search/tv`. Movies carry `title` and
/// `release_date`, series carry `name` and `first_air_date`.
#[derive(Debug, Deserialize)]
struct ListItem {
    id: i64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    original_language: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

impl ListItem {
    /// Kind taken from `media_type`; `None` for people and unknown kinds.
    fn trending_kind(&self) -> Option<MediaKind> {
        match self.media_type.as_deref() {
            Some("movie") => Some(MediaKind::Movie),
            Some("tv") => Some(MediaKind::Series),
            _ => None,
        }
    }

    fn into_summary(self, kind: MediaKind) -> MediaSummary {
        let (title, date) = match kind {
            MediaKind::Movie => (self.title.or(self.name), self.release_date),
            MediaKind::Series => (self.name.or(self.title), self.first_air_date),
        };

        MediaSummary {
            id: MediaId::new(self.id),
            title: title.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: non_empty(self.poster_path),
            release_or_air_date: non_empty(date),
            media_type: kind,
            original_language: self.original_language.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenreDto {
    id: i64,
    name: String,
}

impl From<GenreDto> for Genre {
    fn from(dto: GenreDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompanyDto {
    id: i64,
    name: String,
    logo_path: Option<String>,
    origin_country: Option<String>,
}

impl From<CompanyDto> for ProductionCompany {
    fn from(dto: CompanyDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            logo_path: non_empty(dto.logo_path),
            origin_country: non_empty(dto.origin_country),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieDto {
    id: i64,
    title: String,
    #[serde(default)]
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    original_language: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: i64,
    #[serde(default)]
    genres: Vec<GenreDto>,
    #[serde(default)]
    production_companies: Vec<CompanyDto>,
    runtime: Option<i64>,
    #[serde(default)]
    budget: i64,
    #[serde(default)]
    revenue: i64,
    tagline: Option<String>,
    status: Option<String>,
}

impl From<MovieDto> for MovieDetail {
    fn from(dto: MovieDto) -> Self {
        Self {
            id: MediaId::new(dto.id),
            title: dto.title,
            overview: dto.overview.unwrap_or_default(),
            poster_path: non_empty(dto.poster_path),
            backdrop_path: non_empty(dto.backdrop_path),
            release_date: non_empty(dto.release_date),
            original_language: dto.original_language.unwrap_or_default(),
            vote_average: dto.vote_average,
            vote_count: dto.vote_count,
            genres: dto.genres.into_iter().map(Into::into).collect(),
            production_companies: dto.production_companies.into_iter().map(Into::into).collect(),
            runtime_minutes: dto.runtime.filter(|r| *r > 0),
            budget: dto.budget,
            revenue: dto.revenue,
            tagline: non_empty(dto.tagline),
            status: non_empty(dto.status),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonDto {
    season_number: i64,
    #[serde(default)]
    name: String,
    episode_count: Option<i64>,
    air_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeriesDto {
    id: i64,
    name: String,
    #[serde(default)]
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    first_air_date: Option<String>,
    last_air_date: Option<String>,
    #[serde(default)]
    original_language: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: i64,
    #[serde(default)]
    genres: Vec<GenreDto>,
    #[serde(default)]
    production_companies: Vec<CompanyDto>,
    number_of_seasons: Option<i64>,
    number_of_episodes: Option<i64>,
    #[serde(default)]
    episode_run_time: Vec<i64>,
    #[serde(default)]
    seasons: Vec<SeasonDto>,
    status: Option<String>,
}

impl From<SeriesDto> for SeriesDetail {
    fn from(dto: SeriesDto) -> Self {
        Self {
            id: MediaId::new(dto.id),
            name: dto.name,
            overview: dto.overview.unwrap_or_default(),
            poster_path: non_empty(dto.poster_path),
            backdrop_path: non_empty(dto.backdrop_path),
            first_air_date: non_empty(dto.first_air_date),
            last_air_date: non_empty(dto.last_air_date),
            original_language: dto.original_language.unwrap_or_default(),
            vote_average: dto.vote_average,
            vote_count: dto.vote_count,
            genres: dto.genres.into_iter().map(Into::into).collect(),
            production_companies: dto.production_companies.into_iter().map(Into::into).collect(),
            number_of_seasons: dto.number_of_seasons,
            number_of_episodes: dto.number_of_episodes,
            episode_run_time: dto.episode_run_time,
            seasons: dto
                .seasons
                .into_iter()
                .map(|s| SeasonSummary {
                    season_number: s.season_number,
                    name: s.name,
                    episode_count: s.episode_count,
                    air_date: non_empty(s.air_date),
                    poster_path: non_empty(s.poster_path),
                })
                .collect(),
            status: non_empty(dto.status),
        }
    }
}

/// TMDB sends `""` for unknown dates and paths.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Full image URL for a poster path, e.g. `/abc.jpg`.
#[must_use]
pub fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path.filter(|p| !p.trim().is_empty())?;
    Some(format!(
        "{}/{}",
        image_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_token: String,
    language: String,
    include_adult: bool,
}

impl TmdbClient {
    pub fn with_shared_client(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            language: config.language.clone(),
            include_adult: config.include_adult,
        }
    }

    fn request_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?language={}",
            self.base_url,
            path,
            urlencoding::encode(&self.language)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.request_url(path, params);
        debug!(path, "TMDB request");

        let mut request = self.client.get(&url);
        if !self.api_token.is_empty() {
            request = request.bearer_auth(&self.api_token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("TMDB request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpStatusError::new(status.as_u16(), body).into());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode TMDB response: {path}"))
    }

    async fn get_page(&self, path: &str, params: &[(&str, String)]) -> Result<PagedResponse<ListItem>> {
        let page: PagedResponse<ListItem> = self.get_json(path, params).await?;
        debug!(
            path,
            page = page.page,
            total_pages = page.total_pages,
            total_results = page.total_results,
            returned = page.results.len(),
            "TMDB page received"
        );
        Ok(page)
    }

    async fn search(&self, path: &str, query: &str, page: u32) -> Result<Vec<MediaSummary>> {
        let kind = if path.ends_with("/tv") {
            MediaKind::Series
        } else {
            MediaKind::Movie
        };
        let params = [
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("include_adult", self.include_adult.to_string()),
        ];
        let response = self.get_page(path, &params).await?;
        Ok(summaries_of_kind(response.results, kind))
    }
}

fn summaries_of_kind(results: Vec<ListItem>, kind: MediaKind) -> Vec<MediaSummary> {
    results.into_iter().map(|r| r.into_summary(kind)).collect()
}

fn trending_summaries(results: Vec<ListItem>) -> Vec<MediaSummary> {
    results
        .into_iter()
        .filter_map(|r| r.trending_kind().map(|kind| r.into_summary(kind)))
        .collect()
}

#[async_trait]
impl MediaCatalog for TmdbClient {
    async fn trending(&self, page: u32) -> Result<Vec<MediaSummary>> {
        let response = self
            .get_page("/trending/all/day", &[("page", page.to_string())])
            .await?;
        Ok(trending_summaries(response.results))
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MediaSummary>> {
        self.search("/search/movie", query, page).await
    }

    async fn search_series(&self, query: &str, page: u32) -> Result<Vec<MediaSummary>> {
        self.search("/search/tv", query, page).await
    }

    async fn movie_details(&self, id: MediaId) -> Result<MovieDetail> {
        let dto: MovieDto = self.get_json(&format!("/movie/{id}"), &[]).await?;
        Ok(dto.into())
    }

    async fn series_details(&self, id: MediaId) -> Result<SeriesDetail> {
        let dto: SeriesDto = self.get_json(&format!("/tv/{id}"), &[]).await?;
        Ok(dto.into())
    }
}
