use serde::{Deserialize, Serialize};

use crate::domain::{MediaId, MediaKind};

/// One row of a trending or search listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: MediaId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    /// Release date for movies, first air date for series.
    pub release_or_air_date: Option<String>,
    pub media_type: MediaKind,
    pub original_language: String,
    pub vote_average: f64,
}

impl MediaSummary {
    /// Four-digit year taken from the release/air date, when present.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.release_or_air_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MediaId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub original_language: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub genres: Vec<Genre>,
    pub production_companies: Vec<ProductionCompany>,
    pub runtime_minutes: Option<i64>,
    pub budget: i64,
    pub revenue: i64,
    pub tagline: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: i64,
    pub name: String,
    pub episode_count: Option<i64>,
    pub air_date: Option<String>,
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDetail {
    pub id: MediaId,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub original_language: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub genres: Vec<Genre>,
    pub production_companies: Vec<ProductionCompany>,
    pub number_of_seasons: Option<i64>,
    pub number_of_episodes: Option<i64>,
    pub episode_run_time: Vec<i64>,
    pub seasons: Vec<SeasonSummary>,
    pub status: Option<String>,
}

/// Full record shown on the details screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MediaDetail {
    Movie(MovieDetail),
    Series(SeriesDetail),
}

impl MediaDetail {
    #[must_use]
    pub const fn id(&self) -> MediaId {
        match self {
            Self::Movie(m) => m.id,
            Self::Series(s) => s.id,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Movie(m) => &m.title,
            Self::Series(s) => &s.name,
        }
    }

    #[must_use]
    pub fn poster_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.poster_path.as_deref(),
            Self::Series(s) => s.poster_path.as_deref(),
        }
    }

    #[must_use]
    pub const fn vote_average(&self) -> f64 {
        match self {
            Self::Movie(m) => m.vote_average,
            Self::Series(s) => s.vote_average,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        match self {
            Self::Movie(_) => MediaKind::Movie,
            Self::Series(_) => MediaKind::Series,
        }
    }

    #[must_use]
    pub fn genres(&self) -> &[Genre] {
        match self {
            Self::Movie(m) => &m.genres,
            Self::Series(s) => &s.genres,
        }
    }
}
