use serde::{Deserialize, Serialize};

use crate::domain::{ListType, MediaId};
use crate::models::media::{MediaDetail, MediaSummary};

/// A movie or series saved to one of the user's favourites lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavouriteItem {
    pub id: MediaId,
    pub name: String,
    pub list_type: ListType,
    pub average_rating: Option<f64>,
    pub poster_path: Option<String>,
}

impl FavouriteItem {
    pub fn new(id: MediaId, name: impl Into<String>, list_type: ListType) -> Self {
        Self {
            id,
            name: name.into(),
            list_type,
            average_rating: None,
            poster_path: None,
        }
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.average_rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    /// Fields persisted in the item document.
    #[must_use]
    pub fn to_document(&self) -> FavouriteDocument {
        FavouriteDocument {
            id: self.id,
            name: self.name.clone(),
            poster_path: self.poster_path.clone(),
            average_rating: self.average_rating,
        }
    }
}

impl From<&MediaDetail> for FavouriteItem {
    fn from(detail: &MediaDetail) -> Self {
        Self {
            id: detail.id(),
            name: detail.title().to_string(),
            list_type: detail.kind().list_type(),
            average_rating: Some(detail.vote_average()),
            poster_path: detail.poster_path().map(str::to_string),
        }
    }
}

impl From<&MediaSummary> for FavouriteItem {
    fn from(summary: &MediaSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.title.clone(),
            list_type: summary.media_type.list_type(),
            average_rating: Some(summary.vote_average),
            poster_path: summary.poster_path.clone(),
        }
    }
}

/// Stored shape of an item document. The list type is implied by the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteDocument {
    pub id: MediaId,
    pub name: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
}

impl FavouriteDocument {
    #[must_use]
    pub fn into_item(self, list_type: ListType) -> FavouriteItem {
        FavouriteItem {
            id: self.id,
            name: self.name,
            list_type,
            average_rating: self.average_rating,
            poster_path: self.poster_path,
        }
    }
}
