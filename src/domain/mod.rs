//! Domain primitives shared by the catalog, favourites and screen layers.
//!
//! Identifiers follow the newtype pattern so a catalog id can never be passed
//! where a user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier of a movie or series.
///
/// # Examples
///
/// ```rust
/// use reelvault::domain::MediaId;
///
/// let id = MediaId::new(101);
/// assert_eq!(id.value(), 101);
/// assert_eq!(id.to_string(), "101");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MediaId(i64);

impl MediaId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MediaId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<MediaId> for i64 {
    fn from(id: MediaId) -> Self {
        id.0
    }
}

impl Serialize for MediaId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for MediaId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Opaque identifier of a signed-in account.
///
/// Used as the top-level collection name in the document store, so it is kept
/// as the provider issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Series,
}

impl MediaKind {
    /// The favourites list an entry of this kind belongs to.
    #[must_use]
    pub const fn list_type(self) -> ListType {
        match self {
            Self::Movie => ListType::FavouriteMovies,
            Self::Series => ListType::FavouriteSeries,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the two per-user favourites lists.
///
/// The string form is the document id of the list's pointer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListType {
    #[serde(rename = "FAVOURITE_MOVIES")]
    FavouriteMovies,
    #[serde(rename = "FAVOURITE_SERIES")]
    FavouriteSeries,
}

impl ListType {
    pub const ALL: [Self; 2] = [Self::FavouriteMovies, Self::FavouriteSeries];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FavouriteMovies => "FAVOURITE_MOVIES",
            Self::FavouriteSeries => "FAVOURITE_SERIES",
        }
    }

    #[must_use]
    pub const fn media_kind(self) -> MediaKind {
        match self {
            Self::FavouriteMovies => MediaKind::Movie,
            Self::FavouriteSeries => MediaKind::Series,
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "favourite_movies" | "movies" | "movie" => Ok(Self::FavouriteMovies),
            "favourite_series" | "series" | "tv" => Ok(Self::FavouriteSeries),
            other => Err(format!("Unknown favourites list: {other}")),
        }
    }
}
