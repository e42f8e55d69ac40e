//! Per-user favourites kept as a two-tier index in the document store.
//!
//! Layout for user `u` and list `L`:
//!
//! ```text
//! u/L                 pointer document: { "<name>": <id>, ... }
//! u/L/<name>/<id>     item document:    { id, name, posterPath, averageRating }
//! ```
//!
//! An item is a favourite only when both documents exist. The store has no
//! multi-document transactions, so [`FavouritesIndex::add`] and
//! [`FavouritesIndex::remove`] can leave the two tiers out of step. Their errors
//! say which step failed, and [`FavouritesIndex::list`] is the reconciliation
//! read callers issue after every mutation:
//!
//! - an item document without a pointer entry is invisible to `list`;
//! - a pointer entry without an item document is reported in
//!   [`Listing::unresolved`], never dropped silently.
//!
//! Concurrent mutations of the same item are not ordered against each other.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::documents::{Document, DocumentPath, DocumentStore, StoreError};
use crate::domain::{ListType, MediaId, UserId};
use crate::models::{FavouriteDocument, FavouriteItem};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Invalid favourite: {0}")]
    InvalidItem(String),

    #[error("Failed to read {list_type} pointer document: {source}")]
    PointerRead {
        list_type: ListType,
        #[source]
        source: StoreError,
    },

    #[error(
        "Favourite '{name}' was not fully saved (item document: {}, pointer entry: {})",
        step_outcome(.item_error.as_ref()),
        step_outcome(.pointer_error.as_ref())
    )]
    AddIncomplete {
        name: String,
        item_error: Option<StoreError>,
        pointer_error: Option<StoreError>,
    },

    #[error("Failed to delete favourite '{name}': {source}")]
    RemoveItem {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("Favourite '{name}' was deleted but its pointer entry remains: {source}")]
    RemovePointer {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("{unresolved} of {total} {list_type} entries could not be loaded (first: {first})")]
    PartialList {
        list_type: ListType,
        unresolved: usize,
        total: usize,
        first: String,
    },
}

fn step_outcome(error: Option<&StoreError>) -> String {
    error.map_or_else(|| "written".to_string(), |e| format!("failed: {e}"))
}

impl From<StoreError> for IndexError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPath(msg) => Self::InvalidItem(msg),
            other => Self::InvalidItem(other.to_string()),
        }
    }
}

/// Why a pointer entry did not yield an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The pointer names an item document that does not exist.
    MissingItem,
    /// The item document exists but could not be read or decoded.
    ReadFailed(String),
    /// The pointer entry itself is unusable (non-integer id, bad name).
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedEntry {
    pub name: String,
    pub id: Option<MediaId>,
    pub reason: UnresolvedReason,
}

impl UnresolvedEntry {
    fn describe(&self) -> String {
        let id = self
            .id
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        match &self.reason {
            UnresolvedReason::MissingItem => format!("'{}' ({id}): item document missing", self.name),
            UnresolvedReason::ReadFailed(e) => format!("'{}' ({id}): {e}", self.name),
            UnresolvedReason::Malformed(e) => format!("'{}': {e}", self.name),
        }
    }
}

/// Result of reconstructing one favourites list.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub list_type: ListType,
    pub items: Vec<FavouriteItem>,
    pub unresolved: Vec<UnresolvedEntry>,
}

impl Listing {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// The partial-failure error to show next to `items`, if any entry failed.
    #[must_use]
    pub fn error(&self) -> Option<IndexError> {
        let first = self.unresolved.first()?;
        Some(IndexError::PartialList {
            list_type: self.list_type,
            unresolved: self.unresolved.len(),
            total: self.unresolved.len() + self.items.len(),
            first: first.describe(),
        })
    }
}

pub struct FavouritesIndex {
    user: UserId,
    store: Arc<dyn DocumentStore>,
}

/// Item collection name for a title. Titles are percent-encoded so names such
/// as "Face/Off" form a single path segment; the pointer keeps the raw title.
fn name_segment(name: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(name)
}

impl FavouritesIndex {
    pub fn new(user: UserId, store: Arc<dyn DocumentStore>) -> Self {
        Self { user, store }
    }

    #[must_use]
    pub const fn user(&self) -> &UserId {
        &self.user
    }

    fn pointer_path(&self, list_type: ListType) -> Result<DocumentPath, IndexError> {
        DocumentPath::new([self.user.as_str(), list_type.as_str()]).map_err(IndexError::from)
    }

    fn item_path(
        &self,
        list_type: ListType,
        name: &str,
        id: MediaId,
    ) -> Result<DocumentPath, IndexError> {
        self.pointer_path(list_type)?
            .child(&name_segment(name), &id.to_string())
            .map_err(IndexError::from)
    }

    /// Rebuilds a list from its pointer document.
    ///
    /// Item documents are read concurrently; the result keeps pointer order.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::PointerRead`] when the pointer document cannot be
    /// read. Failures on individual items are reported in
    /// [`Listing::unresolved`] alongside the items that did load.
    pub async fn list(&self, list_type: ListType) -> Result<Listing, IndexError> {
        let pointer_path = self.pointer_path(list_type)?;
        let pointer = self
            .store
            .get(&pointer_path)
            .await
            .map_err(|source| IndexError::PointerRead { list_type, source })?
            .unwrap_or_default();

        debug!(%list_type, entries = pointer.len(), "Resolving favourites pointer");

        let reads = pointer
            .iter()
            .map(|(name, value)| self.resolve_entry(list_type, &pointer_path, name, value));
        let resolved = join_all(reads).await;

        let mut listing = Listing {
            list_type,
            items: Vec::with_capacity(resolved.len()),
            unresolved: Vec::new(),
        };
        for entry in resolved {
            match entry {
                Ok(item) => listing.items.push(item),
                Err(unresolved) => listing.unresolved.push(unresolved),
            }
        }

        if !listing.is_complete() {
            warn!(
                %list_type,
                unresolved = listing.unresolved.len(),
                "Favourites list loaded partially"
            );
        }

        Ok(listing)
    }

    async fn resolve_entry(
        &self,
        list_type: ListType,
        pointer_path: &DocumentPath,
        name: &str,
        value: &Value,
    ) -> Result<FavouriteItem, UnresolvedEntry> {
        let unresolved = |id: Option<MediaId>, reason| UnresolvedEntry {
            name: name.to_string(),
            id,
            reason,
        };

        let Some(id) = value.as_i64().map(MediaId::new) else {
            return Err(unresolved(
                None,
                UnresolvedReason::Malformed(format!("pointer value {value} is not an id")),
            ));
        };

        let path = pointer_path
            .child(&name_segment(name), &id.to_string())
            .map_err(|e| unresolved(Some(id), UnresolvedReason::Malformed(e.to_string())))?;

        let fields = match self.store.get(&path).await {
            Ok(Some(fields)) => fields,
            Ok(None) => return Err(unresolved(Some(id), UnresolvedReason::MissingItem)),
            Err(e) => return Err(unresolved(Some(id), UnresolvedReason::ReadFailed(e.to_string()))),
        };

        serde_json::from_value::<FavouriteDocument>(Value::Object(fields))
            .map(|doc| doc.into_item(list_type))
            .map_err(|e| unresolved(Some(id), UnresolvedReason::ReadFailed(e.to_string())))
    }

    /// Writes the item document and merges the pointer entry.
    ///
    /// The two writes are issued independently and either can fail on its own.
    /// Re-adding an existing item rewrites both documents with the same content.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::AddIncomplete`] naming the failed step(s). Nothing
    /// is rolled back; re-list to see what was persisted.
    pub async fn add(&self, item: &FavouriteItem) -> Result<(), IndexError> {
        let item_path = self.item_path(item.list_type, &item.name, item.id)?;
        let pointer_path = self.pointer_path(item.list_type)?;

        let fields = match serde_json::to_value(item.to_document()) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                return Err(IndexError::InvalidItem(format!(
                    "item serialized to {other} instead of an object"
                )));
            }
            Err(e) => return Err(IndexError::InvalidItem(e.to_string())),
        };

        let (item_result, pointer_result) = futures::join!(
            self.store.set(&item_path, fields),
            self.merge_pointer(&pointer_path, &item.name, item.id),
        );

        if item_result.is_ok() && pointer_result.is_ok() {
            info!(list_type = %item.list_type, name = %item.name, id = %item.id, "Added favourite");
            return Ok(());
        }

        let err = IndexError::AddIncomplete {
            name: item.name.clone(),
            item_error: item_result.err(),
            pointer_error: pointer_result.err(),
        };
        warn!("{err}");
        Err(err)
    }

    async fn merge_pointer(
        &self,
        pointer_path: &DocumentPath,
        name: &str,
        id: MediaId,
    ) -> Result<(), StoreError> {
        let mut pointer: Document = self.store.get(pointer_path).await?.unwrap_or_default();
        pointer.insert(name.to_string(), Value::from(id.value()));
        self.store.set(pointer_path, pointer).await
    }

    /// Deletes the item document, then drops its pointer entry.
    ///
    /// The pointer is only touched after the item document is gone. Removing an
    /// item that is not present succeeds.
    ///
    /// # Errors
    ///
    /// - [`IndexError::RemoveItem`] when the item document could not be deleted;
    ///   the pointer is left untouched.
    /// - [`IndexError::RemovePointer`] when the item is gone but the pointer
    ///   entry could not be removed.
    pub async fn remove(&self, item: &FavouriteItem) -> Result<(), IndexError> {
        let item_path = self.item_path(item.list_type, &item.name, item.id)?;
        let pointer_path = self.pointer_path(item.list_type)?;

        self.store
            .delete(&item_path)
            .await
            .map_err(|source| IndexError::RemoveItem {
                name: item.name.clone(),
                source,
            })?;

        self.store
            .delete_field(&pointer_path, &item.name)
            .await
            .map_err(|source| {
                let err = IndexError::RemovePointer {
                    name: item.name.clone(),
                    source,
                };
                warn!("{err}");
                err
            })?;

        info!(list_type = %item.list_type, name = %item.name, id = %item.id, "Removed favourite");
        Ok(())
    }

    /// Whether both the pointer entry and the item document exist.
    ///
    /// # Errors
    ///
    /// Propagates store read failures.
    pub async fn contains(
        &self,
        list_type: ListType,
        name: &str,
        id: MediaId,
    ) -> Result<bool, IndexError> {
        let pointer_path = self.pointer_path(list_type)?;
        let pointer = self
            .store
            .get(&pointer_path)
            .await
            .map_err(|source| IndexError::PointerRead { list_type, source })?;

        let listed = pointer
            .as_ref()
            .and_then(|p| p.get(name))
            .and_then(Value::as_i64)
            == Some(id.value());
        if !listed {
            return Ok(false);
        }

        let item_path = self.item_path(list_type, name, id)?;
        let item = self
            .store
            .get(&item_path)
            .await
            .map_err(|source| IndexError::PointerRead { list_type, source })?;
        Ok(item.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{MemoryDocumentStore, Operation};

    fn movie_a() -> FavouriteItem {
        FavouriteItem::new(MediaId::new(101), "Movie A", ListType::FavouriteMovies)
            .with_poster("/a.jpg")
            .with_rating(7.5)
    }

    fn setup() -> (Arc<MemoryDocumentStore>, FavouritesIndex) {
        let store = Arc::new(MemoryDocumentStore::new());
        let index = FavouritesIndex::new(UserId::new("u1"), store.clone());
        (store, index)
    }

    fn path(segments: &[&str]) -> DocumentPath {
        DocumentPath::new(segments.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn add_then_list_returns_item_with_all_fields() {
        let (_, index) = setup();
        index.add(&movie_a()).await.unwrap();

        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert!(listing.is_complete());
        assert_eq!(listing.items, vec![movie_a()]);

        let series = index.list(ListType::FavouriteSeries).await.unwrap();
        assert!(series.items.is_empty());
    }

    #[tokio::test]
    async fn add_writes_both_tiers() {
        let (store, index) = setup();
        index.add(&movie_a()).await.unwrap();

        let pointer = store
            .get(&path(&["u1", "FAVOURITE_MOVIES"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pointer.get("Movie A"), Some(&Value::from(101)));
        assert!(store.contains(&path(&["u1", "FAVOURITE_MOVIES", "Movie%20A", "101"])).await);
    }

    #[tokio::test]
    async fn remove_then_list_is_empty_and_second_remove_is_noop() {
        let (store, index) = setup();
        index.add(&movie_a()).await.unwrap();

        index.remove(&movie_a()).await.unwrap();
        assert!(index.list(ListType::FavouriteMovies).await.unwrap().items.is_empty());

        index.remove(&movie_a()).await.unwrap();
        assert!(index.list(ListType::FavouriteMovies).await.unwrap().items.is_empty());
        assert_eq!(store.len().await, 1, "only the emptied pointer document remains");
    }

    #[tokio::test]
    async fn readd_is_idempotent() {
        let (store, index) = setup();
        index.add(&movie_a()).await.unwrap();
        index.add(&movie_a()).await.unwrap();

        assert_eq!(index.list(ListType::FavouriteMovies).await.unwrap().items, vec![movie_a()]);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn failed_pointer_write_leaves_invisible_item() {
        let (store, index) = setup();
        store
            .fail_on(Operation::Set, &path(&["u1", "FAVOURITE_MOVIES"]))
            .await;

        let err = index.add(&movie_a()).await.unwrap_err();
        match &err {
            IndexError::AddIncomplete {
                item_error,
                pointer_error,
                ..
            } => {
                assert!(item_error.is_none());
                assert!(pointer_error.is_some());
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(store.contains(&path(&["u1", "FAVOURITE_MOVIES", "Movie%20A", "101"])).await);
        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert!(listing.items.is_empty());
        assert!(listing.is_complete());
    }

    #[tokio::test]
    async fn failed_item_write_leaves_phantom_pointer_entry() {
        let (store, index) = setup();
        store
            .fail_on(
                Operation::Set,
                &path(&["u1", "FAVOURITE_MOVIES", "Movie%20A", "101"]),
            )
            .await;

        let err = index.add(&movie_a()).await.unwrap_err();
        assert!(err.to_string().contains("item document: failed"));
        assert!(err.to_string().contains("pointer entry: written"));

        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(
            listing.unresolved,
            vec![UnresolvedEntry {
                name: "Movie A".to_string(),
                id: Some(MediaId::new(101)),
                reason: UnresolvedReason::MissingItem,
            }]
        );
        assert!(matches!(
            listing.error(),
            Some(IndexError::PartialList { unresolved: 1, total: 1, .. })
        ));
    }

    #[tokio::test]
    async fn partial_list_keeps_readable_items() {
        let (store, index) = setup();
        let movie_b = FavouriteItem::new(MediaId::new(202), "Movie B", ListType::FavouriteMovies);
        index.add(&movie_a()).await.unwrap();
        index.add(&movie_b).await.unwrap();

        store
            .fail_on(
                Operation::Get,
                &path(&["u1", "FAVOURITE_MOVIES", "Movie%20A", "101"]),
            )
            .await;

        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert_eq!(listing.items, vec![movie_b]);
        assert_eq!(listing.unresolved.len(), 1);
        assert!(matches!(
            listing.unresolved[0].reason,
            UnresolvedReason::ReadFailed(_)
        ));
    }

    #[tokio::test]
    async fn failed_item_delete_leaves_pointer_untouched() {
        let (store, index) = setup();
        index.add(&movie_a()).await.unwrap();
        store
            .fail_on(
                Operation::Delete,
                &path(&["u1", "FAVOURITE_MOVIES", "Movie%20A", "101"]),
            )
            .await;

        let err = index.remove(&movie_a()).await.unwrap_err();
        assert!(matches!(err, IndexError::RemoveItem { .. }));
        assert_eq!(index.list(ListType::FavouriteMovies).await.unwrap().items, vec![movie_a()]);
    }

    #[tokio::test]
    async fn failed_pointer_update_after_delete_is_reported() {
        let (store, index) = setup();
        index.add(&movie_a()).await.unwrap();
        store
            .fail_on(Operation::DeleteField, &path(&["u1", "FAVOURITE_MOVIES"]))
            .await;

        let err = index.remove(&movie_a()).await.unwrap_err();
        assert!(matches!(err, IndexError::RemovePointer { .. }));

        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.unresolved[0].reason, UnresolvedReason::MissingItem);
    }

    #[tokio::test]
    async fn unreadable_pointer_fails_the_whole_list() {
        let (store, index) = setup();
        store
            .fail_on(Operation::Get, &path(&["u1", "FAVOURITE_SERIES"]))
            .await;
        assert!(matches!(
            index.list(ListType::FavouriteSeries).await,
            Err(IndexError::PointerRead { .. })
        ));
    }

    #[tokio::test]
    async fn malformed_pointer_values_are_reported() {
        let (store, index) = setup();
        let mut pointer = Document::new();
        pointer.insert("Broken".to_string(), Value::from("not-an-id"));
        store
            .set(&path(&["u1", "FAVOURITE_MOVIES"]), pointer)
            .await
            .unwrap();

        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert!(matches!(
            listing.unresolved[0].reason,
            UnresolvedReason::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn contains_requires_both_tiers() {
        let (store, index) = setup();
        assert!(!index.contains(ListType::FavouriteMovies, "Movie A", MediaId::new(101)).await.unwrap());

        index.add(&movie_a()).await.unwrap();
        assert!(index.contains(ListType::FavouriteMovies, "Movie A", MediaId::new(101)).await.unwrap());
        assert!(!index.contains(ListType::FavouriteMovies, "Movie A", MediaId::new(102)).await.unwrap());

        store
            .delete(&path(&["u1", "FAVOURITE_MOVIES", "Movie%20A", "101"]))
            .await
            .unwrap();
        assert!(!index.contains(ListType::FavouriteMovies, "Movie A", MediaId::new(101)).await.unwrap());
    }

    #[tokio::test]
    async fn titles_with_slashes_round_trip() {
        let (store, index) = setup();
        let item = FavouriteItem::new(MediaId::new(1018), "Face/Off", ListType::FavouriteMovies)
            .with_rating(6.9);
        index.add(&item).await.unwrap();

        assert!(store.contains(&path(&["u1", "FAVOURITE_MOVIES", "Face%2FOff", "1018"])).await);
        let pointer = store
            .get(&path(&["u1", "FAVOURITE_MOVIES"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pointer.get("Face/Off"), Some(&Value::from(1018)));

        let listing = index.list(ListType::FavouriteMovies).await.unwrap();
        assert!(listing.is_complete());
        assert_eq!(listing.items, vec![item.clone()]);
        assert!(index.contains(ListType::FavouriteMovies, "Face/Off", MediaId::new(1018)).await.unwrap());

        index.remove(&item).await.unwrap();
        assert!(index.list(ListType::FavouriteMovies).await.unwrap().items.is_empty());
        assert!(!store.contains(&path(&["u1", "FAVOURITE_MOVIES", "Face%2FOff", "1018"])).await);
    }
}
