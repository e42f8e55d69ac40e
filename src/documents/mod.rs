//! Hierarchical document store addressed by `collection/document/...` paths.
//!
//! The store offers single-document operations only. There is no transaction
//! spanning two documents; callers that touch several documents must handle
//! partial success themselves.

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryDocumentStore, Operation};
pub use sqlite::SqliteDocumentStore;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::constants::limits::MAX_PATH_SEGMENT_LEN;

/// Field map of one document.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Location of a single document: alternating collection and document ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// Builds a document path from its segments.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] when the segment count is odd or zero
    /// (that would address a collection), or a segment is empty, contains `/`,
    /// is `.`/`..`, or is too long.
    pub fn new<I, S>(segments: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();

        if segments.is_empty() || segments.len() % 2 != 0 {
            return Err(StoreError::InvalidPath(format!(
                "'{}' does not address a document",
                segments.join("/")
            )));
        }

        for segment in &segments {
            validate_segment(segment)?;
        }

        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path of the collection holding this document.
    #[must_use]
    pub fn collection(&self) -> String {
        self.segments[..self.segments.len() - 1].join("/")
    }

    /// Id of the document within its collection.
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Path of a document nested under this one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] when either segment is invalid.
    pub fn child(&self, collection: &str, document: &str) -> Result<Self, StoreError> {
        validate_segment(collection)?;
        validate_segment(document)?;
        let mut segments = self.segments.clone();
        segments.push(collection.to_string());
        segments.push(document.to_string());
        Ok(Self { segments })
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

fn validate_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() {
        return Err(StoreError::InvalidPath("empty path segment".to_string()));
    }
    if segment.contains('/') {
        return Err(StoreError::InvalidPath(format!(
            "segment '{segment}' must not contain '/'"
        )));
    }
    if segment == "." || segment == ".." {
        return Err(StoreError::InvalidPath(format!(
            "segment '{segment}' is reserved"
        )));
    }
    if segment.len() > MAX_PATH_SEGMENT_LEN {
        return Err(StoreError::InvalidPath(format!(
            "segment longer than {MAX_PATH_SEGMENT_LEN} bytes"
        )));
    }
    Ok(())
}

/// Single-document operations of the backing store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a document; `None` when it does not exist.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Creates or overwrites a document wholesale.
    async fn set(&self, path: &DocumentPath, fields: Document) -> Result<(), StoreError>;

    /// Deletes a document. Deleting a missing document succeeds.
    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError>;

    /// Removes one field from a document. A missing document or field is a no-op.
    async fn delete_field(&self, path: &DocumentPath, field: &str) -> Result<(), StoreError>;
}
