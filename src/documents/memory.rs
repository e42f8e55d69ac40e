//! Process-local document store.
//!
//! Also used by tests: individual operations on individual paths can be made to
//! fail so partial-write behaviour can be exercised.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Document, DocumentPath, DocumentStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Set,
    Delete,
    DeleteField,
}

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
    faults: RwLock<HashSet<(Operation, String)>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `operation` on `path` fail until [`Self::clear_failures`].
    pub async fn fail_on(&self, operation: Operation, path: &DocumentPath) {
        self.faults
            .write()
            .await
            .insert((operation, path.to_string()));
    }

    pub async fn clear_failures(&self) {
        self.faults.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Whether a document exists at `path`, bypassing injected faults.
    pub async fn contains(&self, path: &DocumentPath) -> bool {
        self.documents.read().await.contains_key(&path.to_string())
    }

    async fn check(&self, operation: Operation, key: &str) -> Result<(), StoreError> {
        if self
            .faults
            .read()
            .await
            .contains(&(operation, key.to_string()))
        {
            return Err(StoreError::Unavailable(format!(
                "{operation:?} on {key} rejected"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let key = path.to_string();
        self.check(Operation::Get, &key).await?;
        Ok(self.documents.read().await.get(&key).cloned())
    }

    async fn set(&self, path: &DocumentPath, fields: Document) -> Result<(), StoreError> {
        let key = path.to_string();
        self.check(Operation::Set, &key).await?;
        self.documents.write().await.insert(key, fields);
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        let key = path.to_string();
        self.check(Operation::Delete, &key).await?;
        self.documents.write().await.remove(&key);
        Ok(())
    }

    async fn delete_field(&self, path: &DocumentPath, field: &str) -> Result<(), StoreError> {
        let key = path.to_string();
        self.check(Operation::DeleteField, &key).await?;
        if let Some(doc) = self.documents.write().await.get_mut(&key) {
            doc.remove(field);
        }
        Ok(())
    }
}
