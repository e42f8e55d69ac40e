//! Document store persisted in the local SQLite database, one row per document.

use async_trait::async_trait;

use super::{Document, DocumentPath, DocumentStore, StoreError};
use crate::db::Store;

#[derive(Clone)]
pub struct SqliteDocumentStore {
    store: Store,
}

impl SqliteDocumentStore {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn db_error(err: anyhow::Error) -> StoreError {
    StoreError::Database(format!("{err:#}"))
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let Some(json) = self
            .store
            .get_document(&path.to_string())
            .await
            .map_err(db_error)?
        else {
            return Ok(None);
        };

        let fields: Document = serde_json::from_str(&json)?;
        Ok(Some(fields))
    }

    async fn set(&self, path: &DocumentPath, fields: Document) -> Result<(), StoreError> {
        let json = serde_json::to_string(&fields)?;
        self.store
            .put_document(&path.to_string(), &path.collection(), json)
            .await
            .map_err(db_error)
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        self.store
            .delete_document(&path.to_string())
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn delete_field(&self, path: &DocumentPath, field: &str) -> Result<(), StoreError> {
        let Some(mut fields) = self.get(path).await? else {
            return Ok(());
        };

        if fields.remove(field).is_some() {
            self.set(path, fields).await?;
        }
        Ok(())
    }
}
