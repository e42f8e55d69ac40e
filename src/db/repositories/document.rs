use crate::entities::{documents, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// Raw row access for the `documents` table.
pub struct DocumentRepository {
    conn: DatabaseConnection,
}

impl DocumentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, path: &str) -> Result<Option<String>> {
        let row = Documents::find_by_id(path.to_string())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to read document {path}"))?;

        Ok(row.map(|r| r.fields_json))
    }

    pub async fn upsert(&self, path: &str, collection: &str, fields_json: String) -> Result<()> {
        let active_model = documents::ActiveModel {
            path: Set(path.to_string()),
            collection: Set(collection.to_string()),
            fields_json: Set(fields_json),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        Documents::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(documents::Column::Path)
                    .update_columns([documents::Column::FieldsJson, documents::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to write document {path}"))?;

        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<bool> {
        let result = Documents::delete_by_id(path.to_string())
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete document {path}"))?;

        Ok(result.rows_affected > 0)
    }
}
