use crate::entities::{preferences, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// Local key-value settings (profile names, signed-in account).
pub struct PreferenceRepository {
    conn: DatabaseConnection,
}

impl PreferenceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = Preferences::find_by_id(key.to_string())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to read preference {key}"))?;

        Ok(row.map(|r| r.value))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let active_model = preferences::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
        };

        Preferences::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(preferences::Column::Key)
                    .update_column(preferences::Column::Value)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to write preference {key}"))?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        Preferences::delete_by_id(key.to_string())
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to remove preference {key}"))?;
        Ok(())
    }
}
