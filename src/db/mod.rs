use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

/// Handle to the local SQLite database: documents, accounts and preferences.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Fresh in-memory database, used by tests and the `memory` backend.
    pub async fn in_memory() -> Result<Self> {
        Self::with_pool_options("sqlite::memory:", 1, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn document_repo(&self) -> repositories::document::DocumentRepository {
        repositories::document::DocumentRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn preference_repo(&self) -> repositories::preference::PreferenceRepository {
        repositories::preference::PreferenceRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Documents
    // ========================================================================

    pub async fn get_document(&self, path: &str) -> Result<Option<String>> {
        self.document_repo().get(path).await
    }

    pub async fn put_document(&self, path: &str, collection: &str, fields_json: String) -> Result<()> {
        self.document_repo().upsert(path, collection, fields_json).await
    }

    pub async fn delete_document(&self, path: &str) -> Result<bool> {
        self.document_repo().delete(path).await
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub async fn create_user(&self, email: &str, password: &str) -> Result<User> {
        self.user_repo().create(email, password).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn record_password_reset(&self, user: &User) -> Result<String> {
        self.user_repo().record_password_reset(user).await
    }

    pub async fn count_password_resets(&self, user_id: &str) -> Result<u64> {
        self.user_repo().count_password_resets(user_id).await
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        self.preference_repo().get(key).await
    }

    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.preference_repo().set(key, value).await
    }

    pub async fn remove_preference(&self, key: &str) -> Result<()> {
        self.preference_repo().remove(key).await
    }
}
