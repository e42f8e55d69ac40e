use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::clients::{MediaCatalog, TmdbClient};
use crate::config::{Config, StoreBackend};
use crate::db::Store;
use crate::documents::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore};
use crate::domain::{MediaId, MediaKind};
use crate::favourites::FavouritesIndex;
use crate::screens::{
    DetailsHolder, FavouritesHolder, LogInHolder, ResetPasswordHolder, SearchHolder,
    SignUpHolder, TrendingHolder,
};
use crate::services::{AuthService, SeaOrmAuthService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Reelvault/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Process-wide handles shared by every screen.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub catalog: Arc<dyn MediaCatalog>,

    pub documents: Arc<dyn DocumentStore>,

    pub auth: Arc<dyn AuthService>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await
        .context("Failed to open database")?;

        let http_client = build_shared_http_client(config.tmdb.request_timeout_seconds)?;
        let catalog: Arc<dyn MediaCatalog> =
            Arc::new(TmdbClient::with_shared_client(http_client, &config.tmdb));

        Ok(Self::from_parts(config, store, catalog))
    }

    /// Wires the remaining services around an existing store and catalog.
    pub fn from_parts(config: Config, store: Store, catalog: Arc<dyn MediaCatalog>) -> Self {
        let documents: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Sqlite => Arc::new(SqliteDocumentStore::new(store.clone())),
            StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
        };
        info!(backend = ?config.store.backend, "Document store ready");

        let auth: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            catalog,
            documents,
            auth,
        }
    }

    /// Favourites of the signed-in account, `None` when signed out.
    pub async fn favourites(&self) -> anyhow::Result<Option<Arc<FavouritesIndex>>> {
        let account = self.auth.current_user().await?;
        Ok(account.map(|a| Arc::new(FavouritesIndex::new(a.user_id, Arc::clone(&self.documents)))))
    }

    #[must_use]
    pub fn trending_holder(&self) -> TrendingHolder {
        TrendingHolder::new(Arc::clone(&self.catalog))
    }

    #[must_use]
    pub fn search_holder(&self) -> SearchHolder {
        SearchHolder::new(Arc::clone(&self.catalog))
    }

    pub async fn details_holder(&self, id: MediaId, kind: MediaKind) -> anyhow::Result<DetailsHolder> {
        let favourites = self.favourites().await?;
        Ok(
            DetailsHolder::new(Arc::clone(&self.catalog), favourites, id, kind)
                .with_image_base_url(self.config.tmdb.image_base_url.clone()),
        )
    }

    /// # Errors
    ///
    /// Fails when nobody is signed in.
    pub async fn favourites_holder(&self) -> anyhow::Result<FavouritesHolder> {
        let index = self
            .favourites()
            .await?
            .context("Sign in to see your favourites")?;
        Ok(FavouritesHolder::new(index))
    }

    #[must_use]
    pub fn sign_up_holder(&self) -> SignUpHolder {
        SignUpHolder::new(Arc::clone(&self.auth), self.store.clone())
    }

    #[must_use]
    pub fn log_in_holder(&self) -> LogInHolder {
        LogInHolder::new(Arc::clone(&self.auth))
    }

    #[must_use]
    pub fn reset_password_holder(&self) -> ResetPasswordHolder {
        ResetPasswordHolder::new(Arc::clone(&self.auth))
    }
}
