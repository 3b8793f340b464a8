use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::store::{DocumentStore, MemoryStore, PostgresStore};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no `DATABASE_URL` is configured.
    pub store: Option<Arc<dyn DocumentStore>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Option<Arc<dyn DocumentStore>> = match config.database_url.as_deref() {
            None => {
                tracing::warn!("DATABASE_URL not set; running without a document store");
                None
            }
            Some(url) if url.starts_with("memory:") => {
                tracing::info!("using in-memory document store");
                Some(Arc::new(MemoryStore::new()))
            }
            Some(url) => {
                let pg = PostgresStore::connect(url, config.db_max_connections)?;
                if let Err(e) = pg.migrate().await {
                    tracing::warn!(error = %e, "migrations failed; store may be unreachable");
                }
                Some(Arc::new(pg))
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Option<Arc<dyn DocumentStore>>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> Result<&dyn DocumentStore, ApiError> {
        self.store.as_deref().ok_or(ApiError::StoreUnavailable)
    }

    pub async fn close(&self) {
        if let Some(store) = &self.store {
            store.close().await;
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_parts(
            Some(Arc::new(MemoryStore::new())),
            Arc::new(AppConfig::for_tests()),
        )
    }
}
