use std::sync::Arc;
use std::time::Duration;

use atelier_cloud::{
    HttpProcessingTrigger, LocalObjectStore, NoopProcessingTrigger, ObjectStore,
    ProcessingTrigger, S3ObjectStore, TriggerError,
};

use crate::config::{ProcessingConfig, ServerConfig, StorageBackend, StorageConfig};
use crate::workflow::CatalogWorkflow;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: atelier_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Transactional write side of the catalogue.
    pub workflow: Arc<CatalogWorkflow>,
}

impl AppState {
    /// Wire the write workflow to its collaborators.
    pub fn new(
        pool: atelier_db::DbPool,
        config: ServerConfig,
        store: Arc<dyn ObjectStore>,
        trigger: Arc<dyn ProcessingTrigger>,
    ) -> Self {
        let workflow = CatalogWorkflow::new(pool.clone(), store, trigger, config.max_upload_bytes);
        Self {
            pool,
            config: Arc::new(config),
            workflow: Arc::new(workflow),
        }
    }
}

/// Build the object store selected by `STORAGE_BACKEND`.
pub async fn build_object_store(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    match &config.backend {
        StorageBackend::Local { root } => {
            tracing::info!(root = %root.display(), "Using local object store");
            Arc::new(LocalObjectStore::new(
                root.clone(),
                config.public_base_url.clone(),
            ))
        }
        StorageBackend::S3(settings) => {
            tracing::info!(bucket = %settings.bucket, region = %settings.region, "Using S3 object store");
            Arc::new(S3ObjectStore::connect(settings.clone()).await)
        }
    }
}

/// Build the processing trigger; without a webhook URL notifications are
/// logged and dropped.
pub fn build_processing_trigger(
    config: &ProcessingConfig,
) -> Result<Arc<dyn ProcessingTrigger>, TriggerError> {
    match &config.webhook_url {
        Some(url) => {
            tracing::info!(%url, "Processing webhook configured");
            let trigger =
                HttpProcessingTrigger::new(url.clone(), Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(trigger))
        }
        None => {
            tracing::info!("No processing webhook configured; notifications are no-ops");
            Ok(Arc::new(NoopProcessingTrigger))
        }
    }
}
