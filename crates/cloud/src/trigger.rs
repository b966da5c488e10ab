//! Downstream image-processing trigger.
//!
//! After an upload commits, the write workflow tells the processing
//! pipeline where the new original lives. Delivery is best-effort: the
//! caller logs a failure and reports the print as created with processing
//! unconfirmed.

use std::time::Duration;

use async_trait::async_trait;
use atelier_core::types::DbId;
use serde::Serialize;

/// Delays before each retry of a failed notification.
const RETRY_DELAYS_MS: [u64; 2] = [200, 800];

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// What the pipeline needs to derive variants for one stored original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingRequest {
    pub print_id: DbId,
    pub image_id: DbId,
    pub storage_key: String,
    pub public_url: String,
    pub content_type: String,
}

/// Error type for trigger failures.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Processing endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

#[async_trait]
pub trait ProcessingTrigger: Send + Sync {
    async fn notify(&self, request: &ProcessingRequest) -> Result<(), TriggerError>;
}

// ---------------------------------------------------------------------------
// HTTP webhook
// ---------------------------------------------------------------------------

/// POSTs the request as JSON to a webhook, retrying briefly.
pub struct HttpProcessingTrigger {
    client: reqwest::Client,
    url: String,
}

impl HttpProcessingTrigger {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TriggerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn try_send(&self, request: &ProcessingRequest) -> Result<(), TriggerError> {
        let response = self.client.post(&self.url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(TriggerError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProcessingTrigger for HttpProcessingTrigger {
    async fn notify(&self, request: &ProcessingRequest) -> Result<(), TriggerError> {
        for (attempt, delay_ms) in RETRY_DELAYS_MS.iter().enumerate() {
            match self.try_send(request).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url = %self.url,
                        print_id = request.print_id,
                        error = %e,
                        "Processing notification failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                }
            }
        }
        self.try_send(request).await
    }
}

// ---------------------------------------------------------------------------
// No-op
// ---------------------------------------------------------------------------

/// Used when no pipeline is configured. Always succeeds.
#[derive(Debug, Default)]
pub struct NoopProcessingTrigger;

#[async_trait]
impl ProcessingTrigger for NoopProcessingTrigger {
    async fn notify(&self, request: &ProcessingRequest) -> Result<(), TriggerError> {
        tracing::debug!(
            print_id = request.print_id,
            key = %request.storage_key,
            "No processing pipeline configured, skipping notification"
        );
        Ok(())
    }
}
