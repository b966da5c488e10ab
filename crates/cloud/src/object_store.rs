//! Object storage contract.

use async_trait::async_trait;

/// Errors from an object store.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    /// The key is empty, absolute or escapes the store root.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Object store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The remote backend rejected or failed the request.
    #[error("Object store request failed: {0}")]
    Backend(String),
}

/// Acknowledgement of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
    pub size: u64,
}

/// Binary storage addressed by slash-separated keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, ObjectStoreError>;

    /// Remove an object. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}

/// Reject keys that are empty, absolute or contain `..` segments.
pub fn validate_key(key: &str) -> Result<(), ObjectStoreError> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment.is_empty() || segment == "..")
    {
        return Err(ObjectStoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Join a public base URL and a key with exactly one slash.
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
