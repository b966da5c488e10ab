//! Filesystem-backed object store for development and tests.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::object_store::{public_url, validate_key, ObjectStore, ObjectStoreError, StoredObject};

/// Stores objects as files under a root directory.
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, ObjectStoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let size = bytes.len() as u64;
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(key, size, content_type, path = %path.display(), "Stored object on disk");
        Ok(StoredObject {
            key: key.to_string(),
            public_url: public_url(&self.public_base_url, key),
            size,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn put_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "/media");

        let stored = store
            .put("artists/1/prints/abc.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(stored.public_url, "/media/artists/1/prints/abc.png");
        assert_eq!(stored.size, 3);
        let on_disk = std::fs::read(dir.path().join("artists/1/prints/abc.png")).unwrap();
        assert_eq!(on_disk, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "/media");

        store.put("a.png", vec![0], "image/png").await.unwrap();
        store.delete("a.png").await.unwrap();
        store.delete("a.png").await.unwrap();
        assert!(!dir.path().join("a.png").exists());
    }

    #[tokio::test]
    async fn rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "/media");

        let err = store.put("../escape.png", vec![0], "image/png").await.unwrap_err();
        assert_matches!(err, ObjectStoreError::InvalidKey(_));
    }
}
