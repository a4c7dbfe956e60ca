//! Photo object-storage seam
//!
//! The portal core only depends on the `PhotoStore` trait; the local
//! filesystem implementation backs it in production, with stored files
//! served as static content under `/photos/`.

use async_trait::async_trait;
use smp_common::{Error, Result};
use std::path::PathBuf;
use uuid::Uuid;

/// One stored photo: the storage key used for deletion plus the public URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub key: String,
    pub url: String,
}

/// Object storage contract for program photos
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store one photo under the given folder prefix
    async fn store(&self, folder_prefix: &str, bytes: &[u8], mime_type: &str)
        -> Result<StoredPhoto>;

    /// Delete a stored photo by key
    ///
    /// Idempotent: deleting an already-absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Filesystem-backed photo store rooted at `<data-dir>/photos`
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

fn extension_for_mime(mime_type: &str) -> Result<&'static str> {
    match mime_type {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        "image/gif" => Ok("gif"),
        other => Err(Error::InvalidInput(format!(
            "Unsupported photo type: {}",
            other
        ))),
    }
}

fn valid_key_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && component
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn store(
        &self,
        folder_prefix: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<StoredPhoto> {
        if !valid_key_component(folder_prefix) {
            return Err(Error::InvalidInput(format!(
                "Invalid storage prefix: {}",
                folder_prefix
            )));
        }
        let ext = extension_for_mime(mime_type)?;
        let key = format!("{}/{}.{}", folder_prefix, Uuid::new_v4(), ext);

        let path = self.root.join(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        Ok(StoredPhoto {
            url: format!("/photos/{}", key),
            key,
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        // Keys are always "<prefix>/<uuid>.<ext>"; reject anything else so a
        // stored key can never address files outside the photo root.
        if !key.split('/').all(valid_key_component) {
            return Err(Error::InvalidInput(format!("Invalid storage key: {}", key)));
        }

        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            // Idempotent delete: already absent is fine
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_delete_photo() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());

        let stored = store
            .store("unit-1", b"fake-jpeg-bytes", "image/jpeg")
            .await
            .expect("store failed");

        assert!(stored.key.starts_with("unit-1/"));
        assert!(stored.key.ends_with(".jpg"));
        assert_eq!(stored.url, format!("/photos/{}", stored.key));
        assert!(tmp.path().join(&stored.key).is_file());

        store.delete(&stored.key).await.expect("delete failed");
        assert!(!tmp.path().join(&stored.key).exists());
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        store
            .delete("unit-1/does-not-exist.jpg")
            .await
            .expect("idempotent delete failed");
    }

    #[tokio::test]
    async fn test_unsupported_mime_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        let err = store
            .store("unit-1", b"data", "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_traversal_key_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        assert!(store.delete("../etc/passwd").await.is_err());
    }
}
