//! Media storage abstraction for report attachments.
//!
//! The moderation core treats media as an opaque "store bytes, get URL"
//! operation; only the resulting URL is persisted alongside a report.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Stored media metadata.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Storage key (path or object key).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
}

/// Media store trait.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Store a blob under the given key.
    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredMedia>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem media store.
pub struct LocalMediaStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// Create a new local media store.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredMedia> {
        let path = self.base_path.join(key);

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(StoredMedia {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_joins_cleanly() {
        let store = LocalMediaStore::new(PathBuf::from("/tmp/media"), "/files/".to_string());
        assert_eq!(store.public_url("a/b.png"), "/files/a/b.png");
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = std::env::temp_dir().join(format!("civimod-media-{}", uuid::Uuid::new_v4()));
        let store = LocalMediaStore::new(dir.clone(), "/files".to_string());

        let stored = store
            .store("reports/att1.png", b"png-bytes", "image/png")
            .await
            .unwrap();

        assert_eq!(stored.url, "/files/reports/att1.png");
        assert_eq!(stored.size, 9);
        let on_disk = tokio::fs::read(dir.join("reports/att1.png")).await.unwrap();
        assert_eq!(on_disk, b"png-bytes");
    }
}
