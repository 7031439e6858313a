//! Blob storage
//!
//! Persisted artefacts are mirrored to an object container keyed by
//! their store-relative paths. A `backup` upload additionally retains a
//! dated copy under `backup/<YYYY-MM-DD>/`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use edpulse_config::BlobConfig;

use crate::error::{Result, StoreError};
use crate::layout::{ensure_parent, DataStore};

/// Object storage operations
///
/// Implementations are interchangeable: the HTTP container in
/// production, a directory mirror for local runs, a no-op when blob
/// storage is not configured.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch an object's bytes
    ///
    /// Absence is the typed [`StoreError::BlobNotFound`], distinguishable
    /// from transport failures.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;

    /// Upload an object; `backup` retains an additional dated copy
    async fn upload(&self, key: &str, bytes: &[u8], backup: bool) -> Result<()>;
}

/// Fetch a blob object into its place in the local tree
pub async fn pull_file(blob: &dyn BlobStore, store: &DataStore, path: &Path) -> Result<()> {
    let key = store.key_for(path)?;
    let bytes = blob.fetch(&key).await?;
    ensure_parent(path)?;
    std::fs::write(path, &bytes).map_err(|e| StoreError::io(path.display().to_string(), e))?;
    debug!(key, bytes = bytes.len(), "pulled blob object");
    Ok(())
}

/// Upload a local file to its blob key
pub async fn push_file(
    blob: &dyn BlobStore,
    store: &DataStore,
    path: &Path,
    backup: bool,
) -> Result<()> {
    let key = store.key_for(path)?;
    let bytes =
        std::fs::read(path).map_err(|e| StoreError::io(path.display().to_string(), e))?;
    blob.upload(&key, &bytes, backup).await?;
    debug!(key, bytes = bytes.len(), backup, "pushed blob object");
    Ok(())
}

/// Key of the dated backup copy for an object
fn backup_key(key: &str) -> String {
    format!("backup/{}/{}", Utc::now().format("%Y-%m-%d"), key)
}

// =============================================================================
// HTTP container
// =============================================================================

/// Container-style HTTP blob store
///
/// Objects live at `<base_url>/<key>`; GET fetches, PUT uploads.
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBlobStore {
    /// Create a store from blob configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: &BlobConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::BlobTransport {
                key: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let response = self
            .client
            .put(self.url(key))
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| StoreError::BlobTransport {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(StoreError::BlobStatus {
                key: key.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url(key))
            .send()
            .await
            .map_err(|e| StoreError::BlobTransport {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::BlobNotFound {
                key: key.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(StoreError::BlobStatus {
                key: key.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| StoreError::BlobTransport {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    async fn upload(&self, key: &str, bytes: &[u8], backup: bool) -> Result<()> {
        self.put(key, bytes).await?;
        if backup {
            self.put(&backup_key(key), bytes).await?;
        }
        Ok(())
    }
}

// =============================================================================
// Directory mirror
// =============================================================================

/// Filesystem-backed blob store for local runs and tests
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a mirror rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::BlobNotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(StoreError::io(path.display().to_string(), e)),
        }
    }

    async fn upload(&self, key: &str, bytes: &[u8], backup: bool) -> Result<()> {
        let targets = if backup {
            vec![self.object_path(key), self.object_path(&backup_key(key))]
        } else {
            vec![self.object_path(key)]
        };
        for path in targets {
            ensure_parent(&path)?;
            std::fs::write(&path, bytes)
                .map_err(|e| StoreError::io(path.display().to_string(), e))?;
        }
        Ok(())
    }
}

// =============================================================================
// No-op
// =============================================================================

/// Blob store used when no container is configured
///
/// Fetches report absence; uploads are skipped.
pub struct NullBlobStore;

#[async_trait]
impl BlobStore for NullBlobStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        Err(StoreError::BlobNotFound {
            key: key.to_string(),
        })
    }

    async fn upload(&self, _key: &str, _bytes: &[u8], _backup: bool) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "blob_test.rs"]
mod blob_test;
