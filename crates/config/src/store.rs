//! Data store configuration
//!
//! Locations for the local working tree and the blob storage container
//! that persisted reports are pushed to.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Data store configuration
///
/// # Example
///
/// ```toml
/// [store]
/// base_dir = "/var/lib/edpulse"
///
/// [store.blob]
/// base_url = "https://blob.example.org/reports"
/// timeout_secs = 60
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root of the local working tree. All intermediate CSVs and
    /// dashboard histories live under date-partitioned subdirectories here.
    pub base_dir: PathBuf,

    /// Blob storage container. When absent, uploads are skipped and the
    /// run is local-only (useful for development).
    pub blob: Option<BlobConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("data"),
            blob: None,
        }
    }
}

impl StoreConfig {
    /// Validate store settings
    pub fn validate(&self) -> Result<()> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value(
                "store",
                "base_dir",
                "must not be empty",
            ));
        }
        if let Some(blob) = &self.blob {
            blob.validate()?;
        }
        Ok(())
    }
}

/// Blob storage container configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    /// Container base URL. Object keys are appended as path segments.
    pub base_url: String,

    /// Request timeout in seconds (default: 60)
    pub timeout_secs: u64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 60,
        }
    }
}

impl BlobConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::missing_field("store.blob", "base_url"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::invalid_value(
                "store.blob",
                "base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        Ok(())
    }
}
