//! EdPulse Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use edpulse_config::Config;
//! use std::str::FromStr;
//!
//! let toml = r#"
//! [store]
//! base_dir = "/var/lib/edpulse"
//!
//! [services]
//! druid_host = "http://localhost:8082/"
//! org_search = "http://localhost:9000/api/org/v1/search"
//! "#;
//! let config = Config::from_str(toml).unwrap();
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [store]
//! base_dir = "/var/lib/edpulse"
//!
//! [services]
//! druid_host = "http://druid:8082/"
//! org_search = "https://portal.example.org/api/org/v1/search"
//! ```

mod dates;
mod error;
mod logging;
mod platform;
mod services;
mod store;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use dates::RunDates;
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use platform::{PlatformContext, PLATFORM_CONTEXT_PATH};
pub use services::ServicesConfig;
pub use store::{BlobConfig, StoreConfig};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with defaults except `[services]`, whose
/// endpoints have no sensible fallback and are validated after load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Data store locations (local tree + blob storage)
    pub store: StoreConfig,

    /// External service endpoints (Druid, org search, telemetry)
    pub services: ServicesConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML,
    /// or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_str(&contents)
    }

    /// Validate the configuration
    ///
    /// Checks that required endpoints are present and well-formed.
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        self.services.validate()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[log]
level = "debug"
format = "json"

[store]
base_dir = "/var/lib/edpulse"

[store.blob]
base_url = "https://blob.example.org/reports"

[services]
druid_host = "http://druid:8082/"
org_search = "https://portal.example.org/api/org/v1/search"
content_search = "https://portal.example.org/api/content/v1/search"
content_hierarchy = "https://portal.example.org/api/content/v1/hierarchy"
telemetry = "https://telemetry.example.org/v1/metrics"
"#;

    #[test]
    fn test_full_config() {
        let config = Config::from_str(FULL).unwrap();
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.store.base_dir.to_str(), Some("/var/lib/edpulse"));
        assert_eq!(config.services.druid_host, "http://druid:8082/");
        assert!(config.services.telemetry.is_some());
    }

    #[test]
    fn test_minimal_config() {
        let toml = r#"
[store]
base_dir = "data"

[services]
druid_host = "http://localhost:8082/"
org_search = "http://localhost:9000/api/org/v1/search"
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.log.level, LogLevel::Info);
        assert!(config.store.blob.is_none());
        assert!(config.services.telemetry.is_none());
    }

    #[test]
    fn test_missing_druid_host_rejected() {
        let toml = r#"
[store]
base_dir = "data"

[services]
org_search = "http://localhost:9000/api/org/v1/search"
"#;
        assert!(Config::from_str(toml).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edpulse.toml");
        std::fs::write(&path, FULL).unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/edpulse.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/edpulse.toml"));
    }
}
