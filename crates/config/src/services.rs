//! External service endpoints
//!
//! The pipeline talks to four upstream services: the Druid analytics
//! cluster, the organisation search API, the content search/hierarchy
//! APIs, and (optionally) a telemetry collector for run metrics.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// External service endpoints
///
/// # Example
///
/// ```toml
/// [services]
/// druid_host = "http://druid-broker:8082/"
/// org_search = "https://portal.example.org/api/org/v1/search"
/// content_search = "https://portal.example.org/api/content/v1/search"
/// content_hierarchy = "https://portal.example.org/api/content/v1/hierarchy"
/// telemetry = "https://telemetry.example.org/v1/metrics"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Druid broker base URL; queries POST to `<druid_host>druid/v2/`
    pub druid_host: String,

    /// Organisation search endpoint (tenant info source)
    pub org_search: String,

    /// Content search endpoint (snapshot producer, upstream)
    pub content_search: String,

    /// Content hierarchy endpoint (snapshot producer, upstream)
    pub content_hierarchy: String,

    /// Telemetry endpoint for end-of-run metric events.
    /// When absent, the event is logged instead of posted.
    pub telemetry: Option<String>,

    /// Request timeout in seconds for all service calls (default: 30)
    pub timeout_secs: u64,
}

impl ServicesConfig {
    /// Validate service endpoints
    ///
    /// `druid_host` and `org_search` are required; the content endpoints
    /// belong to the upstream snapshot producer and may be blank in
    /// deployments where the snapshot is only ever pulled from blob storage.
    pub fn validate(&self) -> Result<()> {
        if self.druid_host.is_empty() {
            return Err(ConfigError::missing_field("services", "druid_host"));
        }
        if self.org_search.is_empty() {
            return Err(ConfigError::missing_field("services", "org_search"));
        }
        for (field, value) in [
            ("druid_host", &self.druid_host),
            ("org_search", &self.org_search),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::invalid_value(
                    "services",
                    field,
                    format!("'{}' is not an http(s) URL", value),
                ));
            }
        }
        Ok(())
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            druid_host: String::new(),
            org_search: String::new(),
            content_search: String::new(),
            content_hierarchy: String::new(),
            telemetry: None,
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServicesConfig {
        ServicesConfig {
            druid_host: "http://druid:8082/".into(),
            org_search: "https://portal.example.org/api/org/v1/search".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_requires_druid_host() {
        let mut config = valid();
        config.druid_host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_requires_org_search() {
        let mut config = valid();
        config.org_search = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bare_host() {
        let mut config = valid();
        config.druid_host = "druid:8082".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(ServicesConfig::default().timeout_secs, 30);
    }
}
