//! Data store directory layout
//!
//! Path construction for every artefact the pipeline reads or writes.
//! Date partitions always render `YYYY-MM-DD`; dashboard targets are
//! `overall` or an organisation slug.

use std::fs;
use std::path::{Path, PathBuf};

use edpulse_config::PLATFORM_CONTEXT_PATH;

use crate::error::{Result, StoreError};

/// The local working tree
#[derive(Debug, Clone)]
pub struct DataStore {
    base: PathBuf,
}

impl DataStore {
    /// Create a store rooted at `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Root directory
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Create the top-level directories the run writes into
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [
            "config",
            "tb_metadata",
            "textbook_reports",
            "downloads",
            "play",
            "dialcode_scans",
            "portal_dashboards",
        ] {
            let path = self.base.join(dir);
            fs::create_dir_all(&path).map_err(|e| StoreError::io(path.display().to_string(), e))?;
        }
        Ok(())
    }

    /// Platform context document
    pub fn platform_context(&self) -> PathBuf {
        self.base.join(PLATFORM_CONTEXT_PATH)
    }

    /// Content metadata snapshot for one partition
    pub fn snapshot_csv(&self, partition: &str) -> PathBuf {
        self.base
            .join("tb_metadata")
            .join(partition)
            .join("textbook_snapshot.csv")
    }

    /// Tenant info table for one partition
    pub fn tenant_info_csv(&self, partition: &str) -> PathBuf {
        self.base
            .join("textbook_reports")
            .join(partition)
            .join("tenant_info.csv")
    }

    /// Downloads intermediate table for one partition
    pub fn downloads_csv(&self, partition: &str) -> PathBuf {
        self.base.join("downloads").join(partition).join("downloads.csv")
    }

    /// App-sessions intermediate table for one partition
    pub fn app_sessions_csv(&self, partition: &str) -> PathBuf {
        self.base.join("play").join(partition).join("app_sessions.csv")
    }

    /// Plays intermediate table for one partition
    pub fn plays_csv(&self, partition: &str) -> PathBuf {
        self.base.join("play").join(partition).join("plays.csv")
    }

    /// Dial-code scans intermediate table for one partition
    pub fn dial_scans_csv(&self, partition: &str) -> PathBuf {
        self.base
            .join("dialcode_scans")
            .join(partition)
            .join("dial_scans.csv")
    }

    /// Dashboard history CSV for a target (`overall` or an org slug)
    pub fn dashboard_csv(&self, target: &str) -> PathBuf {
        self.base
            .join("portal_dashboards")
            .join(target)
            .join("daily_metrics.csv")
    }

    /// Blob object key for a path inside the store
    ///
    /// Keys mirror the local tree, with `/` separators.
    pub fn key_for(&self, path: &Path) -> Result<String> {
        let relative = path
            .strip_prefix(&self.base)
            .map_err(|_| StoreError::OutsideStore {
                path: path.display().to_string(),
            })?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(segments.join("/"))
    }
}

/// Create the parent directory of a file path
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent.display().to_string(), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitioned_paths() {
        let store = DataStore::new("/var/lib/edpulse");
        assert_eq!(
            store.dial_scans_csv("2024-03-14"),
            PathBuf::from("/var/lib/edpulse/dialcode_scans/2024-03-14/dial_scans.csv")
        );
        assert_eq!(
            store.plays_csv("2024-03-14"),
            PathBuf::from("/var/lib/edpulse/play/2024-03-14/plays.csv")
        );
        assert_eq!(
            store.dashboard_csv("overall"),
            PathBuf::from("/var/lib/edpulse/portal_dashboards/overall/daily_metrics.csv")
        );
    }

    #[test]
    fn test_key_for() {
        let store = DataStore::new("/var/lib/edpulse");
        let key = store
            .key_for(&store.downloads_csv("2024-03-14"))
            .unwrap();
        assert_eq!(key, "downloads/2024-03-14/downloads.csv");
    }

    #[test]
    fn test_key_for_rejects_outside_path() {
        let store = DataStore::new("/var/lib/edpulse");
        assert!(store.key_for(Path::new("/tmp/other.csv")).is_err());
    }

    #[test]
    fn test_ensure_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        store.ensure_layout().unwrap();
        assert!(dir.path().join("portal_dashboards").is_dir());
        assert!(dir.path().join("dialcode_scans").is_dir());
    }
}
