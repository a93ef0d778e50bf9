use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::resolver::{DirectoryResolver, EnvDirectory, FixedDirectory};

/// Configuration for a profile store.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// root = "/srv/talk"
/// verify_checksums = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Explicit storage directory. When unset, `$TALK_HOME` or the user's
    /// downloads folder is used.
    pub root: Option<PathBuf>,
    /// Reject blobs whose trailing checksum does not match their contents.
    pub verify_checksums: bool,
    /// `fsync` each blob before it is renamed into place.
    pub sync_on_write: bool,
    /// Largest blob a load will read; bigger files are reported as corrupted.
    pub max_blob_bytes: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: None,
            verify_checksums: true,
            sync_on_write: true,
            max_blob_bytes: 256 * 1024 * 1024,
        }
    }
}

impl StoreConfig {
    /// Configuration rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Default::default()
        }
    }

    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// The directory capability implied by `root`.
    pub fn resolver(&self) -> Box<dyn DirectoryResolver> {
        match &self.root {
            Some(root) => Box::new(FixedDirectory::new(root.clone())),
            None => Box::new(EnvDirectory::downloads()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert!(c.root.is_none());
        assert!(c.verify_checksums);
        assert!(c.sync_on_write);
        assert_eq!(c.max_blob_bytes, 256 * 1024 * 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let text = "root = \"/srv/talk\"\nverify_checksums = false\n";
        let c = StoreConfig::from_toml_str(text).unwrap();
        assert_eq!(c.root, Some(PathBuf::from("/srv/talk")));
        assert!(!c.verify_checksums);
        assert!(c.sync_on_write);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(StoreConfig::from_toml_str("").unwrap(), StoreConfig::default());
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = StoreConfig::from_toml_str("verify_checksums = \"yes\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = StoreConfig {
            max_blob_bytes: 1024,
            ..StoreConfig::at("/tmp/talk")
        };
        let text = c.to_toml_string().unwrap();
        assert_eq!(StoreConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.toml");
        std::fs::write(&path, "sync_on_write = false\n").unwrap();
        let c = StoreConfig::load(&path).unwrap();
        assert!(!c.sync_on_write);
    }

    #[test]
    fn explicit_root_resolves_to_itself() {
        let c = StoreConfig::at("/srv/talk");
        assert_eq!(c.resolver().resolve().unwrap(), PathBuf::from("/srv/talk"));
    }
}
