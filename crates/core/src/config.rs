//! Configuration via `subkit.toml`
//!
//! Every setting has a default, so an empty file (or no file at all) gives the
//! stock behavior. Values are validated when the file is loaded.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::info;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "subkit.toml";

/// Default number of entries kept per cache category by an eviction pass
pub const DEFAULT_CACHE_ITEMS: usize = 1000;
/// Default number of yielded items between eviction passes
pub const DEFAULT_EVICTION_INTERVAL: u64 = 2000;
/// Default TTL of muted / approved-submitter lists, in seconds
pub const DEFAULT_MEMBERSHIP_TTL_SECS: u64 = 600;
/// Default TTL of community snapshots, in seconds
pub const DEFAULT_COMMUNITY_TTL_SECS: u64 = 3600;

/// Settings of the stream filter and its caches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Entries kept per cache category by an eviction pass
    pub cache_items: usize,
    /// Yielded items between eviction passes
    pub eviction_interval: u64,
    /// TTL of membership lists, seconds
    pub membership_ttl_secs: u64,
    /// TTL of community snapshots, seconds
    pub community_ttl_secs: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            cache_items: DEFAULT_CACHE_ITEMS,
            eviction_interval: DEFAULT_EVICTION_INTERVAL,
            membership_ttl_secs: DEFAULT_MEMBERSHIP_TTL_SECS,
            community_ttl_secs: DEFAULT_COMMUNITY_TTL_SECS,
        }
    }
}

impl FilterConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.eviction_interval == 0 {
            return Err(Error::Config(
                "filters.eviction_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings of page updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Give up after this many conflicting edits; unset retries forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_conflicts: Option<NonZeroUsize>,
}

/// Whole `subkit.toml`
///
/// # Example
///
/// ```toml
/// [filters]
/// cache_items = 1000
/// eviction_interval = 2000
///
/// [update]
/// max_conflicts = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubkitConfig {
    /// `[filters]`
    pub filters: FilterConfig,
    /// `[update]`
    pub update: UpdateConfig,
}

impl SubkitConfig {
    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# subkit configuration

[filters]
# Entries kept per cache category each time the caches are pruned.
cache_items = 1000

# Number of yielded items between two cache pruning passes.
eviction_interval = 2000

# Seconds before muted / approved-submitter lists are fetched again.
membership_ttl_secs = 600

# Seconds before community snapshots are fetched again.
community_ttl_secs = 3600

[update]
# Stop retrying a wiki edit after this many conflicts.
# Leave unset to retry until the edit goes through.
# max_conflicts = 10
"#
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        self.filters.validate()
    }

    /// Parse config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SubkitConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
            info!(target: "subkit::config", path = %path.display(), "Wrote default configuration");
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SubkitConfig::default();
        assert_eq!(config.filters.cache_items, 1000);
        assert_eq!(config.filters.eviction_interval, 2000);
        assert_eq!(config.filters.membership_ttl_secs, 600);
        assert_eq!(config.filters.community_ttl_secs, 3600);
        assert_eq!(config.update.max_conflicts, None);
    }

    #[test]
    fn default_toml_parses_to_defaults() {
        let config = SubkitConfig::from_toml_str(SubkitConfig::default_toml()).unwrap();
        assert_eq!(config, SubkitConfig::default());
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(SubkitConfig::from_toml_str("").unwrap(), SubkitConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = SubkitConfig::from_toml_str("[filters]\ncache_items = 5\n").unwrap();
        assert_eq!(config.filters.cache_items, 5);
        assert_eq!(config.filters.eviction_interval, 2000);
    }

    #[test]
    fn zero_eviction_interval_rejected() {
        let err = SubkitConfig::from_toml_str("[filters]\neviction_interval = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("eviction_interval"));
    }

    #[test]
    fn zero_conflict_cap_rejected() {
        let err = SubkitConfig::from_toml_str("[update]\nmax_conflicts = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = SubkitConfig::from_toml_str("[filters\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        SubkitConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());
        assert_eq!(SubkitConfig::from_file(&path).unwrap(), SubkitConfig::default());
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[update]\nmax_conflicts = 3\n").unwrap();

        SubkitConfig::write_default_if_missing(&path).unwrap();

        let config = SubkitConfig::from_file(&path).unwrap();
        assert_eq!(config.update.max_conflicts, NonZeroUsize::new(3));
    }

    #[test]
    fn round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = SubkitConfig {
            filters: FilterConfig {
                cache_items: 10,
                eviction_interval: 50,
                membership_ttl_secs: 1,
                community_ttl_secs: 2,
            },
            update: UpdateConfig {
                max_conflicts: NonZeroUsize::new(4),
            },
        };
        config.write_to_file(&path).unwrap();
        assert_eq!(SubkitConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = SubkitConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
