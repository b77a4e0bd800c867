//! Configuration file management.

use std::path::PathBuf;

use obol_types::{GroupId, DEFAULT_MAX_MEMBERS};
use serde::{Deserialize, Serialize};

/// Error types for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`BondConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete bond service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BondConfig {
    /// Membership group settings.
    #[serde(default)]
    pub group: GroupConfig,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Membership group configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Human-readable label the group id is derived from.
    #[serde(default = "default_group_label")]
    pub label: String,
    /// Member capacity of the group.
    #[serde(default = "default_max_members")]
    pub max_members: usize,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_group_label() -> String {
    "obol-main".to_string()
}

fn default_max_members() -> usize {
    DEFAULT_MAX_MEMBERS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            label: default_group_label(),
            max_members: default_max_members(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl BondConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(Self::from_toml(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The group id derived from the configured label.
    pub fn group_id(&self) -> GroupId {
        obol_group::derive_group_id(&self.group.label)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Path of the ledger database inside the data directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join("obol.db")
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("OBOL_DATA_DIR") {
            return PathBuf::from(dir).join("config.toml");
        }
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("OBOL_DATA_DIR") {
            return PathBuf::from(dir);
        }
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".obol"))
            .unwrap_or_else(|_| PathBuf::from("/tmp/obol"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BondConfig::default();
        assert_eq!(config.group.label, "obol-main");
        assert_eq!(config.group.max_members, DEFAULT_MAX_MEMBERS);
        assert_eq!(config.advanced.log_level, "info");
        assert!(config.storage.data_dir.is_empty());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = BondConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let parsed = BondConfig::from_toml(&toml_str).expect("parse");
        assert_eq!(parsed.group.label, config.group.label);
        assert_eq!(parsed.group.max_members, config.group.max_members);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = BondConfig::from_toml("[group]\nlabel = \"obol-test\"\n").expect("parse");
        assert_eq!(parsed.group.label, "obol-test");
        assert_eq!(parsed.group.max_members, DEFAULT_MAX_MEMBERS);
        assert_eq!(parsed.advanced.log_level, "info");
    }

    #[test]
    fn test_group_id_follows_label() {
        let default_config = BondConfig::default();
        let custom = BondConfig::from_toml("[group]\nlabel = \"obol-test\"\n").expect("parse");
        assert_ne!(default_config.group_id(), custom.group_id());
        assert_eq!(default_config.group_id(), obol_group::derive_group_id("obol-main"));
    }

    #[test]
    fn test_db_path_under_data_dir() {
        let config = BondConfig::from_toml("[storage]\ndata_dir = \"/var/lib/obol\"\n")
            .expect("parse");
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/obol/obol.db"));
    }
}
