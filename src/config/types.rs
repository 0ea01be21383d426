//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::*;
use super::permissions::PermissionsConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Ping behavior.
    #[serde(default)]
    pub pings: PingsConfig,
    /// Opt-out persistence.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Command permission grants.
    #[serde(default)]
    pub permissions: PermissionsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Ping behavior configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PingsConfig {
    /// Identifier of the audible cue played on a ping.
    #[serde(default = "default_sound_name")]
    pub sound_name: String,
    /// Cooldown length in ticks. A ping exactly this many ticks old still
    /// blocks the next one.
    #[serde(default = "default_ping_delay")]
    pub ping_delay: u64,
    /// Ping participants whose name appears in chat.
    #[serde(default = "default_enable_name_pings")]
    pub enable_name_pings: bool,
    /// Length of one tick in milliseconds (host timer).
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    /// Ticks between cooldown pruning passes.
    #[serde(default = "default_maintenance_interval")]
    pub maintenance_interval: u64,
}

impl Default for PingsConfig {
    fn default() -> Self {
        Self {
            sound_name: default_sound_name(),
            ping_delay: default_ping_delay(),
            enable_name_pings: default_enable_name_pings(),
            tick_millis: default_tick_millis(),
            maintenance_interval: default_maintenance_interval(),
        }
    }
}

/// Opt-out persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding data files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Opt-out list file name, relative to `data_dir`.
    #[serde(default = "default_blocked_pings_file")]
    pub blocked_pings_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            blocked_pings_file: default_blocked_pings_file(),
        }
    }
}

impl StorageConfig {
    /// Full path of the opt-out list.
    pub fn opt_out_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.blocked_pings_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.pings.sound_name, "block.note_block.pling");
        assert_eq!(config.pings.ping_delay, 100);
        assert!(config.pings.enable_name_pings);
        assert_eq!(config.pings.tick_millis, 50);
        assert_eq!(
            config.storage.opt_out_path(),
            Path::new("data").join("blocked_pings.lst")
        );
    }

    #[test]
    fn test_full_config_parses() {
        let config = Config::parse(
            r#"
[pings]
sound_name = "entity.experience_orb.pickup"
ping_delay = 40
enable_name_pings = false

[storage]
data_dir = "/var/lib/namepings"
blocked_pings_file = "optout.lst"

[permissions]
default = ["namepings.command.togglepings"]
operators = ["4f1c2d3e-5a6b-4c7d-8e9f-0a1b2c3d4e5f"]
"#,
        )
        .unwrap();

        assert_eq!(config.pings.sound_name, "entity.experience_orb.pickup");
        assert_eq!(config.pings.ping_delay, 40);
        assert!(!config.pings.enable_name_pings);
        assert_eq!(
            config.storage.opt_out_path(),
            Path::new("/var/lib/namepings").join("optout.lst")
        );
        assert_eq!(config.permissions.default.len(), 1);
        assert_eq!(config.permissions.operators.len(), 1);
    }

    #[test]
    fn test_bad_operator_id_is_parse_error() {
        let err = Config::parse(
            r#"
[permissions]
operators = ["Notch"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/namepings.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
