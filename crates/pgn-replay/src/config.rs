//! Configuration file loading for pgn-replay.

use std::path::{Path, PathBuf};

use chess_engine::ReplayOptions;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// How each replayed move is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON record per line.
    #[default]
    Jsonl,
    /// Ply number and SAN.
    San,
    /// FEN after the move.
    Fen,
}

/// Settings read from `pgn-replay.toml`. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Accept long algebraic and other non-standard SAN.
    pub permissive: bool,
    pub output: OutputFormat,
    /// Include the board snapshot in JSON output.
    pub include_board: bool,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            permissive: true,
            output: OutputFormat::Jsonl,
            include_board: true,
            log_level: "info".to_string(),
        }
    }
}

impl ReplayConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, `pgn-replay.toml` in the
    /// working directory is used when present, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = Self::config_path();
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the default configuration file path.
    pub fn config_path() -> PathBuf {
        PathBuf::from("pgn-replay.toml")
    }

    pub fn replay_options(&self) -> ReplayOptions {
        ReplayOptions {
            permissive: self.permissive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = ReplayConfig::from_toml(
            r#"
permissive = false
output = "san"
include_board = false
log_level = "debug"
"#,
        )
        .unwrap();
        assert!(!config.permissive);
        assert_eq!(config.output, OutputFormat::San);
        assert!(!config.include_board);
        assert_eq!(config.log_level, "debug");
        assert!(!config.replay_options().permissive);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ReplayConfig::from_toml("output = \"fen\"").unwrap();
        assert_eq!(config.output, OutputFormat::Fen);
        assert!(config.permissive);
        assert!(config.include_board);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ReplayConfig::from_toml("").unwrap(), ReplayConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ReplayConfig::from_toml("output = \"xml\""),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            ReplayConfig::from_toml("permissive = "),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = Path::new("/nonexistent/pgn-replay.toml");
        assert!(matches!(
            ReplayConfig::load(Some(path)),
            Err(ConfigError::ReadError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("pgn-replay-{}.toml", std::process::id()));
        std::fs::write(&path, "permissive = false\n").unwrap();
        let config = ReplayConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(!config.permissive);
        assert_eq!(config.output, OutputFormat::Jsonl);
    }
}
