//! Engine configuration file support.
//!
//! Reads the TOML configuration that selects the repository backend and
//! supplies the sport's scoring rules.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::repository::RepositoryError;
use crate::models::ScoringConfig;

/// Engine configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Repository backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl EngineConfig {
    /// Load engine configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load engine configuration from the default locations, falling back
    /// to defaults when no file exists.
    ///
    /// Searches for `engine.toml` in the current directory and the parent
    /// directory, in that order.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("engine.toml"),
            PathBuf::from("../engine.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = EngineConfig::default();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.scoring.points_for_win, 3);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [repository]
            type = "local"

            [server]
            host = "127.0.0.1"
            port = 9090

            [scoring]
            points_for_win = 2
            use_points_for_draw = false

            [[scoring.bonus_rules]]
            rule = "overtime_loss_point"
            points = 1
        "#;
        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.scoring.points_for_win, 2);
        assert!(!config.scoring.use_points_for_draw);
        assert_eq!(config.scoring.bonus_rules.len(), 1);
    }
}
