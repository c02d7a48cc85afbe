//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub odds: OddsConfig,

    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Odds enrichment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsConfig {
    /// Bookmakers in preference order; the first one present in a payload
    /// is used.
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
}

/// Projection retention configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Delete already-started projections before each projection sync.
    #[serde(default = "default_enabled")]
    pub prune_on_sync: bool,
}

// Default value functions
fn default_database_path() -> String {
    "~/.local/share/courtside/courtside.db".to_string()
}

fn default_providers() -> Vec<String> {
    ["draftkings", "fanduel", "betmgm", "bet365"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_enabled() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            prune_on_sync: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            odds: OddsConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./courtside.yaml (current directory)
    /// 3. ~/.config/courtside/courtside.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "courtside.yaml".to_string(),
            shellexpand::tilde("~/.config/courtside/courtside.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database.path).to_string();
        PathBuf::from(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.retention.prune_on_sync);
        assert_eq!(config.odds.providers[0], "draftkings");
        assert_eq!(config.odds.providers.len(), 4);
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
database:
  path: ~/.local/share/courtside/test.db

odds:
  providers: [fanduel, draftkings]

retention:
  prune_on_sync: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.path, "~/.local/share/courtside/test.db");
        assert_eq!(config.odds.providers, vec!["fanduel", "draftkings"]);
        assert!(!config.retention.prune_on_sync);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "database:\n  path: /tmp/courtside.db\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.path, "/tmp/courtside.db");
        assert_eq!(config.odds.providers.len(), 4);
        assert!(config.retention.prune_on_sync);
    }
}
