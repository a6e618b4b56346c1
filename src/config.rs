//! Configuration loading and management
//!
//! Handles parsing of `.tt.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project name recorded in new documents
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Backup configuration
    #[serde(default)]
    pub backups: BackupsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            backups: BackupsConfig::default(),
        }
    }
}

fn default_project_name() -> String {
    "untitled".to_string()
}

/// Backup-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupsConfig {
    /// Keep at most this many backups listed before warning (0 = unlimited)
    #[serde(default = "default_warn_after")]
    pub warn_after: usize,
}

fn default_warn_after() -> usize {
    20
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            warn_after: default_warn_after(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tt.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the project root, or return defaults
    pub fn load_from_project(project_root: &Path) -> Self {
        let config_path = project_root.join(crate::store::CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.project_name.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "project_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from_project(temp.path());
        assert_eq!(config.project_name, "untitled");
        assert_eq!(config.backups.warn_after, 20);
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".tt.toml");

        let config = Config {
            project_name: "demo".to_string(),
            backups: BackupsConfig { warn_after: 5 },
        };
        config.save(&path).unwrap();

        let back = Config::load(&path).unwrap();
        assert_eq!(back.project_name, "demo");
        assert_eq!(back.backups.warn_after, 5);
    }

    #[test]
    fn empty_project_name_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".tt.toml");
        std::fs::write(&path, "project_name = \"  \"\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn partial_file_uses_field_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".tt.toml");
        std::fs::write(&path, "project_name = \"demo\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.project_name, "demo");
        assert_eq!(config.backups.warn_after, 20);
    }
}
