use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discover::DEFAULT_UNIT_LIMIT;

/// Dashboard configuration: the favorites list plus engine settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DashConfig {
    /// Config file version
    #[serde(default = "default_version")]
    pub version: String,

    /// Units pinned to the dashboard, in display order.
    #[serde(default)]
    pub favorites: Vec<String>,

    /// Ceiling on the browse view's enumerated units.
    #[serde(default = "default_unit_limit")]
    pub unit_limit: usize,

    /// Per-call timeout for external commands, in milliseconds. `0`
    /// disables the bound, and a hung command then blocks its worker call
    /// indefinitely.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
}

fn default_version() -> String {
    "1".into()
}
fn default_unit_limit() -> usize {
    DEFAULT_UNIT_LIMIT
}
fn default_command_timeout_ms() -> u64 {
    5000
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            favorites: Vec::new(),
            unit_limit: default_unit_limit(),
            command_timeout_ms: default_command_timeout_ms(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    HomeNotSet,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Yaml(e) => write!(f, "YAML parse error: {}", e),
            Self::HomeNotSet => write!(f, "neither $XDG_CONFIG_HOME nor $HOME is set"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

impl DashConfig {
    /// Default location: `$XDG_CONFIG_HOME/unitdash/config.yaml`, falling
    /// back to `~/.config/unitdash/config.yaml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir).join("unitdash/config.yaml"));
            }
        }
        let home = std::env::var("HOME").map_err(|_| ConfigError::HomeNotSet)?;
        Ok(PathBuf::from(home).join(".config/unitdash/config.yaml"))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load the config, writing a commented default file on first run.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = String::from(
            "# unitdash configuration\n\
             # favorites: one systemd unit per entry, e.g. `- nginx.service`\n",
        );
        out.push_str(&serde_yaml::to_string(self)?);
        std::fs::write(path, out)?;
        Ok(())
    }

    /// Pin a unit; returns false when it is already pinned.
    pub fn add_favorite(&mut self, unit: &str) -> bool {
        if self.favorites.iter().any(|u| u == unit) {
            return false;
        }
        self.favorites.push(unit.to_string());
        true
    }

    /// Unpin a unit; returns false when it was not pinned.
    pub fn remove_favorite(&mut self, unit: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|u| u != unit);
        self.favorites.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_file_with_defaults() {
        let yaml = r#"
favorites:
  - nginx.service
  - sync.service
"#;
        let config = DashConfig::from_str(yaml).unwrap();
        assert_eq!(config.favorites.len(), 2);
        assert_eq!(config.unit_limit, DEFAULT_UNIT_LIMIT);
        assert_eq!(config.command_timeout_ms, 5000);
    }

    #[test]
    fn settings_override_defaults() {
        let yaml = r#"
favorites: []
unit_limit: 50
command_timeout_ms: 0
"#;
        let config = DashConfig::from_str(yaml).unwrap();
        assert_eq!(config.unit_limit, 50);
        assert_eq!(config.command_timeout_ms, 0);
    }

    #[test]
    fn add_and_remove_favorites_deduplicate() {
        let mut config = DashConfig::default();
        assert!(config.add_favorite("a.service"));
        assert!(!config.add_favorite("a.service"));
        assert_eq!(config.favorites, vec!["a.service".to_string()]);

        assert!(config.remove_favorite("a.service"));
        assert!(!config.remove_favorite("a.service"));
        assert!(config.favorites.is_empty());
    }

    #[test]
    fn first_run_writes_a_default_file_that_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unitdash/config.yaml");

        let created = DashConfig::load_or_init(&path).unwrap();
        assert!(path.exists());
        assert!(created.favorites.is_empty());

        let mut edited = created;
        edited.add_favorite("web.service");
        edited.save(&path).unwrap();

        let reloaded = DashConfig::load_or_init(&path).unwrap();
        assert_eq!(reloaded.favorites, vec!["web.service".to_string()]);
    }
}
