use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    API_URL_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_BASE_URL,
    DEFAULT_NOTIFICATION_TTL_SECS, DEFAULT_TIMEOUT_SECS,
};
use crate::models::{default_programs, Program};

/// User configuration, read from `~/.student-admin/config.yaml`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub notification_ttl_secs: u64,
    pub programs: Vec<Program>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            notification_ttl_secs: DEFAULT_NOTIFICATION_TTL_SECS,
            programs: default_programs(),
        }
    }
}

impl Config {
    /// Load from the default location, then apply the environment override
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&default_config_path())?;
        Ok(config.with_base_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Load from a specific file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        if config.programs.is_empty() {
            config.programs = default_programs();
        }
        Ok(config)
    }

    /// Replace the base URL when an override is present and non-empty
    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Toast lifetime; values beyond what chrono can hold saturate
    pub fn notification_ttl(&self) -> chrono::Duration {
        i64::try_from(self.notification_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

/// `~/.student-admin/config.yaml`, falling back to the working directory
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:3001");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "api_base_url: http://api.school.test\nprograms:\n  - value: \"P1\"\n    label: Derecho\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "http://api.school.test");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.programs, vec![Program::new("P1", "Derecho")]);
    }

    #[test]
    fn test_empty_program_list_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "programs: []\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.programs, default_programs());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "timeout_secs: [not, a, number]\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_numeric_program_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "programs:\n  - { value: 1, label: Derecho }\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.programs, vec![Program::new("1", "Derecho")]);
    }

    #[test]
    fn test_huge_notification_ttl_saturates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "notification_ttl_secs: 100000000000000000\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.notification_ttl(), chrono::Duration::MAX);

        let config = Config {
            notification_ttl_secs: u64::MAX,
            ..Config::default()
        };
        assert_eq!(config.notification_ttl(), chrono::Duration::MAX);

        assert_eq!(Config::default().notification_ttl(), chrono::Duration::seconds(4));
    }

    #[test]
    fn test_env_override() {
        let config = Config::default().with_base_url_override(Some(" http://other:9000 ".into()));
        assert_eq!(config.api_base_url, "http://other:9000");

        let config = Config::default().with_base_url_override(Some("   ".into()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
