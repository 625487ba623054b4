//! Configuration file management
//!
//! Handles finding, loading, and validating configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ApiConfig, EnvConfig, RunSettings};
use crate::models::TestCase;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./explorer-api-tests.yaml",
    "./explorer-api-tests.yml",
    "./explorer-api-tests.json",
    "./.explorer-api-tests/config.yaml",
    "~/.config/explorer-api-tests/config.yaml",
    "~/.explorer-api-tests.yaml",
];

/// Full configuration file structure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Version of config file format
    #[serde(default = "default_version")]
    pub version: String,

    /// Target service settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Run settings
    #[serde(default)]
    pub run: RunSettings,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiConfig::default(),
            run: RunSettings::default(),
        }
    }
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load from an explicit path, the environment's path, a standard
    /// location, or fall back to defaults; then apply environment overrides
    pub fn resolve(explicit: Option<&str>, env: &EnvConfig) -> Result<Self> {
        let path = explicit
            .map(expand_path)
            .or_else(|| env.config_file.as_deref().map(expand_path))
            .or_else(Self::find);

        let mut config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };

        env.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != "1.0" {
            anyhow::bail!("Unsupported config version: {}", self.version);
        }

        let base_url = &self.api.base_url;
        if base_url.is_empty() {
            anyhow::bail!("Base URL must not be empty");
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            anyhow::bail!("Base URL must start with http:// or https://: {base_url}");
        }

        let timeouts = &self.api.timeouts;
        if timeouts.request_ms == 0 || timeouts.test_ms == 0 || timeouts.response_limit_ms == 0 {
            anyhow::bail!("Timeouts must be greater than zero");
        }

        if self.run.rounds == 0 {
            anyhow::bail!("rounds must be at least 1");
        }

        if self.run.max_concurrent == 0 {
            anyhow::bail!("max_concurrent must be at least 1");
        }

        let max = TestCase::all().len() as u8;
        for test_num in &self.run.skip_tests {
            if *test_num < 1 || *test_num > max {
                anyhow::bail!("Invalid test number {test_num} in skip list. Valid range: 1-{max}");
            }
        }

        Ok(())
    }

    /// Generate example configuration
    pub fn example() -> Self {
        let mut config = Self::default();
        config.api.base_url = "https://explorer.example.com/api/v1/".to_string();
        config.run.rounds = 3;
        config.run.parallel = true;
        config
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
