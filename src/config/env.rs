//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

use super::ConfigFile;

/// Environment variable prefix
const ENV_PREFIX: &str = "EXPLORER_API";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Base URL from EXPLORER_API_BASE_URL
    pub base_url: Option<String>,
    /// Request timeout (ms) from EXPLORER_API_TIMEOUT
    pub timeout_ms: Option<u64>,
    /// Per-test timeout (ms) from EXPLORER_API_TEST_TIMEOUT
    pub test_timeout_ms: Option<u64>,
    /// Config file from EXPLORER_API_CONFIG
    pub config_file: Option<String>,
    /// Output format from EXPLORER_API_FORMAT
    pub format: Option<String>,
    /// Verbose from EXPLORER_API_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            base_url: get_env("BASE_URL"),
            timeout_ms: get_env_parse("TIMEOUT"),
            test_timeout_ms: get_env_parse("TEST_TIMEOUT"),
            config_file: get_env("CONFIG"),
            format: get_env("FORMAT"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.timeout_ms.is_some()
            || self.test_timeout_ms.is_some()
            || self.config_file.is_some()
            || self.format.is_some()
            || self.verbose.is_some()
    }

    /// Overlay the variables that are set onto a loaded configuration
    pub fn apply(&self, config: &mut ConfigFile) {
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.api.timeouts.request_ms = timeout_ms;
        }
        if let Some(test_timeout_ms) = self.test_timeout_ms {
            config.api.timeouts.test_ms = test_timeout_ms;
        }
        if let Some(format) = &self.format {
            config.run.format = format.clone();
        }
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_BASE_URL:      {:?}", ENV_PREFIX, self.base_url);
        println!("  {}_TIMEOUT:       {:?}", ENV_PREFIX, self.timeout_ms);
        println!("  {}_TEST_TIMEOUT:  {:?}", ENV_PREFIX, self.test_timeout_ms);
        println!("  {}_CONFIG:        {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_FORMAT:        {:?}", ENV_PREFIX, self.format);
        println!("  {}_VERBOSE:       {:?}", ENV_PREFIX, self.verbose);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables in tests
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_BASE_URL"), url.into()));
        self
    }

    pub fn timeout(mut self, timeout_ms: u64) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_TIMEOUT"), timeout_ms.to_string()));
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_VERBOSE"), verbose.to_string()));
        self
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        for (key, value) in self.vars {
            env::set_var(key, value);
        }

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all EXPLORER_API environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_BASE_URL       Base URL of the explorer API");
    println!("  {ENV_PREFIX}_TIMEOUT        Request timeout in milliseconds");
    println!("  {ENV_PREFIX}_TEST_TIMEOUT   Per-test timeout in milliseconds");
    println!("  {ENV_PREFIX}_CONFIG         Path to configuration file");
    println!("  {ENV_PREFIX}_FORMAT         Output format (table, json, csv, summary)");
    println!("  {ENV_PREFIX}_VERBOSE        Enable verbose output (true/false)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_BASE_URL=https://explorer.example.com/api/v1/");
    println!("  explorer-api-tests test");
}
