//! Data models for explorer API testing
//!
//! This module contains all data structures used throughout the application.

mod endpoint;
mod test_result;

pub use endpoint::Endpoint;
pub use test_result::{TestCase, TestResult, TestRoundSummary, TestStatus};

use serde::{Deserialize, Serialize};

use crate::config::{ApiConfig, ConfigFile};

/// Settings for one test run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestConfig {
    pub api: ApiConfig,
    pub rounds: u32,
    pub parallel: bool,
    pub max_concurrent: usize,
    pub skip_tests: Vec<u8>,
}

impl TestConfig {
    pub fn new(api: ApiConfig) -> Self {
        Self {
            api,
            rounds: 1,
            parallel: false,
            max_concurrent: 4,
            skip_tests: Vec::new(),
        }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_parallel(mut self, max_concurrent: usize) -> Self {
        self.parallel = true;
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn skip_test(mut self, test_number: u8) -> Self {
        self.skip_tests.push(test_number);
        self
    }
}

impl From<&ConfigFile> for TestConfig {
    fn from(file: &ConfigFile) -> Self {
        Self {
            api: file.api.clone(),
            rounds: file.run.rounds,
            parallel: file.run.parallel,
            max_concurrent: file.run.max_concurrent,
            skip_tests: file.run.skip_tests.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_file() {
        let mut file = ConfigFile::example();
        file.run.skip_tests = vec![2, 7];

        let config = TestConfig::from(&file);
        assert_eq!(config.api.base_url, "https://explorer.example.com/api/v1/");
        assert_eq!(config.rounds, 3);
        assert!(config.parallel);
        assert_eq!(config.skip_tests, vec![2, 7]);
    }

    #[test]
    fn test_config_builders() {
        let config = TestConfig::new(ApiConfig::default())
            .with_rounds(5)
            .with_parallel(8)
            .skip_test(13);
        assert_eq!(config.rounds, 5);
        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.skip_tests, vec![13]);
    }
}
