//! Configuration module
//!
//! The explorer's base URL, endpoint paths, schemas, timeouts and sample
//! parameters. Everything is passed explicitly into the executor, validator
//! and runners; nothing is process-wide.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;

use serde::{Deserialize, Serialize};

use crate::models::Endpoint;
use crate::validation::SchemaSet;

/// Everything the suites need to know about the target service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix every endpoint path is appended to
    pub base_url: String,
    pub endpoints: EndpointPaths,
    pub schemas: SchemaSet,
    pub timeouts: Timeouts,
    pub samples: SampleParams,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1/".to_string(),
            endpoints: EndpointPaths::default(),
            schemas: SchemaSet::default(),
            timeouts: Timeouts::default(),
            samples: SampleParams::default(),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeouts.request_ms = timeout_ms;
        self
    }

    pub fn with_test_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeouts.test_ms = timeout_ms;
        self
    }
}

/// Path of each endpoint relative to the base URL
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    pub history: String,
    pub tokens: String,
    pub token_pairs: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            history: "history".to_string(),
            tokens: "tokens".to_string(),
            token_pairs: "token-pairs".to_string(),
        }
    }
}

impl EndpointPaths {
    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::History => &self.history,
            Endpoint::Tokens => &self.tokens,
            Endpoint::TokenPairs => &self.token_pairs,
        }
    }
}

/// Timeouts in milliseconds
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Default per-request timeout
    pub request_ms: u64,
    /// Budget for a whole test case
    pub test_ms: u64,
    /// Ceiling for the response-time cases
    pub response_limit_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_ms: 10_000,
            test_ms: 30_000,
            response_limit_ms: crate::utils::DEFAULT_LIMIT_MS,
        }
    }
}

/// Known-good and known-bad parameter values
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleParams {
    pub symbol: String,
    pub resolution: String,
    /// Unix seconds
    pub from: i64,
    pub to: i64,
    pub invalid_resolution: String,
    pub unknown_pair_id: String,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            symbol: "BTC".to_string(),
            resolution: "1D".to_string(),
            from: 1_700_000_000,
            to: 1_700_604_800,
            invalid_resolution: "INVALID".to_string(),
            unknown_pair_id: "non-existent-pair-id".to_string(),
        }
    }
}

/// How a test run is executed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub rounds: u32,
    pub parallel: bool,
    pub max_concurrent: usize,
    /// Test numbers to skip
    pub skip_tests: Vec<u8>,
    pub format: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            rounds: 1,
            parallel: false,
            max_concurrent: 4,
            skip_tests: Vec::new(),
            format: "table".to_string(),
        }
    }
}
