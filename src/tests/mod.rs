//! Explorer API test implementations
//!
//! This module contains the 13 test cases run against the explorer backend.
//!
//! ## Test Categories
//!
//! ### History Tests (1-5)
//! - Valid Parameters
//! - Missing Symbol
//! - Invalid Resolution
//! - Inverted Time Range
//! - History Response Time
//!
//! ### Tokens Tests (6-9)
//! - Token List
//! - Concurrent Requests
//! - Method Not Allowed
//! - Tokens Response Time
//!
//! ### Token Pair Tests (10-13)
//! - Pair List
//! - Pair By Id
//! - Unknown Pair Id
//! - Pair Method Not Allowed


pub use history::HistorySuite;
pub use token_pairs::TokenPairsSuite;
pub use tokens::TokensSuite;

use anyhow::Result;

use crate::config::ApiConfig;
use crate::http::{ExecutorConfig, RequestExecutor};
use crate::models::{Endpoint, TestCase};
use crate::validation::SchemaValidator;

/// How a case ended when none of its assertions failed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed(Vec<String>),
    /// Preconditions not met, e.g. the service reported itself unavailable
    Skipped(String),
}

/// Executor, validator and configuration shared by every suite
#[derive(Clone)]
pub struct SuiteContext {
    pub api: ApiConfig,
    pub executor: RequestExecutor,
    pub validator: SchemaValidator,
}

impl SuiteContext {
    pub fn new(api: ApiConfig) -> Result<Self> {
        let executor = RequestExecutor::new(ExecutorConfig::from(&api))?;
        let validator = SchemaValidator::new(api.schemas.clone());
        Ok(Self {
            api,
            executor,
            validator,
        })
    }

    /// Configured path of an endpoint
    pub fn path(&self, endpoint: Endpoint) -> &str {
        self.api.endpoints.path(endpoint)
    }
}

/// Run a specific test case
pub async fn run_test(test_case: TestCase, ctx: &SuiteContext) -> Result<CaseOutcome> {
    match test_case.endpoint() {
        Endpoint::History => HistorySuite::new(ctx).run(test_case).await,
        Endpoint::Tokens => TokensSuite::new(ctx).run(test_case).await,
        Endpoint::TokenPairs => TokenPairsSuite::new(ctx).run(test_case).await,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::http::stub::StubServer;

    /// Context pointed at a stub server, with short timeouts
    pub fn context_for(server: &StubServer) -> SuiteContext {
        let api = ApiConfig::default()
            .with_base_url(server.base_url())
            .with_request_timeout(2_000)
            .with_test_timeout(5_000);
        SuiteContext::new(api).unwrap()
    }
}
