//! Test execution runner
//!
//! Wraps each case in a per-test timeout and turns its outcome into a
//! [`TestResult`].

use anyhow::{Context, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info};

use crate::models::{Endpoint, TestCase, TestConfig, TestResult, TestRoundSummary};
use crate::tests::{self, CaseOutcome, SuiteContext};

/// Why a guarded test body did not succeed
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("{name} failed: {reason}")]
    Failed { name: String, reason: String },

    #[error("{name} timed out after {timeout_ms}ms")]
    TimedOut { name: String, timeout_ms: u64 },
}

/// Run a named test body under a timeout, logging the name on failure
pub async fn run_guarded<T, F>(name: &str, timeout_ms: u64, body: F) -> Result<T, CaseError>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), body).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!("{} failed: {:#}", name, e);
            Err(CaseError::Failed {
                name: name.to_string(),
                reason: format!("{e:#}"),
            })
        }
        Err(_) => {
            error!("{} timed out after {}ms", name, timeout_ms);
            Err(CaseError::TimedOut {
                name: name.to_string(),
                timeout_ms,
            })
        }
    }
}

/// Run one case to a [`TestResult`]
pub(crate) async fn execute_case(
    ctx: &SuiteContext,
    test_case: TestCase,
    timeout_ms: u64,
) -> TestResult {
    let start = Instant::now();
    let outcome = run_guarded(
        &test_case.to_string(),
        timeout_ms,
        tests::run_test(test_case, ctx),
    )
    .await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(CaseOutcome::Passed(details)) => {
            let result = TestResult::pass(test_case, duration_ms);
            if details.is_empty() {
                result
            } else {
                result.with_message(details.join("\n"))
            }
        }
        Ok(CaseOutcome::Skipped(reason)) => {
            TestResult::skip(test_case, reason).with_duration(duration_ms)
        }
        Err(CaseError::Failed { reason, .. }) => TestResult::fail(test_case, duration_ms, reason),
        Err(e @ CaseError::TimedOut { .. }) => {
            TestResult::error(test_case, e.to_string()).with_duration(duration_ms)
        }
    }
}

/// Sequential test runner
pub struct TestRunner {
    config: TestConfig,
    ctx: SuiteContext,
}

impl TestRunner {
    /// Create a new test runner
    pub fn new(config: TestConfig) -> Result<Self> {
        let ctx = SuiteContext::new(config.api.clone())?;
        Ok(Self { config, ctx })
    }

    pub fn target(&self) -> &str {
        &self.config.api.base_url
    }

    /// Run a single test case
    pub async fn run_test(&self, test_case: TestCase) -> TestResult {
        if self.config.skip_tests.contains(&test_case.number()) {
            return TestResult::skip(test_case, "Skipped by configuration");
        }

        info!("Running {}", test_case);
        execute_case(&self.ctx, test_case, self.config.api.timeouts.test_ms).await
    }

    /// Run all test cases sequentially
    pub async fn run_all(&self) -> TestRoundSummary {
        info!("Starting test round against {}", self.target());
        self.run_round(1, &TestCase::all()).await
    }

    /// Run the cases of one endpoint
    pub async fn run_endpoint(&self, endpoint: Endpoint) -> TestRoundSummary {
        info!("Running {} tests against {}", endpoint, self.target());
        self.run_round(1, &TestCase::for_endpoint(endpoint)).await
    }

    /// Run the given cases for multiple rounds
    pub async fn run_rounds(
        &self,
        num_rounds: u32,
        test_cases: &[TestCase],
    ) -> Vec<TestRoundSummary> {
        info!("Running {} rounds against {}", num_rounds, self.target());

        let mut summaries = Vec::new();
        for round in 1..=num_rounds {
            info!("=== Round {}/{} ===", round, num_rounds);
            summaries.push(self.run_round(round, test_cases).await);
        }
        summaries
    }

    async fn run_round(&self, round: u32, test_cases: &[TestCase]) -> TestRoundSummary {
        let started_at = chrono::Utc::now();
        let start = Instant::now();
        let mut results = Vec::new();

        for &test_case in test_cases {
            let result = self.run_test(test_case).await;
            info!("  {}", result);
            results.push(result);
        }

        let summary =
            TestRoundSummary::new(round, self.target(), results).with_started_at(started_at);

        info!(
            "Round {} completed in {}ms - Pass: {}/{} ({:.1}%)",
            round,
            start.elapsed().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        summary
    }
}

/// Run specific test by number
pub async fn run_test_by_number(config: TestConfig, test_number: u8) -> Result<TestResult> {
    let test_case = TestCase::from_number(test_number)
        .context(format!("Invalid test number: {test_number}"))?;

    let runner = TestRunner::new(config)?;
    Ok(runner.run_test(test_case).await)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::stub::{StubResponse, StubServer};
    use crate::models::TestStatus;
    use serde_json::json;

    fn config_for(server: &StubServer) -> TestConfig {
        TestConfig::new(
            ApiConfig::default()
                .with_base_url(server.base_url())
                .with_request_timeout(2_000)
                .with_test_timeout(5_000),
        )
    }

    #[tokio::test]
    async fn test_run_guarded_passes_value_through() {
        let value = run_guarded("ok", 100, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_guarded_reraises_failure_with_name() {
        let err = run_guarded::<(), _>("Test 2: Missing Symbol", 100, async {
            anyhow::bail!("expected status 400, got 200")
        })
        .await
        .unwrap_err();

        assert!(matches!(err, CaseError::Failed { .. }));
        assert_eq!(
            err.to_string(),
            "Test 2: Missing Symbol failed: expected status 400, got 200"
        );
    }

    #[tokio::test]
    async fn test_run_guarded_times_out() {
        let err = run_guarded("slow", 20, async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "slow timed out after 20ms");
    }

    #[tokio::test]
    async fn test_run_all_against_explorer() {
        let server = StubServer::explorer().await;
        let runner = TestRunner::new(config_for(&server)).unwrap();

        let summary = runner.run_all().await;

        assert_eq!(summary.total, 13);
        assert_eq!(summary.passed, 13, "{summary}");
        assert!(summary.is_all_passed());
        assert_eq!(summary.target, server.base_url());
    }

    #[tokio::test]
    async fn test_skip_list_is_honoured() {
        let server = StubServer::explorer().await;
        let runner = TestRunner::new(config_for(&server).skip_test(6)).unwrap();

        let result = runner.run_test(TestCase::TokenList).await;
        assert_eq!(result.status, TestStatus::Skip);
        assert!(server.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_failed_assertion_becomes_fail() {
        let server = StubServer::fixed(StubResponse::json(200, json!({}))).await;
        let runner = TestRunner::new(config_for(&server)).unwrap();

        let result = runner.run_test(TestCase::PairUnknownId).await;
        assert_eq!(result.status, TestStatus::Fail);
        assert!(result
            .message
            .unwrap()
            .starts_with("expected status 404, got 200"));
    }

    #[tokio::test]
    async fn test_test_timeout_becomes_error() {
        let server =
            StubServer::fixed(StubResponse::json(404, json!({"error": "x"})).with_delay(500)).await;
        let mut config = config_for(&server);
        config.api.timeouts.test_ms = 30;
        let runner = TestRunner::new(config).unwrap();

        let result = runner.run_test(TestCase::PairUnknownId).await;
        assert_eq!(result.status, TestStatus::Error);
        assert_eq!(
            result.message.as_deref(),
            Some("Test 12: Unknown Pair Id timed out after 30ms")
        );
    }

    #[tokio::test]
    async fn test_run_endpoint_and_rounds() {
        let server = StubServer::explorer().await;
        let runner = TestRunner::new(config_for(&server)).unwrap();

        let summary = runner.run_endpoint(Endpoint::Tokens).await;
        assert_eq!(summary.total, 4);

        let summaries = runner.run_rounds(2, &TestCase::all()).await;
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].round, 2);
    }

    #[tokio::test]
    async fn test_run_test_by_number_rejects_unknown() {
        let config = TestConfig::new(ApiConfig::default());
        assert!(run_test_by_number(config, 42).await.is_err());
    }
}
