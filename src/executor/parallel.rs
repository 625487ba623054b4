//! Parallel test execution
//!
//! Runs independent test cases concurrently with a bounded number in flight.

#![allow(dead_code)]

use anyhow::Result;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::runner::execute_case;
use crate::models::{TestCase, TestConfig, TestResult, TestRoundSummary, TestStatus};
use crate::tests::SuiteContext;

/// Parallel test executor
pub struct ParallelExecutor {
    max_concurrent: usize,
}

impl ParallelExecutor {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run test cases in parallel; results come back in test-number order
    pub async fn run_tests_parallel(
        &self,
        config: &TestConfig,
        test_cases: Vec<TestCase>,
    ) -> Result<Vec<TestResult>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let ctx = Arc::new(SuiteContext::new(config.api.clone())?);
        let timeout_ms = config.api.timeouts.test_ms;

        let mut handles = Vec::new();

        for &test_case in &test_cases {
            if config.skip_tests.contains(&test_case.number()) {
                handles.push(tokio::spawn(async move {
                    TestResult::skip(test_case, "Skipped by configuration")
                }));
                continue;
            }

            let semaphore = semaphore.clone();
            let ctx = ctx.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return TestResult::error(test_case, e.to_string()),
                };

                debug!("Starting parallel execution of {}", test_case);
                execute_case(&ctx, test_case, timeout_ms).await
            }));
        }

        let mut results: Vec<TestResult> = join_all(handles)
            .await
            .into_iter()
            .zip(test_cases)
            .map(|(joined, test_case)| {
                joined.unwrap_or_else(|e| TestResult::error(test_case, e.to_string()))
            })
            .collect();

        results.sort_by_key(|r| r.test_case.number());
        Ok(results)
    }

    /// Run every test case in parallel
    pub async fn run_all_parallel(&self, config: &TestConfig) -> Result<TestRoundSummary> {
        self.run_round_parallel(config, 1, &TestCase::all()).await
    }

    async fn run_round_parallel(
        &self,
        config: &TestConfig,
        round: u32,
        test_cases: &[TestCase],
    ) -> Result<TestRoundSummary> {
        info!(
            "Running {} tests in parallel (max {} concurrent) against {}",
            test_cases.len(),
            self.max_concurrent,
            config.api.base_url
        );

        let started_at = chrono::Utc::now();
        let start = Instant::now();
        let results = self
            .run_tests_parallel(config, test_cases.to_vec())
            .await?;

        let summary = TestRoundSummary::new(round, &config.api.base_url, results)
            .with_started_at(started_at);

        info!(
            "Parallel round {} completed in {}ms - Pass: {}/{} ({:.1}%)",
            round,
            start.elapsed().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Batch test runner for multiple rounds
pub struct BatchRunner {
    executor: ParallelExecutor,
    rounds: u32,
}

impl BatchRunner {
    pub fn new(max_concurrent: usize, rounds: u32) -> Self {
        Self {
            executor: ParallelExecutor::new(max_concurrent),
            rounds,
        }
    }

    /// Run multiple rounds of parallel tests
    pub async fn run_rounds(
        &self,
        config: &TestConfig,
        test_cases: &[TestCase],
    ) -> Result<Vec<TestRoundSummary>> {
        info!(
            "Running {} rounds of parallel tests against {}",
            self.rounds, config.api.base_url
        );

        let mut summaries = Vec::new();
        for round in 1..=self.rounds {
            info!("=== Round {}/{} ===", round, self.rounds);
            summaries.push(self
                .executor
                .run_round_parallel(config, round, test_cases)
                .await?);
        }

        Ok(summaries)
    }
}

/// Aggregate results across multiple rounds
pub fn aggregate_results(summaries: &[TestRoundSummary]) -> AggregateResult {
    let total_rounds = summaries.len() as u32;
    let mut test_stats: HashMap<TestCase, TestStats> = HashMap::new();

    for summary in summaries {
        for result in &summary.results {
            let stats = test_stats.entry(result.test_case).or_default();

            match result.status {
                TestStatus::Pass => stats.passes += 1,
                TestStatus::Fail => stats.failures += 1,
                TestStatus::Skip => stats.skips += 1,
                TestStatus::Error => stats.errors += 1,
            }
            stats.total_duration_ms += result.duration_ms;
        }
    }

    let test_pass_rates: HashMap<TestCase, f64> = test_stats
        .iter()
        .map(|(tc, stats)| (*tc, stats.pass_rate()))
        .collect();

    let overall_pass_rate = if summaries.is_empty() {
        0.0
    } else {
        summaries.iter().map(|s| s.pass_rate()).sum::<f64>() / summaries.len() as f64
    };

    AggregateResult {
        total_rounds,
        test_stats,
        test_pass_rates,
        overall_pass_rate,
    }
}

/// Statistics for a single test case across rounds
#[derive(Clone, Debug, Default)]
pub struct TestStats {
    pub passes: u32,
    pub failures: u32,
    pub skips: u32,
    pub errors: u32,
    pub total_duration_ms: u64,
}

impl TestStats {
    fn ran(&self) -> u32 {
        self.passes + self.failures + self.errors
    }

    pub fn pass_rate(&self) -> f64 {
        if self.ran() > 0 {
            (self.passes as f64 / self.ran() as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn avg_duration_ms(&self) -> u64 {
        if self.ran() > 0 {
            self.total_duration_ms / self.ran() as u64
        } else {
            0
        }
    }
}

/// Aggregate results across multiple test rounds
#[derive(Clone, Debug)]
pub struct AggregateResult {
    pub total_rounds: u32,
    pub test_stats: HashMap<TestCase, TestStats>,
    pub test_pass_rates: HashMap<TestCase, f64>,
    pub overall_pass_rate: f64,
}

impl AggregateResult {
    /// Cases that did not pass every round they ran, lowest pass rate first
    pub fn flaky_tests(&self) -> Vec<(TestCase, f64)> {
        let mut tests: Vec<_> = self
            .test_pass_rates
            .iter()
            .filter(|(tc, rate)| **rate < 100.0 && self.test_stats[*tc].ran() > 0)
            .map(|(tc, rate)| (*tc, *rate))
            .collect();
        tests.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.number().cmp(&b.0.number())));
        tests
    }

    /// Cases that passed in every round they ran
    pub fn stable_tests(&self) -> Vec<TestCase> {
        let mut tests: Vec<_> = self
            .test_pass_rates
            .iter()
            .filter(|(_, rate)| **rate >= 100.0)
            .map(|(tc, _)| *tc)
            .collect();
        tests.sort_by_key(|tc| tc.number());
        tests
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::stub::StubServer;

    fn config_for(server: &StubServer) -> TestConfig {
        TestConfig::new(
            ApiConfig::default()
                .with_base_url(server.base_url())
                .with_request_timeout(2_000)
                .with_test_timeout(5_000),
        )
    }

    #[test]
    fn test_parallel_executor_creation() {
        assert_eq!(ParallelExecutor::new(8).max_concurrent, 8);
        assert_eq!(ParallelExecutor::new(0).max_concurrent, 1);
    }

    #[test]
    fn test_batch_runner_creation() {
        let runner = BatchRunner::new(4, 10);
        assert_eq!(runner.rounds, 10);
    }

    #[tokio::test]
    async fn test_run_all_parallel_against_explorer() {
        let server = StubServer::explorer().await;
        let summary = ParallelExecutor::new(4)
            .run_all_parallel(&config_for(&server).skip_test(13))
            .await
            .unwrap();

        let numbers: Vec<u8> = summary.results.iter().map(|r| r.test_case.number()).collect();
        assert_eq!(numbers, (1..=13).collect::<Vec<u8>>());
        assert_eq!(summary.passed, 12, "{summary}");
        assert_eq!(summary.skipped, 1);
    }

    #[tokio::test]
    async fn test_batch_rounds() {
        let server = StubServer::explorer().await;
        let summaries = BatchRunner::new(2, 2)
            .run_rounds(&config_for(&server), &TestCase::all())
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].round, 2);
        assert!(summaries.iter().all(|s| s.is_all_passed()));
    }

    #[test]
    fn test_aggregate_results() {
        let results1 = vec![
            TestResult::pass(TestCase::TokenList, 100),
            TestResult::fail(TestCase::PairList, 50, "failed"),
        ];
        let results2 = vec![
            TestResult::pass(TestCase::TokenList, 120),
            TestResult::pass(TestCase::PairList, 60),
        ];

        let summaries = vec![
            TestRoundSummary::new(1, "http://localhost/", results1),
            TestRoundSummary::new(2, "http://localhost/", results2),
        ];

        let aggregate = aggregate_results(&summaries);
        assert_eq!(aggregate.total_rounds, 2);
        assert_eq!(
            aggregate.test_pass_rates.get(&TestCase::TokenList),
            Some(&100.0)
        );
        assert_eq!(
            aggregate.test_pass_rates.get(&TestCase::PairList),
            Some(&50.0)
        );
        assert_eq!(aggregate.flaky_tests(), vec![(TestCase::PairList, 50.0)]);
        assert_eq!(aggregate.stable_tests(), vec![TestCase::TokenList]);
        assert_eq!(aggregate.test_stats[&TestCase::TokenList].avg_duration_ms(), 110);
    }
}
