//! Test result models for explorer API testing
//!
//! Defines test cases, results, and status types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Endpoint;

/// All test cases, grouped by endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCase {
    // History tests (1-5)
    HistoryValidParams,
    HistoryMissingSymbol,
    HistoryInvalidResolution,
    HistoryInvertedRange,
    HistoryResponseTime,

    // Tokens tests (6-9)
    TokenList,
    TokensConcurrent,
    TokensMethodNotAllowed,
    TokensResponseTime,

    // Token pair tests (10-13)
    PairList,
    PairById,
    PairUnknownId,
    PairsMethodNotAllowed,
}

impl TestCase {
    /// Get test case number (1-13)
    pub fn number(&self) -> u8 {
        match self {
            TestCase::HistoryValidParams => 1,
            TestCase::HistoryMissingSymbol => 2,
            TestCase::HistoryInvalidResolution => 3,
            TestCase::HistoryInvertedRange => 4,
            TestCase::HistoryResponseTime => 5,
            TestCase::TokenList => 6,
            TestCase::TokensConcurrent => 7,
            TestCase::TokensMethodNotAllowed => 8,
            TestCase::TokensResponseTime => 9,
            TestCase::PairList => 10,
            TestCase::PairById => 11,
            TestCase::PairUnknownId => 12,
            TestCase::PairsMethodNotAllowed => 13,
        }
    }

    /// Get test case name
    pub fn name(&self) -> &'static str {
        match self {
            TestCase::HistoryValidParams => "Valid Parameters",
            TestCase::HistoryMissingSymbol => "Missing Symbol",
            TestCase::HistoryInvalidResolution => "Invalid Resolution",
            TestCase::HistoryInvertedRange => "Inverted Time Range",
            TestCase::HistoryResponseTime => "History Response Time",
            TestCase::TokenList => "Token List",
            TestCase::TokensConcurrent => "Concurrent Requests",
            TestCase::TokensMethodNotAllowed => "Method Not Allowed",
            TestCase::TokensResponseTime => "Tokens Response Time",
            TestCase::PairList => "Pair List",
            TestCase::PairById => "Pair By Id",
            TestCase::PairUnknownId => "Unknown Pair Id",
            TestCase::PairsMethodNotAllowed => "Pair Method Not Allowed",
        }
    }

    /// Get the endpoint the case exercises
    pub fn endpoint(&self) -> Endpoint {
        match self {
            TestCase::HistoryValidParams
            | TestCase::HistoryMissingSymbol
            | TestCase::HistoryInvalidResolution
            | TestCase::HistoryInvertedRange
            | TestCase::HistoryResponseTime => Endpoint::History,
            TestCase::TokenList
            | TestCase::TokensConcurrent
            | TestCase::TokensMethodNotAllowed
            | TestCase::TokensResponseTime => Endpoint::Tokens,
            _ => Endpoint::TokenPairs,
        }
    }

    /// Get all test cases
    pub fn all() -> Vec<TestCase> {
        vec![
            TestCase::HistoryValidParams,
            TestCase::HistoryMissingSymbol,
            TestCase::HistoryInvalidResolution,
            TestCase::HistoryInvertedRange,
            TestCase::HistoryResponseTime,
            TestCase::TokenList,
            TestCase::TokensConcurrent,
            TestCase::TokensMethodNotAllowed,
            TestCase::TokensResponseTime,
            TestCase::PairList,
            TestCase::PairById,
            TestCase::PairUnknownId,
            TestCase::PairsMethodNotAllowed,
        ]
    }

    /// Cases for one endpoint
    pub fn for_endpoint(endpoint: Endpoint) -> Vec<TestCase> {
        Self::all()
            .into_iter()
            .filter(|tc| tc.endpoint() == endpoint)
            .collect()
    }

    /// Parse from test number
    pub fn from_number(n: u8) -> Option<TestCase> {
        Self::all().into_iter().find(|tc| tc.number() == n)
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test {}: {}", self.number(), self.name())
    }
}

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Skip => "○",
            TestStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "SKIP"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single test execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub test_case: TestCase,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl TestResult {
    pub fn pass(test_case: TestCase, duration_ms: u64) -> Self {
        Self {
            test_case,
            status: TestStatus::Pass,
            duration_ms,
            message: None,
        }
    }

    pub fn fail(test_case: TestCase, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Fail,
            duration_ms,
            message: Some(message.into()),
        }
    }

    pub fn skip(test_case: TestCase, reason: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Skip,
            duration_ms: 0,
            message: Some(reason.into()),
        }
    }

    pub fn error(test_case: TestCase, error: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Error,
            duration_ms: 0,
            message: Some(error.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.test_case,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of test round execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRoundSummary {
    pub round: u32,
    /// Base URL the round ran against
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestRoundSummary {
    pub fn new(round: u32, target: impl Into<String>, results: Vec<TestResult>) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();

        Self {
            round,
            target: target.into(),
            started_at: Utc::now(),
            total: results.len(),
            passed: count(TestStatus::Pass),
            failed: count(TestStatus::Fail),
            skipped: count(TestStatus::Skip),
            errors: count(TestStatus::Error),
            total_duration_ms: results.iter().map(|r| r.duration_ms).sum(),
            results,
        }
    }

    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn pass_rate(&self) -> f64 {
        let ran = self.total - self.skipped;
        if ran == 0 {
            0.0
        } else {
            (self.passed as f64 / ran as f64) * 100.0
        }
    }

    /// No case failed or errored; skipped cases do not count against a round
    pub fn is_all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestRoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} - {}", self.round, self.target)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}",
            self.total, self.passed, self.failed, self.skipped, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}
