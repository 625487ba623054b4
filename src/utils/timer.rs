//! Timer utilities
//!
//! Provides timing and response-time measurement helpers.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

use crate::http::NormalizedResponse;

/// Response-time ceiling used when a caller does not name one
pub const DEFAULT_LIMIT_MS: u64 = 1000;

/// Simple timer for measuring elapsed time
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Stop timer and return elapsed time
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!("{}: {}ms", self.label, elapsed.as_millis());
        elapsed
    }
}

/// Wall-clock duration of one request and whether it met its ceiling
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub duration_ms: u64,
    pub is_within_limit: bool,
    pub response: NormalizedResponse,
}

/// Run `operation` to completion and time it.
///
/// The limit only sets `is_within_limit`; a slow operation is never
/// cancelled and its response is returned untouched.
pub async fn measure<F, Fut>(operation: F, limit_ms: u64) -> PerformanceResult
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = NormalizedResponse>,
{
    let timer = Timer::start("measured request");
    let response = operation().await;
    let duration_ms = timer.stop().as_millis() as u64;

    PerformanceResult {
        duration_ms,
        is_within_limit: duration_ms <= limit_ms,
        response,
    }
}
