//! Test execution engine
//!
//! Provides the guarded test wrapper plus sequential and parallel runners.

mod parallel;
mod runner;

pub use parallel::{aggregate_results, AggregateResult, BatchRunner, ParallelExecutor};
pub use runner::{run_guarded, run_test_by_number, CaseError, TestRunner};
