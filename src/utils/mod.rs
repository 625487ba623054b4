//! Shared utilities
//!
//! Logging setup and response-time measurement.

mod logger;
mod timer;

pub use logger::{init_logger, LogLevel};
pub use timer::{measure, PerformanceResult, Timer, DEFAULT_LIMIT_MS};
