//! Output formatting module
//!
//! Provides various output formats for test results.

mod formatter;

pub use formatter::{save_summaries, save_summary, OutputFormat, ResultFormatter};
