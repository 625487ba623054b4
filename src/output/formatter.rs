//! Output formatters for test results
//!
//! Provides JSON, Table, CSV and summary output formats.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::executor::AggregateResult;
use crate::models::{TestResult, TestRoundSummary, TestStatus};

const CSV_HEADER: [&str; 6] = [
    "round",
    "test_num",
    "test_name",
    "status",
    "duration_ms",
    "message",
];

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["table", "json", "json-pretty", "csv", "summary"]
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a single test result
    pub fn format_result(&self, result: &TestResult) -> String {
        match self.format {
            OutputFormat::Table => self.format_result_table(result),
            OutputFormat::Json => serde_json::to_string(result).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Csv => csv_rows(false, [(0, result)]).unwrap_or_default(),
            OutputFormat::Summary => format_result_brief(result),
        }
    }

    fn status_label(&self, status: TestStatus) -> String {
        let label = format!("{} {}", status.symbol(), status);
        if !self.colorize {
            return label;
        }
        let color = match status {
            TestStatus::Pass => "32",
            TestStatus::Skip => "33",
            TestStatus::Fail | TestStatus::Error => "31",
        };
        format!("\x1b[{color}m{label:<7}\x1b[0m")
    }

    fn format_result_table(&self, result: &TestResult) -> String {
        format!(
            "{:2}. {:24} {:<7} [{:>6}ms]",
            result.test_case.number(),
            result.test_case.name(),
            self.status_label(result.status),
            result.duration_ms
        )
    }

    /// Format test round summary
    pub fn format_summary(&self, summary: &TestRoundSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Csv => {
                csv_rows(true, summary.results.iter().map(|r| (summary.round, r)))
                    .unwrap_or_default()
            }
            OutputFormat::Summary => format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &TestRoundSummary) -> String {
        let mut output = String::new();

        output.push_str("\n══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(" Round {} - {}\n", summary.round, summary.target));
        output.push_str(&format!(
            " Started {}\n",
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str("══════════════════════════════════════════════════════════════\n");

        for result in &summary.results {
            output.push_str(&format!(" {}\n", self.format_result_table(result)));
            if result.status != TestStatus::Pass {
                if let Some(message) = &result.message {
                    for line in message.lines() {
                        output.push_str(&format!("       {line}\n"));
                    }
                }
            }
        }

        output.push_str("──────────────────────────────────────────────────────────────\n");

        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            " Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}\n",
            summary.total, summary.passed, fail_str, summary.skipped, summary.errors
        ));
        output.push_str(&format!(
            " Pass Rate: {:.1}% | Duration: {}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));

        output
    }

    /// Format aggregate results
    pub fn format_aggregate(&self, aggregate: &AggregateResult, target: &str) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                #[derive(Serialize)]
                struct AggregateJson<'a> {
                    target: &'a str,
                    total_rounds: u32,
                    overall_pass_rate: f64,
                    test_pass_rates: BTreeMap<u8, f64>,
                    flaky_tests: Vec<u8>,
                }

                let json = AggregateJson {
                    target,
                    total_rounds: aggregate.total_rounds,
                    overall_pass_rate: aggregate.overall_pass_rate,
                    test_pass_rates: aggregate
                        .test_pass_rates
                        .iter()
                        .map(|(k, v)| (k.number(), *v))
                        .collect(),
                    flaky_tests: aggregate
                        .flaky_tests()
                        .iter()
                        .map(|(tc, _)| tc.number())
                        .collect(),
                };

                if self.format == OutputFormat::JsonPretty {
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                } else {
                    serde_json::to_string(&json).unwrap_or_default()
                }
            }
            _ => self.format_aggregate_table(aggregate, target),
        }
    }

    fn format_aggregate_table(&self, aggregate: &AggregateResult, target: &str) -> String {
        let mut output = String::new();

        output.push_str("\n═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Aggregate Results: {} ({} rounds)\n",
            target, aggregate.total_rounds
        ));
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Overall Pass Rate: {:.1}%\n\n",
            aggregate.overall_pass_rate
        ));

        let mut tests: Vec<_> = aggregate.test_pass_rates.iter().collect();
        tests.sort_by_key(|(tc, _)| tc.number());

        for (test_case, rate) in tests {
            let bar_len = ((*rate / 5.0) as usize).min(20);
            output.push_str(&format!(
                " {:2}. {:24} {}{} {:5.1}%\n",
                test_case.number(),
                test_case.name(),
                "█".repeat(bar_len),
                "░".repeat(20 - bar_len),
                rate
            ));
        }

        let flaky = aggregate.flaky_tests();
        if !flaky.is_empty() {
            output.push_str("\n Flaky Tests (< 100% pass rate):\n");
            for (tc, rate) in flaky.iter().take(5) {
                output.push_str(&format!("   - {} ({:.1}%)\n", tc.name(), rate));
            }
        }

        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

fn format_result_brief(result: &TestResult) -> String {
    format!(
        "{} {} ({}ms)",
        result.status.symbol(),
        result.test_case.name(),
        result.duration_ms
    )
}

fn format_summary_brief(summary: &TestRoundSummary) -> String {
    format!(
        "Round {} against {}: {}/{} passed ({:.1}%) in {}ms",
        summary.round,
        summary.target,
        summary.passed,
        summary.total,
        summary.pass_rate(),
        summary.total_duration_ms
    )
}

/// Render results as CSV, one row per result
fn csv_rows<'a>(
    header: bool,
    rows: impl IntoIterator<Item = (u32, &'a TestResult)>,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if header {
        writer.write_record(CSV_HEADER)?;
    }

    for (round, result) in rows {
        writer.write_record([
            round.to_string(),
            result.test_case.number().to_string(),
            result.test_case.name().to_string(),
            result.status.to_string(),
            result.duration_ms.to_string(),
            result.message.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;
    Ok(())
}

/// Write one round summary to a file as pretty JSON
pub fn save_summary(path: &Path, summary: &TestRoundSummary) -> Result<()> {
    write_json(path, summary)
}

/// Write several round summaries to a file as a pretty JSON array
pub fn save_summaries(path: &Path, summaries: &[TestRoundSummary]) -> Result<()> {
    write_json(path, summaries)
}
