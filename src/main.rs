//! Explorer API Tests - black-box checks for a blockchain explorer REST API
//!
//! Sends real HTTP requests to a running explorer and checks status codes,
//! response shapes and response times of its public endpoints.
//!
//! ## Features
//!
//! - 13 test cases covering `history`, `tokens` and `token-pairs`
//! - Request executor that turns every outcome into a normalized response
//! - Required/optional field schema validation
//! - Parallel execution and multi-round runs with flaky test detection
//! - Multiple output formats (Table, JSON, CSV)
//!
//! ## Usage
//!
//! ```bash
//! # Run all tests against a local explorer
//! explorer-api-tests test --base-url http://localhost:8080/api/v1/
//!
//! # Run specific test
//! explorer-api-tests test --test 11
//!
//! # Run the tokens tests for 10 rounds in parallel
//! explorer-api-tests test --endpoint tokens --rounds 10 --parallel
//!
//! # List available tests
//! explorer-api-tests list --detailed
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::info;

mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod tests;
mod utils;
mod validation;

use cli::{Args, Command};
use config::{ConfigFile, EnvConfig};
use executor::{aggregate_results, run_test_by_number, BatchRunner, TestRunner};
use models::{Endpoint, TestCase, TestConfig, TestRoundSummary};
use output::{OutputFormat, ResultFormatter};
use utils::LogLevel;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    utils::init_logger(log_level(&args, &env)?);

    let all_passed = match args.command {
        Command::Test(test_args) => run_tests(test_args, &env).await?,
        Command::List(list_args) => {
            list_tests(list_args);
            true
        }
        Command::Config(config_args) => {
            manage_config(config_args, &env)?;
            true
        }
    };

    if !all_passed {
        std::process::exit(1);
    }

    Ok(())
}

/// `--log-level` wins; otherwise `--verbose` or EXPLORER_API_VERBOSE pick debug
fn log_level(args: &Args, env: &EnvConfig) -> Result<LogLevel> {
    match &args.log_level {
        Some(name) => {
            LogLevel::from_str(name).with_context(|| format!("Unknown log level: {name}"))
        }
        None => Ok(LogLevel::for_verbosity(
            args.verbose || env.verbose.unwrap_or(false),
        )),
    }
}

/// Run the selected tests; returns whether every round passed
async fn run_tests(args: cli::TestArgs, env: &EnvConfig) -> Result<bool> {
    let mut file = ConfigFile::resolve(args.config.as_deref(), env)?;
    apply_overrides(&mut file, &args);
    file.validate()?;

    let format = OutputFormat::from_str(&file.run.format).with_context(|| {
        format!(
            "Unknown output format: {} (expected one of {})",
            file.run.format,
            OutputFormat::all_names().join(", ")
        )
    })?;
    let formatter = ResultFormatter::new(format);
    let config = TestConfig::from(&file);

    info!(
        "Testing {} ({} rounds{})",
        config.api.base_url,
        config.rounds,
        if config.parallel { ", parallel" } else { "" }
    );

    if let (Some(test_num), 1, false) = (args.test, config.rounds, config.parallel) {
        let target = config.api.base_url.clone();
        let result = run_test_by_number(config, test_num).await?;
        println!("{}", formatter.format_result(&result));

        let summary = TestRoundSummary::new(1, target, vec![result]);
        if let Some(path) = &args.output {
            output::save_summary(Path::new(path), &summary)?;
            info!("Results saved to {}", path);
        }
        return Ok(summary.is_all_passed());
    }

    let test_cases = select_cases(&args)?;
    let summaries = if config.parallel {
        BatchRunner::new(config.max_concurrent, config.rounds)
            .run_rounds(&config, &test_cases)
            .await?
    } else {
        TestRunner::new(config.clone())?
            .run_rounds(config.rounds, &test_cases)
            .await
    };

    for summary in &summaries {
        println!("{}", formatter.format_summary(summary));
    }

    if summaries.len() > 1 {
        let aggregate = aggregate_results(&summaries);
        println!(
            "{}",
            formatter.format_aggregate(&aggregate, &config.api.base_url)
        );
    }

    if let Some(path) = &args.output {
        match summaries.as_slice() {
            [summary] => output::save_summary(Path::new(path), summary)?,
            all => output::save_summaries(Path::new(path), all)?,
        }
        info!("Results saved to {}", path);
    }

    Ok(summaries.iter().all(|s| s.is_all_passed()))
}

/// Command-line flags win over file and environment settings
fn apply_overrides(file: &mut ConfigFile, args: &cli::TestArgs) {
    if let Some(base_url) = &args.base_url {
        file.api.base_url = base_url.clone();
    }
    if let Some(timeout) = args.timeout {
        file.api.timeouts.request_ms = timeout;
    }
    if let Some(rounds) = args.rounds {
        file.run.rounds = rounds;
    }
    if args.parallel {
        file.run.parallel = true;
    }
    if let Some(concurrent) = args.concurrent {
        file.run.max_concurrent = concurrent;
    }
    if let Some(format) = &args.format {
        file.run.format = format.clone();
    }
    if !args.skip.is_empty() {
        file.run.skip_tests = args.skip.clone();
    }
}

fn select_cases(args: &cli::TestArgs) -> Result<Vec<TestCase>> {
    if let Some(test_num) = args.test {
        let test_case = TestCase::from_number(test_num)
            .with_context(|| format!("Invalid test number: {test_num}"))?;
        return Ok(vec![test_case]);
    }

    match &args.endpoint {
        Some(name) => {
            let endpoint = Endpoint::from_str(name)
                .with_context(|| format!("Unknown endpoint: {name}"))?;
            Ok(TestCase::for_endpoint(endpoint))
        }
        None => Ok(TestCase::all()),
    }
}

fn list_tests(args: cli::ListArgs) {
    let defaults = config::ApiConfig::default();

    println!("\nExplorer API Test Cases ({} total)\n", TestCase::all().len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for endpoint in Endpoint::all() {
        println!("\n{endpoint} Tests:");
        println!("──────────────────────────────────────────────────────────────────────");

        for test_case in TestCase::for_endpoint(endpoint) {
            if args.detailed {
                println!(
                    "  {:2}. {:24} [{} {}]",
                    test_case.number(),
                    test_case.name(),
                    request_method(test_case),
                    defaults.endpoints.path(endpoint)
                );
            } else {
                println!("  {:2}. {}", test_case.number(), test_case.name());
            }
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

fn request_method(test_case: TestCase) -> &'static str {
    match test_case {
        TestCase::TokensMethodNotAllowed => "POST",
        TestCase::PairsMethodNotAllowed => "DELETE",
        _ => "GET",
    }
}

fn manage_config(args: cli::ConfigArgs, env: &EnvConfig) -> Result<()> {
    match args.action {
        cli::ConfigAction::Show { config, format } => {
            let config = ConfigFile::resolve(config.as_deref(), env)?;
            let output = if format == "json" {
                serde_json::to_string_pretty(&config)?
            } else {
                serde_yaml::to_string(&config)?
            };
            println!("{output}");
        }

        cli::ConfigAction::Init { path, force } => {
            if Path::new(&path).exists() && !force {
                anyhow::bail!("Configuration file already exists: {path}. Use --force to overwrite.");
            }

            ConfigFile::example().save(&path)?;
            println!("✓ Configuration file created: {path}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Env => {
            config::print_env_help();
            if env.has_any() {
                println!();
                env.print_summary();
            }
        }
    }

    Ok(())
}
