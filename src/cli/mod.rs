//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Black-box REST API tests for a blockchain explorer
#[derive(Parser, Debug)]
#[command(name = "explorer-api-tests")]
#[command(version)]
#[command(about = "Run the history, tokens and token-pairs checks against a live explorer API")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error); overrides --verbose
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run explorer API tests
    Test(TestArgs),

    /// List available tests
    List(ListArgs),

    /// Show or create configuration
    Config(ConfigArgs),
}

/// Arguments for test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Only run the tests of one endpoint (history, tokens, token-pairs)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Specific test number to run (1-13)
    #[arg(short, long)]
    pub test: Option<u8>,

    /// Base URL of the explorer API
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Number of test rounds
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Run tests in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of concurrent tests (when parallel)
    #[arg(short, long)]
    pub concurrent: Option<usize>,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Test numbers to skip
    #[arg(short, long, value_delimiter = ',')]
    pub skip: Vec<u8>,

    /// Save results to file as JSON
    #[arg(short, long)]
    pub output: Option<String>,

    /// Configuration file
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show detailed test information
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Configuration file to load
        #[arg(long)]
        config: Option<String>,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Write an example configuration file
    Init {
        /// Output path (.yaml, .yml or .json)
        #[arg(default_value = "explorer-api-tests.yaml")]
        path: String,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show environment variable overrides
    Env,
}
