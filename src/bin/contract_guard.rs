//! contract-guard: check calls against runtime argument contracts
//!
//! ## Commands
//!
//! - **check**: validate the calls in a JSON call spec and print each outcome
//! - **demo**: run the built-in guarded callables and print their reports
//! - **self-test**: run the engine's behavioral checks
//!
//! ## Example Usage
//!
//! ```bash
//! # Check calls from a spec file; exits non-zero if any call is rejected
//! contract-guard check calls.json
//!
//! # Same, as JSON Lines
//! contract-guard --format jsonl check calls.json
//!
//! # Show what the reports look like
//! contract-guard demo
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod guard_cli;

use guard_cli::{check::CheckCmd, demo::DemoCmd, self_test::SelfTestCmd};
use guard_core::output::{OutputFormat, OutputFormatter};
use guard_core::GuardConfig;

#[derive(Parser)]
#[command(
    name = "contract-guard",
    author,
    version,
    about = "Check calls against runtime argument contracts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: human, json, or jsonl
    #[arg(
        long,
        global = true,
        env = "CONTRACT_GUARD_FORMAT",
        default_value = "human",
        value_parser = parse_format
    )]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the calls described in a JSON call spec
    Check(CheckCmd),

    /// Run the illustrative guarded callables
    Demo(DemoCmd),

    /// Run the built-in behavioral checks
    SelfTest(SelfTestCmd),
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s)
        .ok_or_else(|| format!("unknown format '{}' (expected human, json, or jsonl)", s))
}

fn main() -> Result<ExitCode> {
    let Cli { command, format } = Cli::parse();
    let formatter = OutputFormatter::new(format);
    let config = GuardConfig::from_env();

    match command {
        Commands::Check(cmd) => cmd.execute(&formatter, &config),
        Commands::Demo(cmd) => cmd.execute(&formatter, &config),
        Commands::SelfTest(cmd) => cmd.execute(&formatter),
    }
}
