//! Check command - validate the calls of a JSON call spec

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use contract_guard::call_spec::{read_call_spec, CallOutcome};
use guard_core::output::{OutputFormat, OutputFormatter};
use guard_core::GuardConfig;

#[derive(Parser, Debug)]
pub struct CheckCmd {
    /// JSON call spec file (use '-' for stdin)
    pub spec: PathBuf,
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    callable: &'a str,
    checked: usize,
    rejected: usize,
    outcomes: &'a [CallOutcome],
}

impl CheckCmd {
    pub fn execute(&self, formatter: &OutputFormatter, config: &GuardConfig) -> Result<ExitCode> {
        let spec = read_call_spec(&self.spec)?;
        let contract = spec.contract(config.clone())?;
        let source = self.spec.display().to_string();
        let outcomes = spec.check_calls(&contract, &source);
        let rejected = outcomes.iter().filter(|o| !o.accepted).count();

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match formatter.format() {
            OutputFormat::Human => {
                for outcome in &outcomes {
                    match &outcome.report {
                        None => writeln!(out, "call {}: accepted", outcome.call)?,
                        Some(report) => {
                            writeln!(out, "call {}: rejected", outcome.call)?;
                            formatter.write_violation(report, &mut out)?;
                        }
                    }
                }
                writeln!(
                    out,
                    "Summary: {} calls checked, {} rejected",
                    outcomes.len(),
                    rejected
                )?;
            }
            OutputFormat::Json => formatter.write_value(
                &CheckSummary {
                    callable: contract.signature().name(),
                    checked: outcomes.len(),
                    rejected,
                    outcomes: &outcomes,
                },
                &mut out,
            )?,
            OutputFormat::JsonLines => {
                for outcome in &outcomes {
                    formatter.write_value(outcome, &mut out)?;
                }
            }
        }

        Ok(if rejected == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
