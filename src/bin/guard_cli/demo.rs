//! Demo command - run the illustrative guarded callables

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;

use contract_guard::demo::{run_demos, DemoOutcome};
use guard_core::output::{OutputFormat, OutputFormatter};
use guard_core::GuardConfig;

#[derive(Parser, Debug)]
pub struct DemoCmd {}

impl DemoCmd {
    pub fn execute(&self, formatter: &OutputFormatter, config: &GuardConfig) -> Result<ExitCode> {
        let cases = run_demos(config)?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        match formatter.format() {
            OutputFormat::Human => {
                let mut title = "";
                for case in &cases {
                    if case.title != title {
                        title = case.title;
                        writeln!(out, "\n## {}", title)?;
                    }
                    writeln!(out, "{}", case.call)?;
                    match &case.outcome {
                        DemoOutcome::Returned { value } => writeln!(out, "  -> {}", value)?,
                        DemoOutcome::Failed { error } => writeln!(out, "  -> error: {}", error)?,
                        DemoOutcome::Rejected { report } => {
                            formatter.write_violation(report, &mut out)?
                        }
                    }
                }
            }
            OutputFormat::Json => formatter.write_value(&cases, &mut out)?,
            OutputFormat::JsonLines => {
                for case in &cases {
                    formatter.write_value(case, &mut out)?;
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}
