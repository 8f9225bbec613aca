//! Doctor command - check that native tools and project directories resolve

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use super::resolve::{block_on, resolve_deferred, ResolvedField};
use crate::cli::output::{check_line, header};
use crate::cli::{Cli, OutputFormat};

/// Check that native tools and project directories can be found
#[derive(Debug, Args)]
pub struct DoctorCommand {
    /// Show suggestions for fixing issues
    #[arg(long)]
    pub fix: bool,
}

/// Summary of all checks
#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub checks: Vec<ResolvedField>,
    pub ok_count: usize,
    pub fail_count: usize,
}

impl DoctorSummary {
    fn new(checks: Vec<ResolvedField>) -> Self {
        let ok_count = checks.iter().filter(|c| c.is_resolved()).count();
        let fail_count = checks.len() - ok_count;
        Self {
            checks,
            ok_count,
            fail_count,
        }
    }
}

impl DoctorCommand {
    /// Execute the doctor command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(fix = self.fix, "executing doctor command");
        let config = cli.loader()?.load()?;

        if cli.is_text() {
            println!("{}", header("Checking environment..."));
            println!();
        }

        let summary = DoctorSummary::new(block_on(resolve_deferred(&config))?);
        info!(
            ok = summary.ok_count,
            failed = summary.fail_count,
            "doctor checks finished"
        );

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    self.print_results(&summary);
                }
            }
        }

        if summary.fail_count > 0 {
            anyhow::bail!("{} check(s) failed", summary.fail_count);
        }

        Ok(())
    }

    fn print_results(&self, summary: &DoctorSummary) {
        for check in &summary.checks {
            let detail = check
                .value
                .as_deref()
                .or(check.error.as_deref())
                .unwrap_or_default();
            println!("{}", check_line(check.name, check.is_resolved(), detail));
        }

        println!();
        println!(
            "{} passed, {} failed",
            style(summary.ok_count).green(),
            style(summary.fail_count).red()
        );

        if self.fix && summary.fail_count > 0 {
            println!();
            println!("{}", header("Suggested fixes:"));
            for check in summary.checks.iter().filter(|c| !c.is_resolved()) {
                if let Some(hint) = &check.hint {
                    println!("  {}: {}", style(check.name).bold(), hint);
                }
            }
        }
    }
}
