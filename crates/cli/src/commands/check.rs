//! Check Command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use a11y_report::{load_summaries, CompliancePolicy, ImpactLevel, PolicyVerdict};

use crate::output::{print_error, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct CheckArgs {
    /// Summaries file written by `scan` or `render`
    pub summaries: PathBuf,

    /// Impact levels that fail a page
    #[arg(long, value_delimiter = ',', default_value = "critical,serious")]
    pub fail_on: Vec<ImpactLevel>,

    /// Do not fail on violations with a missing or unrecognized impact
    #[arg(long)]
    pub allow_unknown: bool,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

impl CheckArgs {
    fn policy(&self) -> CompliancePolicy {
        CompliancePolicy {
            fail_on_unknown: !self.allow_unknown,
            ..CompliancePolicy::with_levels(self.fail_on.iter().copied())
        }
    }
}

#[derive(Serialize)]
pub struct VerdictRow(PolicyVerdict);

impl TableDisplay for VerdictRow {
    fn headers() -> Vec<&'static str> {
        vec!["Page", "Result", "Blocking", "Violations"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.0.page_name.clone(),
            if self.0.passed { "PASS" } else { "FAIL" }.to_string(),
            self.0.blocking.to_string(),
            self.0.total.to_string(),
        ]
    }
}

pub fn execute(args: CheckArgs) -> Result<bool> {
    let summaries = load_summaries(&args.summaries)
        .with_context(|| format!("loading {}", args.summaries.display()))?;

    let verdicts = args.policy().evaluate_run(&summaries);
    let failing = verdicts.iter().filter(|v| !v.passed).count();

    let rows: Vec<VerdictRow> = verdicts.into_iter().map(VerdictRow).collect();
    print_list(&rows, args.format);

    if failing == 0 {
        print_success(&format!("All {} page(s) pass the compliance policy", rows.len()));
        Ok(true)
    } else {
        print_error(&format!("{} of {} page(s) failed the compliance policy", failing, rows.len()));
        Ok(false)
    }
}
