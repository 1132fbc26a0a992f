//! Show Command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use a11y_report::{load_summaries, PageScanSummary, RunTotals};

use crate::output::{print_info, print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ShowArgs {
    /// Summaries file written by `scan` or `render`
    pub summaries: PathBuf,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

/// One page of a run, flattened for display
#[derive(Serialize)]
pub struct PageRow {
    pub page: String,
    pub compliant: bool,
    pub violations: usize,
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
    pub unknown: usize,
    pub passes: usize,
    pub scanned_at: String,
}

impl From<&PageScanSummary> for PageRow {
    fn from(summary: &PageScanSummary) -> Self {
        let counts = summary.counts();
        Self {
            page: summary.page_name().to_string(),
            compliant: summary.is_compliant(),
            violations: summary.total_violations(),
            critical: counts.critical,
            serious: counts.serious,
            moderate: counts.moderate,
            minor: counts.minor,
            unknown: counts.unknown,
            passes: summary.pass_count(),
            scanned_at: summary.scanned_at().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl TableDisplay for PageRow {
    fn headers() -> Vec<&'static str> {
        vec![
            "Page", "Status", "Violations", "Critical", "Serious", "Moderate", "Minor", "Unknown",
            "Passes", "Scanned",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.page.clone(),
            if self.compliant { "✓" } else { "✗" }.to_string(),
            self.violations.to_string(),
            self.critical.to_string(),
            self.serious.to_string(),
            self.moderate.to_string(),
            self.minor.to_string(),
            self.unknown.to_string(),
            self.passes.to_string(),
            self.scanned_at.clone(),
        ]
    }
}

pub fn execute(args: ShowArgs) -> Result<bool> {
    let summaries = load_summaries(&args.summaries)
        .with_context(|| format!("loading {}", args.summaries.display()))?;

    let rows: Vec<PageRow> = summaries.iter().map(PageRow::from).collect();
    print_list(&rows, args.format);

    if matches!(args.format, OutputFormat::Table) {
        let totals = RunTotals::from_summaries(&summaries);
        print_info(&format!(
            "{}/{} pages compliant, {} violation(s)",
            totals.compliant_pages, totals.pages_tested, totals.total_violations
        ));
    }

    Ok(true)
}
