//! Render Command

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use a11y_report::{log_summary, PageScanSummary, RawScanResult, ReportWriter, RunReport, RunTotals};

use crate::output::{print_success, print_warning};

#[derive(Args)]
pub struct RenderArgs {
    /// Raw axe-core result files, one per page
    #[arg(required = true)]
    pub raw: Vec<PathBuf>,

    /// Directory for the reports
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Page name, when rendering a single file
    #[arg(long)]
    pub name: Option<String>,
}

/// Page name for a raw result file: its stem
fn page_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("no file name in {}", path.display()))
}

pub fn execute(args: RenderArgs) -> Result<bool> {
    if args.name.is_some() && args.raw.len() > 1 {
        bail!("--name can only be used with a single raw result file");
    }

    let report = RunReport::new();
    for path in &args.raw {
        let name = match &args.name {
            Some(name) => name.clone(),
            None => page_name(path)?,
        };

        let raw = RawScanResult::from_file(path)
            .with_context(|| format!("reading scan result {}", path.display()))?;
        let summary = PageScanSummary::from_scan(raw, name);
        log_summary(&summary);
        report.append(summary)?;
    }

    let summaries = report.into_summaries();
    let paths = ReportWriter::new(&args.output).write_all(&summaries)?;
    info!("Rendered {} page(s)", summaries.len());

    print_success(&format!("HTML report: {}", paths.html.display()));
    print_success(&format!("Markdown report: {}", paths.markdown.display()));
    print_success(&format!("Summaries: {}", paths.json.display()));

    let totals = RunTotals::from_summaries(&summaries);
    if !totals.overall_pass() {
        print_warning(&format!(
            "{} violation(s) on {} page(s)",
            totals.total_violations,
            totals.non_compliant_pages()
        ));
    }

    Ok(true)
}
