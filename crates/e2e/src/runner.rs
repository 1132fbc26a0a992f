//! Scan runner: executes page specs, feeds the run report, writes results

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use a11y_report::{log_summary, CompliancePolicy, PageScanSummary, ReportPaths, RunReport};

use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::playwright::{AxeScanner, PageScanner};
use crate::spec::ScanSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Scanned, no violation the policy blocks on
    Passed,
    /// Scanned, blocking violations present
    Failed,
    /// No scan result (driver failure, timeout, rejected summary)
    Errored,
}

/// Result of scanning a single page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutcome {
    pub name: String,
    pub status: PageStatus,
    pub duration_ms: u64,
    pub violations: usize,
    pub blocking: usize,
    pub error: Option<String>,
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteOutcome {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub duration_ms: u64,
    pub pages: Vec<PageOutcome>,
    /// Summaries this run recorded in the run report, in completion order
    #[serde(skip)]
    pub summaries: Vec<PageScanSummary>,
}

impl SuiteOutcome {
    pub fn success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// Drives scans for a suite
pub struct ScanRunner {
    config: SuiteConfig,
    scanner: Arc<dyn PageScanner>,
}

impl ScanRunner {
    /// Runner using Playwright and axe-core
    pub fn with_config(config: SuiteConfig) -> Self {
        let scanner = Arc::new(AxeScanner::new(config.playwright_config()));
        Self::with_scanner(config, scanner)
    }

    pub fn with_scanner(config: SuiteConfig, scanner: Arc<dyn PageScanner>) -> Self {
        Self { config, scanner }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run all specs in the specs directory
    pub async fn run_all(&self) -> E2eResult<SuiteOutcome> {
        let specs = ScanSpec::load_all(&self.config.specs_dir)?;
        self.run_specs(&specs).await
    }

    /// Run specs carrying a tag
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<SuiteOutcome> {
        let specs = ScanSpec::load_all(&self.config.specs_dir)?;
        let filtered: Vec<ScanSpec> = ScanSpec::filter_by_tag(&specs, tag)
            .into_iter()
            .cloned()
            .collect();
        self.run_specs(&filtered).await
    }

    /// Run a single spec by page name
    pub async fn run_named(&self, name: &str) -> E2eResult<SuiteOutcome> {
        let specs = ScanSpec::load_all(&self.config.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecNotFound(name.to_string()))?;
        self.run_specs(&[spec]).await
    }

    /// Run specs into a fresh run report
    pub async fn run_specs(&self, specs: &[ScanSpec]) -> E2eResult<SuiteOutcome> {
        let report = Arc::new(RunReport::new());
        self.run_specs_into(specs, &report).await
    }

    /// Run specs, appending every completed scan to `report`. Pages are
    /// scanned on up to `workers` concurrent tasks; a failure on one page
    /// does not stop the others.
    ///
    /// `report` may already hold pages from earlier calls. The returned
    /// outcome covers only the pages of this call, `summaries` included.
    pub async fn run_specs_into(
        &self,
        specs: &[ScanSpec],
        report: &Arc<RunReport>,
    ) -> E2eResult<SuiteOutcome> {
        self.config.validate()?;
        if !specs.is_empty() {
            self.scanner.check().await?;
        }

        let start = Instant::now();
        let workers = self.config.workers;
        let semaphore = Arc::new(Semaphore::new(workers));
        let exclusions = Arc::new(self.config.global_exclusions.clone());
        let policy = Arc::new(self.config.policy.clone());

        info!("Scanning {} page(s) with {} worker(s)...", specs.len(), workers);

        let mut tasks = JoinSet::new();
        for spec in specs.iter().cloned() {
            let semaphore = Arc::clone(&semaphore);
            let scan = scan_page(
                spec.clone(),
                Arc::clone(&self.scanner),
                Arc::clone(&exclusions),
                Arc::clone(&policy),
                Arc::clone(report),
            );

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return errored_outcome(&spec.name, 0, e.to_string()),
                };

                // A panicking scan is reported against its page
                let page_start = Instant::now();
                match tokio::spawn(scan).await {
                    Ok(outcome) => outcome,
                    Err(e) => errored_outcome(
                        &spec.name,
                        page_start.elapsed().as_millis() as u64,
                        format!("scan task failed: {}", e),
                    ),
                }
            });
        }

        let mut pages = Vec::with_capacity(specs.len());
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Scan worker failed: {}", e);
                    continue;
                }
            };

            match outcome.status {
                PageStatus::Passed => info!("✓ {} ({} ms)", outcome.name, outcome.duration_ms),
                PageStatus::Failed => warn!(
                    "✗ {} - {} blocking of {} violation(s)",
                    outcome.name, outcome.blocking, outcome.violations
                ),
                PageStatus::Errored => error!(
                    "✗ {} - {}",
                    outcome.name,
                    outcome.error.as_deref().unwrap_or("unknown error")
                ),
            }
            pages.push(outcome);
        }

        let count = |status: PageStatus| pages.iter().filter(|p| p.status == status).count();
        let passed = count(PageStatus::Passed);
        let failed = count(PageStatus::Failed);
        let errored = count(PageStatus::Errored);
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Scan results: {} passed, {} failed, {} errored ({} ms)",
            passed, failed, errored, duration_ms
        );

        let recorded: HashSet<&str> = pages
            .iter()
            .filter(|p| p.status != PageStatus::Errored)
            .map(|p| p.name.as_str())
            .collect();
        let summaries = report
            .snapshot()
            .into_iter()
            .filter(|s| recorded.contains(s.page_name()))
            .collect();

        Ok(SuiteOutcome {
            total: specs.len(),
            passed,
            failed,
            errored,
            duration_ms,
            pages,
            summaries,
        })
    }

    /// Write the HTML and Markdown reports and the summaries dump
    pub fn write_reports(&self, outcome: &SuiteOutcome) -> E2eResult<ReportPaths> {
        Ok(self.config.report_writer().write_all(&outcome.summaries)?)
    }

    /// Write per-page outcomes to JSON
    pub fn write_results(&self, outcome: &SuiteOutcome) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("scan-results.json");
        let json = serde_json::to_string_pretty(outcome)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Scan one page, then summarize, log, judge and record it
async fn scan_page(
    spec: ScanSpec,
    scanner: Arc<dyn PageScanner>,
    exclusions: Arc<Vec<String>>,
    policy: Arc<CompliancePolicy>,
    report: Arc<RunReport>,
) -> PageOutcome {
    let start = Instant::now();
    debug!("Scanning: {}", spec.name);

    let result = scanner.scan(&spec, &spec.exclusions(&exclusions)).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    let raw = match result {
        Ok(raw) => raw,
        Err(e) => return errored_outcome(&spec.name, duration_ms, e.to_string()),
    };

    let summary = PageScanSummary::from_scan(raw, spec.name.clone());
    log_summary(&summary);
    let verdict = policy.evaluate(&summary);

    if let Err(e) = report.append(summary) {
        return errored_outcome(&spec.name, duration_ms, e.to_string());
    }

    PageOutcome {
        name: spec.name,
        status: if verdict.passed { PageStatus::Passed } else { PageStatus::Failed },
        duration_ms,
        violations: verdict.total,
        blocking: verdict.blocking,
        error: None,
    }
}

fn errored_outcome(name: &str, duration_ms: u64, error: String) -> PageOutcome {
    PageOutcome {
        name: name.to_string(),
        status: PageStatus::Errored,
        duration_ms,
        violations: 0,
        blocking: 0,
        error: Some(error),
    }
}
