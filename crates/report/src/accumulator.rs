//! Run-scoped accumulation of page summaries

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{ReportError, ReportResult};
use crate::summary::PageScanSummary;

/// Append-only collection of the page summaries produced during one run.
///
/// The report is owned by whoever drives the run and handed to scan workers
/// (usually behind an `Arc`). Appends are serialized by an internal lock, so
/// concurrent workers never lose an update. Pages appear in completion order.
#[derive(Debug, Default)]
pub struct RunReport {
    pages: Mutex<Vec<PageScanSummary>>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed page scan. Page names are unique within a run; a
    /// second summary for the same name is rejected and nothing is recorded.
    pub fn append(&self, summary: PageScanSummary) -> ReportResult<()> {
        let mut pages = self.pages.lock();

        if pages.iter().any(|p| p.page_name() == summary.page_name()) {
            return Err(ReportError::DuplicatePage(summary.page_name().to_string()));
        }

        debug!(
            "Recorded '{}' ({} violations, {} pages so far)",
            summary.page_name(),
            summary.total_violations(),
            pages.len() + 1
        );
        pages.push(summary);
        Ok(())
    }

    /// Copy of everything recorded so far, for rendering
    pub fn snapshot(&self) -> Vec<PageScanSummary> {
        self.pages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.pages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.lock().is_empty()
    }

    pub fn into_summaries(self) -> Vec<PageScanSummary> {
        self.pages.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::summary::summarize;
    use crate::types::{Impact, RawRuleResult, RawScanResult};

    fn page(name: &str, violations: usize) -> PageScanSummary {
        let raw = RawScanResult {
            violations: (0..violations)
                .map(|i| RawRuleResult {
                    id: format!("rule-{}", i),
                    impact: Impact::from("serious"),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        summarize(raw, name, Utc::now())
    }

    #[test]
    fn test_append_and_snapshot() {
        let report = RunReport::new();
        assert!(report.is_empty());

        report.append(page("Home", 0)).unwrap();
        report.append(page("Results", 3)).unwrap();

        let snapshot = report.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].page_name(), "Home");
        assert_eq!(snapshot[1].total_violations(), 3);
    }

    #[test]
    fn test_duplicate_page_rejected() {
        let report = RunReport::new();
        report.append(page("Home", 1)).unwrap();

        let err = report.append(page("Home", 2)).unwrap_err();
        assert!(matches!(err, ReportError::DuplicatePage(name) if name == "Home"));
        assert_eq!(report.len(), 1);
        assert_eq!(report.snapshot()[0].total_violations(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_not_lost() {
        let report = Arc::new(RunReport::new());
        let mut handles = Vec::new();

        for i in 0..64 {
            let report = Arc::clone(&report);
            handles.push(tokio::spawn(async move {
                report.append(page(&format!("page-{}", i), i % 3)).unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(report.len(), 64);
    }
}
