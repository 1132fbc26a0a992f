//! Cross-page totals shared by every renderer

use serde::Serialize;

use crate::summary::{ImpactCounts, PageScanSummary};

/// Aggregate numbers for a whole run. Both report formats read their header
/// figures from this one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub pages_tested: usize,
    pub compliant_pages: usize,
    pub total_violations: usize,
    pub counts: ImpactCounts,
    pub total_passes: usize,
}

impl RunTotals {
    pub fn from_summaries(summaries: &[PageScanSummary]) -> Self {
        summaries.iter().fold(Self::default(), |mut totals, page| {
            totals.pages_tested += 1;
            if page.is_compliant() {
                totals.compliant_pages += 1;
            }
            totals.total_violations += page.total_violations();
            totals.counts += page.counts();
            totals.total_passes += page.pass_count();
            totals
        })
    }

    /// True when every page is compliant, including the empty run
    pub fn overall_pass(&self) -> bool {
        self.compliant_pages == self.pages_tested
    }

    pub fn non_compliant_pages(&self) -> usize {
        self.pages_tested - self.compliant_pages
    }
}
