//! Per-page scan summaries

use std::ops::{Add, AddAssign};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{Impact, ImpactLevel, RawScanResult, ViolationRecord};

/// Violation counts partitioned by impact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactCounts {
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
    /// Violations whose impact was missing or not one of the four levels
    pub unknown: usize,
}

impl ImpactCounts {
    pub fn from_violations(violations: &[ViolationRecord]) -> Self {
        let mut counts = Self::default();
        for violation in violations {
            counts.record(&violation.impact);
        }
        counts
    }

    pub fn record(&mut self, impact: &Impact) {
        match impact.level() {
            Some(ImpactLevel::Critical) => self.critical += 1,
            Some(ImpactLevel::Serious) => self.serious += 1,
            Some(ImpactLevel::Moderate) => self.moderate += 1,
            Some(ImpactLevel::Minor) => self.minor += 1,
            None => self.unknown += 1,
        }
    }

    pub fn get(&self, level: ImpactLevel) -> usize {
        match level {
            ImpactLevel::Critical => self.critical,
            ImpactLevel::Serious => self.serious,
            ImpactLevel::Moderate => self.moderate,
            ImpactLevel::Minor => self.minor,
        }
    }

    pub fn known_total(&self) -> usize {
        self.critical + self.serious + self.moderate + self.minor
    }

    pub fn total(&self) -> usize {
        self.known_total() + self.unknown
    }
}

impl Add for ImpactCounts {
    type Output = ImpactCounts;

    fn add(mut self, rhs: ImpactCounts) -> ImpactCounts {
        self += rhs;
        self
    }
}

impl AddAssign for ImpactCounts {
    fn add_assign(&mut self, rhs: ImpactCounts) {
        self.critical += rhs.critical;
        self.serious += rhs.serious;
        self.moderate += rhs.moderate;
        self.minor += rhs.minor;
        self.unknown += rhs.unknown;
    }
}

/// Result of scanning one page, fixed at construction.
///
/// `counts` is always derived from `violations`; when a summary is read back
/// from JSON the counts are recomputed rather than trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SummaryRecord")]
pub struct PageScanSummary {
    page_name: String,
    scanned_at: DateTime<Utc>,
    violations: Vec<ViolationRecord>,
    counts: ImpactCounts,
    pass_count: usize,
    inapplicable_count: usize,
    incomplete_count: usize,
}

#[derive(Deserialize)]
struct SummaryRecord {
    page_name: String,
    scanned_at: DateTime<Utc>,
    #[serde(default)]
    violations: Vec<ViolationRecord>,
    #[serde(default)]
    pass_count: usize,
    #[serde(default)]
    inapplicable_count: usize,
    #[serde(default)]
    incomplete_count: usize,
}

impl From<SummaryRecord> for PageScanSummary {
    fn from(record: SummaryRecord) -> Self {
        Self::new(
            record.page_name,
            record.scanned_at,
            record.violations,
            record.pass_count,
            record.inapplicable_count,
            record.incomplete_count,
        )
    }
}

impl PageScanSummary {
    pub fn new(
        page_name: impl Into<String>,
        scanned_at: DateTime<Utc>,
        violations: Vec<ViolationRecord>,
        pass_count: usize,
        inapplicable_count: usize,
        incomplete_count: usize,
    ) -> Self {
        let counts = ImpactCounts::from_violations(&violations);
        Self {
            page_name: page_name.into(),
            scanned_at,
            violations,
            counts,
            pass_count,
            inapplicable_count,
            incomplete_count,
        }
    }

    /// Summarize a scan that just completed
    pub fn from_scan(raw: RawScanResult, page_name: impl Into<String>) -> Self {
        summarize(raw, page_name, Utc::now())
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }

    /// Violations in the order the scanner returned them
    pub fn violations(&self) -> &[ViolationRecord] {
        &self.violations
    }

    pub fn counts(&self) -> ImpactCounts {
        self.counts
    }

    pub fn total_violations(&self) -> usize {
        self.violations.len()
    }

    pub fn pass_count(&self) -> usize {
        self.pass_count
    }

    pub fn inapplicable_count(&self) -> usize {
        self.inapplicable_count
    }

    pub fn incomplete_count(&self) -> usize {
        self.incomplete_count
    }

    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations_with_impact(&self, level: ImpactLevel) -> Vec<&ViolationRecord> {
        self.violations
            .iter()
            .filter(|v| v.impact.level() == Some(level))
            .collect()
    }

    pub fn unrecognized_violations(&self) -> Vec<&ViolationRecord> {
        self.violations
            .iter()
            .filter(|v| v.impact.level().is_none())
            .collect()
    }

    /// Violations whose rule id satisfies `predicate`, e.g. all `aria-*` rules
    pub fn violations_matching<F>(&self, predicate: F) -> Vec<&ViolationRecord>
    where
        F: Fn(&str) -> bool,
    {
        self.violations
            .iter()
            .filter(|v| predicate(&v.rule_id))
            .collect()
    }
}

/// Build the summary for one scanned page
pub fn summarize(
    raw: RawScanResult,
    page_name: impl Into<String>,
    scanned_at: DateTime<Utc>,
) -> PageScanSummary {
    let page_name = page_name.into();
    let violations: Vec<ViolationRecord> =
        raw.violations.into_iter().map(ViolationRecord::from).collect();

    for violation in violations.iter().filter(|v| v.impact.level().is_none()) {
        warn!(
            "Unrecognized impact '{}' for rule '{}' on {}",
            violation.impact.label(),
            violation.rule_id,
            page_name
        );
    }

    PageScanSummary::new(
        page_name,
        scanned_at,
        violations,
        raw.passes.len(),
        raw.inapplicable.len(),
        raw.incomplete.len(),
    )
}
