//! Pass/fail gating of page summaries

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::summary::PageScanSummary;
use crate::types::{Impact, ImpactLevel};

/// Which impacts fail a page. Rendering is unaffected: reports always list
/// every violation, the policy only decides the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompliancePolicy {
    pub fail_on: BTreeSet<ImpactLevel>,
    /// Fail on violations whose impact is missing or unrecognized
    pub fail_on_unknown: bool,
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self {
            fail_on: [ImpactLevel::Critical, ImpactLevel::Serious].into_iter().collect(),
            fail_on_unknown: true,
        }
    }
}

/// Verdict for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVerdict {
    pub page_name: String,
    pub total: usize,
    pub blocking: usize,
    pub passed: bool,
}

impl CompliancePolicy {
    /// Every violation fails the page
    pub fn strict() -> Self {
        Self {
            fail_on: ImpactLevel::ALL.into_iter().collect(),
            fail_on_unknown: true,
        }
    }

    pub fn with_levels(levels: impl IntoIterator<Item = ImpactLevel>) -> Self {
        Self {
            fail_on: levels.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_blocking(&self, impact: &Impact) -> bool {
        match impact.level() {
            Some(level) => self.fail_on.contains(&level),
            None => self.fail_on_unknown,
        }
    }

    pub fn evaluate(&self, summary: &PageScanSummary) -> PolicyVerdict {
        let blocking = summary
            .violations()
            .iter()
            .filter(|v| self.is_blocking(&v.impact))
            .count();

        PolicyVerdict {
            page_name: summary.page_name().to_string(),
            total: summary.total_violations(),
            blocking,
            passed: blocking == 0,
        }
    }

    pub fn evaluate_run(&self, summaries: &[PageScanSummary]) -> Vec<PolicyVerdict> {
        summaries.iter().map(|s| self.evaluate(s)).collect()
    }
}
