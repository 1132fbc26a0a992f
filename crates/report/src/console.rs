//! Log output for a single page scan

use tracing::{info, warn};

use crate::summary::PageScanSummary;
use crate::types::{ImpactLevel, ViolationRecord};

const MARKUP_PREVIEW_CHARS: usize = 80;

/// Log a page's violations grouped by impact, most severe first
pub fn log_summary(summary: &PageScanSummary) {
    if summary.is_compliant() {
        info!("✓ No accessibility violations found on {}", summary.page_name());
        return;
    }

    warn!(
        "Accessibility issues found on {}: {} violation(s)",
        summary.page_name(),
        summary.total_violations()
    );

    for level in ImpactLevel::ALL {
        let group = summary.violations_with_impact(level);
        if !group.is_empty() {
            warn!("{} ({} issues):", level.as_str().to_uppercase(), group.len());
            log_group(&group);
        }
    }

    let unrecognized = summary.unrecognized_violations();
    if !unrecognized.is_empty() {
        warn!("UNRECOGNIZED IMPACT ({} issues):", unrecognized.len());
        log_group(&unrecognized);
    }
}

fn log_group(violations: &[&ViolationRecord]) {
    for (index, v) in violations.iter().enumerate() {
        warn!("  {}. {}", index + 1, v.title());
        warn!("     Rule ID: {}", v.rule_id);
        warn!("     Elements Affected: {}", v.affected_count());
        warn!("     Learn More: {}", v.help_reference);

        if let Some(first) = v.affected_elements.first() {
            warn!("     First Element: {}", preview(&first.markup));
        }
    }
}

fn preview(markup: &str) -> String {
    let mut chars = markup.chars();
    let head: String = chars.by_ref().take(MARKUP_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
