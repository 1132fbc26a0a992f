//! Markdown report

use chrono::{DateTime, Utc};

use crate::rollup::RunTotals;
use crate::summary::PageScanSummary;

/// Render the Markdown report stamped with the current time
pub fn render_markdown(summaries: &[PageScanSummary]) -> String {
    render_markdown_at(summaries, Utc::now())
}

/// Render the Markdown report. Output depends only on the inputs.
pub fn render_markdown_at(summaries: &[PageScanSummary], generated_at: DateTime<Utc>) -> String {
    let totals = RunTotals::from_summaries(summaries);
    let verdict = if totals.overall_pass() { "✅ PASS" } else { "❌ FAIL" };

    let mut md = format!(
        r#"# Web Accessibility Test Report

_Generated {generated}_

## Executive Summary

- **Pages Tested**: {pages}
- **Compliant Pages**: {compliant}/{pages}
- **Total Violations**: {total}
  - Critical: {critical}
  - Serious: {serious}
  - Moderate: {moderate}
  - Minor: {minor}
  - Unknown impact: {unknown}
- **WCAG 2.1 AA Compliance**: {verdict}

---

## Results by Page

| Page | Status | Violations | Critical | Serious | Moderate | Minor | Unknown |
|------|--------|------------|----------|---------|----------|-------|---------|
"#,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        pages = totals.pages_tested,
        compliant = totals.compliant_pages,
        total = totals.total_violations,
        critical = totals.counts.critical,
        serious = totals.counts.serious,
        moderate = totals.counts.moderate,
        minor = totals.counts.minor,
        unknown = totals.counts.unknown,
    );

    for page in summaries {
        let counts = page.counts();
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            escape_cell(page.page_name()),
            if page.is_compliant() { "✅" } else { "❌" },
            page.total_violations(),
            counts.critical,
            counts.serious,
            counts.moderate,
            counts.minor,
            counts.unknown,
        ));
    }

    md.push_str("\n---\n\n## Detailed Findings\n");

    for page in summaries.iter().filter(|p| !p.is_compliant()) {
        md.push_str(&format!("\n### {}\n\n", single_line(page.page_name())));

        for (idx, v) in page.violations().iter().enumerate() {
            md.push_str(&format!("#### {}. {}\n\n", idx + 1, single_line(v.title())));
            md.push_str(&format!("- **Impact**: {}\n", v.impact.label()));
            md.push_str(&format!("- **Rule ID**: {}\n", v.rule_id));
            md.push_str(&format!("- **Affected Elements**: {}\n", v.affected_count()));
            md.push_str(&format!("- **Learn More**: [{}]({})\n\n", v.rule_id, v.help_reference));
        }
    }

    md
}

fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

/// Table cells cannot contain raw pipes or line breaks
fn escape_cell(s: &str) -> String {
    single_line(s).replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::summary::summarize;
    use crate::types::{Impact, RawNode, RawRuleResult, RawScanResult};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let md = render_markdown_at(&[], fixed_time());
        assert!(md.contains("- **Pages Tested**: 0"));
        assert!(md.contains("- **Compliant Pages**: 0/0"));
        assert!(md.contains("- **Total Violations**: 0"));
        assert!(md.contains("✅ PASS"));
        assert!(md.trim_end().ends_with("## Detailed Findings"));
    }

    #[test]
    fn test_findings_listed_in_scan_order() {
        let raw = RawScanResult {
            violations: vec![
                RawRuleResult {
                    id: "region".into(),
                    impact: Impact::from("moderate"),
                    help: "All content should be in landmarks".into(),
                    help_url: "https://rules.test/region".into(),
                    nodes: vec![RawNode::default(), RawNode::default()],
                    ..Default::default()
                },
                RawRuleResult {
                    id: "image-alt".into(),
                    impact: Impact::from("critical"),
                    help: "Images must have alt text".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let md = render_markdown_at(&[summarize(raw, "Home", fixed_time())], fixed_time());

        assert!(md.contains("#### 1. All content should be in landmarks"));
        assert!(md.contains("#### 2. Images must have alt text"));
        assert!(md.contains("- **Affected Elements**: 2"));
        assert!(md.contains("- **Learn More**: [region](https://rules.test/region)"));
        assert!(md.contains("| Home | ❌ | 2 | 1 | 0 | 1 | 0 | 0 |"));
    }

    #[test]
    fn test_pipes_escaped_in_table() {
        let md = render_markdown_at(
            &[summarize(RawScanResult::default(), "Search | Filters", fixed_time())],
            fixed_time(),
        );
        assert!(md.contains("| Search \\| Filters | ✅ |"));
    }
}
