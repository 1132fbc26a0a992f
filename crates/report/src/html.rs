//! Self-contained HTML report

use chrono::{DateTime, Utc};

use crate::rollup::RunTotals;
use crate::summary::PageScanSummary;
use crate::types::{ImpactLevel, ViolationRecord};

const STYLE: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      line-height: 1.6;
      color: #333;
      background: #f5f5f5;
    }
    .container { max-width: 1200px; margin: 0 auto; padding: 20px; }
    header {
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      color: white;
      padding: 40px 20px;
      border-radius: 8px;
      margin-bottom: 30px;
      text-align: center;
    }
    h1 { font-size: 2.5em; margin-bottom: 10px; }
    .summary {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 20px;
      margin-bottom: 40px;
    }
    .summary-card {
      background: white;
      padding: 20px;
      border-radius: 8px;
      box-shadow: 0 2px 4px rgba(0,0,0,0.1);
      text-align: center;
    }
    .summary-card h3 { font-size: 2em; margin: 10px 0; }
    .summary-card p { color: #666; font-size: 0.9em; }
    .status-passed { color: #28a745; }
    .status-failed { color: #dc3545; }
    .status-partial { color: #ffc107; }
    .report-section {
      background: white;
      padding: 25px;
      margin-bottom: 20px;
      border-radius: 8px;
      box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    .report-section h2 {
      border-bottom: 3px solid #667eea;
      padding-bottom: 10px;
      margin-bottom: 20px;
    }
    .page-status {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 15px;
      border-left: 4px solid #667eea;
      background: #f9f9f9;
      margin-bottom: 15px;
      border-radius: 4px;
    }
    .page-status.passed { border-left-color: #28a745; background: #f0f9f5; }
    .page-status.failed { border-left-color: #dc3545; background: #fff5f5; }
    .page-status .meta { font-size: 0.9em; color: #666; margin-top: 5px; }
    .page-detail { margin-bottom: 30px; }
    .page-detail h3 { color: #667eea; margin-bottom: 15px; }
    .impact-group h4.group-title { margin: 15px 0 10px; }
    .violation {
      padding: 15px;
      margin-bottom: 15px;
      border-left: 4px solid #dc3545;
      background: #fff5f5;
      border-radius: 4px;
    }
    .violation.serious { border-left-color: #ff6b6b; }
    .violation.moderate { border-left-color: #ffc107; }
    .violation.minor { border-left-color: #17a2b8; }
    .violation.unknown { border-left-color: #6c757d; }
    .violation-head { display: flex; justify-content: space-between; align-items: start; margin-bottom: 8px; }
    .violation p { font-size: 0.9em; color: #666; margin: 5px 0; }
    .impact-badge {
      display: inline-block;
      padding: 4px 8px;
      border-radius: 4px;
      font-weight: bold;
      font-size: 0.8em;
    }
    .impact-badge.critical { background: #dc3545; color: white; }
    .impact-badge.serious { background: #ff6b6b; color: white; }
    .impact-badge.moderate { background: #ffc107; color: black; }
    .impact-badge.minor { background: #17a2b8; color: white; }
    .impact-badge.unknown { background: #6c757d; color: white; }
    footer {
      text-align: center;
      padding: 20px;
      color: #666;
      font-size: 0.9em;
      margin-top: 40px;
    }
"#;

/// Render the HTML report stamped with the current time
pub fn render_html(summaries: &[PageScanSummary]) -> String {
    render_html_at(summaries, Utc::now())
}

/// Render the HTML report. Output depends only on the inputs.
pub fn render_html_at(summaries: &[PageScanSummary], generated_at: DateTime<Utc>) -> String {
    let totals = RunTotals::from_summaries(summaries);
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Accessibility Test Report</title>
  <style>{STYLE}  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>Accessibility Test Report</h1>
      <p>WCAG 2.1 Compliance Analysis</p>
    </header>
"#
    ));

    html.push_str(&render_header(&totals));
    html.push_str(&render_page_list(summaries));
    html.push_str(&render_details(summaries));

    html.push_str(&format!(
        r#"
    <footer>
      <p>Report generated on {}</p>
      <p>Scanned with axe-core through Playwright</p>
    </footer>
  </div>
</body>
</html>
"#,
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    html
}

fn render_header(totals: &RunTotals) -> String {
    let violations_class = if totals.total_violations == 0 {
        "status-passed"
    } else {
        "status-failed"
    };
    let (compliant_class, verdict_class, verdict) = if totals.overall_pass() {
        ("status-passed", "status-passed", "&#x2705; PASS")
    } else {
        ("status-partial", "status-failed", "&#x274C; FAIL")
    };

    format!(
        r#"
    <div class="summary">
      <div class="summary-card">
        <p>Total Violations</p>
        <h3 class="{violations_class}" id="total-violations">{total}</h3>
      </div>
      <div class="summary-card">
        <p>Pages Tested</p>
        <h3 id="pages-tested">{pages}</h3>
      </div>
      <div class="summary-card">
        <p>Compliant Pages</p>
        <h3 class="{compliant_class}" id="compliant-pages">{compliant}/{pages}</h3>
      </div>
      <div class="summary-card">
        <p>WCAG 2.1 AA</p>
        <h3 class="{verdict_class}" id="overall-status">{verdict}</h3>
      </div>
    </div>
"#,
        total = totals.total_violations,
        pages = totals.pages_tested,
        compliant = totals.compliant_pages,
    )
}

fn render_page_list(summaries: &[PageScanSummary]) -> String {
    let mut section = String::from(
        r#"
    <div class="report-section">
      <h2>Page-by-Page Results</h2>
"#,
    );

    for page in summaries {
        let (class, marker) = if page.is_compliant() {
            ("passed", "&#x2705; COMPLIANT")
        } else {
            ("failed", "&#x274C; ISSUES FOUND")
        };
        section.push_str(&format!(
            r#"      <div class="page-status {class}">
        <div>
          <strong>{name}</strong>
          <p class="meta">Violations: {violations} | Passed: {passes}</p>
        </div>
        <span>{marker}</span>
      </div>
"#,
            name = escape_html(page.page_name()),
            violations = page.total_violations(),
            passes = page.pass_count(),
        ));
    }

    section.push_str("    </div>\n");
    section
}

fn render_details(summaries: &[PageScanSummary]) -> String {
    let mut section = String::from(
        r#"
    <div class="report-section">
      <h2>Detailed Violations</h2>
"#,
    );

    for page in summaries.iter().filter(|p| !p.is_compliant()) {
        section.push_str(&format!(
            "      <div class=\"page-detail\">\n        <h3>{}</h3>\n",
            escape_html(page.page_name())
        ));

        for level in ImpactLevel::ALL {
            let group = page.violations_with_impact(level);
            section.push_str(&render_group(level.title(), &group));
        }
        section.push_str(&render_group("Unrecognized impact", &page.unrecognized_violations()));

        section.push_str("      </div>\n");
    }

    section.push_str("    </div>\n");
    section
}

fn render_group(title: &str, violations: &[&ViolationRecord]) -> String {
    if violations.is_empty() {
        return String::new();
    }

    let mut group = format!(
        "        <div class=\"impact-group\">\n          <h4 class=\"group-title\">{} ({})</h4>\n",
        title,
        violations.len()
    );

    for violation in violations {
        let class = violation.impact.css_class();
        let help_url = escape_html(&violation.help_reference);
        group.push_str(&format!(
            r#"          <div class="violation {class}">
            <div class="violation-head">
              <h4>{title}</h4>
              <span class="impact-badge {class}">{label}</span>
            </div>
            <p><strong>Rule:</strong> {rule}</p>
            <p><strong>Affected Elements:</strong> {affected}</p>
            <p><strong>More Info:</strong> <a href="{help_url}" target="_blank" rel="noopener">{help_url}</a></p>
          </div>
"#,
            title = escape_html(violation.title()),
            label = escape_html(&violation.impact.label()),
            rule = escape_html(&violation.rule_id),
            affected = violation.affected_count(),
        ));
    }

    group.push_str("        </div>\n");
    group
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::summary::summarize;
    use crate::types::{Impact, RawRuleResult, RawScanResult};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn rule(id: &str, impact: &str) -> RawRuleResult {
        RawRuleResult {
            id: id.to_string(),
            impact: Impact::from(impact),
            help: format!("{} help", id),
            help_url: format!("https://rules.test/{}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_report() {
        let html = render_html_at(&[], fixed_time());
        assert!(html.contains(r#"id="total-violations">0<"#));
        assert!(html.contains(r#"id="pages-tested">0<"#));
        assert!(html.contains(r#"id="compliant-pages">0/0<"#));
        assert!(html.contains("PASS"));
        assert!(!html.contains(r#"class="page-detail""#));
        assert!(html.contains("2026-03-01 12:00:00 UTC"));
    }

    #[test]
    fn test_groups_by_impact_in_severity_order() {
        let raw = RawScanResult {
            violations: vec![rule("region", "moderate"), rule("image-alt", "critical")],
            ..Default::default()
        };
        let summaries = vec![summarize(raw, "Home", fixed_time())];
        let html = render_html_at(&summaries, fixed_time());

        let critical = html.find("Critical (1)").unwrap();
        let moderate = html.find("Moderate (1)").unwrap();
        assert!(critical < moderate);
        assert!(html.contains("https://rules.test/image-alt"));
        assert!(html.contains("FAIL"));
    }

    #[test]
    fn test_unrecognized_impact_is_rendered() {
        let raw = RawScanResult {
            violations: vec![rule("custom", "unknown-value")],
            ..Default::default()
        };
        let html = render_html_at(&[summarize(raw, "X", fixed_time())], fixed_time());
        assert!(html.contains("Unrecognized impact (1)"));
        assert!(html.contains("UNKNOWN-VALUE"));
    }

    #[test]
    fn test_page_names_are_escaped() {
        let summaries = vec![summarize(RawScanResult::default(), "<script>x</script>", fixed_time())];
        let html = render_html_at(&summaries, fixed_time());
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
    }
}
