//! Writing rendered reports to disk

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::{ReportError, ReportResult};
use crate::html::render_html_at;
use crate::markdown::render_markdown_at;
use crate::summary::PageScanSummary;

pub const DEFAULT_HTML_FILE: &str = "accessibility-report.html";
pub const DEFAULT_MARKDOWN_FILE: &str = "ACCESSIBILITY_TEST_REPORT.md";
pub const DEFAULT_JSON_FILE: &str = "a11y-summaries.json";

/// Where a run's reports go. Existing files from a previous run are
/// overwritten.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    pub output_dir: PathBuf,
    pub html_file: String,
    pub markdown_file: String,
    pub json_file: String,
}

/// Paths of the files written by [`ReportWriter::write_all`]
#[derive(Debug, Clone, Serialize)]
pub struct ReportPaths {
    pub html: PathBuf,
    pub markdown: PathBuf,
    pub json: PathBuf,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            html_file: DEFAULT_HTML_FILE.to_string(),
            markdown_file: DEFAULT_MARKDOWN_FILE.to_string(),
            json_file: DEFAULT_JSON_FILE.to_string(),
        }
    }

    /// Render both reports and dump the summaries as JSON
    pub fn write_all(&self, summaries: &[PageScanSummary]) -> ReportResult<ReportPaths> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ReportError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let generated_at = Utc::now();
        let paths = ReportPaths {
            html: self.output_dir.join(&self.html_file),
            markdown: self.output_dir.join(&self.markdown_file),
            json: self.output_dir.join(&self.json_file),
        };

        write_file(&paths.html, &render_html_at(summaries, generated_at))?;
        write_file(&paths.markdown, &render_markdown_at(summaries, generated_at))?;
        write_file(&paths.json, &serde_json::to_string_pretty(summaries)?)?;

        info!(
            "Reports written: {} and {}",
            paths.html.display(),
            paths.markdown.display()
        );
        Ok(paths)
    }
}

fn write_file(path: &Path, contents: &str) -> ReportResult<()> {
    std::fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read back a summaries dump written by [`ReportWriter::write_all`]
pub fn load_summaries(path: &Path) -> ReportResult<Vec<PageScanSummary>> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;
    use crate::types::{Impact, RawRuleResult, RawScanResult};

    fn summaries() -> Vec<PageScanSummary> {
        let raw = RawScanResult {
            violations: vec![RawRuleResult {
                id: "image-alt".into(),
                impact: Impact::from("critical"),
                ..Default::default()
            }],
            ..Default::default()
        };
        vec![summarize(raw, "Home", Utc::now())]
    }

    #[test]
    fn test_write_all_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("reports"));

        let original = summaries();
        let paths = writer.write_all(&original).unwrap();
        assert!(paths.html.exists());
        assert!(paths.markdown.exists());
        assert_eq!(paths.html.file_name().unwrap(), DEFAULT_HTML_FILE);

        let restored = load_summaries(&paths.json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());
        std::fs::write(dir.path().join(DEFAULT_MARKDOWN_FILE), "stale").unwrap();

        writer.write_all(&[]).unwrap();
        let md = std::fs::read_to_string(dir.path().join(DEFAULT_MARKDOWN_FILE)).unwrap();
        assert!(md.starts_with("# Web Accessibility Test Report"));
    }

    #[test]
    fn test_unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let summaries = summaries();
        let err = ReportWriter::new(&blocker).write_all(&summaries).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
        assert_eq!(summaries[0].total_violations(), 1);
    }
}
