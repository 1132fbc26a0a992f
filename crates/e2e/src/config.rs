//! Suite configuration loaded from `a11y.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use a11y_report::export::{DEFAULT_HTML_FILE, DEFAULT_JSON_FILE, DEFAULT_MARKDOWN_FILE};
use a11y_report::{CompliancePolicy, ReportWriter};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{Browser, PlaywrightConfig};

/// Settings for a whole scan run. Every field has a default, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub base_url: String,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Pages scanned concurrently
    pub workers: usize,
    pub browser: Browser,
    pub headless: bool,
    pub viewport: Viewport,
    /// Upper bound for one page scan, setup included
    pub timeout_ms: u64,
    /// Directory whose `node_modules` provides playwright and axe-core
    pub node_project_dir: PathBuf,
    /// Third-party content left out of every scan
    pub global_exclusions: Vec<String>,
    pub policy: CompliancePolicy,
    pub reports: ReportFiles,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFiles {
    pub html: String,
    pub markdown: String,
    pub json: String,
}

impl Default for ReportFiles {
    fn default() -> Self {
        Self {
            html: DEFAULT_HTML_FILE.to_string(),
            markdown: DEFAULT_MARKDOWN_FILE.to_string(),
            json: DEFAULT_JSON_FILE.to_string(),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 1280, height: 720 }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            specs_dir: PathBuf::from("tests/a11y/specs"),
            output_dir: PathBuf::from("test-results"),
            workers: 1,
            browser: Browser::Chromium,
            headless: true,
            viewport: Viewport::default(),
            timeout_ms: 30_000,
            node_project_dir: PathBuf::from("."),
            global_exclusions: default_exclusions(),
            policy: CompliancePolicy::default(),
            reports: ReportFiles::default(),
        }
    }
}

fn default_exclusions() -> Vec<String> {
    [
        "#cookie-banner",
        "[data-testid=\"cookie-notice\"]",
        ".google-analytics",
        "[id^=\"reCAPTCHA\"]",
        ".chat-widget",
        "#intercom-frame",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl SuiteConfig {
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> E2eResult<()> {
        if self.workers == 0 {
            return Err(E2eError::Config("workers must be at least 1".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(E2eError::Config("timeout_ms must be positive".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(E2eError::Config("base_url must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn playwright_config(&self) -> PlaywrightConfig {
        PlaywrightConfig {
            base_url: self.base_url.clone(),
            browser: self.browser,
            headless: self.headless,
            viewport_width: self.viewport.width,
            viewport_height: self.viewport.height,
            timeout_ms: self.timeout_ms,
            node_project_dir: self.node_project_dir.clone(),
            ..PlaywrightConfig::default()
        }
    }

    pub fn report_writer(&self) -> ReportWriter {
        ReportWriter {
            output_dir: self.output_dir.clone(),
            html_file: self.reports.html.clone(),
            markdown_file: self.reports.markdown.clone(),
            json_file: self.reports.json.clone(),
        }
    }
}
