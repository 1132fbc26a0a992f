//! Error types for scan runs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Scan toolchain not available: {0}. Install with: npm install playwright @axe-core/playwright && npx playwright install")]
    ToolchainNotFound(String),

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Scan spec parse error: {0}")]
    SpecParse(String),

    #[error("Scan spec not found: {0}")]
    SpecNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Timeout scanning: {0}")]
    Timeout(String),

    #[error("No scan result in output of '{0}'")]
    ScanOutput(String),

    #[error("Report error: {0}")]
    Report(#[from] a11y_report::ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
