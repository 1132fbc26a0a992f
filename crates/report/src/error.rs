//! Error types for report aggregation and export

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Page already recorded in this run: {0}")]
    DuplicatePage(String),

    #[error("Invalid impact level: {0} (expected critical, serious, moderate or minor)")]
    InvalidImpact(String),

    #[error("Failed to write report {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
