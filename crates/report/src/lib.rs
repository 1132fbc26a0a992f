//! Accessibility Report Aggregation
//!
//! Turns raw axe-core scan results into per-page summaries, collects them
//! over a test run and renders the run as HTML and Markdown reports.
//!
//! # Data flow
//!
//! ```text
//! RawScanResult ──summarize()──> PageScanSummary ──append()──> RunReport
//!                                                                 │
//!                                                            snapshot()
//!                                                                 │
//!                                   ┌─────────────────────────────┤
//!                                   ▼                             ▼
//!                             render_html()               render_markdown()
//!                                   └────────── RunTotals ────────┘
//! ```
//!
//! Both renderers take their counts from the same [`RunTotals`], so the two
//! documents always agree.

pub mod accumulator;
pub mod console;
pub mod error;
pub mod export;
pub mod html;
pub mod markdown;
pub mod policy;
pub mod rollup;
pub mod summary;
pub mod types;

pub use accumulator::RunReport;
pub use console::log_summary;
pub use error::{ReportError, ReportResult};
pub use export::{load_summaries, ReportPaths, ReportWriter};
pub use html::{render_html, render_html_at};
pub use markdown::{render_markdown, render_markdown_at};
pub use policy::{CompliancePolicy, PolicyVerdict};
pub use rollup::RunTotals;
pub use summary::{summarize, ImpactCounts, PageScanSummary};
pub use types::{
    AffectedElement, Impact, ImpactLevel, RawScanResult, ViolationRecord, WcagLevel,
};
