//! Accessibility Scan Runner
//!
//! This crate drives accessibility scans for an end-to-end suite:
//! - Parses declarative YAML page-scan specs and a suite config
//! - Generates Playwright + axe-core scripts and runs them under Node
//! - Summarizes every scan into a shared, caller-owned run report
//! - Writes the HTML/Markdown reports when the run completes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ScanRunner (Rust)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  run_specs(specs) -> SuiteOutcome                           │
//! │    ├── N workers (Semaphore + JoinSet)                      │
//! │    │     └── PageScanner::scan(spec) -> RawScanResult       │
//! │    ├── PageScanSummary::from_scan() + log_summary()         │
//! │    ├── CompliancePolicy::evaluate() -> pass / fail          │
//! │    └── RunReport::append()          (Arc, shared)           │
//! │  write_reports(outcome) -> ReportPaths                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScanSpec (YAML)                                            │
//! │    ├── name, url, wcag, rules, include, exclude             │
//! │    └── setup: [navigate | click | fill | press | wait ...]  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod playwright;
pub mod runner;
pub mod spec;

pub use config::SuiteConfig;
pub use error::{E2eError, E2eResult};
pub use playwright::{AxeScanner, PageScanner};
pub use runner::{PageOutcome, PageStatus, ScanRunner, SuiteOutcome};
pub use spec::{ScanSpec, ScanStep};
