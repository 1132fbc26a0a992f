//! Runner tests with an in-process scanner
//!
//! The scanner returns canned axe results per page, so these run without
//! Node or a browser.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use a11y_e2e::{
    E2eError, E2eResult, PageScanner, PageStatus, ScanRunner, ScanSpec, SuiteConfig,
};
use a11y_report::{load_summaries, RawScanResult, RunReport};

struct CannedScanner {
    results: HashMap<String, &'static str>,
    delay: Duration,
}

#[async_trait]
impl PageScanner for CannedScanner {
    async fn scan(&self, spec: &ScanSpec, exclusions: &[String]) -> E2eResult<RawScanResult> {
        tokio::time::sleep(self.delay).await;
        assert!(exclusions.iter().any(|e| e == "#cookie-banner"));

        if spec.name == "Crash" {
            panic!("scanner crashed on {}", spec.name);
        }

        match self.results.get(&spec.name) {
            Some(json) => Ok(RawScanResult::from_json(json)?),
            None => Err(E2eError::Playwright(format!("no page {}", spec.name))),
        }
    }
}

fn spec(name: &str, tags: &[&str]) -> ScanSpec {
    ScanSpec::from_yaml(&format!(
        "name: {}\nurl: /{}\ntags: [{}]",
        name,
        name.to_lowercase(),
        tags.join(", ")
    ))
    .unwrap()
}

fn config(output_dir: &Path, workers: usize) -> SuiteConfig {
    SuiteConfig {
        workers,
        output_dir: output_dir.to_path_buf(),
        ..SuiteConfig::default()
    }
}

fn scanner() -> Arc<CannedScanner> {
    let mut results = HashMap::new();
    results.insert("Home".to_string(), r#"{"violations": [], "passes": [{"id": "bypass"}]}"#);
    results.insert(
        "Results".to_string(),
        r#"{"violations": [{"id": "color-contrast", "impact": "serious", "nodes": [{"html": "<td>", "target": ["td"]}]}]}"#,
    );
    results.insert(
        "Definitions".to_string(),
        r#"{"violations": [{"id": "region", "impact": "moderate", "nodes": []}]}"#,
    );
    Arc::new(CannedScanner {
        results,
        delay: Duration::from_millis(10),
    })
}

#[tokio::test]
async fn run_collects_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScanRunner::with_scanner(config(dir.path(), 3), scanner());

    let specs = vec![
        spec("Home", &["smoke"]),
        spec("Results", &[]),
        spec("Definitions", &[]),
        spec("Contacts", &[]),
    ];
    let outcome = runner.run_specs(&specs).await.unwrap();

    assert_eq!(outcome.total, 4);
    // moderate is not blocking under the default policy
    assert_eq!(outcome.passed, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.errored, 1);
    assert!(!outcome.success());
    assert_eq!(outcome.summaries.len(), 3);

    let contacts = outcome.pages.iter().find(|p| p.name == "Contacts").unwrap();
    assert_eq!(contacts.status, PageStatus::Errored);
    assert!(contacts.error.as_deref().unwrap().contains("no page Contacts"));

    let results = outcome.pages.iter().find(|p| p.name == "Results").unwrap();
    assert_eq!(results.status, PageStatus::Failed);
    assert_eq!(results.blocking, 1);
}

#[tokio::test]
async fn reports_written_from_run() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScanRunner::with_scanner(config(dir.path(), 2), scanner());

    let outcome = runner
        .run_specs(&[spec("Home", &[]), spec("Results", &[])])
        .await
        .unwrap();
    let paths = runner.write_reports(&outcome).unwrap();
    let results_path = runner.write_results(&outcome).unwrap();

    let md = std::fs::read_to_string(&paths.markdown).unwrap();
    assert!(md.contains("- **Compliant Pages**: 1/2"));
    assert!(md.contains("- **Rule ID**: color-contrast"));

    let reloaded = load_summaries(&paths.json).unwrap();
    assert_eq!(reloaded.len(), 2);

    let results: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(results_path).unwrap()).unwrap();
    assert_eq!(results["total"], 2);
}

#[tokio::test]
async fn caller_owned_report_rejects_repeated_page() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScanRunner::with_scanner(config(dir.path(), 1), scanner());
    let report = Arc::new(RunReport::new());

    runner.run_specs_into(&[spec("Home", &[])], &report).await.unwrap();
    let second = runner
        .run_specs_into(&[spec("Home", &[])], &report)
        .await
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(second.errored, 1);
    assert!(second.summaries.is_empty());
}

#[tokio::test]
async fn outcome_summaries_cover_only_this_call() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScanRunner::with_scanner(config(dir.path(), 2), scanner());
    let report = Arc::new(RunReport::new());

    let first = runner.run_specs_into(&[spec("Home", &[])], &report).await.unwrap();
    let second = runner
        .run_specs_into(&[spec("Results", &[]), spec("Definitions", &[])], &report)
        .await
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(first.summaries.len(), 1);
    assert_eq!(second.total, 2);
    assert_eq!(second.summaries.len(), 2);
    assert!(second.summaries.iter().all(|s| s.page_name() != "Home"));
}

#[tokio::test]
async fn panicking_scan_reported_against_its_page() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScanRunner::with_scanner(config(dir.path(), 2), scanner());

    let outcome = runner
        .run_specs(&[spec("Crash", &[]), spec("Home", &[])])
        .await
        .unwrap();

    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.passed, 1);
    assert_eq!(outcome.errored, 1);

    let crashed = outcome.pages.iter().find(|p| p.name == "Crash").unwrap();
    assert_eq!(crashed.status, PageStatus::Errored);
    assert!(crashed.error.as_deref().unwrap().contains("scan task failed"));
    assert_eq!(outcome.summaries.len(), 1);
}

#[tokio::test]
async fn default_runner_with_no_specs_skips_toolchain() {
    let dir = tempfile::tempdir().unwrap();
    let specs_dir = dir.path().join("specs");
    std::fs::create_dir_all(&specs_dir).unwrap();

    let runner = ScanRunner::with_config(SuiteConfig {
        specs_dir,
        ..config(dir.path(), 1)
    });
    let outcome = runner.run_all().await.unwrap();
    assert_eq!(outcome.total, 0);
    assert!(outcome.success());
}

#[tokio::test]
async fn run_tagged_loads_specs_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    let specs_dir = dir.path().join("specs");
    std::fs::create_dir_all(&specs_dir).unwrap();
    std::fs::write(specs_dir.join("home.yaml"), "name: Home\nurl: /\ntags: [smoke]\n").unwrap();
    std::fs::write(specs_dir.join("results.yml"), "name: Results\nurl: /results\n").unwrap();
    std::fs::write(specs_dir.join("notes.txt"), "ignored").unwrap();

    let config = SuiteConfig {
        specs_dir,
        ..config(dir.path(), 1)
    };
    let runner = ScanRunner::with_scanner(config, scanner());

    let outcome = runner.run_tagged("smoke").await.unwrap();
    assert_eq!(outcome.total, 1);
    assert_eq!(outcome.pages[0].name, "Home");

    let all = runner.run_all().await.unwrap();
    assert_eq!(all.total, 2);

    assert!(matches!(
        runner.run_named("Missing").await,
        Err(E2eError::SpecNotFound(_))
    ));
}
