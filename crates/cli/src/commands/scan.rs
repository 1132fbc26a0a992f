//! Scan Command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use a11y_e2e::playwright::Browser;
use a11y_e2e::{PageOutcome, PageStatus, ScanRunner, SuiteConfig, SuiteOutcome};

use crate::output::{print_error, print_info, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ScanArgs {
    /// Suite configuration file
    #[arg(short, long, default_value = "a11y.yaml")]
    pub config: PathBuf,

    /// Directory of page scan specs
    #[arg(long)]
    pub specs: Option<PathBuf>,

    /// Only scan pages carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only scan the page with this name
    #[arg(long, conflicts_with = "tag")]
    pub name: Option<String>,

    /// Pages scanned concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Base URL prepended to relative page URLs
    #[arg(long, env = "A11Y_BASE_URL")]
    pub base_url: Option<String>,

    /// Directory for the reports
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Browser engine (chromium, firefox, webkit)
    #[arg(long)]
    pub browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

impl ScanArgs {
    /// Config file values with command-line overrides applied
    fn suite_config(&self) -> Result<SuiteConfig> {
        let mut config = SuiteConfig::load_or_default(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;

        if let Some(specs) = &self.specs {
            config.specs_dir = specs.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(browser) = self.browser {
            config.browser = browser;
        }
        if self.headed {
            config.headless = false;
        }

        config.validate()?;
        Ok(config)
    }

    async fn run(&self, runner: &ScanRunner) -> Result<SuiteOutcome> {
        let outcome = match (&self.name, &self.tag) {
            (Some(name), _) => runner.run_named(name).await?,
            (None, Some(tag)) => runner.run_tagged(tag).await?,
            (None, None) => runner.run_all().await?,
        };
        Ok(outcome)
    }
}

impl TableDisplay for PageOutcome {
    fn headers() -> Vec<&'static str> {
        vec!["Page", "Result", "Violations", "Blocking", "Duration"]
    }

    fn row(&self) -> Vec<String> {
        let result = match self.status {
            PageStatus::Passed => "PASS".to_string(),
            PageStatus::Failed => "FAIL".to_string(),
            PageStatus::Errored => format!("ERROR: {}", self.error.as_deref().unwrap_or("unknown")),
        };
        vec![
            self.name.clone(),
            result,
            self.violations.to_string(),
            self.blocking.to_string(),
            format!("{}ms", self.duration_ms),
        ]
    }
}

pub async fn execute(args: ScanArgs) -> Result<bool> {
    let config = args.suite_config()?;

    info!("Scanning {} against {}", config.specs_dir.display(), config.base_url);
    let runner = ScanRunner::with_config(config);
    let outcome = args.run(&runner).await?;

    if outcome.total == 0 {
        print_info(&format!("No scan specs found in {}", runner.config().specs_dir.display()));
        return Ok(true);
    }

    let paths = runner.write_reports(&outcome)?;
    runner.write_results(&outcome)?;

    print_list(&outcome.pages, OutputFormat::Table);
    print_info(&format!("HTML report: {}", paths.html.display()));
    print_info(&format!("Markdown report: {}", paths.markdown.display()));

    if outcome.success() {
        print_success(&format!("{} page(s) passed", outcome.passed));
    } else {
        print_error(&format!(
            "{} passed, {} failed, {} errored",
            outcome.passed, outcome.failed, outcome.errored
        ));
    }

    Ok(outcome.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(config: PathBuf) -> ScanArgs {
        ScanArgs {
            config,
            specs: None,
            tag: None,
            name: None,
            workers: None,
            base_url: None,
            output: None,
            browser: None,
            headed: false,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("a11y.yaml");
        std::fs::write(&config_path, "base_url: http://localhost:3000\nworkers: 2\n").unwrap();

        let from_file = args(config_path.clone()).suite_config().unwrap();
        assert_eq!(from_file.workers, 2);
        assert_eq!(from_file.base_url, "http://localhost:3000");

        let overridden = ScanArgs {
            workers: Some(6),
            output: Some(PathBuf::from("out")),
            browser: Some(Browser::Webkit),
            headed: true,
            ..args(config_path)
        }
        .suite_config()
        .unwrap();
        assert_eq!(overridden.workers, 6);
        assert_eq!(overridden.output_dir, PathBuf::from("out"));
        assert_eq!(overridden.browser, Browser::Webkit);
        assert!(!overridden.headless);
    }

    #[test]
    fn test_zero_workers_flag_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScanArgs {
            workers: Some(0),
            ..args(dir.path().join("missing.yaml"))
        }
        .suite_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_tag_and_name_conflict() {
        use clap::Parser;

        #[derive(Parser)]
        struct Harness {
            #[command(flatten)]
            args: ScanArgs,
        }

        assert!(Harness::try_parse_from(["scan", "--tag", "smoke", "--name", "Home"]).is_err());
        let harness = Harness::try_parse_from(["scan", "--name", "Home"]).unwrap();
        assert_eq!(harness.args.name.as_deref(), Some("Home"));
    }

    #[tokio::test]
    async fn test_run_empty_specs_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = ScanArgs {
            specs: Some(dir.path().to_path_buf()),
            output: Some(dir.path().join("out")),
            ..args(dir.path().join("missing.yaml"))
        };
        let runner = ScanRunner::with_config(args.suite_config().unwrap());
        let outcome = args.run(&runner).await.unwrap();
        assert_eq!(outcome.total, 0);
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn test_run_named_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let args = ScanArgs {
            specs: Some(dir.path().to_path_buf()),
            name: Some("Checkout".to_string()),
            ..args(dir.path().join("missing.yaml"))
        };
        let runner = ScanRunner::with_config(args.suite_config().unwrap());
        assert!(args.run(&runner).await.is_err());
    }
}
