//! Playwright + axe-core scan driver
//!
//! Each page scan is a generated Node script run as a subprocess. The script
//! runs the page's setup steps, opens it, runs the interaction steps on it,
//! then runs `AxeBuilder` and
//! prints the raw results on one line prefixed with [`RESULT_MARKER`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::debug;

use a11y_report::RawScanResult;

use crate::error::{E2eError, E2eResult};
use crate::spec::{ScanSpec, ScanStep};

/// Prefix of the stdout line carrying the axe results
pub const RESULT_MARKER: &str = "A11Y_RESULT:";

/// Grace period on top of the page timeout for browser startup and shutdown
const PROCESS_GRACE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" | "safari" => Ok(Browser::Webkit),
            other => Err(E2eError::Config(format!("unknown browser: {}", other))),
        }
    }
}

/// Anything that can produce a raw scan result for a page
#[async_trait]
pub trait PageScanner: Send + Sync {
    /// Verify the scanner can run before any page is scanned
    async fn check(&self) -> E2eResult<()> {
        Ok(())
    }

    async fn scan(&self, spec: &ScanSpec, exclusions: &[String]) -> E2eResult<RawScanResult>;
}

/// Scanner backed by Playwright and @axe-core/playwright
pub struct AxeScanner {
    config: PlaywrightConfig,
}

impl AxeScanner {
    pub fn new(config: PlaywrightConfig) -> Self {
        Self { config }
    }

    /// Check that node and both npm packages resolve
    pub async fn check_toolchain(&self) -> E2eResult<()> {
        let output = TokioCommand::new(&self.config.node_binary)
            .args([
                "-e",
                "require.resolve('playwright'); require.resolve('@axe-core/playwright');",
            ])
            .env("NODE_PATH", self.node_path())
            .output()
            .await
            .map_err(|e| E2eError::ToolchainNotFound(format!("{}: {}", self.config.node_binary.display(), e)))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(E2eError::ToolchainNotFound(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }

    fn node_path(&self) -> PathBuf {
        self.config.node_project_dir.join("node_modules")
    }

    /// Build the Node script scanning one page
    pub fn build_script(&self, spec: &ScanSpec, exclusions: &[String]) -> String {
        let mut script = String::new();

        // Header
        script.push_str(&format!(
            r#"
const {{ chromium, firefox, webkit }} = require('playwright');
const AxeBuilder = require('@axe-core/playwright').default;

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  page.setDefaultTimeout({timeout});
  const baseUrl = {base_url};
  const resolve = (url) => new URL(url, baseUrl).toString();

  try {{
"#,
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            width = self.config.viewport_width,
            height = self.config.viewport_height,
            timeout = self.config.timeout_ms,
            base_url = js_str(&self.config.base_url),
        ));

        push_steps(&mut script, "Setup", &spec.setup);

        // Page under scan
        script.push_str(&format!(
            r#"
    // Page: {name}
    await page.goto(resolve({url}));
    await page.waitForLoadState('networkidle');
"#,
            name = single_line(&spec.name),
            url = js_str(&spec.url),
        ));

        push_steps(&mut script, "Interact", &spec.interact);

        // Scan
        script.push_str(&format!(
            r#"
    await page.waitForTimeout({settle});
    let builder = new AxeBuilder({{ page }}).withTags({tags});
"#,
            settle = spec.settle_ms,
            tags = js_array(&spec.axe_tags()),
        ));
        for selector in &spec.include {
            script.push_str(&format!("    builder = builder.include({});\n", js_str(selector)));
        }
        for selector in exclusions {
            script.push_str(&format!("    builder = builder.exclude({});\n", js_str(selector)));
        }

        // Footer
        script.push_str(&format!(
            r#"
    const results = await builder.analyze();
    console.log('{marker}' + JSON.stringify(results));
  }} catch (error) {{
    console.error(JSON.stringify({{ success: false, error: error.message, stack: error.stack }}));
    process.exitCode = 1;
  }} finally {{
    await browser.close();
  }}
}})();
"#,
            marker = RESULT_MARKER,
        ));

        script
    }

    async fn run_script(&self, spec_name: &str, script: &str) -> E2eResult<String> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("scan.js");
        std::fs::write(&script_path, script)?;

        debug!("Running scan script for '{}': {}", spec_name, script_path.display());

        let run = TokioCommand::new(&self.config.node_binary)
            .arg(&script_path)
            .current_dir(temp_dir.path())
            .env("NODE_PATH", self.node_path())
            .kill_on_drop(true)
            .output();

        let limit = Duration::from_millis(self.config.timeout_ms) + PROCESS_GRACE;
        let output = tokio::time::timeout(limit, run)
            .await
            .map_err(|_| E2eError::Timeout(spec_name.to_string()))??;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(E2eError::Playwright(format!(
                "Scan of '{}' failed:\nstdout: {}\nstderr: {}",
                spec_name, stdout, stderr
            )));
        }

        Ok(stdout)
    }
}

#[async_trait]
impl PageScanner for AxeScanner {
    async fn check(&self) -> E2eResult<()> {
        self.check_toolchain().await
    }

    async fn scan(&self, spec: &ScanSpec, exclusions: &[String]) -> E2eResult<RawScanResult> {
        let script = self.build_script(spec, exclusions);
        let stdout = self.run_script(&spec.name, &script).await?;
        parse_scan_output(&spec.name, &stdout)
    }
}

/// Extract the axe results from script stdout. The last marked line wins.
pub fn parse_scan_output(spec_name: &str, stdout: &str) -> E2eResult<RawScanResult> {
    let payload = stdout
        .lines()
        .rev()
        .find_map(|line| line.trim_start().strip_prefix(RESULT_MARKER))
        .ok_or_else(|| E2eError::ScanOutput(spec_name.to_string()))?;

    Ok(RawScanResult::from_json(payload)?)
}

fn push_steps(script: &mut String, phase: &str, steps: &[ScanStep]) {
    for (i, step) in steps.iter().enumerate() {
        script.push_str(&format!("\n    // {} {}: {}\n", phase, i + 1, step_name(step)));
        script.push_str(&step_to_js(step));
        script.push('\n');
    }
}

/// Short label for logs and script comments
fn step_name(step: &ScanStep) -> String {
    let name = match step {
        ScanStep::Navigate { url, .. } => format!("navigate:{}", url),
        ScanStep::Click { selector, .. } => format!("click:{}", selector),
        ScanStep::Fill { selector, .. } => format!("fill:{}", selector),
        ScanStep::Press { key, .. } => format!("press:{}", key),
        ScanStep::Wait { selector, .. } => format!("wait:{}", selector),
        ScanStep::WaitForLoad { state } => format!("wait_for_load:{}", state.as_str()),
        ScanStep::Sleep { ms } => format!("sleep:{}ms", ms),
    };
    single_line(&name)
}

fn step_to_js(step: &ScanStep) -> String {
    match step {
        ScanStep::Navigate { url, wait_for_selector } => {
            let wait = wait_for_selector
                .as_ref()
                .map(|s| format!("\n    await page.waitForSelector({});", js_str(s)))
                .unwrap_or_default();
            format!("    await page.goto(resolve({}));{}", js_str(url), wait)
        }
        ScanStep::Click { selector, timeout_ms } => format!(
            "    await page.click({}, {{ timeout: {} }});",
            js_str(selector),
            timeout_ms.unwrap_or(5000)
        ),
        ScanStep::Fill { selector, value } => {
            format!("    await page.fill({}, {});", js_str(selector), js_str(value))
        }
        ScanStep::Press { selector: Some(selector), key } => {
            format!("    await page.press({}, {});", js_str(selector), js_str(key))
        }
        ScanStep::Press { selector: None, key } => {
            format!("    await page.keyboard.press({});", js_str(key))
        }
        ScanStep::Wait { selector, timeout_ms, state } => format!(
            "    await page.waitForSelector({}, {{ state: '{}', timeout: {} }});",
            js_str(selector),
            state.as_str(),
            timeout_ms
        ),
        ScanStep::WaitForLoad { state } => {
            format!("    await page.waitForLoadState('{}');", state.as_str())
        }
        ScanStep::Sleep { ms } => format!("    await page.waitForTimeout({});", ms),
    }
}

/// JS string literal (JSON string syntax is valid JS)
fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn js_array(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

/// Configuration for the Playwright driver
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub timeout_ms: u64,
    pub node_binary: PathBuf,
    pub node_project_dir: PathBuf,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            timeout_ms: 30_000,
            node_binary: PathBuf::from("node"),
            node_project_dir: PathBuf::from("."),
        }
    }
}
