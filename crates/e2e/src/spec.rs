//! Declarative YAML page-scan specification

use serde::{Deserialize, Serialize};
use std::path::Path;

use a11y_report::WcagLevel;

use crate::error::{E2eError, E2eResult};

/// One page to scan, parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSpec {
    /// Page label used in reports; unique within a run
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Page URL, relative to the suite base URL or absolute
    pub url: String,

    /// Tags for filtering specs
    #[serde(default)]
    pub tags: Vec<String>,

    /// WCAG level to check
    #[serde(default)]
    pub wcag: WcagLevel,

    /// Extra axe rule tags, e.g. `best-practice`
    #[serde(default)]
    pub rules: Vec<String>,

    /// Restrict the scan to these selectors
    #[serde(default)]
    pub include: Vec<String>,

    /// Selectors left out of the scan, on top of the suite-wide exclusions
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Do not apply the suite-wide exclusions to this page
    #[serde(default)]
    pub skip_global_exclusions: bool,

    /// Steps run before navigating to `url`, e.g. signing in
    #[serde(default)]
    pub setup: Vec<ScanStep>,

    /// Steps run on the page after navigating to `url` and before the scan:
    /// opening a tab, applying a filter, typing a search
    #[serde(default)]
    pub interact: Vec<ScanStep>,

    /// Pause after the page settles, before scanning
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_settle_ms() -> u64 {
    500
}

/// A browser interaction performed before the scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScanStep {
    /// Navigate to a URL (relative to base)
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Click an element
    Click {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Fill an input field
    Fill {
        selector: String,
        value: String,
    },

    /// Press a key, on an element or the page
    Press {
        #[serde(default)]
        selector: Option<String>,
        key: String,
    },

    /// Wait for an element
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Wait for a page load state
    WaitForLoad {
        #[serde(default)]
        state: LoadState,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Sleep {
        ms: u64,
    },
}

fn default_wait_timeout() -> u64 {
    5000
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

/// Playwright load states, spelled as Playwright spells them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Load,
    DomContentLoaded,
    #[default]
    NetworkIdle,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

impl ScanSpec {
    /// Parse a scan spec from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        if spec.name.trim().is_empty() {
            return Err(E2eError::SpecParse("spec name must not be empty".to_string()));
        }
        Ok(spec)
    }

    /// Parse a scan spec from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all scan specs from a directory, ordered by path
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        if !dir.is_dir() {
            return Err(E2eError::Config(format!(
                "specs directory not found: {}",
                dir.display()
            )));
        }

        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            specs.push(Self::from_file(entry.path())?);
        }

        let mut names = std::collections::HashSet::new();
        for spec in &specs {
            if !names.insert(spec.name.as_str()) {
                return Err(E2eError::SpecParse(format!(
                    "duplicate page name '{}' in {}",
                    spec.name,
                    dir.display()
                )));
            }
        }

        Ok(specs)
    }

    /// Filter specs by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }

    /// axe tags for this scan: the WCAG level's tags followed by extra rules,
    /// without duplicates
    pub fn axe_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.wcag.tags().iter().copied().chain(self.rules.iter().map(String::as_str)) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    /// Exclusion selectors for this scan
    pub fn exclusions(&self, global: &[String]) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        let inherited = if self.skip_global_exclusions { &[][..] } else { global };
        for selector in inherited.iter().chain(self.exclude.iter()) {
            if !all.contains(selector) {
                all.push(selector.clone());
            }
        }
        all
    }
}
