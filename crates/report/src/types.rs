//! Scan data model: impact levels, violation records and raw axe-core results

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// The four impact levels axe-core assigns, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl ImpactLevel {
    /// All levels in severity order
    pub const ALL: [ImpactLevel; 4] = [
        ImpactLevel::Critical,
        ImpactLevel::Serious,
        ImpactLevel::Moderate,
        ImpactLevel::Minor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Critical => "critical",
            ImpactLevel::Serious => "serious",
            ImpactLevel::Moderate => "moderate",
            ImpactLevel::Minor => "minor",
        }
    }

    /// Capitalized name for table headers and group titles
    pub fn title(&self) -> &'static str {
        match self {
            ImpactLevel::Critical => "Critical",
            ImpactLevel::Serious => "Serious",
            ImpactLevel::Moderate => "Moderate",
            ImpactLevel::Minor => "Minor",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactLevel {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(ImpactLevel::Critical),
            "serious" => Ok(ImpactLevel::Serious),
            "moderate" => Ok(ImpactLevel::Moderate),
            "minor" => Ok(ImpactLevel::Minor),
            _ => Err(ReportError::InvalidImpact(s.to_string())),
        }
    }
}

/// Impact of a single violation as reported by the scanner.
///
/// Anything that is not exactly one of the four known levels, including a
/// missing or null impact, is kept as `Unrecognized` with the raw value so it
/// can still be counted and shown. A missing impact is stored as an empty
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Impact {
    Known(ImpactLevel),
    Unrecognized(String),
}

impl Impact {
    pub fn level(&self) -> Option<ImpactLevel> {
        match self {
            Impact::Known(level) => Some(*level),
            Impact::Unrecognized(_) => None,
        }
    }

    /// Upper-case label used in badges and finding lists
    pub fn label(&self) -> String {
        match self {
            Impact::Known(level) => level.as_str().to_uppercase(),
            Impact::Unrecognized(raw) if raw.is_empty() => "UNSPECIFIED".to_string(),
            Impact::Unrecognized(raw) => raw.to_uppercase(),
        }
    }

    /// CSS class for the HTML report
    pub fn css_class(&self) -> &'static str {
        match self {
            Impact::Known(level) => level.as_str(),
            Impact::Unrecognized(_) => "unknown",
        }
    }
}

impl Default for Impact {
    fn default() -> Self {
        Impact::Unrecognized(String::new())
    }
}

impl From<ImpactLevel> for Impact {
    fn from(level: ImpactLevel) -> Self {
        Impact::Known(level)
    }
}

impl From<&str> for Impact {
    // Exact match only: axe-core always emits lowercase impact strings.
    fn from(raw: &str) -> Self {
        match raw {
            "critical" => Impact::Known(ImpactLevel::Critical),
            "serious" => Impact::Known(ImpactLevel::Serious),
            "moderate" => Impact::Known(ImpactLevel::Moderate),
            "minor" => Impact::Known(ImpactLevel::Minor),
            other => Impact::Unrecognized(other.to_string()),
        }
    }
}

impl From<Option<String>> for Impact {
    fn from(raw: Option<String>) -> Self {
        match raw {
            Some(raw) => Impact::from(raw.as_str()),
            None => Impact::default(),
        }
    }
}

impl From<Impact> for Option<String> {
    fn from(impact: Impact) -> Self {
        match impact {
            Impact::Known(level) => Some(level.as_str().to_string()),
            Impact::Unrecognized(raw) if raw.is_empty() => None,
            Impact::Unrecognized(raw) => Some(raw),
        }
    }
}

/// WCAG conformance level to scan against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagLevel {
    A,
    #[default]
    AA,
    AAA,
}

impl WcagLevel {
    /// axe-core rule tags covering this level
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            WcagLevel::A => &["wcag2a", "wcag21a"],
            WcagLevel::AA => &["wcag2a", "wcag2aa", "wcag21a", "wcag21aa"],
            WcagLevel::AAA => &[
                "wcag2a", "wcag2aa", "wcag2aaa", "wcag21a", "wcag21aa", "wcag21aaa",
            ],
        }
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WcagLevel::A => "A",
            WcagLevel::AA => "AA",
            WcagLevel::AAA => "AAA",
        };
        f.write_str(name)
    }
}

/// One DOM element that triggered a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedElement {
    pub markup: String,
    pub target: String,
}

/// One detected accessibility issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub rule_id: String,
    #[serde(default)]
    pub impact: Impact,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub help_reference: String,
    #[serde(default)]
    pub affected_elements: Vec<AffectedElement>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ViolationRecord {
    pub fn affected_count(&self) -> usize {
        self.affected_elements.len()
    }

    /// Heading text: the rule's short help, falling back to its id
    pub fn title(&self) -> &str {
        if self.help.is_empty() {
            &self.rule_id
        } else {
            &self.help
        }
    }
}

/// Raw axe-core `analyze()` output. Only the fields the reports use are
/// modelled; everything else in the document is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawScanResult {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub violations: Vec<RawRuleResult>,
    #[serde(default)]
    pub passes: Vec<RawRuleResult>,
    #[serde(default)]
    pub inapplicable: Vec<RawRuleResult>,
    #[serde(default)]
    pub incomplete: Vec<RawRuleResult>,
}

impl RawScanResult {
    pub fn from_json(json: &str) -> ReportResult<Self> {
        serde_json::from_str(json).map_err(ReportError::from)
    }

    pub fn from_file(path: &Path) -> ReportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}

/// One rule entry from any of the axe result lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRuleResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub impact: Impact,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help: String,
    #[serde(default, rename = "helpUrl")]
    pub help_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub target: Vec<TargetSelector>,
}

/// axe target entry: a plain selector, or a selector chain crossing shadow
/// roots / frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetSelector {
    Single(String),
    Chain(Vec<String>),
}

impl RawNode {
    pub fn selector(&self) -> String {
        self.target
            .iter()
            .map(|t| match t {
                TargetSelector::Single(s) => s.clone(),
                TargetSelector::Chain(parts) => parts.join(" > "),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<RawRuleResult> for ViolationRecord {
    fn from(raw: RawRuleResult) -> Self {
        let affected_elements = raw
            .nodes
            .iter()
            .map(|node| AffectedElement {
                markup: node.html.clone(),
                target: node.selector(),
            })
            .collect();

        Self {
            rule_id: raw.id,
            impact: raw.impact,
            description: raw.description,
            help: raw.help,
            help_reference: raw.help_url,
            affected_elements,
            tags: raw.tags,
        }
    }
}
