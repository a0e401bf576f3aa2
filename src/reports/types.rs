//! Report type definitions.

use crate::diff::{ChangeSeverity, ResourceChange};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: summary if TTY, JSON otherwise
    #[default]
    Auto,
    /// Structured JSON output
    Json,
    /// Structured YAML output
    #[value(alias = "yml")]
    Yaml,
    /// Brief plain-text summary
    Summary,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Only include changes at or above this severity
    pub min_severity: Option<ChangeSeverity>,
    /// Include unchanged resources in the report
    pub include_unchanged: bool,
    /// Maximum change lines per section
    pub max_items: Option<usize>,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl ReportConfig {
    /// Create a config that includes every change
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the severity floor
    #[must_use]
    pub const fn with_min_severity(mut self, severity: Option<ChangeSeverity>) -> Self {
        self.min_severity = severity;
        self
    }

    /// Check whether a severity passes the configured floor
    pub fn includes_severity(&self, severity: ChangeSeverity) -> bool {
        self.min_severity.map_or(true, |min| severity >= min)
    }

    /// Changes passing the severity floor, truncated to `max_items`.
    pub fn select<'r>(&self, changes: &'r [ResourceChange]) -> Vec<&'r ResourceChange> {
        let filtered = changes.iter().filter(|c| self.includes_severity(c.severity));
        match self.max_items {
            Some(max) => filtered.take(max).collect(),
            None => filtered.collect(),
        }
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Old snapshot file path
    pub old_path: Option<String>,
    /// New snapshot file path
    pub new_path: Option<String>,
    /// Tool version
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        }
    }
}
