//! Configuration types for cloud-delta operations.
//!
//! Provides structured configuration for the diff operation and the file
//! format loaded from `.cloud-delta.yaml`.

use crate::diff::{ChangeSeverity, DeltaConfig};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// This is the top-level configuration struct. It can be constructed from CLI
/// arguments, config files, or both (with CLI overriding file settings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Diff engine configuration (ignore-list, severity rules, dependency table)
    pub engine: DeltaConfig,
    /// Output configuration (format, file, filtering)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Only report changes at or above this severity.
    pub const fn min_severity(mut self, severity: Option<ChangeSeverity>) -> Self {
        self.config.output.min_severity = severity;
        self
    }

    /// Include unchanged resources in structured output.
    pub const fn include_unchanged(mut self, include: bool) -> Self {
        self.config.output.include_unchanged = include;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Add fields to the ignore-list.
    pub fn ignore_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            self.config.engine = self.config.engine.ignore_field(field);
        }
        self
    }

    /// Add or override a severity rule.
    pub fn severity_rule(mut self, pattern: impl Into<String>, severity: ChangeSeverity) -> Self {
        self.config.engine = self.config.engine.with_severity_rule(pattern, severity);
        self
    }

    /// Enable fail-on-change mode.
    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    /// Enable fail-on-critical mode.
    pub const fn fail_on_critical(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_critical = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-specific Configuration
// ============================================================================

/// Configuration for the diff operation.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Paths to the two snapshots
    pub paths: DiffPaths,
    /// State labels; `None` falls back to the snapshot's own label
    pub states: StateLabels,
    /// Diff engine configuration
    pub engine: DeltaConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl DiffConfig {
    /// Build a diff configuration from the merged application configuration.
    #[must_use]
    pub fn from_app_config(app: AppConfig, paths: DiffPaths, states: StateLabels) -> Self {
        Self {
            paths,
            states,
            engine: app.engine,
            output: app.output,
            behavior: app.behavior,
        }
    }
}

/// Paths for diff operation
#[derive(Debug, Clone)]
pub struct DiffPaths {
    /// Path to the older snapshot
    pub old: PathBuf,
    /// Path to the newer snapshot
    pub new: PathBuf,
}

/// Explicit state labels given on the command line.
#[derive(Debug, Clone, Default)]
pub struct StateLabels {
    pub from: Option<String>,
    pub to: Option<String>,
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Output-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Only report changes at or above this severity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_severity: Option<ChangeSeverity>,
    /// Include unchanged resources in structured output
    pub include_unchanged: bool,
    /// Disable colored output
    pub no_color: bool,
}

/// Behavior flags
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any change is detected
    pub fail_on_change: bool,
    /// Exit with code 2 if a Critical change is detected
    pub fail_on_critical: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}
