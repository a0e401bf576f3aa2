//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::diff::{default_dependency_patterns, DEFAULT_IGNORED_FIELDS};
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".cloud-delta.yaml",
    ".cloud-delta.yml",
    "cloud-delta.yaml",
    "cloud-delta.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/cloud-delta/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // 1. Use explicit path if provided
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    // 2. Search current directory
    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    // 3. Search git root (if in a repo)
    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    // 4. Search user config directory
    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("cloud-delta")) {
            return Some(path);
        }
    }

    // 5. Search home directory
    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// This is useful for layering CLI args over file config.
    pub fn merge(&mut self, other: &Self) {
        // Engine config: only entries that differ from the built-in tables
        // count as explicitly set
        for field in &other.engine.ignored_fields {
            if !DEFAULT_IGNORED_FIELDS.contains(&field.as_str()) && !self.engine.is_ignored(field) {
                self.engine.ignored_fields.push(field.clone());
            }
        }
        for (pattern, severity) in &other.engine.severity_rules {
            self.engine.severity_rules.insert(pattern.clone(), *severity);
        }
        let defaults = default_dependency_patterns();
        for (service, pattern) in &other.engine.dependency_patterns {
            if defaults.get(service) != Some(pattern) {
                self.engine
                    .dependency_patterns
                    .insert(service.clone(), pattern.clone());
            }
        }

        // Output config - only override if explicitly set
        if other.output.format != ReportFormat::Auto {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.min_severity.is_some() {
            self.output.min_severity = other.output.min_severity;
        }
        if other.output.include_unchanged {
            self.output.include_unchanged = true;
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        // Behavior config (booleans - if set to true, override)
        if other.behavior.fail_on_change {
            self.behavior.fail_on_change = true;
        }
        if other.behavior.fail_on_critical {
            self.behavior.fail_on_critical = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# Cloud Delta Configuration
# Place this file at .cloud-delta.yaml in your project root or ~/.config/cloud-delta/

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# Cloud Delta Configuration File
# ===============================
#
# This file configures cloud-delta behavior. Place it at:
#   - .cloud-delta.yaml in your project root
#   - ~/.config/cloud-delta/cloud-delta.yaml for global config
#
# CLI arguments always override file settings.

# Diff engine configuration
engine:
  # Field names skipped at every depth of the attribute diff
  ignored_fields:
    - lastSeen
    - discoveryTimestamp
    - scanTime
    - metadata
  # Extra severity rules, checked before the built-in table.
  # Keys are substrings of the attribute path; prefix with 're:' for a regex.
  severity_rules: {}
  #   instance-type: high
  #   're:^tags\.Owner$': low
  # Service dependency table overrides, keyed by lowercase service name
  # dependency_patterns:
  #   sqs:
  #     dependsOn: [kms, iam]
  #     affects: [lambda]

# Output configuration
output:
  # Format: auto, json, yaml, summary
  format: auto
  # Output file path (omit for stdout)
  # file: delta.json
  # Minimum severity to report: critical, high, medium, low, info
  # min_severity: medium
  # Include unchanged resources in structured output
  include_unchanged: false
  # Disable colored output
  no_color: false

# Behavior flags
behavior:
  # Exit with code 1 if any change is detected
  fail_on_change: false
  # Exit with code 2 if a Critical change is detected
  fail_on_critical: false
  # Suppress non-essential output
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
