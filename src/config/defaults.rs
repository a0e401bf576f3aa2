//! Default configurations and presets for cloud-delta.
//!
//! Provides named presets for common use cases.

use super::types::{AppConfig, BehaviorConfig, OutputConfig};
use crate::diff::{ChangeSeverity, DeltaConfig};
use crate::reports::ReportFormat;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default settings suitable for most cases
    Default,
    /// Security review: only High and above, fail on Critical changes
    Security,
    /// CI/CD: machine-readable output, fail on any change
    CiCd,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Security => "security",
            Self::CiCd => "ci-cd",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "security" | "security-review" => Some(Self::Security),
            "ci-cd" | "ci" | "pipeline" => Some(Self::CiCd),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Report every change with the built-in rule tables",
            Self::Security => "Report High and Critical changes, fail when a Critical change appears",
            Self::CiCd => "JSON output, quiet, fail when anything changed",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Security, Self::CiCd]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Security => Self::security_preset(),
            ConfigPreset::CiCd => Self::ci_cd_preset(),
        }
    }

    /// Security review preset.
    #[must_use]
    pub fn security_preset() -> Self {
        Self {
            engine: DeltaConfig::default(),
            output: OutputConfig {
                min_severity: Some(ChangeSeverity::High),
                ..OutputConfig::default()
            },
            behavior: BehaviorConfig {
                fail_on_critical: true,
                ..BehaviorConfig::default()
            },
        }
    }

    /// CI/CD pipeline preset.
    #[must_use]
    pub fn ci_cd_preset() -> Self {
        Self {
            engine: DeltaConfig::default(),
            output: OutputConfig {
                format: ReportFormat::Json,
                no_color: true,
                ..OutputConfig::default()
            },
            behavior: BehaviorConfig {
                fail_on_change: true,
                fail_on_critical: true,
                quiet: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
        assert_eq!(ConfigPreset::from_name("CI"), Some(ConfigPreset::CiCd));
        assert_eq!(ConfigPreset::from_name("unknown"), None);
    }

    #[test]
    fn test_security_preset() {
        let config = AppConfig::from_preset(ConfigPreset::Security);
        assert_eq!(config.output.min_severity, Some(ChangeSeverity::High));
        assert!(config.behavior.fail_on_critical);
        assert!(!config.behavior.fail_on_change);
    }

    #[test]
    fn test_ci_cd_preset() {
        let config = AppConfig::from_preset(ConfigPreset::CiCd);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.behavior.fail_on_change);
        assert!(config.behavior.quiet);
    }
}
