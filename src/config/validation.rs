//! Configuration validation for cloud-delta.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, BehaviorConfig, OutputConfig};
use crate::diff::rules::check_pattern;
use crate::diff::DeltaConfig;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.engine.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for DeltaConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (i, field) in self.ignored_fields.iter().enumerate() {
            if field.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("engine.ignored_fields[{i}]"),
                    message: "Ignored field name must not be empty".to_string(),
                });
            }
        }

        for pattern in self.severity_rules.keys() {
            if let Err(reason) = check_pattern(pattern) {
                errors.push(ConfigError {
                    field: format!("engine.severity_rules.{pattern}"),
                    message: format!("Invalid severity rule pattern '{pattern}': {reason}"),
                });
            }
        }

        for (service, pattern) in &self.dependency_patterns {
            if service.trim().is_empty() {
                errors.push(ConfigError {
                    field: "engine.dependency_patterns".to_string(),
                    message: "Dependency pattern service name must not be empty".to_string(),
                });
            }
            let has_empty = pattern
                .depends_on
                .iter()
                .chain(pattern.affects.iter())
                .any(|s| s.trim().is_empty());
            if has_empty {
                errors.push(ConfigError {
                    field: format!("engine.dependency_patterns.{service}"),
                    message: "Service names in depends_on/affects must not be empty".to_string(),
                });
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError {
                        field: "output.file".to_string(),
                        message: format!("Parent directory does not exist: {}", parent.display()),
                    });
                }
            }
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        // BehaviorConfig contains only boolean flags that don't need validation
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{ChangeSeverity, DependencyPattern};
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.is_valid(), "{:?}", config.validate());
    }

    #[test]
    fn test_empty_ignored_field_rejected() {
        let config = DeltaConfig::default().ignore_field("  ");
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.starts_with("engine.ignored_fields["));
    }

    #[test]
    fn test_invalid_severity_patterns_rejected() {
        let config = DeltaConfig::default()
            .with_severity_rule("re:([", ChangeSeverity::High)
            .with_severity_rule("", ChangeSeverity::Low)
            .with_severity_rule("re:^tags\\.", ChangeSeverity::Low);
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.field.starts_with("engine.severity_rules")));
    }

    #[test]
    fn test_empty_dependency_service_rejected() {
        let config = DeltaConfig::default()
            .with_dependency_pattern("sqs", DependencyPattern::new(&[""], &["lambda"]));
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "engine.dependency_patterns.sqs");
    }

    #[test]
    fn test_output_file_parent_must_exist() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent-dir-for-test/report.json")),
            ..OutputConfig::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError {
            field: "engine.ignored_fields[0]".to_string(),
            message: "empty".to_string(),
        };
        assert_eq!(error.to_string(), "engine.ignored_fields[0]: empty");
    }
}
