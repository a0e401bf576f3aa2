//! Configuration module for cloud-delta.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cloud_delta::config::{AppConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::Security);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .ignore_fields(["etag"])
//!     .severity_rule("instance-type", ChangeSeverity::High)
//!     .fail_on_critical(true)
//!     .build();
//!
//! // Load from file
//! use cloud_delta::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.cloud-delta.yaml` file in your project root or `~/.config/cloud-delta/`:
//!
//! ```yaml
//! engine:
//!   ignored_fields: [lastSeen, scanTime, etag]
//!   severity_rules:
//!     instance-type: high
//! behavior:
//!   fail_on_critical: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, DiffConfig, DiffPaths, OutputConfig, StateLabels,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.cloud-delta.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
