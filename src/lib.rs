//! **Change detection and impact analysis for cloud resource inventories.**
//!
//! `cloud-delta` compares two snapshots of a cloud resource inventory and
//! produces a categorized, severity-ranked and dependency-aware description
//! of what changed between them. It powers both a command-line interface
//! (CLI) and a Rust library for programmatic integration.
//!
//! ## Key Features
//!
//! - **Identity-based matching**: resources are matched across snapshots by
//!   ARN, then id, then a stable content-derived synthetic key.
//! - **Attribute diffing**: nested mappings are compared leaf by leaf and every
//!   change carries a dot-notation path, a category and a severity.
//! - **Configurable severity rules**: caller rules (substring or `re:` regex)
//!   are checked before a built-in table.
//! - **Impact narratives**: security, network and compliance impact of each
//!   changed resource.
//! - **Dependency analysis**: changes are correlated through a service
//!   dependency table to find high-impact changes and cascade risks.
//! - **Reporting**: JSON, YAML or a compact terminal summary.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`ResourceRecord`], the semi-structured record, and
//!   [`ResourceIndex`], which keys a collection by identity.
//! - **[`diff`]**: Home of the [`DeltaEngine`], which compares two collections
//!   and returns a [`DeltaReport`].
//! - **[`config`]**: Application configuration, file discovery and presets.
//! - **[`pipeline`]**: Parse → diff → output stages used by the CLI.
//! - **[`reports`]**: Generators for the output formats.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use cloud_delta::{DeltaEngine, Snapshot};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let old = Snapshot::from_file(Path::new("snapshots/monday.json"))?;
//!     let new = Snapshot::from_file(Path::new("snapshots/tuesday.json"))?;
//!
//!     let report = DeltaEngine::new().diff(&old.resources, &new.resources, "monday", "tuesday")?;
//!
//!     println!("Added: {}", report.summary.added);
//!     println!("Removed: {}", report.summary.removed);
//!     for change in report.changes_at_or_above(cloud_delta::diff::ChangeSeverity::High) {
//!         println!("  [{}] {} ({})", change.severity, change.identity, change.change_type);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Rules
//!
//! ```
//! use cloud_delta::diff::{ChangeSeverity, DeltaConfig, DeltaEngine};
//! use cloud_delta::model::ResourceRecord;
//! use serde_json::json;
//!
//! let config = DeltaConfig::default()
//!     .ignore_field("etag")
//!     .with_severity_rule("instance-type", ChangeSeverity::High);
//! let engine = DeltaEngine::with_config(config);
//!
//! let old = vec![ResourceRecord::try_from(json!({"arn": "i-1", "instance-type": "t3.micro", "etag": "a"})).unwrap()];
//! let new = vec![ResourceRecord::try_from(json!({"arn": "i-1", "instance-type": "t3.large", "etag": "b"})).unwrap()];
//!
//! let report = engine.diff(&old, &new, "before", "after").unwrap();
//! let change = &report.modified[0];
//! assert_eq!(change.attribute_changes.len(), 1);
//! assert_eq!(change.severity, ChangeSeverity::High);
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Percentages are computed from bounded counts
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod utils;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset};
pub use config::{BehaviorConfig, DiffConfig, OutputConfig};
pub use config::{ConfigError, Validatable};
pub use diff::{ChangeSeverity, DeltaConfig, DeltaEngine, DeltaReport, ResourceChange};
pub use error::{DeltaError, ErrorContext, Result};
pub use model::{ResourceIndex, ResourceRecord, Snapshot};
pub use reports::{ReportFormat, ReportGenerator};
