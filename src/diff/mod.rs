//! Change detection and impact analysis engine.
//!
//! Given two snapshots of a resource population, the engine computes a
//! categorized, severity-ranked and dependency-aware description of what
//! changed between them.
//!
//! # Architecture
//!
//! The pipeline inside [`DeltaEngine::diff`] runs leaf-first:
//!
//! 1. both collections are indexed by identity ([`crate::model::ResourceIndex`])
//! 2. [`changes::PresenceChangeComputer`] splits added, removed and common identities
//! 3. [`changes::ModificationChangeComputer`] diffs common records attribute by
//!    attribute, classifies every change and attaches impact narratives
//! 4. [`DependencyAnalyzer`] correlates changes through the service dependency table
//! 5. [`ReportAggregator`] derives counts, trends, rollups and statistics
//!
//! Both change computers implement [`ChangeComputer`](traits::ChangeComputer).
//!
//! # Example
//!
//! ```
//! use cloud_delta::diff::DeltaEngine;
//! use cloud_delta::model::ResourceRecord;
//! use serde_json::json;
//!
//! let old = vec![ResourceRecord::try_from(json!({"arn": "X", "tags": {"Env": "dev"}})).unwrap()];
//! let new = vec![ResourceRecord::try_from(json!({"arn": "X", "tags": {"Env": "prod"}})).unwrap()];
//!
//! let report = DeltaEngine::new().diff(&old, &new, "monday", "tuesday").unwrap();
//! assert_eq!(report.summary.modified, 1);
//! assert_eq!(report.modified[0].attribute_changes[0].attribute_path, "tags.Env");
//! ```

mod aggregate;
pub mod changes;
mod dependencies;
mod engine;
mod engine_config;
pub mod impact;
mod result;
pub mod rules;
pub mod services;
pub mod traits;

pub use aggregate::{sort_by_severity, ReportAggregator, UNKNOWN_SERVICE};
pub use dependencies::DependencyAnalyzer;
pub use engine::DeltaEngine;
pub use engine_config::{
    default_dependency_patterns, DeltaConfig, DependencyPattern, DEFAULT_IGNORED_FIELDS,
    DEFAULT_SEVERITY_RULES,
};
pub use impact::is_publicly_accessible;
pub use result::{
    AttributeChange, CascadeRisk, ChangeCategory, ChangeSeverity, ChangeStatistics, ChangeType,
    ComplianceChanges, ComplianceEntry, DeltaReport, DeltaSummary, HighImpactChange,
    ImpactAnalysis, ImpactRollup, ResourceChange, ServiceStatistics,
};
pub use rules::{classify_category, SeverityRules};
pub use traits::{ChangeComputer, ModificationChangeSet, PresenceChangeSet};
