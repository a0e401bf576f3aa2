//! Delta report structures.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Type of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category a change falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCategory {
    Configuration,
    Tags,
    Security,
    Network,
    Compliance,
    Metadata,
}

impl ChangeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Tags => "tags",
            Self::Security => "security",
            Self::Network => "network",
            Self::Compliance => "compliance",
            Self::Metadata => "metadata",
        }
    }
}

impl std::fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a change.
///
/// Variants are declared from least to most severe so that the derived
/// `Ord` gives `Critical > High > Medium > Low > Info`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSeverity {
    #[default]
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl ChangeSeverity {
    /// All severities, most severe first.
    pub const ALL: [Self; 5] = [
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
        }
    }

    /// Parse from a string label. Returns `None` for unrecognized values.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" | "moderate" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "info" | "informational" | "none" => Some(Self::Info),
            _ => None,
        }
    }

    /// Critical or High.
    pub fn is_high_risk(&self) -> bool {
        *self >= Self::High
    }
}

impl std::fmt::Display for ChangeSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChangeSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| {
            format!("invalid severity '{s}' (expected critical, high, medium, low or info)")
        })
    }
}

/// A single atomic change to one attribute of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Dot-notation path, possibly suffixed with `[added]` / `[removed]`
    pub attribute_path: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub change_type: ChangeType,
    pub category: ChangeCategory,
    pub severity: ChangeSeverity,
    pub description: String,
}

/// All changes observed for one resource between the two states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Stable identity used for indexing (ARN, id, or synthetic key)
    pub identity: String,
    pub resource_id: String,
    pub service: String,
    pub resource_type: String,
    pub region: String,
    pub change_type: ChangeType,
    pub category: ChangeCategory,
    pub attribute_changes: Vec<AttributeChange>,
    pub compliance_changes: Vec<AttributeChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_impact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_impact: Option<String>,
    pub related_resources: Vec<String>,
    pub severity: ChangeSeverity,
    pub timestamp: DateTime<Utc>,
}

impl ResourceChange {
    /// Highest severity among attribute changes, `Info` when there are none.
    pub fn max_attribute_severity(&self) -> ChangeSeverity {
        self.attribute_changes
            .iter()
            .map(|c| c.severity)
            .max()
            .unwrap_or(ChangeSeverity::Info)
    }

    /// Whether an impact narrative of either kind is attached.
    pub fn has_impact(&self) -> bool {
        self.security_impact.is_some() || self.network_impact.is_some()
    }
}

/// Summary counts for the delta
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub old_total: usize,
    pub new_total: usize,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
    pub total_changes: usize,
}

/// Compliance-specific changes of one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceEntry {
    pub identity: String,
    pub service: String,
    pub changes: Vec<AttributeChange>,
}

/// Compliance trend between the two states.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceChanges {
    /// Percentage of resources carrying a compliance status that were compliant
    pub compliant_before_pct: f64,
    pub compliant_after_pct: f64,
    pub newly_compliant: usize,
    pub newly_non_compliant: usize,
    pub entries: Vec<ComplianceEntry>,
}

/// Rollup of resource changes carrying a security or network impact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactRollup {
    pub total: usize,
    pub by_severity: BTreeMap<ChangeSeverity, usize>,
    /// Identities of Critical/High resource changes in this rollup
    pub high_risk_resources: Vec<String>,
}

/// A Critical/High change with at least one related resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighImpactChange {
    pub identity: String,
    pub service: String,
    pub change_type: ChangeType,
    pub severity: ChangeSeverity,
    pub related_resources: Vec<String>,
}

/// A resource named as related by more than one changed resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeRisk {
    pub identity: String,
    /// Changed resources that named this one as related
    pub caused_by: Vec<String>,
    pub risk_level: ChangeSeverity,
}

/// Dependency-aware correlation of all changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub high_impact_changes: Vec<HighImpactChange>,
    pub cascade_risks: Vec<CascadeRisk>,
}

/// Added/removed/modified counts for one service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatistics {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl ServiceStatistics {
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

/// Change statistics by service, severity and category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeStatistics {
    pub by_service: BTreeMap<String, ServiceStatistics>,
    pub by_severity: BTreeMap<ChangeSeverity, usize>,
    pub by_category: BTreeMap<ChangeCategory, usize>,
    pub most_changed_service: Option<String>,
}

/// Complete result of diffing two resource states.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct DeltaReport {
    pub from_state_id: String,
    pub to_state_id: String,
    pub timestamp: DateTime<Utc>,
    pub summary: DeltaSummary,
    pub added: Vec<ResourceChange>,
    pub removed: Vec<ResourceChange>,
    pub modified: Vec<ResourceChange>,
    pub unchanged: Vec<ResourceChange>,
    pub compliance_changes: ComplianceChanges,
    pub security_changes: ImpactRollup,
    pub network_changes: ImpactRollup,
    pub impact_analysis: ImpactAnalysis,
    pub change_statistics: ChangeStatistics,
}

impl DeltaReport {
    /// Check if there are any changes
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.summary.total_changes > 0
    }

    /// Added, removed and modified changes, in that order.
    pub fn all_changes(&self) -> impl Iterator<Item = &ResourceChange> {
        self.added
            .iter()
            .chain(self.removed.iter())
            .chain(self.modified.iter())
    }

    /// Find a change (including unchanged entries) by identity
    pub fn find_change(&self, identity: &str) -> Option<&ResourceChange> {
        self.all_changes()
            .chain(self.unchanged.iter())
            .find(|c| c.identity == identity)
    }

    /// Changes whose severity is at least `min`.
    pub fn changes_at_or_above(&self, min: ChangeSeverity) -> Vec<&ResourceChange> {
        self.all_changes().filter(|c| c.severity >= min).collect()
    }

    /// Highest severity of any change, `None` when nothing changed.
    #[must_use]
    pub fn highest_severity(&self) -> Option<ChangeSeverity> {
        self.all_changes().map(|c| c.severity).max()
    }
}
