//! Serializable view of a delta shared by the structured reporters.

use super::ReportConfig;
use crate::diff::{
    ChangeStatistics, ComplianceChanges, DeltaReport, DeltaSummary, ImpactAnalysis, ImpactRollup,
    ResourceChange,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub(super) struct DeltaDocument<'a> {
    metadata: DocumentMetadata<'a>,
    from_state_id: &'a str,
    to_state_id: &'a str,
    timestamp: DateTime<Utc>,
    summary: &'a DeltaSummary,
    added: Vec<&'a ResourceChange>,
    removed: Vec<&'a ResourceChange>,
    modified: Vec<&'a ResourceChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unchanged: Option<Vec<&'a ResourceChange>>,
    compliance_changes: &'a ComplianceChanges,
    security_changes: &'a ImpactRollup,
    network_changes: &'a ImpactRollup,
    impact_analysis: &'a ImpactAnalysis,
    change_statistics: &'a ChangeStatistics,
}

#[derive(Serialize)]
struct DocumentMetadata<'a> {
    tool: ToolInfo,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_severity: Option<String>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

impl<'a> DeltaDocument<'a> {
    /// Borrow a report, applying the severity floor to the change lists.
    ///
    /// Summary, rollups and statistics always describe the full delta.
    pub(super) fn new(report: &'a DeltaReport, config: &'a ReportConfig) -> Self {
        Self {
            metadata: DocumentMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                },
                generated_at: Utc::now().to_rfc3339(),
                old_file: config.metadata.old_path.as_deref(),
                new_file: config.metadata.new_path.as_deref(),
                min_severity: config.min_severity.map(|s| s.to_string()),
            },
            from_state_id: &report.from_state_id,
            to_state_id: &report.to_state_id,
            timestamp: report.timestamp,
            summary: &report.summary,
            added: config.select(&report.added),
            removed: config.select(&report.removed),
            modified: config.select(&report.modified),
            unchanged: config
                .include_unchanged
                .then(|| config.select(&report.unchanged)),
            compliance_changes: &report.compliance_changes,
            security_changes: &report.security_changes,
            network_changes: &report.network_changes,
            impact_analysis: &report.impact_analysis,
            change_statistics: &report.change_statistics,
        }
    }
}
