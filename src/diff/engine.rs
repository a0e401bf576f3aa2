//! Delta engine implementation.

use super::aggregate::{sort_by_severity, ReportAggregator};
use super::changes::{ModificationChangeComputer, PresenceChangeComputer};
use super::dependencies::DependencyAnalyzer;
use super::engine_config::DeltaConfig;
use super::rules::SeverityRules;
use super::traits::ChangeComputer;
use super::DeltaReport;
use crate::error::{DeltaError, Result};
use crate::model::{ResourceIndex, ResourceRecord};
use chrono::Utc;

/// Change detection engine for resource inventories.
///
/// The engine holds only read-only configuration and compiled rules, so a
/// single instance can serve concurrent diffs of different inputs.
#[derive(Debug, Clone)]
pub struct DeltaEngine {
    config: DeltaConfig,
    severity_rules: SeverityRules,
}

impl DeltaEngine {
    /// Create a new engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(DeltaConfig::default())
    }

    /// Create an engine from a configuration, compiling its severity rules.
    ///
    /// Rules whose pattern does not compile are skipped with a warning.
    pub fn with_config(config: DeltaConfig) -> Self {
        let severity_rules = SeverityRules::from_config(&config);
        Self {
            config,
            severity_rules,
        }
    }

    pub fn config(&self) -> &DeltaConfig {
        &self.config
    }

    pub fn severity_rules(&self) -> &SeverityRules {
        &self.severity_rules
    }

    /// Diff two resource collections.
    ///
    /// Fails only when a state id is empty; every well-typed record
    /// collection produces a report.
    pub fn diff(
        &self,
        old: &[ResourceRecord],
        new: &[ResourceRecord],
        from_state_id: &str,
        to_state_id: &str,
    ) -> Result<DeltaReport> {
        if from_state_id.is_empty() {
            return Err(DeltaError::missing_argument("from_state_id"));
        }
        if to_state_id.is_empty() {
            return Err(DeltaError::missing_argument("to_state_id"));
        }

        let timestamp = Utc::now();
        let old_index = ResourceIndex::build(old);
        let new_index = ResourceIndex::build(new);
        tracing::debug!(
            "Indexed {} old and {} new resources ({} duplicate identities dropped)",
            old_index.len(),
            new_index.len(),
            old_index.duplicates() + new_index.duplicates()
        );

        let presence_computer = PresenceChangeComputer::new();
        let mut presence = presence_computer.compute(&old_index, &new_index, timestamp);
        tracing::debug!(
            "{}: {} added, {} removed, {} common",
            presence_computer.name(),
            presence.added.len(),
            presence.removed.len(),
            presence.common.len()
        );

        let modification_computer = ModificationChangeComputer::new(&self.config, &self.severity_rules);
        let mut modification = modification_computer.compute(&old_index, &new_index, timestamp);
        tracing::debug!(
            "{}: {} modified, {} unchanged",
            modification_computer.name(),
            modification.modified.len(),
            modification.unchanged.len()
        );

        sort_by_severity(&mut presence.added);
        sort_by_severity(&mut presence.removed);
        sort_by_severity(&mut modification.modified);

        let impact_analysis = DependencyAnalyzer::new(&self.config).analyze(
            presence
                .added
                .iter_mut()
                .chain(presence.removed.iter_mut())
                .chain(modification.modified.iter_mut()),
            &old_index,
            &new_index,
        );
        tracing::debug!(
            "Dependency analysis: {} high-impact changes, {} cascade risks",
            impact_analysis.high_impact_changes.len(),
            impact_analysis.cascade_risks.len()
        );

        let aggregator =
            ReportAggregator::new(&presence.added, &presence.removed, &modification.modified);
        let summary = aggregator.summary(
            old_index.len(),
            new_index.len(),
            modification.unchanged.len(),
        );
        let compliance_changes = aggregator.compliance(&old_index, &new_index);
        let security_changes = aggregator.security_rollup();
        let network_changes = aggregator.network_rollup();
        let change_statistics = aggregator.statistics();

        Ok(DeltaReport {
            from_state_id: from_state_id.to_string(),
            to_state_id: to_state_id.to_string(),
            timestamp,
            summary,
            added: presence.added,
            removed: presence.removed,
            modified: modification.modified,
            unchanged: modification.unchanged,
            compliance_changes,
            security_changes,
            network_changes,
            impact_analysis,
            change_statistics,
        })
    }
}

impl Default for DeltaEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{ChangeSeverity, ChangeType};
    use crate::error::DiffErrorKind;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<ResourceRecord> {
        values
            .into_iter()
            .map(|v| ResourceRecord::try_from(v).expect("object literal"))
            .collect()
    }

    #[test]
    fn test_empty_diff() {
        let report = DeltaEngine::new().diff(&[], &[], "a", "b").expect("diff");
        assert!(!report.has_changes());
        assert_eq!(report.summary.total_changes, 0);
        assert!(report.change_statistics.most_changed_service.is_none());
    }

    #[test]
    fn test_empty_state_id_rejected() {
        let err = DeltaEngine::new().diff(&[], &[], "", "b").unwrap_err();
        assert!(matches!(
            err,
            DeltaError::Diff {
                source: DiffErrorKind::MissingArgument(_),
                ..
            }
        ));
        assert!(DeltaEngine::new().diff(&[], &[], "a", "").is_err());
    }

    #[test]
    fn test_state_ids_and_timestamp_copied() {
        let old = records(vec![json!({"arn": "a", "service": "S3"})]);
        let new = records(vec![json!({"arn": "b", "service": "S3"})]);
        let report = DeltaEngine::new().diff(&old, &new, "state-1", "state-2").expect("diff");
        assert_eq!(report.from_state_id, "state-1");
        assert_eq!(report.to_state_id, "state-2");
        assert!(report.all_changes().all(|c| c.timestamp == report.timestamp));
    }

    #[test]
    fn test_changes_sorted_by_severity() {
        let new = records(vec![
            json!({"arn": "a-topic", "service": "SNS"}),
            json!({"arn": "b-role", "service": "IAM"}),
            json!({"arn": "c-bucket", "service": "S3"}),
        ]);
        let report = DeltaEngine::new().diff(&[], &new, "a", "b").expect("diff");
        let order: Vec<ChangeSeverity> = report.added.iter().map(|c| c.severity).collect();
        assert_eq!(
            order,
            vec![ChangeSeverity::Critical, ChangeSeverity::Medium, ChangeSeverity::Low]
        );
        assert_eq!(report.highest_severity(), Some(ChangeSeverity::Critical));
    }

    #[test]
    fn test_custom_ignore_list_applies() {
        let engine = DeltaEngine::with_config(DeltaConfig::default().ignore_field("size"));
        let old = records(vec![json!({"arn": "a", "size": 1})]);
        let new = records(vec![json!({"arn": "a", "size": 2})]);
        let report = engine.diff(&old, &new, "a", "b").expect("diff");
        assert_eq!(report.unchanged.len(), 1);
        assert_eq!(report.unchanged[0].change_type, ChangeType::Unchanged);
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DeltaEngine>();
    }
}
