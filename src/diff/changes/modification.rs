//! Modification change computer implementation.

use super::attributes::AttributeDiffer;
use super::base_change;
use super::compliance::diff_compliance;
use crate::diff::engine_config::DeltaConfig;
use crate::diff::impact::{network_impact, security_impact, ImpactContext};
use crate::diff::rules::{resource_category, SeverityRules};
use crate::diff::traits::{ChangeComputer, ModificationChangeSet};
use crate::diff::{ChangeCategory, ChangeSeverity, ChangeType};
use crate::model::ResourceIndex;
use chrono::{DateTime, Utc};

/// Diffs every identity present in both states.
pub struct ModificationChangeComputer<'a> {
    config: &'a DeltaConfig,
    rules: &'a SeverityRules,
}

impl<'a> ModificationChangeComputer<'a> {
    #[must_use]
    pub const fn new(config: &'a DeltaConfig, rules: &'a SeverityRules) -> Self {
        Self { config, rules }
    }
}

impl ChangeComputer for ModificationChangeComputer<'_> {
    type ChangeSet = ModificationChangeSet;

    fn compute(
        &self,
        old: &ResourceIndex<'_>,
        new: &ResourceIndex<'_>,
        timestamp: DateTime<Utc>,
    ) -> ModificationChangeSet {
        let differ = AttributeDiffer::new(self.config, self.rules);
        let mut result = ModificationChangeSet::new();

        for (identity, new_record) in new.iter() {
            let Some(old_record) = old.get(identity) else {
                continue;
            };

            let attribute_changes = differ.diff_records(old_record, new_record);
            if attribute_changes.is_empty() {
                let mut change =
                    base_change(identity, new_record, ChangeType::Unchanged, timestamp);
                change.category = ChangeCategory::Configuration;
                change.severity = ChangeSeverity::Info;
                result.unchanged.push(change);
                continue;
            }

            let compliance_changes = diff_compliance(old_record, new_record);
            let ctx = ImpactContext {
                change_type: ChangeType::Modified,
                service: new_record.service(),
                resource_type: new_record.resource_type(),
                old: Some(old_record),
                new: Some(new_record),
            };

            let mut change = base_change(identity, new_record, ChangeType::Modified, timestamp);
            change.category = resource_category(&attribute_changes, &compliance_changes);
            change.security_impact = security_impact(&ctx);
            change.network_impact = network_impact(&ctx);
            change.attribute_changes = attribute_changes;
            change.compliance_changes = compliance_changes;
            change.severity = change.max_attribute_severity();
            result.modified.push(change);
        }

        result
    }

    fn name(&self) -> &str {
        "ModificationChangeComputer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceRecord;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<ResourceRecord> {
        values
            .into_iter()
            .map(|v| ResourceRecord::try_from(v).expect("object literal"))
            .collect()
    }

    fn compute(old: &[ResourceRecord], new: &[ResourceRecord]) -> ModificationChangeSet {
        let config = DeltaConfig::default();
        let rules = SeverityRules::from_config(&config);
        ModificationChangeComputer::new(&config, &rules).compute(
            &ResourceIndex::build(old),
            &ResourceIndex::build(new),
            Utc::now(),
        )
    }

    #[test]
    fn test_modified_severity_is_max_of_attributes() {
        let old = records(vec![json!({"arn": "i-1", "service": "EC2", "subnetId": "subnet-a", "vpcId": "vpc-1"})]);
        let new = records(vec![json!({"arn": "i-1", "service": "EC2", "subnetId": "subnet-b", "vpcId": "vpc-2"})]);
        let set = compute(&old, &new);
        assert_eq!(set.modified.len(), 1);
        let change = &set.modified[0];
        assert_eq!(change.attribute_changes.len(), 2);
        assert_eq!(change.severity, ChangeSeverity::Critical);
        assert_eq!(change.category, ChangeCategory::Network);
        assert!(change
            .network_impact
            .as_deref()
            .is_some_and(|n| n.contains("vpc-1") && n.contains("vpc-2")));
    }

    #[test]
    fn test_ignored_only_changes_are_unchanged() {
        let old = records(vec![json!({"arn": "x", "lastSeen": "2024-01-01"})]);
        let new = records(vec![json!({"arn": "x", "lastSeen": "2024-02-01"})]);
        let set = compute(&old, &new);
        assert!(set.modified.is_empty());
        assert_eq!(set.unchanged.len(), 1);
        assert_eq!(set.unchanged[0].severity, ChangeSeverity::Info);
        assert_eq!(set.unchanged[0].change_type, ChangeType::Unchanged);
    }

    #[test]
    fn test_compliance_changes_attached() {
        let old = records(vec![json!({"arn": "b", "service": "S3", "complianceStatus": "compliant"})]);
        let new = records(vec![json!({"arn": "b", "service": "S3", "complianceStatus": "non-compliant"})]);
        let set = compute(&old, &new);
        let change = &set.modified[0];
        assert_eq!(change.compliance_changes.len(), 1);
        assert_eq!(change.compliance_changes[0].severity, ChangeSeverity::High);
        assert_eq!(change.category, ChangeCategory::Compliance);
    }
}
