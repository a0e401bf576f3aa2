//! Presence change computer implementation.

use super::base_change;
use crate::diff::impact::{network_impact, security_impact, ImpactContext};
use crate::diff::rules::presence_category;
use crate::diff::services::service_importance;
use crate::diff::traits::{ChangeComputer, PresenceChangeSet};
use crate::diff::{ChangeType, ResourceChange};
use crate::model::{ResourceIndex, ResourceRecord};
use chrono::{DateTime, Utc};

/// Splits identities into added, removed and common.
///
/// Added and removed resources carry no attribute changes; their severity
/// comes from the importance of their service.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceChangeComputer;

impl PresenceChangeComputer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn resource_event(
        identity: &str,
        record: &ResourceRecord,
        change_type: ChangeType,
        timestamp: DateTime<Utc>,
    ) -> ResourceChange {
        let mut change = base_change(identity, record, change_type, timestamp);
        let (old, new) = match change_type {
            ChangeType::Removed => (Some(record), None),
            _ => (None, Some(record)),
        };
        let ctx = ImpactContext {
            change_type,
            service: record.service(),
            resource_type: record.resource_type(),
            old,
            new,
        };
        change.category = presence_category(record.service(), record.resource_type());
        change.severity = service_importance(record.service());
        change.security_impact = security_impact(&ctx);
        change.network_impact = network_impact(&ctx);
        change
    }
}

impl ChangeComputer for PresenceChangeComputer {
    type ChangeSet = PresenceChangeSet;

    fn compute(
        &self,
        old: &ResourceIndex<'_>,
        new: &ResourceIndex<'_>,
        timestamp: DateTime<Utc>,
    ) -> PresenceChangeSet {
        let mut result = PresenceChangeSet::new();

        for (identity, record) in new.iter() {
            if old.contains(identity) {
                result.common.push(identity.clone());
            } else {
                result.added.push(Self::resource_event(
                    identity,
                    record,
                    ChangeType::Added,
                    timestamp,
                ));
            }
        }

        for (identity, record) in old.iter() {
            if !new.contains(identity) {
                result.removed.push(Self::resource_event(
                    identity,
                    record,
                    ChangeType::Removed,
                    timestamp,
                ));
            }
        }

        result
    }

    fn name(&self) -> &str {
        "PresenceChangeComputer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{ChangeCategory, ChangeSeverity};
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<ResourceRecord> {
        values
            .into_iter()
            .map(|v| ResourceRecord::try_from(v).expect("object literal"))
            .collect()
    }

    #[test]
    fn test_split_into_added_removed_common() {
        let old = records(vec![
            json!({"arn": "a", "service": "S3"}),
            json!({"arn": "b", "service": "RDS", "resourceType": "DBInstance"}),
        ]);
        let new = records(vec![
            json!({"arn": "a", "service": "S3"}),
            json!({"arn": "c", "service": "IAM", "resourceType": "Role"}),
        ]);
        let (old_index, new_index) = (ResourceIndex::build(&old), ResourceIndex::build(&new));
        let set = PresenceChangeComputer::new().compute(&old_index, &new_index, Utc::now());

        assert_eq!(set.common, vec!["a".to_string()]);
        assert_eq!(set.added.len(), 1);
        assert_eq!(set.removed.len(), 1);

        let added = &set.added[0];
        assert_eq!(added.identity, "c");
        assert_eq!(added.change_type, ChangeType::Added);
        assert_eq!(added.severity, ChangeSeverity::Critical);
        assert_eq!(added.category, ChangeCategory::Security);
        assert!(added.attribute_changes.is_empty());
        assert!(added.security_impact.is_some());

        let removed = &set.removed[0];
        assert_eq!(removed.identity, "b");
        assert_eq!(removed.severity, ChangeSeverity::High);
        assert!(removed
            .network_impact
            .as_deref()
            .is_some_and(|n| n.contains("RDS")));
    }

    #[test]
    fn test_unknown_service_is_low() {
        let new = records(vec![json!({"id": "topic-1", "service": "SNS"})]);
        let empty: Vec<ResourceRecord> = Vec::new();
        let set = PresenceChangeComputer::new().compute(
            &ResourceIndex::build(&empty),
            &ResourceIndex::build(&new),
            Utc::now(),
        );
        assert_eq!(set.added[0].severity, ChangeSeverity::Low);
        assert_eq!(set.added[0].category, ChangeCategory::Configuration);
        assert!(set.added[0].security_impact.is_none());
        assert!(set.added[0].network_impact.is_none());
    }
}
