//! Report aggregation: summary counts, compliance trend, rollups, statistics.

use super::changes::compliance::{compliance_state, record_compliance, COMPLIANCE_STATUS_KEY};
use super::{
    ChangeCategory, ChangeStatistics, ChangeType, ComplianceChanges, ComplianceEntry, DeltaSummary,
    ImpactRollup, ResourceChange, ServiceStatistics,
};
use crate::model::ResourceIndex;

/// Label used in statistics for resources without a service.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Sort by severity (highest first), then identity.
pub fn sort_by_severity(changes: &mut [ResourceChange]) {
    changes.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.identity.cmp(&b.identity))
    });
}

/// Derives every aggregate section of a report from the resource changes.
pub struct ReportAggregator<'r> {
    added: &'r [ResourceChange],
    removed: &'r [ResourceChange],
    modified: &'r [ResourceChange],
}

impl<'r> ReportAggregator<'r> {
    #[must_use]
    pub const fn new(
        added: &'r [ResourceChange],
        removed: &'r [ResourceChange],
        modified: &'r [ResourceChange],
    ) -> Self {
        Self {
            added,
            removed,
            modified,
        }
    }

    fn changes(&self) -> impl Iterator<Item = &'r ResourceChange> {
        self.added
            .iter()
            .chain(self.removed.iter())
            .chain(self.modified.iter())
    }

    pub fn summary(&self, old_total: usize, new_total: usize, unchanged: usize) -> DeltaSummary {
        let (added, removed, modified) = (self.added.len(), self.removed.len(), self.modified.len());
        DeltaSummary {
            old_total,
            new_total,
            added,
            removed,
            modified,
            unchanged,
            total_changes: added + removed + modified,
        }
    }

    /// Compliance trend between the two states.
    ///
    /// Percentages are taken over resources whose compliance status is
    /// recognised; a state without any such resource reports 0.
    pub fn compliance(&self, old: &ResourceIndex<'_>, new: &ResourceIndex<'_>) -> ComplianceChanges {
        let mut result = ComplianceChanges {
            compliant_before_pct: compliant_pct(old),
            compliant_after_pct: compliant_pct(new),
            ..ComplianceChanges::default()
        };

        for change in self.modified {
            if change.compliance_changes.is_empty() {
                continue;
            }
            let status = change
                .compliance_changes
                .iter()
                .find(|c| c.attribute_path == COMPLIANCE_STATUS_KEY);
            if let Some(status) = status {
                let before = status.old_value.as_ref().and_then(compliance_state);
                let after = status.new_value.as_ref().and_then(compliance_state);
                match after {
                    Some(true) if before != Some(true) => result.newly_compliant += 1,
                    Some(false) if before != Some(false) => result.newly_non_compliant += 1,
                    _ => {}
                }
            }
            result.entries.push(ComplianceEntry {
                identity: change.identity.clone(),
                service: change.service.clone(),
                changes: change.compliance_changes.clone(),
            });
        }

        result
    }

    /// Changes that touch security: Security category or a security narrative.
    pub fn security_rollup(&self) -> ImpactRollup {
        rollup(self.changes().filter(|c| {
            c.category == ChangeCategory::Security || c.security_impact.is_some()
        }))
    }

    /// Changes that touch the network: Network category or a network narrative.
    pub fn network_rollup(&self) -> ImpactRollup {
        rollup(self.changes().filter(|c| {
            c.category == ChangeCategory::Network || c.network_impact.is_some()
        }))
    }

    pub fn statistics(&self) -> ChangeStatistics {
        let mut stats = ChangeStatistics::default();

        for change in self.changes() {
            let service = if change.service.is_empty() {
                UNKNOWN_SERVICE.to_string()
            } else {
                change.service.clone()
            };
            let entry = stats.by_service.entry(service).or_default();
            match change.change_type {
                ChangeType::Added => entry.added += 1,
                ChangeType::Removed => entry.removed += 1,
                _ => entry.modified += 1,
            }
            *stats.by_severity.entry(change.severity).or_default() += 1;
            *stats.by_category.entry(change.category).or_default() += 1;
        }

        // BTreeMap order makes the lexicographically first service win ties
        let mut best: Option<(&String, &ServiceStatistics)> = None;
        for (service, counts) in &stats.by_service {
            if best.map_or(true, |(_, b)| counts.total() > b.total()) {
                best = Some((service, counts));
            }
        }
        stats.most_changed_service = best.map(|(s, _)| s.clone());

        stats
    }
}

fn compliant_pct(index: &ResourceIndex<'_>) -> f64 {
    let (mut known, mut compliant) = (0usize, 0usize);
    for (_, record) in index.iter() {
        if let Some(state) = record_compliance(record) {
            known += 1;
            if state {
                compliant += 1;
            }
        }
    }
    if known == 0 {
        0.0
    } else {
        compliant as f64 * 100.0 / known as f64
    }
}

fn rollup<'r>(changes: impl Iterator<Item = &'r ResourceChange>) -> ImpactRollup {
    let mut result = ImpactRollup::default();
    for change in changes {
        result.total += 1;
        *result.by_severity.entry(change.severity).or_default() += 1;
        if change.severity.is_high_risk() {
            result.high_risk_resources.push(change.identity.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{AttributeChange, ChangeSeverity};
    use crate::model::ResourceRecord;
    use chrono::Utc;
    use serde_json::json;

    fn change(identity: &str, service: &str, change_type: ChangeType, severity: ChangeSeverity) -> ResourceChange {
        ResourceChange {
            identity: identity.to_string(),
            resource_id: identity.to_string(),
            service: service.to_string(),
            resource_type: String::new(),
            region: String::new(),
            change_type,
            category: ChangeCategory::Configuration,
            attribute_changes: Vec::new(),
            compliance_changes: Vec::new(),
            security_impact: None,
            network_impact: None,
            related_resources: Vec::new(),
            severity,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_sort_by_severity_then_identity() {
        let mut changes = vec![
            change("b", "S3", ChangeType::Added, ChangeSeverity::Low),
            change("c", "IAM", ChangeType::Added, ChangeSeverity::Critical),
            change("a", "S3", ChangeType::Added, ChangeSeverity::Low),
        ];
        sort_by_severity(&mut changes);
        let order: Vec<&str> = changes.iter().map(|c| c.identity.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_statistics_and_most_changed_service() {
        let added = vec![
            change("a1", "S3", ChangeType::Added, ChangeSeverity::Medium),
            change("a2", "EC2", ChangeType::Added, ChangeSeverity::High),
        ];
        let removed = vec![change("r1", "EC2", ChangeType::Removed, ChangeSeverity::High)];
        let modified = vec![change("m1", "", ChangeType::Modified, ChangeSeverity::Low)];
        let stats = ReportAggregator::new(&added, &removed, &modified).statistics();

        assert_eq!(stats.most_changed_service.as_deref(), Some("EC2"));
        assert_eq!(stats.by_service["EC2"].total(), 2);
        assert_eq!(stats.by_service[UNKNOWN_SERVICE].modified, 1);
        assert_eq!(stats.by_severity[&ChangeSeverity::High], 2);
        assert_eq!(stats.by_category[&ChangeCategory::Configuration], 4);
    }

    #[test]
    fn test_most_changed_tie_breaks_lexicographically() {
        let added = vec![
            change("a1", "S3", ChangeType::Added, ChangeSeverity::Medium),
            change("a2", "EC2", ChangeType::Added, ChangeSeverity::High),
        ];
        let stats = ReportAggregator::new(&added, &[], &[]).statistics();
        assert_eq!(stats.most_changed_service.as_deref(), Some("EC2"));
    }

    #[test]
    fn test_no_changes_no_most_changed_service() {
        let stats = ReportAggregator::new(&[], &[], &[]).statistics();
        assert!(stats.most_changed_service.is_none());
    }

    #[test]
    fn test_rollups_use_category_and_narratives() {
        let mut sg = change("sg", "EC2", ChangeType::Modified, ChangeSeverity::Critical);
        sg.category = ChangeCategory::Security;
        let mut db = change("db", "RDS", ChangeType::Removed, ChangeSeverity::High);
        db.network_impact = Some("RDS resource deleted".to_string());
        let mut bucket = change("b", "S3", ChangeType::Added, ChangeSeverity::Medium);
        bucket.security_impact = Some("public".to_string());

        let modified = vec![sg];
        let removed = vec![db];
        let added = vec![bucket];
        let aggregator = ReportAggregator::new(&added, &removed, &modified);

        let security = aggregator.security_rollup();
        assert_eq!(security.total, 2);
        assert_eq!(security.high_risk_resources, vec!["sg".to_string()]);

        let network = aggregator.network_rollup();
        assert_eq!(network.total, 1);
        assert_eq!(network.by_severity[&ChangeSeverity::High], 1);
        assert_eq!(network.high_risk_resources, vec!["db".to_string()]);
    }

    #[test]
    fn test_compliance_trend() {
        let old = vec![
            ResourceRecord::try_from(json!({"arn": "a", "complianceStatus": "compliant"})).expect("object"),
            ResourceRecord::try_from(json!({"arn": "b", "complianceStatus": "compliant"})).expect("object"),
            ResourceRecord::try_from(json!({"arn": "c"})).expect("object"),
        ];
        let new = vec![
            ResourceRecord::try_from(json!({"arn": "a", "complianceStatus": "non-compliant"})).expect("object"),
            ResourceRecord::try_from(json!({"arn": "b", "complianceStatus": "compliant"})).expect("object"),
            ResourceRecord::try_from(json!({"arn": "c"})).expect("object"),
        ];
        let mut modified = change("a", "S3", ChangeType::Modified, ChangeSeverity::High);
        modified.compliance_changes.push(AttributeChange {
            attribute_path: COMPLIANCE_STATUS_KEY.to_string(),
            old_value: Some(json!("compliant")),
            new_value: Some(json!("non-compliant")),
            change_type: ChangeType::Modified,
            category: ChangeCategory::Compliance,
            severity: ChangeSeverity::High,
            description: String::new(),
        });
        let modified = vec![modified];

        let trend = ReportAggregator::new(&[], &[], &modified)
            .compliance(&ResourceIndex::build(&old), &ResourceIndex::build(&new));

        assert!((trend.compliant_before_pct - 100.0).abs() < f64::EPSILON);
        assert!((trend.compliant_after_pct - 50.0).abs() < f64::EPSILON);
        assert_eq!(trend.newly_non_compliant, 1);
        assert_eq!(trend.newly_compliant, 0);
        assert_eq!(trend.entries.len(), 1);
    }
}
