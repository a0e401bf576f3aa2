//! Dependency and cascade analysis.
//!
//! A resource is related to a changed resource when the service dependency
//! table links their services and the two records share a value on one of the
//! structural link fields (VPC, subnet, security groups, IAM role, KMS key).
//! Resources named as related by several changed resources are cascade risks.

use super::engine_config::{DeltaConfig, DependencyPattern};
use super::services::normalize_service;
use super::{
    CascadeRisk, ChangeSeverity, ChangeType, HighImpactChange, ImpactAnalysis, ResourceChange,
};
use crate::model::{ResourceIndex, ResourceRecord};
use crate::utils::canonical_json;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Field aliases that link two records structurally.
const LINK_FIELDS: &[&[&str]] = &[
    &["vpcId", "vpc_id", "VpcId"],
    &["subnetId", "subnet_id", "SubnetId"],
    &["securityGroups", "security_groups", "SecurityGroups"],
    &["iamRole", "iam_role", "IamRole"],
    &["kmsKeyId", "kms_key_id", "KmsKeyId"],
];

/// Named by more than this many changes raises a cascade risk to High.
const HIGH_CASCADE_THRESHOLD: usize = 2;

/// Link values of one record, one set per entry of [`LINK_FIELDS`].
type LinkValues = Vec<BTreeSet<String>>;

struct Candidate<'a> {
    identity: &'a str,
    service: String,
    links: LinkValues,
}

/// Correlates changes through the service dependency table.
pub struct DependencyAnalyzer<'a> {
    patterns: Vec<(String, &'a DependencyPattern)>,
}

impl<'a> DependencyAnalyzer<'a> {
    #[must_use]
    pub fn new(config: &'a DeltaConfig) -> Self {
        let patterns = config
            .dependency_patterns
            .iter()
            .map(|(service, pattern)| (normalize_service(service), pattern))
            .collect();
        Self { patterns }
    }

    fn pattern(&self, service: &str) -> Option<&'a DependencyPattern> {
        self.patterns
            .iter()
            .find(|(s, _)| s == service)
            .map(|(_, p)| *p)
    }

    /// Fill `related_resources` of every change and build the impact analysis.
    pub fn analyze<'c, I>(
        &self,
        changes: I,
        old: &ResourceIndex<'_>,
        new: &ResourceIndex<'_>,
    ) -> ImpactAnalysis
    where
        I: IntoIterator<Item = &'c mut ResourceChange>,
    {
        let candidates: Vec<Candidate<'_>> = new
            .iter()
            .map(|(identity, record)| Candidate {
                identity: identity.as_str(),
                service: normalize_service(record.service()),
                links: link_values(record),
            })
            .collect();

        let mut analysis = ImpactAnalysis::default();
        let mut named_by: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for change in changes {
            let record = match change.change_type {
                ChangeType::Removed => old.get(&change.identity),
                _ => new.get(&change.identity),
            };
            let Some(record) = record else {
                continue;
            };

            let related = self.related_resources(&change.identity, record, &candidates);
            if related.is_empty() {
                continue;
            }
            tracing::debug!(
                "{} related resource(s) for {}",
                related.len(),
                change.identity
            );

            for identity in &related {
                named_by
                    .entry(identity.clone())
                    .or_default()
                    .insert(change.identity.clone());
            }
            if change.severity.is_high_risk() {
                analysis.high_impact_changes.push(HighImpactChange {
                    identity: change.identity.clone(),
                    service: change.service.clone(),
                    change_type: change.change_type,
                    severity: change.severity,
                    related_resources: related.clone(),
                });
            }
            change.related_resources = related;
        }

        analysis.cascade_risks = named_by
            .into_iter()
            .filter(|(_, causes)| causes.len() > 1)
            .map(|(identity, causes)| CascadeRisk {
                risk_level: if causes.len() > HIGH_CASCADE_THRESHOLD {
                    ChangeSeverity::High
                } else {
                    ChangeSeverity::Medium
                },
                identity,
                caused_by: causes.into_iter().collect(),
            })
            .collect();
        analysis.cascade_risks.sort_by(|a, b| {
            b.risk_level
                .cmp(&a.risk_level)
                .then_with(|| a.identity.cmp(&b.identity))
        });

        analysis
    }

    /// Identities in the new state related to the changed record, sorted.
    fn related_resources(
        &self,
        identity: &str,
        record: &ResourceRecord,
        candidates: &[Candidate<'_>],
    ) -> Vec<String> {
        let service = normalize_service(record.service());
        let Some(pattern) = self.pattern(&service) else {
            return Vec::new();
        };
        let affects: BTreeSet<String> = pattern.affects.iter().map(|s| normalize_service(s)).collect();
        let links = link_values(record);

        candidates
            .iter()
            .filter(|c| c.identity != identity)
            .filter(|c| {
                affects.contains(&c.service)
                    || self.pattern(&c.service).is_some_and(|p| {
                        p.depends_on.iter().any(|d| normalize_service(d) == service)
                    })
            })
            .filter(|c| shares_link(&links, &c.links))
            .map(|c| c.identity.to_string())
            .collect()
    }
}

fn shares_link(a: &LinkValues, b: &LinkValues) -> bool {
    a.iter()
        .zip(b)
        .any(|(left, right)| !left.is_disjoint(right))
}

fn link_values(record: &ResourceRecord) -> LinkValues {
    LINK_FIELDS
        .iter()
        .map(|aliases| {
            let mut values = BTreeSet::new();
            for alias in *aliases {
                if let Some(value) = record.get(alias) {
                    collect_link_values(value, &mut values);
                }
            }
            values
        })
        .collect()
}

fn collect_link_values(value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                out.insert(trimmed.to_string());
            }
        }
        Value::Bool(_) | Value::Number(_) => {
            out.insert(value.to_string());
        }
        Value::Array(items) => {
            for item in items {
                collect_link_values(item, out);
            }
        }
        Value::Object(_) => {
            out.insert(canonical_json(value));
        }
    }
}
