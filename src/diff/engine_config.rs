//! Configuration types for the delta engine.

use super::ChangeSeverity;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields excluded from attribute comparison at every depth by default.
pub const DEFAULT_IGNORED_FIELDS: &[&str] = &["lastSeen", "discoveryTimestamp", "scanTime", "metadata"];

/// Default severity rules, evaluated top to bottom.
pub const DEFAULT_SEVERITY_RULES: &[(&str, ChangeSeverity)] = &[
    ("security-groups", ChangeSeverity::Critical),
    ("iam", ChangeSeverity::Critical),
    ("encryption", ChangeSeverity::Critical),
    ("public-access", ChangeSeverity::Critical),
    ("vpc", ChangeSeverity::Critical),
    ("subnet", ChangeSeverity::High),
    ("compliance-status", ChangeSeverity::High),
    ("policy", ChangeSeverity::High),
    ("permissions", ChangeSeverity::High),
    ("network-acls", ChangeSeverity::High),
    ("tags", ChangeSeverity::Medium),
    ("configuration", ChangeSeverity::Medium),
    ("state", ChangeSeverity::Medium),
    ("description", ChangeSeverity::Low),
    ("name", ChangeSeverity::Low),
    ("labels", ChangeSeverity::Low),
];

/// Static service relationships used to correlate changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DependencyPattern {
    /// Services this service relies on
    pub depends_on: Vec<String>,
    /// Services affected when this service changes
    pub affects: Vec<String>,
}

impl DependencyPattern {
    pub fn new(depends_on: &[&str], affects: &[&str]) -> Self {
        Self {
            depends_on: depends_on.iter().map(|s| (*s).to_string()).collect(),
            affects: affects.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Configuration threaded read-only through every diff call.
///
/// The same value may be shared by concurrent diffs of different inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeltaConfig {
    /// Field names skipped at every depth of the attribute diff
    pub ignored_fields: Vec<String>,
    /// Caller severity rules, evaluated before (and replacing same-pattern) defaults.
    /// Patterns are substrings; prefix with `re:` for a regular expression.
    pub severity_rules: IndexMap<String, ChangeSeverity>,
    /// Service dependency table, keyed by lowercase service name
    pub dependency_patterns: BTreeMap<String, DependencyPattern>,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            ignored_fields: DEFAULT_IGNORED_FIELDS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            severity_rules: IndexMap::new(),
            dependency_patterns: default_dependency_patterns(),
        }
    }
}

impl DeltaConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ignore-list.
    #[must_use]
    pub fn with_ignored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add one field to the ignore-list.
    #[must_use]
    pub fn ignore_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.ignored_fields.contains(&field) {
            self.ignored_fields.push(field);
        }
        self
    }

    /// Add or override a severity rule.
    #[must_use]
    pub fn with_severity_rule(mut self, pattern: impl Into<String>, severity: ChangeSeverity) -> Self {
        self.severity_rules.insert(pattern.into(), severity);
        self
    }

    /// Add or replace a dependency pattern for a service.
    #[must_use]
    pub fn with_dependency_pattern(mut self, service: impl Into<String>, pattern: DependencyPattern) -> Self {
        self.dependency_patterns
            .insert(service.into().to_lowercase(), pattern);
        self
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignored_fields.iter().any(|f| f == field)
    }

    /// Caller rules followed by defaults whose pattern the caller did not override.
    pub fn effective_severity_rules(&self) -> Vec<(String, ChangeSeverity)> {
        let mut rules: Vec<(String, ChangeSeverity)> = self
            .severity_rules
            .iter()
            .map(|(p, s)| (p.clone(), *s))
            .collect();
        for (pattern, severity) in DEFAULT_SEVERITY_RULES {
            if !self.severity_rules.contains_key(*pattern) {
                rules.push(((*pattern).to_string(), *severity));
            }
        }
        rules
    }
}

/// The built-in service dependency table.
pub fn default_dependency_patterns() -> BTreeMap<String, DependencyPattern> {
    let compute_consumers = ["elb", "elbv2"];
    let table: [(&str, DependencyPattern); 12] = [
        (
            "vpc",
            DependencyPattern::new(
                &[],
                &["ec2", "rds", "lambda", "elb", "elbv2", "ecs", "eks", "elasticache", "redshift"],
            ),
        ),
        (
            "ec2",
            DependencyPattern::new(&["vpc", "iam", "kms"], &["elb", "elbv2", "autoscaling"]),
        ),
        ("rds", DependencyPattern::new(&["vpc", "kms", "iam"], &["lambda", "ec2"])),
        ("lambda", DependencyPattern::new(&["iam", "vpc", "kms"], &["apigateway"])),
        ("elb", DependencyPattern::new(&["vpc", "ec2"], &["route53", "cloudfront"])),
        ("elbv2", DependencyPattern::new(&["vpc", "ec2"], &["route53", "cloudfront"])),
        (
            "iam",
            DependencyPattern::new(&[], &["ec2", "lambda", "ecs", "eks", "rds", "s3"]),
        ),
        (
            "kms",
            DependencyPattern::new(
                &["iam"],
                &["s3", "rds", "ec2", "lambda", "secretsmanager", "dynamodb"],
            ),
        ),
        ("s3", DependencyPattern::new(&["iam", "kms"], &["cloudfront", "lambda"])),
        ("ecs", DependencyPattern::new(&["vpc", "iam", "ec2"], &compute_consumers)),
        ("eks", DependencyPattern::new(&["vpc", "iam", "ec2"], &compute_consumers)),
        ("elasticache", DependencyPattern::new(&["vpc"], &["lambda", "ec2"])),
    ];
    table
        .into_iter()
        .map(|(service, pattern)| (service.to_string(), pattern))
        .collect()
}
