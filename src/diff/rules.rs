//! Change classification rule tables.
//!
//! Both classifiers are ordered pattern lists evaluated top to bottom, first
//! match wins. Attribute paths are matched case-insensitively after removing
//! `-` and `_`, so the pattern `security-groups` matches `securityGroups[added]`.

use super::engine_config::DeltaConfig;
use super::services::{
    is_network_resource_type, is_network_topology_service, is_security_group_type,
    security_service,
};
use super::{AttributeChange, ChangeCategory, ChangeSeverity};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Prefix marking a severity rule pattern as a regular expression.
pub const REGEX_PREFIX: &str = "re:";

/// One row of the category table.
struct CategoryRule {
    category: ChangeCategory,
    keywords: &'static [&'static str],
    prefixes: &'static [&'static str],
}

const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: ChangeCategory::Security,
        keywords: &[
            "security",
            "iam",
            "policy",
            "permission",
            "role",
            "encryption",
            "public",
            "private",
            "acl",
            "firewall",
            "ssl",
            "tls",
            "certificate",
        ],
        prefixes: &["encryption."],
    },
    CategoryRule {
        category: ChangeCategory::Network,
        keywords: &[
            "vpc",
            "subnet",
            "network",
            "ip",
            "cidr",
            "route",
            "gateway",
            "dns",
            "port",
            "protocol",
            "endpoint",
            "loadbalancer",
        ],
        prefixes: &[],
    },
    CategoryRule {
        category: ChangeCategory::Tags,
        keywords: &["tag"],
        prefixes: &[],
    },
    CategoryRule {
        category: ChangeCategory::Compliance,
        keywords: &["compliance", "compliant", "violation", "policystatus"],
        prefixes: &[],
    },
];

/// Lowercase and strip `-` and `_`.
pub fn normalize_path(path: &str) -> String {
    path.chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Category of a single attribute change, from its path.
pub fn classify_category(path: &str) -> ChangeCategory {
    let normalized = normalize_path(path);
    CATEGORY_RULES
        .iter()
        .find(|rule| {
            rule.keywords.iter().any(|k| normalized.contains(k))
                || rule.prefixes.iter().any(|p| normalized.starts_with(p))
        })
        .map_or(ChangeCategory::Configuration, |rule| rule.category)
}

/// Severity when no rule in the table matched.
fn fallback_severity(normalized: &str, old: Option<&Value>, new: Option<&Value>) -> ChangeSeverity {
    if old.is_none() || new.is_none() {
        return ChangeSeverity::Medium;
    }
    let has = |needles: &[&str]| needles.iter().any(|n| normalized.contains(n));
    if has(&["security", "encryption", "publicaccess"]) || has(&["compliance", "policy"]) {
        ChangeSeverity::High
    } else if has(&["tag"]) {
        ChangeSeverity::Medium
    } else {
        ChangeSeverity::Low
    }
}

#[derive(Debug, Clone)]
enum PathMatcher {
    Substring(String),
    Pattern(Regex),
}

impl PathMatcher {
    fn matches(&self, raw: &str, normalized: &str) -> bool {
        match self {
            Self::Substring(needle) => normalized.contains(needle.as_str()),
            Self::Pattern(re) => re.is_match(raw),
        }
    }
}

/// Compiled severity rule table.
///
/// Built once per engine. Rules that cannot be compiled are logged and
/// dropped, so one bad caller rule never aborts a diff.
#[derive(Debug, Clone)]
pub struct SeverityRules {
    rules: Vec<(PathMatcher, ChangeSeverity)>,
    skipped: Vec<String>,
}

impl SeverityRules {
    pub fn from_config(config: &DeltaConfig) -> Self {
        let mut rules = Vec::new();
        let mut skipped = Vec::new();

        for (pattern, severity) in config.effective_severity_rules() {
            match compile_matcher(&pattern) {
                Ok(matcher) => rules.push((matcher, severity)),
                Err(reason) => {
                    tracing::warn!("Skipping severity rule '{}': {}", pattern, reason);
                    skipped.push(pattern);
                }
            }
        }

        Self { rules, skipped }
    }

    /// Patterns that failed to compile.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Severity of a single attribute change.
    pub fn classify(&self, path: &str, old: Option<&Value>, new: Option<&Value>) -> ChangeSeverity {
        let normalized = normalize_path(path);
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.matches(path, &normalized))
            .map_or_else(
                || fallback_severity(&normalized, old, new),
                |(_, severity)| *severity,
            )
    }
}

impl Default for SeverityRules {
    fn default() -> Self {
        Self::from_config(&DeltaConfig::default())
    }
}

/// Validate a single severity rule pattern.
pub fn check_pattern(pattern: &str) -> Result<(), String> {
    compile_matcher(pattern).map(|_| ())
}

fn compile_matcher(pattern: &str) -> Result<PathMatcher, String> {
    if let Some(expr) = pattern.strip_prefix(REGEX_PREFIX) {
        return RegexBuilder::new(expr)
            .case_insensitive(true)
            .build()
            .map(PathMatcher::Pattern)
            .map_err(|e| format!("invalid regular expression: {e}"));
    }
    let needle = normalize_path(pattern);
    if needle.is_empty() {
        return Err("empty pattern".to_string());
    }
    Ok(PathMatcher::Substring(needle))
}

/// Category of a modified resource from its attribute and compliance changes.
///
/// Compliance wins when compliance-specific changes exist, then Security,
/// then Compliance, then the most frequent category (earliest on ties).
pub fn resource_category(
    attribute_changes: &[AttributeChange],
    compliance_changes: &[AttributeChange],
) -> ChangeCategory {
    if !compliance_changes.is_empty() {
        return ChangeCategory::Compliance;
    }
    let has = |cat: ChangeCategory| attribute_changes.iter().any(|c| c.category == cat);
    if has(ChangeCategory::Security) {
        return ChangeCategory::Security;
    }
    if has(ChangeCategory::Compliance) {
        return ChangeCategory::Compliance;
    }

    let mut counts: Vec<(ChangeCategory, usize)> = Vec::new();
    for change in attribute_changes {
        match counts.iter_mut().find(|(cat, _)| *cat == change.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((change.category, 1)),
        }
    }
    let mut best: Option<(ChangeCategory, usize)> = None;
    for (cat, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((cat, n));
        }
    }
    best.map_or(ChangeCategory::Configuration, |(cat, _)| cat)
}

/// Category of a resource that was added or removed as a whole.
pub fn presence_category(service: &str, resource_type: &str) -> ChangeCategory {
    if security_service(service).is_some() || is_security_group_type(resource_type) {
        ChangeCategory::Security
    } else if is_network_topology_service(service) || is_network_resource_type(resource_type) {
        ChangeCategory::Network
    } else {
        ChangeCategory::Configuration
    }
}
