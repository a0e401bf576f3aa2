//! Compliance-specific comparison.
//!
//! Runs independently of the generic attribute diff and looks only at the
//! compliance status and violation list of a record.

use crate::diff::{AttributeChange, ChangeCategory, ChangeSeverity, ChangeType};
use crate::model::ResourceRecord;
use serde_json::Value;

pub const COMPLIANCE_STATUS_KEY: &str = "complianceStatus";
pub const COMPLIANCE_VIOLATIONS_KEY: &str = "complianceViolations";

/// Interpret a compliance status value.
///
/// Returns `Some(true)` for compliant, `Some(false)` for non-compliant and
/// `None` when the value carries no verdict.
pub fn compliance_state(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let normalized: String = s
                .chars()
                .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
                .flat_map(char::to_lowercase)
                .collect();
            match normalized.as_str() {
                "compliant" | "passed" | "pass" => Some(true),
                "noncompliant" | "failed" | "fail" | "violation" | "violated" => Some(false),
                other if other.starts_with("non") => Some(false),
                _ => None,
            }
        }
        _ => None,
    }
}

pub fn is_non_compliant(value: &Value) -> bool {
    compliance_state(value) == Some(false)
}

/// Compliance state of a record, if it declares one.
pub fn record_compliance(record: &ResourceRecord) -> Option<bool> {
    record.get(COMPLIANCE_STATUS_KEY).and_then(compliance_state)
}

/// Compare the compliance fields of two versions of a record.
pub fn diff_compliance(old: &ResourceRecord, new: &ResourceRecord) -> Vec<AttributeChange> {
    let mut changes = Vec::new();

    let (old_status, new_status) = (old.get(COMPLIANCE_STATUS_KEY), new.get(COMPLIANCE_STATUS_KEY));
    if old_status != new_status {
        let severity = if new_status.is_some_and(is_non_compliant) {
            ChangeSeverity::High
        } else {
            ChangeSeverity::Medium
        };
        changes.push(AttributeChange {
            attribute_path: COMPLIANCE_STATUS_KEY.to_string(),
            old_value: old_status.cloned(),
            new_value: new_status.cloned(),
            change_type: presence_change_type(old_status, new_status),
            category: ChangeCategory::Compliance,
            severity,
            description: format!(
                "Compliance status changed from {} to {}",
                status_label(old_status),
                status_label(new_status)
            ),
        });
    }

    let (old_violations, new_violations) = (
        old.get(COMPLIANCE_VIOLATIONS_KEY),
        new.get(COMPLIANCE_VIOLATIONS_KEY),
    );
    if old_violations != new_violations {
        changes.push(AttributeChange {
            attribute_path: COMPLIANCE_VIOLATIONS_KEY.to_string(),
            old_value: old_violations.cloned(),
            new_value: new_violations.cloned(),
            change_type: presence_change_type(old_violations, new_violations),
            category: ChangeCategory::Compliance,
            severity: ChangeSeverity::High,
            description: format!(
                "Compliance violations changed ({} -> {})",
                violation_count(old_violations),
                violation_count(new_violations)
            ),
        });
    }

    changes
}

fn presence_change_type(old: Option<&Value>, new: Option<&Value>) -> ChangeType {
    match (old, new) {
        (None, Some(_)) => ChangeType::Added,
        (Some(_), None) => ChangeType::Removed,
        _ => ChangeType::Modified,
    }
}

fn status_label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "unknown".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn violation_count(value: Option<&Value>) -> usize {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        Some(Value::Number(n)) => n.as_u64().map_or(0, |n| n as usize),
        Some(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ResourceRecord {
        ResourceRecord::try_from(value).expect("object literal")
    }

    #[test]
    fn test_compliance_state_values() {
        assert_eq!(compliance_state(&json!("COMPLIANT")), Some(true));
        assert_eq!(compliance_state(&json!("non-compliant")), Some(false));
        assert_eq!(compliance_state(&json!("NON_COMPLIANT")), Some(false));
        assert_eq!(compliance_state(&json!("Failed")), Some(false));
        assert_eq!(compliance_state(&json!(false)), Some(false));
        assert_eq!(compliance_state(&json!("not_applicable")), None);
        assert_eq!(compliance_state(&json!(3)), None);
    }

    #[test]
    fn test_status_to_non_compliant_is_high() {
        let changes = diff_compliance(
            &record(json!({"complianceStatus": "compliant"})),
            &record(json!({"complianceStatus": "non-compliant"})),
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].severity, ChangeSeverity::High);
        assert_eq!(changes[0].category, ChangeCategory::Compliance);
        assert_eq!(
            changes[0].description,
            "Compliance status changed from compliant to non-compliant"
        );
    }

    #[test]
    fn test_status_to_compliant_is_medium() {
        let changes = diff_compliance(
            &record(json!({"complianceStatus": "non-compliant"})),
            &record(json!({"complianceStatus": "compliant"})),
        );
        assert_eq!(changes[0].severity, ChangeSeverity::Medium);
    }

    #[test]
    fn test_violation_changes_are_high() {
        let changes = diff_compliance(
            &record(json!({"complianceViolations": []})),
            &record(json!({"complianceViolations": ["CIS-1.2"]})),
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].attribute_path, "complianceViolations");
        assert_eq!(changes[0].severity, ChangeSeverity::High);
        assert!(changes[0].description.contains("0 -> 1"));
    }

    #[test]
    fn test_status_appearing_is_added() {
        let changes = diff_compliance(
            &record(json!({})),
            &record(json!({"complianceStatus": "compliant"})),
        );
        assert_eq!(changes[0].change_type, ChangeType::Added);
        assert_eq!(changes[0].description, "Compliance status changed from unknown to compliant");
    }

    #[test]
    fn test_no_compliance_fields_no_changes() {
        assert!(diff_compliance(&record(json!({"a": 1})), &record(json!({"a": 2}))).is_empty());
    }
}
