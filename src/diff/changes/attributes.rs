//! Recursive attribute diff between two versions of one record.
//!
//! Mappings are compared key by key with a dotted path. Sequences of scalars
//! are compared as sets and yield `path[added]` / `path[removed]` changes.
//! Sequences holding structured elements are compared in order and yield a
//! single change for the whole sequence when they differ; element-level
//! detail is not produced for them. Values of different shapes at the same
//! path are reported as one replacement.

use crate::diff::engine_config::DeltaConfig;
use crate::diff::rules::{classify_category, SeverityRules};
use crate::diff::{AttributeChange, ChangeType};
use crate::model::{is_scalar, value_kind, ResourceRecord};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Longest rendering of a scalar value inside a description.
const MAX_DESCRIBED_VALUE: usize = 80;

/// Produces the flat list of attribute changes for a pair of records.
pub struct AttributeDiffer<'a> {
    config: &'a DeltaConfig,
    rules: &'a SeverityRules,
}

impl<'a> AttributeDiffer<'a> {
    #[must_use]
    pub const fn new(config: &'a DeltaConfig, rules: &'a SeverityRules) -> Self {
        Self { config, rules }
    }

    /// Diff two versions of the same record.
    pub fn diff_records(&self, old: &ResourceRecord, new: &ResourceRecord) -> Vec<AttributeChange> {
        let mut changes = Vec::new();
        self.diff_mappings("", old.fields(), new.fields(), &mut changes);
        changes
    }

    fn diff_mappings(
        &self,
        prefix: &str,
        old: &Map<String, Value>,
        new: &Map<String, Value>,
        out: &mut Vec<AttributeChange>,
    ) {
        let keys: BTreeSet<&String> = old
            .keys()
            .chain(new.keys())
            .filter(|k| !self.config.is_ignored(k))
            .collect();

        for key in keys {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            self.diff_value(&path, old.get(key), new.get(key), out);
        }
    }

    fn diff_value(
        &self,
        path: &str,
        old: Option<&Value>,
        new: Option<&Value>,
        out: &mut Vec<AttributeChange>,
    ) {
        match (old, new) {
            (None, None) => {}
            (None, Some(n)) => out.push(self.change(
                path,
                None,
                Some(n.clone()),
                ChangeType::Added,
                format!("Attribute '{path}' added"),
            )),
            (Some(o), None) => out.push(self.change(
                path,
                Some(o.clone()),
                None,
                ChangeType::Removed,
                format!("Attribute '{path}' removed"),
            )),
            (Some(o), Some(n)) if o == n => {}
            (Some(Value::Object(a)), Some(Value::Object(b))) => self.diff_mappings(path, a, b, out),
            (Some(Value::Array(a)), Some(Value::Array(b))) => self.diff_sequences(path, a, b, out),
            (Some(o), Some(n)) => {
                let description = if is_scalar(o) && is_scalar(n) {
                    format!(
                        "Attribute '{path}' changed from {} to {}",
                        describe(o),
                        describe(n)
                    )
                } else {
                    format!(
                        "Attribute '{path}' replaced ({} -> {})",
                        value_kind(o),
                        value_kind(n)
                    )
                };
                out.push(self.change(
                    path,
                    Some(o.clone()),
                    Some(n.clone()),
                    ChangeType::Modified,
                    description,
                ));
            }
        }
    }

    fn diff_sequences(&self, path: &str, old: &[Value], new: &[Value], out: &mut Vec<AttributeChange>) {
        if !old.iter().chain(new).all(is_scalar) {
            out.push(self.change(
                path,
                Some(Value::Array(old.to_vec())),
                Some(Value::Array(new.to_vec())),
                ChangeType::Modified,
                format!(
                    "Sequence '{path}' modified ({} -> {} items)",
                    old.len(),
                    new.len()
                ),
            ));
            return;
        }

        let added = set_difference(new, old);
        let removed = set_difference(old, new);

        if !added.is_empty() {
            let added_path = format!("{path}[added]");
            let description = format!("{} value(s) added to '{path}'", added.len());
            out.push(self.change(
                &added_path,
                None,
                Some(Value::Array(added)),
                ChangeType::Added,
                description,
            ));
        }
        if !removed.is_empty() {
            let removed_path = format!("{path}[removed]");
            let description = format!("{} value(s) removed from '{path}'", removed.len());
            out.push(self.change(
                &removed_path,
                Some(Value::Array(removed)),
                None,
                ChangeType::Removed,
                description,
            ));
        }
    }

    fn change(
        &self,
        path: &str,
        old_value: Option<Value>,
        new_value: Option<Value>,
        change_type: ChangeType,
        description: String,
    ) -> AttributeChange {
        AttributeChange {
            attribute_path: path.to_string(),
            category: classify_category(path),
            severity: self
                .rules
                .classify(path, old_value.as_ref(), new_value.as_ref()),
            old_value,
            new_value,
            change_type,
            description,
        }
    }
}

/// Elements of `left` absent from `right`, deduplicated, in `left` order.
fn set_difference(left: &[Value], right: &[Value]) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    for item in left {
        if !right.contains(item) && !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Render a scalar for a description, shortened when long.
fn describe(value: &Value) -> String {
    let rendered = match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    };
    if rendered.chars().count() > MAX_DESCRIBED_VALUE {
        let short: String = rendered.chars().take(MAX_DESCRIBED_VALUE).collect();
        format!("{short}...")
    } else {
        rendered
    }
}
