//! Normalized resource records.

use crate::error::{DeltaError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that carry an ARN-like globally unique name, checked in order.
pub const ARN_KEYS: &[&str] = &["arn", "Arn", "ARN", "resourceArn", "resource_arn"];

/// Keys that carry a plain resource id, checked in order.
pub const ID_KEYS: &[&str] = &["id", "Id", "resourceId", "resource_id"];

const SERVICE_KEYS: &[&str] = &["service", "Service"];
const RESOURCE_TYPE_KEYS: &[&str] = &["resourceType", "resource_type", "ResourceType", "type"];
const REGION_KEYS: &[&str] = &["region", "Region"];

/// One normalized cloud resource: a mapping from string keys to
/// semi-structured values.
///
/// Records are never mutated by the diff engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRecord(Map<String, Value>);

impl ResourceRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// String value of `key`, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Provider service label, `""` when missing.
    pub fn service(&self) -> &str {
        self.first_str(SERVICE_KEYS).unwrap_or_default()
    }

    /// Resource type label, `""` when missing.
    pub fn resource_type(&self) -> &str {
        self.first_str(RESOURCE_TYPE_KEYS).unwrap_or_default()
    }

    /// Region label, `""` when missing.
    pub fn region(&self) -> &str {
        self.first_str(REGION_KEYS).unwrap_or_default()
    }

    /// The first usable ARN-like value.
    pub fn arn(&self) -> Option<String> {
        self.first_identity(ARN_KEYS)
    }

    /// The first usable id value.
    pub fn resource_id(&self) -> Option<String> {
        self.first_identity(ID_KEYS)
    }

    /// Convert to a plain JSON value (used for hashing and set checks).
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.str_field(k))
    }

    fn first_identity(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| match self.0.get(*k) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}

impl From<Map<String, Value>> for ResourceRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for ResourceRecord {
    type Error = DeltaError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DeltaError::validation(format!(
                "resource record must be a mapping, got {}",
                value_kind(&other)
            ))),
        }
    }
}

/// Short name of a value's shape, used in descriptions and errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// True for `Null | Bool | Number | String`.
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
