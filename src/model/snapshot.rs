//! Snapshot input: one labeled state of a resource collection.

use super::ResourceRecord;
use crate::error::{DeltaError, ErrorContext, ParseErrorKind, Result};
use serde_json::Value;
use std::path::Path;

/// A resource collection as loaded from a snapshot document.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// `stateId` declared by the document, if any
    pub state_id: Option<String>,
    /// Records in document order
    pub resources: Vec<ResourceRecord>,
}

impl Snapshot {
    pub fn new(state_id: Option<String>, resources: Vec<ResourceRecord>) -> Self {
        Self {
            state_id,
            resources,
        }
    }

    /// Parse a JSON or YAML snapshot document.
    ///
    /// Accepted layouts are a bare list of records, or a mapping with a
    /// `resources` list and an optional `stateId`.
    pub fn parse_str(content: &str) -> Result<Self> {
        let trimmed = content.trim_start();
        let value: Value = if trimmed.starts_with('{') || trimmed.starts_with('[') {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        Self::from_value(value)
    }

    /// Read and parse a snapshot file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DeltaError::io(path, e))?;
        Self::parse_str(&content).with_context(|| path.display().to_string())
    }

    /// Interpret an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self::new(None, records_from(items)?)),
            Value::Object(mut map) => {
                let state_id = ["stateId", "state_id"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_str))
                    .map(str::to_string);
                match map.remove("resources") {
                    Some(Value::Array(items)) => Ok(Self::new(state_id, records_from(items)?)),
                    _ => Err(DeltaError::parse(
                        "snapshot document",
                        ParseErrorKind::UnknownLayout,
                    )),
                }
            }
            _ => Err(DeltaError::parse(
                "snapshot document",
                ParseErrorKind::UnknownLayout,
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn records_from(items: Vec<Value>) -> Result<Vec<ResourceRecord>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(ResourceRecord::new(map)),
            _ => Err(DeltaError::parse(
                "snapshot resources",
                ParseErrorKind::NotAMapping { index },
            )),
        })
        .collect()
}
