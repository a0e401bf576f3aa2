//! Resource indexing by stable identity.
//!
//! Identity resolution order:
//! 1. an ARN-like field, if present and non-empty
//! 2. an id field
//! 3. a synthetic `service:resourceType:region:hash` key, where the hash is
//!    taken over the sorted-key serialization of the whole record
//!
//! Every record is therefore indexable. Synthetic keys only collide on a
//! genuine hash collision or for byte-identical records.

use super::ResourceRecord;
use crate::utils::{canonical_json, content_hash};
use std::collections::BTreeMap;

/// Resolve the identity of a single record.
pub fn resolve_identity(record: &ResourceRecord) -> String {
    if let Some(arn) = record.arn() {
        return arn;
    }
    if let Some(id) = record.resource_id() {
        return id;
    }
    synthetic_identity(record)
}

/// Build the synthetic identity of a record lacking a natural one.
pub fn synthetic_identity(record: &ResourceRecord) -> String {
    let hash = content_hash(canonical_json(&record.to_value()).as_bytes());
    format!(
        "{}:{}:{}:{hash:016x}",
        record.service(),
        record.resource_type(),
        record.region()
    )
}

/// Lookup table from identity to record, iterated in identity order.
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex<'a> {
    records: BTreeMap<String, &'a ResourceRecord>,
    duplicates: usize,
}

impl<'a> ResourceIndex<'a> {
    /// Index a collection. The first record wins when two share an identity.
    pub fn build(records: &'a [ResourceRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            let identity = resolve_identity(record);
            if index.records.contains_key(&identity) {
                tracing::debug!("Duplicate resource identity '{}' ignored", identity);
                index.duplicates += 1;
                continue;
            }
            index.records.insert(identity, record);
        }
        index
    }

    pub fn get(&self, identity: &str) -> Option<&'a ResourceRecord> {
        self.records.get(identity).copied()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.records.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of input records dropped because their identity was taken.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn identities(&self) -> impl Iterator<Item = &String> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &'a ResourceRecord)> {
        self.records.iter().map(|(k, v)| (k, *v))
    }
}
