//! Resource data model.
//!
//! Records are semi-structured: a [`ResourceRecord`] is a mapping whose values
//! are [`serde_json::Value`]s (scalar, mapping or sequence). The
//! [`ResourceIndex`] keys a collection by stable identity.

mod index;
mod record;
mod snapshot;

pub use index::{resolve_identity, synthetic_identity, ResourceIndex};
pub use record::{is_scalar, value_kind, ResourceRecord, ARN_KEYS, ID_KEYS};
pub use snapshot::Snapshot;
