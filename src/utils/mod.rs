//! Shared utilities.

mod hash;

pub use hash::{canonical_json, content_hash};
