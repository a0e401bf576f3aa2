//! Trait definitions for diff computation strategies.
//!
//! Each change computer looks at the two indexed states and produces one
//! kind of change set, so the stages can be tested in isolation.

use super::ResourceChange;
use crate::model::ResourceIndex;
use chrono::{DateTime, Utc};

/// Trait for computing a specific type of change between two states.
pub trait ChangeComputer: Send + Sync {
    /// The type of changes this computer produces.
    type ChangeSet;

    /// Compute changes between the old and new indexes.
    ///
    /// `timestamp` is stamped on every emitted [`ResourceChange`].
    fn compute(
        &self,
        old: &ResourceIndex<'_>,
        new: &ResourceIndex<'_>,
        timestamp: DateTime<Utc>,
    ) -> Self::ChangeSet;

    /// Get the name of this change computer for logging/debugging.
    fn name(&self) -> &str;
}

/// Resources present in only one state, plus the identities present in both.
#[derive(Debug, Clone, Default)]
pub struct PresenceChangeSet {
    pub added: Vec<ResourceChange>,
    pub removed: Vec<ResourceChange>,
    /// Identities present in both states, sorted
    pub common: Vec<String>,
}

impl PresenceChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Resources present in both states, split by whether anything changed.
#[derive(Debug, Clone, Default)]
pub struct ModificationChangeSet {
    pub modified: Vec<ResourceChange>,
    pub unchanged: Vec<ResourceChange>,
}

impl ModificationChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modified.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.modified.len() + self.unchanged.len()
    }
}
