//! Change computer implementations.
//!
//! This module provides the concrete `ChangeComputer` implementations
//! (presence and modification) plus the attribute and compliance differs
//! they are built from.

mod attributes;
pub mod compliance;
mod modification;
mod presence;

pub use attributes::AttributeDiffer;
pub use compliance::{compliance_state, diff_compliance, is_non_compliant, record_compliance};
pub use modification::ModificationChangeComputer;
pub use presence::PresenceChangeComputer;

use crate::diff::{ChangeCategory, ChangeSeverity, ChangeType, ResourceChange};
use crate::model::ResourceRecord;
use chrono::{DateTime, Utc};

/// A resource change carrying only the identifying fields of `record`.
pub(crate) fn base_change(
    identity: &str,
    record: &ResourceRecord,
    change_type: ChangeType,
    timestamp: DateTime<Utc>,
) -> ResourceChange {
    ResourceChange {
        identity: identity.to_string(),
        resource_id: record
            .resource_id()
            .unwrap_or_else(|| identity.to_string()),
        service: record.service().to_string(),
        resource_type: record.resource_type().to_string(),
        region: record.region().to_string(),
        change_type,
        category: ChangeCategory::Configuration,
        attribute_changes: Vec::new(),
        compliance_changes: Vec::new(),
        security_impact: None,
        network_impact: None,
        related_resources: Vec::new(),
        severity: ChangeSeverity::Info,
        timestamp,
    }
}
