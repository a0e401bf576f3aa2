//! Diff computation stage.
//!
//! Builds the engine from the configuration, resolves state ids and runs
//! the diff.

use super::ParsedSnapshot;
use crate::config::DiffConfig;
use crate::diff::{DeltaEngine, DeltaReport};
use anyhow::{Context, Result};

/// Pick the state id for one side: explicit label, then the snapshot's
/// `stateId`, then the file stem.
#[must_use]
pub fn resolve_state_id(explicit: Option<&str>, snapshot: &ParsedSnapshot, fallback: &str) -> String {
    explicit
        .filter(|s| !s.trim().is_empty())
        .or_else(|| snapshot.declared_state_id())
        .or_else(|| snapshot.file_stem())
        .unwrap_or(fallback)
        .to_string()
}

/// Run the delta computation between two parsed snapshots.
pub fn compute_delta(
    config: &DiffConfig,
    old: &ParsedSnapshot,
    new: &ParsedSnapshot,
) -> Result<DeltaReport> {
    let quiet = config.behavior.quiet;

    let from_state_id = resolve_state_id(config.states.from.as_deref(), old, "old");
    let to_state_id = resolve_state_id(config.states.to.as_deref(), new, "new");

    if !quiet {
        tracing::info!("Computing delta {} → {}...", from_state_id, to_state_id);
    }

    let engine = DeltaEngine::with_config(config.engine.clone());
    let report = engine
        .diff(old.resources(), new.resources(), &from_state_id, &to_state_id)
        .context("Failed to compute delta")?;

    if !quiet {
        tracing::info!(
            "Delta complete: {} changes ({} added, {} removed, {} modified)",
            report.summary.total_changes,
            report.summary.added,
            report.summary.removed,
            report.summary.modified
        );
        if let Some(severity) = report.highest_severity() {
            tracing::info!("Highest severity: {}", severity);
        }
    }

    Ok(report)
}
