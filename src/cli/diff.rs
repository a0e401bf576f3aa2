//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two resource snapshots.

use crate::config::{BehaviorConfig, DiffConfig};
use crate::diff::{ChangeSeverity, DeltaReport};
use crate::pipeline::{
    compute_delta, exit_codes, output_report, parse_snapshot_with_context, PipelineError,
};
use anyhow::Result;

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: DiffConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;

    let old_parsed = parse_snapshot_with_context(&config.paths.old, quiet)?;
    let new_parsed = parse_snapshot_with_context(&config.paths.new, quiet)?;

    if !quiet {
        tracing::info!(
            "Parsed {} resources from old snapshot, {} from new snapshot",
            old_parsed.resources().len(),
            new_parsed.resources().len()
        );
    }

    let report = compute_delta(&config, &old_parsed, &new_parsed)
        .map_err(|source| PipelineError::DiffFailed { source })?;
    let exit_code = determine_exit_code(&config.behavior, &report);

    output_report(&config, &report).map_err(|source| PipelineError::ReportFailed { source })?;

    Ok(exit_code)
}

/// Determine the appropriate exit code based on the delta and config flags.
///
/// A Critical change outranks the generic changes-detected code.
#[must_use]
pub fn determine_exit_code(behavior: &BehaviorConfig, report: &DeltaReport) -> i32 {
    if behavior.fail_on_critical && report.highest_severity() == Some(ChangeSeverity::Critical) {
        return exit_codes::CRITICAL_CHANGES;
    }
    if behavior.fail_on_change && report.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}
