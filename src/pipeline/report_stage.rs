//! Report output stage.

use crate::config::DiffConfig;
use crate::diff::DeltaReport;
use crate::reports::{create_reporter_with_options, ReportConfig, ReportMetadata};
use anyhow::Result;

use super::{auto_detect_format, should_use_color, write_output, OutputTarget};

/// Build the reporter configuration from the diff configuration.
#[must_use]
pub fn build_report_config(config: &DiffConfig) -> ReportConfig {
    ReportConfig {
        min_severity: config.output.min_severity,
        include_unchanged: config.output.include_unchanged,
        max_items: None,
        metadata: ReportMetadata {
            old_path: Some(config.paths.old.to_string_lossy().to_string()),
            new_path: Some(config.paths.new.to_string_lossy().to_string()),
            ..ReportMetadata::new()
        },
    }
}

/// Output a delta report to the configured destination.
///
/// Handles format auto-detection and writing to file or stdout.
pub fn output_report(config: &DiffConfig, report: &DeltaReport) -> Result<()> {
    let output_target = OutputTarget::from_option(config.output.file.clone());
    let effective_output = auto_detect_format(config.output.format, &output_target);
    let report_config = build_report_config(config);

    tracing::debug!("Rendering report as {}", effective_output);

    let use_color = should_use_color(config.output.no_color) && output_target.is_terminal();
    let reporter = create_reporter_with_options(effective_output, use_color);
    let rendered = reporter.generate_delta_report(report, &report_config)?;

    write_output(&rendered, &output_target, config.behavior.quiet)
}
