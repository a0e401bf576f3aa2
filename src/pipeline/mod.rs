//! Pipeline orchestration for snapshot diffs.
//!
//! This module provides the shared parse → diff → report workflow used by
//! the CLI command handlers.

mod diff_stage;
mod output;
mod parse;
mod report_stage;

pub use diff_stage::{compute_delta, resolve_state_id};
pub use output::{auto_detect_format, should_use_color, write_output, OutputTarget};
pub use parse::{parse_snapshot_with_context, ParsedSnapshot};
pub use report_stage::{build_report_config, output_report};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse a snapshot file
    #[error("Parse failed for {path}: {source}")]
    ParseFailed {
        path: String,
        source: anyhow::Error,
    },

    /// Diff computation failed
    #[error("Diff failed: {source}")]
    DiffFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or no fail flag set)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected (with `--fail-on-change`)
    pub const CHANGES_DETECTED: i32 = 1;
    /// A Critical change was detected (with `--fail-on-critical`)
    pub const CRITICAL_CHANGES: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHANGES_DETECTED, 1);
        assert_eq!(exit_codes::CRITICAL_CHANGES, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::ParseFailed {
            path: "old.json".to_string(),
            source: anyhow::anyhow!("unexpected end of input"),
        };
        assert_eq!(
            err.to_string(),
            "Parse failed for old.json: unexpected end of input"
        );
    }
}
