//! Report generation for delta results.
//!
//! This module provides the output formats for a [`DeltaReport`]:
//! - JSON: Structured data for programmatic integration
//! - YAML: The same document for configuration-management pipelines
//! - Summary: Compact shell-friendly output

mod document;
mod json;
mod summary;
mod types;
mod yaml;

pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::{ReportConfig, ReportFormat, ReportMetadata};
pub use yaml::YamlReporter;

use crate::diff::DeltaReport;
use crate::error::{DeltaError, ReportErrorKind};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(String),

    #[error("YAML serialization error: {0}")]
    YamlError(String),
}

impl From<ReportError> for DeltaError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::IoError(e) => Self::from(e),
            ReportError::JsonError(msg) => {
                Self::report("writing JSON", ReportErrorKind::JsonSerializationError(msg))
            }
            ReportError::YamlError(msg) => {
                Self::report("writing YAML", ReportErrorKind::YamlSerializationError(msg))
            }
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report from a delta
    fn generate_delta_report(
        &self,
        report: &DeltaReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write report to a writer
    fn write_delta_report(
        &self,
        report: &DeltaReport,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let output = self.generate_delta_report(report, config)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Auto | ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Yaml => Box::new(YamlReporter::new()),
    }
}
