//! Unified error types for cloud-delta.
//!
//! The diff engine itself never fails on malformed-but-well-typed records;
//! these errors cover the call boundary (bad arguments), snapshot loading
//! and report output. Configuration problems are reported separately as
//! [`crate::config::ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cloud-delta operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DeltaError {
    /// Errors while reading a snapshot
    #[error("Failed to parse snapshot: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors at the diff call boundary
    #[error("Diff computation failed: {context}")]
    Diff {
        context: String,
        #[source]
        source: DiffErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("Resource record at position {index} is not a mapping")]
    NotAMapping { index: usize },

    #[error("Unrecognized snapshot layout - expected a list of records or an object with 'resources'")]
    UnknownLayout,
}

/// Specific diff error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DiffErrorKind {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("YAML serialization failed: {0}")]
    YamlSerializationError(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for cloud-delta operations
pub type Result<T> = std::result::Result<T, DeltaError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DeltaError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a diff error for a missing call argument
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::diff(
            "invalid call",
            DiffErrorKind::MissingArgument(name.into()),
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a diff error
    pub fn diff(context: impl Into<String>, source: DiffErrorKind) -> Self {
        Self::Diff {
            context: context.into(),
            source,
        }
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for DeltaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DeltaError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for DeltaError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(
            "YAML deserialization",
            ParseErrorKind::InvalidYaml(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained, so the final message shows the path through
/// the code: `"outer: middle: base"`.
///
/// ```
/// use cloud_delta::error::{DeltaError, ErrorContext};
/// use cloud_delta::Snapshot;
///
/// let path = "states/tuesday.json";
/// let err = Snapshot::parse_str(r#"{"stateId": "tuesday"}"#)
///     .with_context(|| format!("parsing snapshot {path}"))
///     .context("loading new state")
///     .unwrap_err();
///
/// match err {
///     DeltaError::Parse { context, .. } => {
///         assert_eq!(context, "loading new state: parsing snapshot states/tuesday.json: snapshot document");
///     }
///     other => panic!("unexpected error: {other}"),
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<DeltaError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: DeltaError, new_ctx: &str) -> DeltaError {
    match err {
        DeltaError::Parse {
            context: existing,
            source,
        } => DeltaError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DeltaError::Diff {
            context: existing,
            source,
        } => DeltaError::Diff {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DeltaError::Report {
            context: existing,
            source,
        } => DeltaError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DeltaError::Io {
            path,
            message,
            source,
        } => DeltaError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        DeltaError::Validation(msg) => DeltaError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeltaError::parse("at old.json", ParseErrorKind::UnknownLayout);
        let display = err.to_string();
        assert!(
            display.contains("snapshot") && display.contains("old.json"),
            "Error message should mention the snapshot: {}",
            display
        );

        let err = DeltaError::missing_argument("from_state_id");
        assert!(err.to_string().contains("Diff computation failed"));
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DeltaError::io("/path/to/snapshot.json", io_err);

        assert!(err.to_string().contains("/path/to/snapshot.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(DeltaError::parse("base", ParseErrorKind::UnknownLayout))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(DeltaError::Parse { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(DeltaError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_yaml_error_converts_to_parse() {
        let err: DeltaError = serde_yaml::from_str::<Vec<u8>>("{not: [valid")
            .expect_err("invalid yaml")
            .into();
        assert!(matches!(
            err,
            DeltaError::Parse {
                source: ParseErrorKind::InvalidYaml(_),
                ..
            }
        ));
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
