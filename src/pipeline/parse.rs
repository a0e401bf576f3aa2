//! Snapshot loading stage.

use crate::model::{ResourceRecord, Snapshot};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A parsed snapshot together with the file it came from
#[derive(Debug, Clone)]
pub struct ParsedSnapshot {
    /// The parsed snapshot
    pub snapshot: Snapshot,
    /// Source file path
    pub path: PathBuf,
}

impl ParsedSnapshot {
    #[must_use]
    pub fn resources(&self) -> &[ResourceRecord] {
        &self.snapshot.resources
    }

    /// `stateId` declared inside the document, if any
    #[must_use]
    pub fn declared_state_id(&self) -> Option<&str> {
        self.snapshot
            .state_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// File stem, used as the state id of last resort
    #[must_use]
    pub fn file_stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// Parse a snapshot file with context for error messages
pub fn parse_snapshot_with_context(path: &Path, quiet: bool) -> Result<ParsedSnapshot> {
    if !quiet {
        tracing::info!("Parsing snapshot: {:?}", path);
    }

    let raw_content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let snapshot = Snapshot::parse_str(&raw_content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;

    if !quiet {
        tracing::info!("Parsed {} resources", snapshot.len());
    }

    Ok(ParsedSnapshot {
        snapshot,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_snapshot_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("monday.json");
        std::fs::write(&path, r#"{"stateId": "mon", "resources": [{"arn": "a"}]}"#).unwrap();

        let parsed = parse_snapshot_with_context(&path, true).unwrap();
        assert_eq!(parsed.resources().len(), 1);
        assert_eq!(parsed.declared_state_id(), Some("mon"));
        assert_eq!(parsed.file_stem(), Some("monday"));
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let err = parse_snapshot_with_context(Path::new("/nonexistent/snap.json"), true)
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/snap.json"));
    }

    #[test]
    fn test_invalid_content_error_names_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = parse_snapshot_with_context(&path, true).unwrap_err();
        assert!(err.to_string().contains("Failed to parse snapshot"));
    }
}
