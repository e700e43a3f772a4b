//! Reader for the recognizer's status file.
//!
//! The recognize tool writes a small JSON object describing its best match.
//! Only the `id` field matters downstream; everything else is optional so
//! the tool is free to evolve its schema. The file is rewritten on every
//! recognition run, so nothing is retained past one read.

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResultError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed recognition result in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Status object written by the recognize tool.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionResult {
    /// Recognized student id. The only field the attendance flow consumes.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Read the status file left by the last recognition run.
///
/// An absent file is `Ok(None)` (no recognition happened, or the tool bailed
/// before writing); JSON that does not parse is an error the caller should
/// surface as a warning and then drop the current action.
pub fn read_result(path: &Path) -> Result<Option<RecognitionResult>, ResultError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no recognition result file");
            return Ok(None);
        }
        Err(source) => {
            return Err(ResultError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let result: RecognitionResult =
        serde_json::from_str(&raw).map_err(|source| ResultError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(id = ?result.id, distance = ?result.distance, "recognition result read");
    Ok(Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_str(dir: &tempfile::TempDir, raw: &str) -> Result<Option<RecognitionResult>, ResultError> {
        let path = dir.path().join("result.json");
        fs::write(&path, raw).unwrap();
        read_result(&path)
    }

    #[test]
    fn test_extracts_id_and_ignores_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_str(&dir, r#"{"id": "S001", "score": 0.9}"#)
            .unwrap()
            .unwrap();
        assert_eq!(result.id.as_deref(), Some("S001"));
    }

    #[test]
    fn test_full_schema_from_recognizer() {
        let dir = tempfile::tempdir().unwrap();
        let raw = r#"{
            "id": "S001",
            "name": "Alice",
            "time": "2025-11-03 09:12:44",
            "distance": 0.3117
        }"#;
        let result = read_str(&dir, raw).unwrap().unwrap();
        assert_eq!(result.id.as_deref(), Some("S001"));
        assert_eq!(result.name.as_deref(), Some("Alice"));
        assert_eq!(result.distance, Some(0.3117));
    }

    #[test]
    fn test_missing_id_key_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_str(&dir, r#"{"name": "Alice"}"#).unwrap().unwrap();
        assert!(result.id.is_none());
    }

    #[test]
    fn test_absent_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_result(&dir.path().join("result.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_str(&dir, "not json at all").unwrap_err();
        assert!(matches!(err, ResultError::Parse { .. }));
    }
}
