//! Student roster and attendance log, kept as plain delimited text files.
//!
//! One record per line, `id,name`. The roster is written by the external
//! enroll tool; this side only reads it. The attendance log is append-only
//! and never deduplicated.

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder name for an attendance record whose id has no roster match.
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A student known to the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
}

/// Flat-file store for the roster and the attendance log.
pub struct RecordStore {
    students_path: PathBuf,
    attendance_path: PathBuf,
}

impl RecordStore {
    pub fn new(students_path: PathBuf, attendance_path: PathBuf) -> Self {
        Self {
            students_path,
            attendance_path,
        }
    }

    /// Create both record files (and their parent directories) if missing,
    /// so later reads never fail on absence. Idempotent.
    pub fn ensure_files(&self) -> Result<(), StoreError> {
        for path in [&self.students_path, &self.attendance_path] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            if !path.exists() {
                File::create(path).map_err(|source| StoreError::Write {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "created empty record file");
            }
        }
        Ok(())
    }

    /// Load the roster. An absent file is an empty roster, not an error.
    ///
    /// Lines shorter than 2 bytes (blank lines included) are skipped, as is
    /// any line with an empty id field. Only the first two comma-separated
    /// fields are consumed; anything after the second comma is ignored.
    pub fn load_students(&self) -> Result<Vec<Student>, StoreError> {
        let file = match File::open(&self.students_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.students_path.clone(),
                    source,
                })
            }
        };

        let mut students = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| StoreError::Read {
                path: self.students_path.clone(),
                source,
            })?;
            let line = line.trim_end_matches('\r');
            if line.len() < 2 {
                continue;
            }
            let mut fields = line.splitn(3, ',');
            let id = fields.next().unwrap_or("");
            let name = fields.next().unwrap_or("");
            if id.is_empty() {
                continue;
            }
            students.push(Student {
                id: id.to_string(),
                name: name.to_string(),
            });
        }

        tracing::debug!(count = students.len(), "loaded roster");
        Ok(students)
    }

    /// Append one `id,name` attendance line. The write reaches the file
    /// before this returns; the log is never truncated or deduplicated.
    pub fn append_attendance(&self, id: &str, name: &str) -> Result<(), StoreError> {
        let map_err = |source| StoreError::Write {
            path: self.attendance_path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.attendance_path)
            .map_err(map_err)?;
        writeln!(file, "{id},{name}").map_err(map_err)?;
        file.flush().map_err(map_err)?;

        tracing::debug!(id, name, "attendance recorded");
        Ok(())
    }

    /// Verbatim lines of the attendance log, for raw display.
    pub fn attendance_lines(&self) -> Result<Vec<String>, StoreError> {
        match fs::read_to_string(&self.attendance_path) {
            Ok(raw) => Ok(raw.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(StoreError::Read {
                path: self.attendance_path.clone(),
                source,
            }),
        }
    }

    pub fn students_path(&self) -> &Path {
        &self.students_path
    }

    pub fn attendance_path(&self) -> &Path {
        &self.attendance_path
    }
}

/// Resolve a recognized id against the roster. Linear scan, first match
/// wins; ids with no roster entry resolve to [`UNKNOWN_NAME`].
pub fn resolve_name<'a>(students: &'a [Student], id: &str) -> &'a str {
    students
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.name.as_str())
        .unwrap_or(UNKNOWN_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> RecordStore {
        RecordStore::new(dir.join("students.csv"), dir.join("attendance.csv"))
    }

    #[test]
    fn test_load_students_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.load_students().unwrap().is_empty());
    }

    #[test]
    fn test_load_students_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(
            store.students_path(),
            "S001,Alice\n\n\nS002,Bob\n\nS003,Carol\n",
        )
        .unwrap();

        let students = store.load_students().unwrap();
        let ids: Vec<&str> = students.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["S001", "S002", "S003"]);
    }

    #[test]
    fn test_load_students_id_only_line_has_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.students_path(), "S001\n").unwrap();

        let students = store.load_students().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "S001");
        assert_eq!(students[0].name, "");
    }

    #[test]
    fn test_load_students_ignores_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.students_path(), "S001,Alice,2024-01-01,0.3117\n").unwrap();

        let students = store.load_students().unwrap();
        assert_eq!(
            students,
            [Student {
                id: "S001".into(),
                name: "Alice".into(),
            }]
        );
    }

    #[test]
    fn test_load_students_skips_short_and_idless_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.students_path(), "x\n,NoId\nS001,Alice\n").unwrap();

        let students = store.load_students().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "S001");
    }

    #[test]
    fn test_load_students_tolerates_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.students_path(), "S001,Alice\r\nS002,Bob\r\n").unwrap();

        let students = store.load_students().unwrap();
        assert_eq!(students[1].name, "Bob");
    }

    #[test]
    fn test_append_attendance_never_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.append_attendance("S001", "Alice").unwrap();
        store.append_attendance("S001", "Alice").unwrap();

        let lines = store.attendance_lines().unwrap();
        assert_eq!(lines, ["S001,Alice", "S001,Alice"]);
    }

    #[test]
    fn test_attendance_lines_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.attendance_lines().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_files_creates_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(
            dir.path().join("data/students.csv"),
            dir.path().join("data/attendance.csv"),
        );

        store.ensure_files().unwrap();
        assert!(store.students_path().exists());
        assert!(store.attendance_path().exists());

        // A second run must not touch existing content.
        fs::write(store.students_path(), "S001,Alice\n").unwrap();
        store.ensure_files().unwrap();
        assert_eq!(store.load_students().unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_name_first_match_wins() {
        let students = vec![
            Student {
                id: "S001".into(),
                name: "Alice".into(),
            },
            Student {
                id: "S001".into(),
                name: "Impostor".into(),
            },
        ];
        assert_eq!(resolve_name(&students, "S001"), "Alice");
    }

    #[test]
    fn test_resolve_name_unknown_fallback() {
        let students = vec![Student {
            id: "S001".into(),
            name: "Alice".into(),
        }];
        assert_eq!(resolve_name(&students, "S999"), UNKNOWN_NAME);
        assert_eq!(resolve_name(&[], "S001"), UNKNOWN_NAME);
    }
}
