//! Process-wide configuration.
//!
//! Resolution order: built-in defaults, then an optional TOML file
//! (`rollcall.toml`, or the path given via `--config` / `ROLLCALL_CONFIG`),
//! then `ROLLCALL_*` environment overrides. The defaults place the data
//! files one level above the working directory, next to the dataset and
//! the external scripts.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interpreter command for the external tools. May carry leading args
    /// (e.g. "py -3.10").
    pub python_cmd: String,
    /// Directory containing the enroll/encode/recognize scripts.
    pub script_dir: PathBuf,
    /// Directory the enroll tool saves face samples into. Opaque to this
    /// program, passed through to the tools.
    pub dataset_dir: PathBuf,
    /// Feature-encoding database rebuilt by the encode tool. Opaque.
    pub encodings_path: PathBuf,
    /// Student roster file.
    pub students_path: PathBuf,
    /// Append-only attendance log.
    pub attendance_path: PathBuf,
    /// Status file written by the recognize tool.
    pub result_path: PathBuf,
    /// Similarity threshold passed to the recognize tool.
    pub threshold: f32,
    /// Sample count used when the operator accepts the enrollment default.
    pub default_samples: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python_cmd: "python3".to_string(),
            script_dir: PathBuf::from("../scripts"),
            dataset_dir: PathBuf::from("../dataset"),
            encodings_path: PathBuf::from("../scripts/encodings.pkl"),
            students_path: PathBuf::from("../students.csv"),
            attendance_path: PathBuf::from("../attendance.csv"),
            result_path: PathBuf::from("../result.json"),
            threshold: 0.35,
            default_samples: 20,
        }
    }
}

impl Config {
    /// Load configuration from the given file (or the default locations)
    /// and apply `ROLLCALL_*` environment overrides.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut cfg = match Self::config_file(file) {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn config_file(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var("ROLLCALL_CONFIG") {
            return Some(PathBuf::from(path));
        }
        let default = PathBuf::from("rollcall.toml");
        default.exists().then_some(default)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("ROLLCALL_PYTHON") {
            self.python_cmd = v;
        }
        env_path("ROLLCALL_SCRIPT_DIR", &mut self.script_dir);
        env_path("ROLLCALL_DATASET_DIR", &mut self.dataset_dir);
        env_path("ROLLCALL_ENCODINGS_PATH", &mut self.encodings_path);
        env_path("ROLLCALL_STUDENTS_PATH", &mut self.students_path);
        env_path("ROLLCALL_ATTENDANCE_PATH", &mut self.attendance_path);
        env_path("ROLLCALL_RESULT_PATH", &mut self.result_path);
        self.threshold = env_f32("ROLLCALL_THRESHOLD", self.threshold);
        self.default_samples = env_u32("ROLLCALL_DEFAULT_SAMPLES", self.default_samples);
    }

    /// Path to the enrollment (sample capture) script.
    pub fn enroll_script(&self) -> PathBuf {
        self.script_dir.join("enroll.py")
    }

    /// Path to the encoding-database rebuild script.
    pub fn encode_script(&self) -> PathBuf {
        self.script_dir.join("encode.py")
    }

    /// Path to the recognition script.
    pub fn recognize_script(&self) -> PathBuf {
        self.script_dir.join("recognize.py")
    }
}

fn env_path(key: &str, slot: &mut PathBuf) {
    if let Ok(v) = std::env::var(key) {
        *slot = PathBuf::from(v);
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.threshold, 0.35);
        assert_eq!(cfg.default_samples, 20);
        assert_eq!(cfg.students_path, PathBuf::from("../students.csv"));
    }

    #[test]
    fn test_toml_overlay_keeps_unset_defaults() {
        let raw = r#"
            python_cmd = "py -3.10"
            threshold = 0.5
            students_path = "data/students.csv"
        "#;
        let cfg: Config = toml::from_str(raw).unwrap();
        assert_eq!(cfg.python_cmd, "py -3.10");
        assert_eq!(cfg.threshold, 0.5);
        assert_eq!(cfg.students_path, PathBuf::from("data/students.csv"));
        // Unset fields keep their defaults.
        assert_eq!(cfg.default_samples, 20);
        assert_eq!(cfg.result_path, PathBuf::from("../result.json"));
    }

    #[test]
    fn test_script_paths_join_script_dir() {
        let cfg = Config {
            script_dir: PathBuf::from("/opt/rollcall/scripts"),
            ..Config::default()
        };
        assert_eq!(
            cfg.recognize_script(),
            PathBuf::from("/opt/rollcall/scripts/recognize.py")
        );
    }
}
