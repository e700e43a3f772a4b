//! Blocking invocation of the three external tools.
//!
//! Each tool is a script run through a configurable interpreter command.
//! Stdout stays inherited so the operator sees the tools' own progress
//! output (the capture tools are interactive); stderr is captured and
//! carried in the error when a tool exits non-zero. There is no timeout:
//! a hung tool blocks the caller until it exits.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },
    #[error("{tool} failed ({status}): {stderr}")]
    Failed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Runner for the external enroll / encode / recognize tools.
pub struct Gateway {
    /// Interpreter command split into program + leading args, so commands
    /// like `py -3.10` work as a single configured string.
    interpreter: Vec<String>,
    enroll_script: PathBuf,
    encode_script: PathBuf,
    recognize_script: PathBuf,
}

impl Gateway {
    pub fn new(
        interpreter_cmd: &str,
        enroll_script: PathBuf,
        encode_script: PathBuf,
        recognize_script: PathBuf,
    ) -> Self {
        Self {
            interpreter: interpreter_cmd
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            enroll_script,
            encode_script,
            recognize_script,
        }
    }

    /// Capture biometric samples for a new student identity.
    /// Positional args: id, name, sample count (decimal).
    pub fn run_enroll(&self, id: &str, name: &str, samples: u32) -> Result<(), GatewayError> {
        let samples = samples.to_string();
        self.run_tool(
            &self.enroll_script,
            &[OsStr::new(id), OsStr::new(name), OsStr::new(&samples)],
        )
    }

    /// Rebuild the feature-encoding database from the enrolled samples.
    /// Positional args: dataset dir, encodings output path.
    pub fn run_encode(&self, dataset_dir: &Path, encodings_path: &Path) -> Result<(), GatewayError> {
        self.run_tool(
            &self.encode_script,
            &[dataset_dir.as_os_str(), encodings_path.as_os_str()],
        )
    }

    /// Match a live sample against the encoding database. The tool writes
    /// its outcome to the well-known status file as a side effect.
    /// Positional args: encodings path, similarity threshold.
    pub fn run_recognize(&self, encodings_path: &Path, threshold: f32) -> Result<(), GatewayError> {
        let threshold = threshold.to_string();
        self.run_tool(
            &self.recognize_script,
            &[encodings_path.as_os_str(), OsStr::new(&threshold)],
        )
    }

    fn run_tool(&self, script: &Path, args: &[&OsStr]) -> Result<(), GatewayError> {
        let tool = script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| script.display().to_string());

        let program = self.interpreter.first().map(String::as_str).unwrap_or("python3");
        let mut cmd = Command::new(program);
        cmd.args(self.interpreter.iter().skip(1))
            .arg(script)
            .args(args)
            .stderr(Stdio::piped());

        tracing::debug!(tool = %tool, ?args, "invoking external tool");

        let child = cmd.spawn().map_err(|source| GatewayError::Spawn {
            tool: tool.clone(),
            source,
        })?;
        let output = child
            .wait_with_output()
            .map_err(|source| GatewayError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(tool = %tool, status = %output.status, "external tool failed");
            return Err(GatewayError::Failed {
                tool,
                status: output.status,
                stderr,
            });
        }

        tracing::debug!(tool = %tool, "external tool finished");
        Ok(())
    }
}
