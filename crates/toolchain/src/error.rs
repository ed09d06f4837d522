//! Toolchain Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::python::PythonVersion;
use derive_more::{Display, Error};
use std::path::PathBuf;
use std::time::Duration;

/// A toolchain error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for toolchain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The tool is neither configured nor discoverable on `PATH`.
    #[display("{_0} not found; configure its path explicitly")]
    ToolNotFound(#[error(not(source))] String),
    /// The executable exists but could not be started.
    #[display("failed to launch {}", _0.display())]
    Spawn(#[error(not(source))] PathBuf),
    /// The process ran past the configured per-job timeout and was killed.
    #[display("timed out after {}s", _0.as_secs_f32())]
    Timeout(#[error(not(source))] Duration),
    /// The process exited with a non-zero exit code.
    #[display("exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },
    /// The process was killed by a signal (no exit code).
    #[display("terminated by signal")]
    Terminated,
    /// The tool reported success but the file it should have written is missing.
    #[display("expected output not produced: {}", _0.display())]
    MissingArtifact(#[error(not(source))] PathBuf),
    /// The interpreter is not the version this run was configured to require.
    #[display("unsupported Python {found}; Python {required} is required")]
    UnsupportedVersion { found: PythonVersion, required: PythonVersion },
    /// A version string could not be parsed as `major.minor`.
    #[display("unrecognized Python version: {_0}")]
    InvalidVersion(#[error(not(source))] String),
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Io)
    }
}
