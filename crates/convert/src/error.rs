//! Conversion Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Failures of the external tools are
//! kept as children in the error tree (see [`decompyler_toolchain::error`]).

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A conversion error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a conversion failure.
///
/// ### Run-level Errors
/// Raised before (or instead of) processing any file; the run cannot continue.
/// - [`ErrorKind::InvalidVariant`]
/// - [`ErrorKind::MissingTool`]
/// - [`ErrorKind::SourceRoot`]
/// - [`ErrorKind::DestinationRoot`]
///
/// ### Per-file Errors
/// Reported for a single file; the batch carries on with the next one.
/// - [`ErrorKind::Walk`]
/// - [`ErrorKind::CreateDir`]
/// - [`ErrorKind::Decompile`]
/// - [`ErrorKind::Compile`]
/// - [`ErrorKind::Relocate`]
/// - [`ErrorKind::MissingOutput`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested bytecode variant is neither `pyc` nor `pyo`.
    #[display("invalid bytecode variant `{_0}`; use pyc or pyo")]
    InvalidVariant(#[error(not(source))] String),
    /// The mode needs a tool that was not supplied for this run.
    #[display("no {_0} available for this run")]
    MissingTool(#[error(not(source))] &'static str),
    /// The source root is missing or not a directory.
    #[display("source root is not a directory: {}", _0.display())]
    SourceRoot(#[error(not(source))] PathBuf),
    /// The destination root could not be wiped or created.
    #[display("could not prepare destination root: {}", _0.display())]
    DestinationRoot(#[error(not(source))] PathBuf),
    /// An entry of the source tree could not be read.
    #[display("could not read source tree entry")]
    Walk,
    /// The destination directory for a file could not be created.
    #[display("could not create directory: {}", _0.display())]
    CreateDir(#[error(not(source))] PathBuf),
    /// The decompiler failed on a file.
    #[display("decompilation failed")]
    Decompile,
    /// The compiler failed on a file.
    #[display("compilation failed")]
    Compile,
    /// Compiled output could not be moved to its destination.
    #[display("could not move compiled output to {}", _0.display())]
    Relocate(#[error(not(source))] PathBuf),
    /// The decompiler reported success but wrote nothing where expected.
    #[display("decompiler produced no output at {}", _0.display())]
    MissingOutput(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CreateDir(_) | Self::Relocate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidVariant("pyz".to_string()).to_string(), "invalid bytecode variant `pyz`; use pyc or pyo");
        assert_eq!(ErrorKind::MissingTool("decompiler").to_string(), "no decompiler available for this run");
    }
}
