//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The folder to pack is missing or not a directory.
    #[display("not a directory: {}", _0.display())]
    Folder(#[error(not(source))] PathBuf),
    /// The archive file could not be created or finalized.
    #[display("could not write archive: {}", _0.display())]
    Create(#[error(not(source))] PathBuf),
    /// The folder could not be walked.
    #[display("could not read folder")]
    Walk,
    /// A file could not be added to the archive.
    #[display("could not add entry: {_0}")]
    Entry(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Entry(_))
    }
}
