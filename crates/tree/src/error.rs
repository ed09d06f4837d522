//! Tree Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::{Path, PathBuf};

/// A tree error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// File or directory does not exist
    #[display("not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Directory entry could not be read while walking
    #[display("could not read directory entry: {}", _0.display())]
    Walk(#[error(not(source))] PathBuf),
    /// Path is not located under the root it was resolved against
    #[display("path escapes root: {}", _0.display())]
    OutsideRoot(#[error(not(source))] PathBuf),
    /// Any other I/O failure while reading a file
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Map a [`std::io::Error`] onto the path it happened to.
    pub(crate) fn from_io(err: &std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(path.to_path_buf()),
        }
    }

    /// The path this error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Walk(p) | Self::OutsideRoot(p) | Self::Io(p) => p,
        }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NotFound(PathBuf::from("a/b.pyc")).to_string(), "not found: a/b.pyc");
        assert_eq!(ErrorKind::Io(PathBuf::from("x")).to_string(), "I/O error: x");
    }

    #[test]
    fn error_kind_from_io() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ErrorKind::from_io(&err, Path::new("x.py")), ErrorKind::NotFound(PathBuf::from("x.py")));
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(ErrorKind::from_io(&err, Path::new("x.py")), ErrorKind::PermissionDenied(PathBuf::from("x.py")));
        let err = std::io::Error::other("boom");
        assert!(ErrorKind::from_io(&err, Path::new("x.py")).is_retryable());
    }
}
