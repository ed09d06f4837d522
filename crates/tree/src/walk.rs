//! Recursive directory enumeration.
//!
//! Walks a root directory and yields every regular file together with its
//! path relative to that root. Enumeration is lazy and re-reads the disk on
//! every walk; nothing is cached between calls. Symbolic links are never
//! followed, so a link pointing back up the tree cannot cause a loop.

use crate::error::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file discovered under a walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path as seen on disk (the walk root joined with [`relative`](Self::relative)).
    pub absolute: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
}

/// Builder for a directory walk.
///
/// # Examples
///
/// ```no_run
/// use decompyler_tree::Walker;
///
/// for entry in Walker::new("/srv/game/scripts").exclude("/srv/game/scripts/out") {
///     let entry = entry.unwrap();
///     println!("{}", entry.relative.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    exclude: Vec<PathBuf>,
}

impl Walker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), exclude: Vec::new() }
    }

    /// Prune a path (file or whole directory) from the walk.
    ///
    /// Compared component-wise against the paths produced by the walk, so it
    /// should be expressed the same way as the root (both absolute, or both
    /// relative to the same working directory).
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude.push(path.into());
        self
    }
}

impl IntoIterator for Walker {
    type Item = Result<TreeEntry>;
    type IntoIter = Walk;

    fn into_iter(self) -> Self::IntoIter {
        let inner = WalkDir::new(&self.root).follow_links(false).into_iter();
        Walk { root: self.root, exclude: self.exclude, inner }
    }
}

/// Walk every regular file under `root`.
///
/// Shorthand for [`Walker::new(root).into_iter()`](Walker).
pub fn walk(root: impl Into<PathBuf>) -> Walk {
    Walker::new(root).into_iter()
}

/// Lazy iterator over the regular files of a tree; see [`Walker`].
///
/// Unreadable entries are yielded as `Err` items and the walk carries on
/// with the rest of the tree. A missing root yields a single
/// [`NotFound`](ErrorKind::NotFound) error.
pub struct Walk {
    root: PathBuf,
    exclude: Vec<PathBuf>,
    inner: walkdir::IntoIter,
}

impl Walk {
    fn map_error(&self, err: walkdir::Error) -> Error {
        let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
        let kind = match err.io_error() {
            Some(io) => match ErrorKind::from_io(io, &path) {
                ErrorKind::Io(p) => ErrorKind::Walk(p),
                kind => kind,
            },
            None => ErrorKind::Walk(path),
        };
        tracing::debug!(error = %err, "Failed to read directory entry");
        Error::from(kind)
    }
}

impl Iterator for Walk {
    type Item = Result<TreeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(self.map_error(err))),
            };
            if self.exclude.iter().any(|excluded| entry.path() == excluded) {
                if entry.file_type().is_dir() {
                    self.inner.skip_current_dir();
                }
                continue;
            }
            // The root itself is never an entry, even when it is a file.
            if entry.depth() == 0 || !entry.file_type().is_file() {
                continue;
            }
            let absolute = entry.into_path();
            let relative = match absolute.strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => return Some(Err(Error::from(ErrorKind::OutsideRoot(absolute)))),
            };
            return Some(Ok(TreeEntry { absolute, relative }));
        }
    }
}
