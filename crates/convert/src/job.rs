use crate::mode::{Direction, Mode};
use decompyler_tree::TreeEntry;
use std::path::{Path, PathBuf};

/// One file to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// The input file, as found on disk.
    pub source: PathBuf,
    /// The input file's path relative to the source root.
    pub relative: PathBuf,
    /// The output file; same relative position under the destination root.
    pub destination: PathBuf,
    pub direction: Direction,
}

impl ConversionJob {
    /// Turn a walked file into a job, or `None` if `mode` does not convert it.
    pub fn plan(mode: Mode, entry: TreeEntry, destination_root: &Path) -> Option<Self> {
        if !mode.accepts(&entry.relative) {
            return None;
        }
        let destination = mode.destination_for(&entry.relative, destination_root);
        Some(Self {
            source: entry.absolute,
            relative: entry.relative,
            destination,
            direction: mode.direction(),
        })
    }

    /// Directory the output is written into.
    pub fn destination_dir(&self) -> &Path {
        // Destinations are always a root joined with a non-empty relative path.
        self.destination.parent().unwrap_or(Path::new(""))
    }
}
