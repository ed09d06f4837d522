//! Pack a folder into an SDAT container: a plain ZIP archive whose entries
//! are all stored without compression.

pub mod error;

use crate::error::{ErrorKind, Result};
use decompyler_tree::{Walker, to_slash};
use exn::ResultExt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::FileOptions;

/// Entries at or above this size need ZIP64 extensions.
const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

/// What [`pack`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
    /// Entry names, in the order they were added.
    pub entries: Vec<String>,
    pub archive: PathBuf,
}

/// Write every regular file under `folder` into a new archive at `archive`.
///
/// Entry names are the files' paths relative to `folder`, always with `/`
/// separators. Directories get no entries of their own. If `archive` lies
/// inside `folder` it is left out of its own contents. An existing file at
/// `archive` is overwritten.
///
/// `on_entry` is called with each entry name once that entry is written.
#[instrument(skip_all, fields(folder = %folder.display(), archive = %archive.display()))]
pub fn pack(folder: &Path, archive: &Path, mut on_entry: impl FnMut(&str)) -> Result<PackSummary> {
    let folder = fs::canonicalize(folder)
        .ok()
        .filter(|path| path.is_dir())
        .ok_or_else(|| ErrorKind::Folder(folder.to_path_buf()))?;
    let create = || ErrorKind::Create(archive.to_path_buf());
    let file = File::create(archive).or_raise(create)?;
    // Only resolvable once the file exists.
    let resolved = fs::canonicalize(archive).or_raise(create)?;

    let mut writer = ZipWriter::new(BufWriter::new(file));
    let mut entries = Vec::new();
    for entry in Walker::new(&folder).exclude(&resolved) {
        let entry = entry.or_raise(|| ErrorKind::Walk)?;
        let name = to_slash(&entry.relative);
        add_entry(&mut writer, &entry.absolute, &name).or_raise(|| ErrorKind::Entry(name.clone()))?;
        tracing::debug!(entry = %name, "Added archive entry");
        on_entry(&name);
        entries.push(name);
    }
    let mut out = writer.finish().or_raise(create)?;
    out.flush().or_raise(create)?;

    tracing::info!(entries = entries.len(), "Created archive");
    Ok(PackSummary { entries, archive: archive.to_path_buf() })
}

fn add_entry<W: Write + io::Seek>(writer: &mut ZipWriter<W>, path: &Path, name: &str) -> io::Result<()> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(size >= ZIP64_THRESHOLD);
    writer.start_file(name, options)?;
    io::copy(&mut file, writer)?;
    Ok(())
}
