//! Content fingerprints for change detection.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// Two pages per read; files are hashed from disk and never held whole in memory.
const CHUNK_SIZE: usize = 8192;

/// A BLAKE3 digest over the full byte content of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    /// Fingerprint an in-memory byte slice.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes))
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Compute the [`Fingerprint`] of a file by streaming it in bounded chunks.
///
/// # Examples
///
/// ```no_run
/// use decompyler_tree::fingerprint;
///
/// let a = fingerprint("build/module.pyc").unwrap();
/// let b = fingerprint("dist/module.pyc").unwrap();
/// println!("unchanged: {}", a == b);
/// ```
pub fn fingerprint(path: impl AsRef<Path>) -> Result<Fingerprint> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| ErrorKind::from_io(&e, path))?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes = file.read(&mut buffer).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        if bytes == 0 {
            break;
        }
        hasher.update(&buffer[..bytes]);
    }
    Ok(Fingerprint(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_identical_content_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), b"print('hello')\n").unwrap();
        fs::write(dir.path().join("b.py"), b"print('hello')\n").unwrap();
        assert_eq!(fingerprint(dir.path().join("a.py")).unwrap(), fingerprint(dir.path().join("b.py")).unwrap());
    }

    #[test]
    fn test_different_content_differs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), b"x = 1\n").unwrap();
        fs::write(dir.path().join("b.py"), b"x = 2\n").unwrap();
        assert_ne!(fingerprint(dir.path().join("a.py")).unwrap(), fingerprint(dir.path().join("b.py")).unwrap());
    }

    #[test]
    fn test_streamed_matches_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        // Spans several chunks, with a partial one at the end.
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        fs::write(dir.path().join("big.pyc"), &data).unwrap();
        assert_eq!(fingerprint(dir.path().join("big.pyc")).unwrap(), Fingerprint::of_bytes(&data));
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.py"), b"").unwrap();
        assert_eq!(fingerprint(dir.path().join("empty.py")).unwrap(), Fingerprint::of_bytes(b""));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.py");
        let err = fingerprint(&missing).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(missing));
    }

    #[test]
    fn test_display_is_hex() {
        let hex = Fingerprint::of_bytes(b"abc").to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
