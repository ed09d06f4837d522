//! Path helpers.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Render a relative path with `/` separators regardless of platform.
///
/// Only normal components are kept; `.` and root/prefix components are
/// dropped. Non-UTF-8 components are converted lossily.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use decompyler_tree::to_slash;
///
/// assert_eq!(to_slash(Path::new("sub/b.txt")), "sub/b.txt");
/// assert_eq!(to_slash(Path::new("./a.txt")), "a.txt");
/// ```
#[must_use]
pub fn to_slash(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Replace the extension of a path, keeping everything else intact.
///
/// `extension` is given without a leading dot.
#[must_use]
pub fn with_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Whether `path` is `base` itself or located underneath it.
///
/// Component-wise, so `/out` is not inside `/output`.
#[must_use]
pub fn is_within(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}

/// Make `path` absolute and resolve it as far as it exists on disk.
///
/// The longest existing ancestor is canonicalized (symlinks, `.` and `..`
/// resolved) and the missing remainder is appended unchanged, so two
/// spellings of the same location compare equal even before it is created.
///
/// # Errors
/// Only if the current directory is needed and cannot be read, or `path` is empty.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return Ok(missing.iter().rev().fold(canonical, |resolved, name| resolved.join(name)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            },
            // A trailing `..` under a missing directory; nothing more to resolve.
            _ => return Ok(absolute.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a.txt", "a.txt")]
    #[case("sub/b.txt", "sub/b.txt")]
    #[case("./sub/./b.txt", "sub/b.txt")]
    #[case("deep/er/still/c.bin", "deep/er/still/c.bin")]
    fn test_to_slash(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_slash(Path::new(input)), expected);
    }

    #[cfg(windows)]
    #[test]
    fn test_to_slash_backslashes() {
        assert_eq!(to_slash(Path::new("sub\\b.txt")), "sub/b.txt");
    }

    #[rstest]
    #[case("x.pyc", "py", "x.py")]
    #[case("nested/y.pyo", "py", "nested/y.py")]
    #[case("pkg/mod.py", "pyc", "pkg/mod.pyc")]
    #[case("pkg/mod.tar.py", "pyo", "pkg/mod.tar.pyo")]
    fn test_with_extension(#[case] input: &str, #[case] extension: &str, #[case] expected: &str) {
        assert_eq!(with_extension(Path::new(input), extension), PathBuf::from(expected));
    }

    #[rstest]
    #[case("/srv/src/out", "/srv/src", true)]
    #[case("/srv/src", "/srv/src", true)]
    #[case("/srv/output", "/srv/out", false)]
    #[case("/srv/dst", "/srv/src", false)]
    fn test_is_within(#[case] path: &str, #[case] base: &str, #[case] expected: bool) {
        assert_eq!(is_within(Path::new(path), Path::new(base)), expected);
    }

    #[test]
    fn test_resolve_relative() {
        let resolved = resolve(Path::new(".")).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, fs::canonicalize(std::env::current_dir().unwrap()).unwrap());
    }

    #[test]
    fn test_resolve_spellings_agree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(resolve(&dir.path().join("src/..")).unwrap(), root);
        assert_eq!(resolve(&dir.path().join("./src/./")).unwrap(), root.join("src"));
        assert!(is_within(&resolve(&dir.path().join("src")).unwrap(), &resolve(&dir.path().join("src/..")).unwrap()));
    }

    #[test]
    fn test_resolve_missing_tail() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(resolve(&dir.path().join("out/nested")).unwrap(), root.join("out/nested"));
    }
}
