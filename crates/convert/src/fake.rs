//! In-process stand-ins for the external tools, for tests.
//!
//! They record every invocation and write deterministic output, so tests
//! can assert both on what was called and on what ended up on disk.

use decompyler_toolchain::error::{ErrorKind, Result};
use decompyler_toolchain::{Compiler, Decompiler};
use std::cell::RefCell;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

fn should_fail(fail_on: &HashSet<OsString>, source: &Path) -> bool {
    source.file_name().is_some_and(|name| fail_on.contains(name))
}

fn failure() -> Result<()> {
    exn::bail!(ErrorKind::Failed { code: 1, stderr: "bad magic number".to_string() })
}

#[derive(Default)]
pub(crate) struct FakeDecompiler {
    fail_on: HashSet<OsString>,
    silent: bool,
    calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl FakeDecompiler {
    /// Fails (non-zero exit) for any source with one of these file names.
    pub(crate) fn failing_on(names: impl IntoIterator<Item = &'static str>) -> Self {
        Self { fail_on: names.into_iter().map(OsString::from).collect(), ..Self::default() }
    }

    /// Reports success without writing anything.
    pub(crate) fn silent() -> Self {
        Self { silent: true, ..Self::default() }
    }

    pub(crate) fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.borrow().clone()
    }
}

impl Decompiler for FakeDecompiler {
    fn decompile(&self, source: &Path, out_dir: &Path) -> Result<()> {
        self.calls.borrow_mut().push((source.to_path_buf(), out_dir.to_path_buf()));
        if should_fail(&self.fail_on, source) {
            return failure();
        }
        if !self.silent {
            let stem = source.file_stem().unwrap_or_default().to_string_lossy();
            let output = out_dir.join(format!("{stem}.py"));
            fs::write(output, format!("# decompiled from {}\n", source.display())).unwrap();
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeCompiler {
    fail_on: HashSet<OsString>,
    cached: bool,
    calls: RefCell<Vec<PathBuf>>,
}

impl FakeCompiler {
    pub(crate) fn failing_on(names: impl IntoIterator<Item = &'static str>) -> Self {
        Self { fail_on: names.into_iter().map(OsString::from).collect(), ..Self::default() }
    }

    /// Writes optimized output into a `__pycache__` directory next to the
    /// source, as Python 3 does.
    pub(crate) fn cached() -> Self {
        Self { cached: true, ..Self::default() }
    }

    pub(crate) fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }

    /// What the fake writes for a source with these contents.
    pub(crate) fn compiled(source: &[u8]) -> Vec<u8> {
        let mut output = b"\x03\xf3\r\n".to_vec();
        output.extend_from_slice(source);
        output
    }

    /// Where the fake's optimized mode leaves its output: `<source>o`.
    pub(crate) fn default_output(source: &Path) -> PathBuf {
        let mut path = source.as_os_str().to_owned();
        path.push("o");
        PathBuf::from(path)
    }
}

impl Compiler for FakeCompiler {
    fn compile(&self, source: &Path, destination: &Path) -> Result<()> {
        self.calls.borrow_mut().push(source.to_path_buf());
        if should_fail(&self.fail_on, source) {
            return failure();
        }
        fs::write(destination, Self::compiled(&fs::read(source).unwrap())).unwrap();
        Ok(())
    }

    fn compile_optimized(&self, source: &Path) -> Result<PathBuf> {
        self.calls.borrow_mut().push(source.to_path_buf());
        if should_fail(&self.fail_on, source) {
            failure()?;
        }
        let output = if self.cached {
            let cache = source.parent().unwrap().join("__pycache__");
            fs::create_dir_all(&cache).unwrap();
            let stem = source.file_stem().unwrap_or_default().to_string_lossy();
            cache.join(format!("{stem}.opt-1.pyc"))
        } else {
            Self::default_output(source)
        };
        fs::write(&output, Self::compiled(&fs::read(source).unwrap())).unwrap();
        Ok(output)
    }
}
