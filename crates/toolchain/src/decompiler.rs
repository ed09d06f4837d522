use crate::error::{ErrorKind, Result};
use crate::runner::Runner;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Recovers source text from a compiled bytecode file.
pub trait Decompiler {
    /// Decompile `source` into the directory `out_dir`.
    ///
    /// The tool chooses the output file name itself, from the base name of
    /// `source` with a `.py` extension. `out_dir` must already exist.
    fn decompile(&self, source: &Path, out_dir: &Path) -> Result<()>;
}

/// An `uncompyle6`-compatible decompiler executable (`<exe> -o <dir> <file>`).
#[derive(Debug, Clone)]
pub struct Uncompyle {
    path: PathBuf,
    runner: Runner,
}

impl Uncompyle {
    /// Executable names searched on `PATH`, in order of preference.
    pub const CANDIDATES: [&'static str; 2] = ["uncompyle6", "decompyle3"];

    pub fn new(path: impl Into<PathBuf>, runner: Runner) -> Self {
        Self { path: path.into(), runner }
    }

    /// Use the configured executable if given, otherwise search `PATH`.
    ///
    /// A configured value may be a bare command name or a path; either way
    /// it must resolve to an executable file.
    pub fn resolve(configured: Option<&Path>, runner: Runner) -> Result<Self> {
        match configured {
            Some(path) => {
                let resolved =
                    which::which(path).or_raise(|| ErrorKind::ToolNotFound(path.display().to_string()))?;
                Ok(Self::new(resolved, runner))
            },
            None => Self::discover(runner),
        }
    }

    pub fn discover(runner: Runner) -> Result<Self> {
        for exe in Self::CANDIDATES {
            if let Ok(path) = which::which(exe) {
                tracing::debug!(decompiler = %path.display(), "Discovered decompiler on PATH");
                return Ok(Self::new(path, runner));
            }
        }
        exn::bail!(ErrorKind::ToolNotFound(Self::CANDIDATES.join("/")));
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn command(&self, source: &Path, out_dir: &Path) -> Command {
        let mut command = Command::new(&self.path);
        command.arg("-o").arg(out_dir).arg(source);
        command
    }
}

impl Decompiler for Uncompyle {
    fn decompile(&self, source: &Path, out_dir: &Path) -> Result<()> {
        self.runner.run(&mut self.command(source, out_dir))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_command_layout() {
        let decompiler = Uncompyle::new("/opt/uncompyle6", Runner::default());
        let command = decompiler.command(Path::new("/in/pkg/mod.pyc"), Path::new("/out/pkg"));
        assert_eq!(command.get_program(), OsStr::new("/opt/uncompyle6"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(args, [OsStr::new("-o"), OsStr::new("/out/pkg"), OsStr::new("/in/pkg/mod.pyc")]);
    }

    #[test]
    fn test_resolve_missing_configured_path() {
        let err = Uncompyle::resolve(Some(Path::new("/definitely/not/uncompyle6")), Runner::default()).unwrap_err();
        assert_eq!(*err, ErrorKind::ToolNotFound("/definitely/not/uncompyle6".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_decompile_reports_tool_failure() {
        // `false` ignores its arguments and exits 1, standing in for a broken decompiler.
        let decompiler = Uncompyle::resolve(Some(Path::new("false")), Runner::default()).unwrap();
        let err = decompiler.decompile(Path::new("x.pyc"), Path::new(".")).unwrap_err();
        assert!(matches!(*err, ErrorKind::Failed { code: 1, .. }));
    }
}
