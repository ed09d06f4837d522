use crate::error::{Error, ErrorKind, Result};
use crate::runner::Runner;
use derive_more::Display;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

// `py_compile.compile` writes the bytecode and raises (non-zero exit) on any
// syntax error because of `doraise=True`.
const COMPILE_SCRIPT: &str = "import py_compile, sys; py_compile.compile(sys.argv[1], cfile=sys.argv[2], doraise=True)";
// Python 2 returns `None` from `py_compile.compile`, so rebuild its default
// name (`<file>c`, or `<file>o` under `-O`). Python 3 returns the path it wrote.
const COMPILE_DEFAULT_SCRIPT: &str = "import py_compile, sys; \
    built = py_compile.compile(sys.argv[1], doraise=True); \
    sys.stdout.write(built or (sys.argv[1] + (__debug__ and 'c' or 'o')))";
const VERSION_SCRIPT: &str = "import sys; sys.stdout.write('%d.%d' % sys.version_info[:2])";

/// Compiles Python source files to bytecode.
pub trait Compiler {
    /// Compile `source` to plain bytecode, written exactly at `destination`.
    fn compile(&self, source: &Path, destination: &Path) -> Result<()>;

    /// Compile `source` to optimized bytecode.
    ///
    /// The compiler picks the output location itself (adjacent to the
    /// source); that path is returned so the caller can move it.
    fn compile_optimized(&self, source: &Path) -> Result<PathBuf>;
}

/// A `major.minor` Python version.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{major}.{minor}")]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for PythonVersion {
    type Err = Error;

    /// Parses `2.7`, tolerating a trailing patch component (`2.7.18`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ErrorKind::InvalidVersion(s.to_string());
        let mut parts = s.trim().split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        Ok(Self::new(major, minor))
    }
}

/// A Python interpreter used through its standard `py_compile` module.
#[derive(Debug, Clone)]
pub struct Python {
    interpreter: PathBuf,
    runner: Runner,
}

impl Python {
    /// Interpreter names searched on `PATH`, in order of preference.
    pub const CANDIDATES: [&'static str; 4] = ["python2.7", "python2", "python", "python3"];

    pub fn new(interpreter: impl Into<PathBuf>, runner: Runner) -> Self {
        Self { interpreter: interpreter.into(), runner }
    }

    /// Use the configured interpreter if given, otherwise search `PATH`.
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
                tracing::debug!(interpreter = %path.display(), "Discovered Python interpreter on PATH");
                return Ok(Self::new(path, runner));
            }
        }
        exn::bail!(ErrorKind::ToolNotFound("python".to_string()));
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Ask the interpreter which version it is.
    pub fn version(&self) -> Result<PythonVersion> {
        let mut command = Command::new(&self.interpreter);
        command.args(["-c", VERSION_SCRIPT]);
        let captured = self.runner.run(&mut command)?;
        captured.stdout.parse()
    }

    /// Fail with [`ErrorKind::UnsupportedVersion`] unless the interpreter is
    /// exactly `required` (major and minor).
    pub fn require(&self, required: PythonVersion) -> Result<PythonVersion> {
        let found = self.version()?;
        if found != required {
            exn::bail!(ErrorKind::UnsupportedVersion { found, required });
        }
        Ok(found)
    }

    fn compile_command(&self, source: &Path, destination: &Path) -> Command {
        let mut command = Command::new(&self.interpreter);
        command.args(["-c", COMPILE_SCRIPT]).arg(source).arg(destination);
        command
    }

    fn compile_optimized_command(&self, source: &Path) -> Command {
        let mut command = Command::new(&self.interpreter);
        command.args(["-O", "-c", COMPILE_DEFAULT_SCRIPT]).arg(source);
        command
    }
}

impl Compiler for Python {
    fn compile(&self, source: &Path, destination: &Path) -> Result<()> {
        self.runner.run(&mut self.compile_command(source, destination))?;
        Ok(())
    }

    fn compile_optimized(&self, source: &Path) -> Result<PathBuf> {
        let captured = self.runner.run(&mut self.compile_optimized_command(source))?;
        let built = PathBuf::from(captured.stdout.trim());
        if built.as_os_str().is_empty() || !built.is_file() {
            exn::bail!(ErrorKind::MissingArtifact(built));
        }
        Ok(built)
    }
}
