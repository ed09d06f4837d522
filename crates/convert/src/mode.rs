//! Conversion modes: which files a run consumes, what it produces, and how.

use crate::error::{Error, ErrorKind};
use derive_more::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const SOURCE_EXTENSION: &str = "py";
pub const BYTECODE_EXTENSIONS: [&str; 2] = ["pyc", "pyo"];

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Bytecode to source.
    #[display("decompile")]
    Decompile,
    /// Source to bytecode.
    #[display("compile")]
    Compile,
}

/// The kind of bytecode produced when compiling.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `.pyc`
    #[default]
    #[display("pyc")]
    PlainBytecode,
    /// `.pyo`, compiled with the interpreter's `-O` flag.
    #[display("pyo")]
    OptimizedBytecode,
}

impl Variant {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::PlainBytecode => "pyc",
            Self::OptimizedBytecode => "pyo",
        }
    }
}

impl FromStr for Variant {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pyc" => Ok(Self::PlainBytecode),
            "pyo" => Ok(Self::OptimizedBytecode),
            _ => exn::bail!(ErrorKind::InvalidVariant(s.to_string())),
        }
    }
}

/// A direction together with the variant it needs.
///
/// The variant only exists for compiling; decompiling accepts both kinds of
/// bytecode and always produces source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Decompile,
    Compile(Variant),
}

impl Mode {
    /// Combine a direction and variant; the variant is ignored for
    /// [`Direction::Decompile`].
    #[must_use]
    pub fn new(direction: Direction, variant: Variant) -> Self {
        match direction {
            Direction::Decompile => Self::Decompile,
            Direction::Compile => Self::Compile(variant),
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        match self {
            Self::Decompile => Direction::Decompile,
            Self::Compile(_) => Direction::Compile,
        }
    }

    /// Extensions (without the dot, exact case) of the files this mode consumes.
    #[must_use]
    pub fn input_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Decompile => &BYTECODE_EXTENSIONS,
            Self::Compile(_) => &[SOURCE_EXTENSION],
        }
    }

    /// Extension (without the dot) of the files this mode produces.
    #[must_use]
    pub fn output_extension(&self) -> &'static str {
        match self {
            Self::Decompile => SOURCE_EXTENSION,
            Self::Compile(variant) => variant.extension(),
        }
    }

    /// Whether a file should be converted in this mode, judged by extension.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.input_extensions().contains(&ext))
    }

    /// Where the output for a file at `relative` (under the source root) goes.
    ///
    /// Same relative position under `destination_root`; only the extension changes.
    #[must_use]
    pub fn destination_for(&self, relative: &Path, destination_root: &Path) -> PathBuf {
        decompyler_tree::with_extension(&destination_root.join(relative), self.output_extension())
    }
}
