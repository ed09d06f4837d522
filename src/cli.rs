//! Command-line grammar for both binaries.

use clap::error::ErrorKind as ClapErrorKind;
use clap::{ArgGroup, Parser};
use decompyler_config::Config;
use decompyler_convert::error::{ErrorKind, Result};
use decompyler_convert::{Direction, Mode, Variant};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

/// Bulk-convert Python bytecode trees into source and back.
#[derive(Debug, Parser)]
#[command(name = "decompyler", version, about, arg_required_else_help = true)]
#[command(group(ArgGroup::new("direction").required(true).args(["decompile", "compile"])))]
pub struct Cli {
    /// Decompile every .pyc/.pyo under SRC into .py files under DST
    #[arg(short = 'd', long, num_args = 2, value_names = ["SRC", "DST"])]
    pub decompile: Option<Vec<PathBuf>>,
    /// Compile every .py under SRC into bytecode under DST (VARIANT: pyc or pyo, default pyc)
    #[arg(short = 'c', long, num_args = 2..=3, value_names = ["SRC", "DST", "VARIANT"])]
    pub compile: Option<Vec<PathBuf>>,
    /// Log every converted file with its full source and destination paths
    #[arg(short, long)]
    pub verbose: bool,
    /// Skip files whose output is already up to date
    #[arg(short, long)]
    pub smart: bool,
    /// Wipe an existing destination before decompiling, without asking
    #[arg(long, conflicts_with_all = ["no_wipe", "compile"])]
    pub wipe: bool,
    /// Keep an existing destination and merge into it, without asking
    #[arg(long, conflicts_with = "compile")]
    pub no_wipe: bool,
    /// Configuration file (defaults to the per-user config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Decompiler executable
    #[arg(long, value_name = "PATH")]
    pub decompiler: Option<PathBuf>,
    /// Python interpreter used for compiling
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,
    /// Give up on a single file after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

/// What to convert, and where to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub mode: Mode,
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
}

impl Cli {
    /// Resolve the mode flags into a concrete [`Invocation`].
    ///
    /// # Errors
    /// [`ErrorKind::InvalidVariant`] for a compile variant other than `pyc` or `pyo`.
    pub fn invocation(&self) -> Result<Invocation> {
        let (direction, values) = match (&self.decompile, &self.compile) {
            (Some(values), _) => (Direction::Decompile, values.as_slice()),
            (None, Some(values)) => (Direction::Compile, values.as_slice()),
            (None, None) => unreachable!("argument group requires -d or -c"),
        };
        let [source_root, destination_root, rest @ ..] = values else {
            unreachable!("both modes take at least SRC and DST");
        };
        let variant = match rest.first() {
            Some(raw) => Variant::from_str(&raw.to_string_lossy())?,
            None => Variant::default(),
        };
        Ok(Invocation {
            mode: Mode::new(direction, variant),
            source_root: source_root.clone(),
            destination_root: destination_root.clone(),
        })
    }

    /// A pre-answered wipe confirmation, or `None` to ask interactively.
    pub fn wipe_answer(&self) -> Option<bool> {
        match (self.wipe, self.no_wipe) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Flags that take precedence over every other configuration source.
    pub fn overrides(&self) -> Config {
        Config {
            decompiler: self.decompiler.clone(),
            python: self.python.clone(),
            python_version: None,
            timeout: self.timeout,
        }
    }
}

/// Pack a folder into an uncompressed SDAT (ZIP) archive.
#[derive(Debug, Parser)]
#[command(name = "make-sdat", version, about)]
pub struct MakeSdat {
    /// Folder whose files are added
    pub folder: PathBuf,
    /// Archive file to create
    pub archive: PathBuf,
}

/// Parse `args` into `P`, printing help or usage as clap would.
///
/// Help and version requests (including running with no arguments at all)
/// map to success; every other parse failure maps to exit code 1.
pub fn parse<P, I, T>(args: I) -> std::result::Result<P, ExitCode>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    P::try_parse_from(args).map_err(|e| {
        let code = match e.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        };
        // Nothing sensible left to do if the terminal is gone.
        let _ = e.print();
        code
    })
}
