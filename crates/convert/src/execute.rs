use crate::error::{ErrorKind, Result};
use crate::job::ConversionJob;
use crate::mode::{Mode, Variant};
use decompyler_toolchain::{Compiler, Decompiler};
use exn::ResultExt;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use tracing::instrument;

/// Directory Python 3 writes default-named bytecode into, next to the source.
const BYTECODE_CACHE_DIR: &str = "__pycache__";

/// The external tools available to a run. Only the one the mode needs has
/// to be present.
#[derive(Clone, Copy, Default)]
pub struct Toolchain<'a> {
    pub decompiler: Option<&'a dyn Decompiler>,
    pub compiler: Option<&'a dyn Compiler>,
}

impl<'a> Toolchain<'a> {
    pub fn decompiler(decompiler: &'a dyn Decompiler) -> Self {
        Self { decompiler: Some(decompiler), compiler: None }
    }

    pub fn compiler(compiler: &'a dyn Compiler) -> Self {
        Self { decompiler: None, compiler: Some(compiler) }
    }
}

#[derive(Clone, Copy)]
enum Action<'a> {
    /// Decompiler writes into the destination *directory*, naming the file itself.
    Decompile(&'a dyn Decompiler),
    /// Compiler writes exactly at the destination path.
    Compile(&'a dyn Compiler),
    /// Compiler writes next to the source; the result is moved into place.
    CompileOptimized(&'a dyn Compiler),
}

/// Performs the single external action behind one [`ConversionJob`].
pub struct Executor<'a> {
    action: Action<'a>,
    verbose: bool,
}

impl<'a> Executor<'a> {
    /// Select the action for `mode`.
    ///
    /// # Errors
    /// [`ErrorKind::MissingTool`] if `toolchain` lacks the tool the mode needs.
    pub fn new(mode: Mode, toolchain: Toolchain<'a>, verbose: bool) -> Result<Self> {
        let action = match mode {
            Mode::Decompile => {
                Action::Decompile(toolchain.decompiler.ok_or(ErrorKind::MissingTool("decompiler"))?)
            },
            Mode::Compile(variant) => {
                let compiler = toolchain.compiler.ok_or(ErrorKind::MissingTool("compiler"))?;
                match variant {
                    Variant::PlainBytecode => Action::Compile(compiler),
                    Variant::OptimizedBytecode => Action::CompileOptimized(compiler),
                }
            },
        };
        Ok(Self { action, verbose })
    }

    /// Convert one file.
    ///
    /// Creates the destination directory first (a no-op when it already
    /// exists). Every failure is returned, never panicked, so the caller can
    /// record it and move on to the next job.
    #[instrument(skip_all, fields(source = %job.source.display()))]
    pub fn execute(&self, job: &ConversionJob) -> Result<()> {
        let out_dir = job.destination_dir();
        fs::create_dir_all(out_dir).or_raise(|| ErrorKind::CreateDir(out_dir.to_path_buf()))?;

        match self.action {
            Action::Decompile(decompiler) => {
                decompiler.decompile(&job.source, out_dir).or_raise(|| ErrorKind::Decompile)?;
                if !job.destination.is_file() {
                    exn::bail!(ErrorKind::MissingOutput(job.destination.clone()));
                }
            },
            Action::Compile(compiler) => {
                compiler.compile(&job.source, &job.destination).or_raise(|| ErrorKind::Compile)?;
            },
            Action::CompileOptimized(compiler) => {
                let built = compiler.compile_optimized(&job.source).or_raise(|| ErrorKind::Compile)?;
                relocate(&built, &job.destination)?;
                remove_cache_dir(&built);
            },
        }

        if self.verbose {
            tracing::debug!(
                source = %job.source.display(),
                destination = %job.destination.display(),
                "Converted file"
            );
        } else {
            tracing::debug!(destination = %job.destination.display(), "Converted file");
        }
        Ok(())
    }
}

/// Move `from` to `to`, replacing whatever is at `to`.
fn relocate(from: &Path, to: &Path) -> Result<()> {
    let raise = || ErrorKind::Relocate(to.to_path_buf());
    // Renaming over an existing file is an error on some platforms.
    match fs::remove_file(to) {
        Ok(()) => {},
        Err(e) if e.kind() == IoErrorKind::NotFound => {},
        Err(e) => return Err(e).or_raise(raise),
    }
    if let Err(e) = fs::rename(from, to) {
        // Rename can't cross filesystems; fall back to copying.
        tracing::debug!(error = %e, from = %from.display(), "Rename failed; copying instead");
        fs::copy(from, to).or_raise(raise)?;
        fs::remove_file(from).or_raise(raise)?;
    }
    Ok(())
}

/// Remove the bytecode cache directory `built` was written into, if moving
/// it out left that directory empty.
fn remove_cache_dir(built: &Path) {
    let Some(dir) = built.parent().filter(|dir| dir.file_name() == Some(OsStr::new(BYTECODE_CACHE_DIR))) else {
        return;
    };
    // Fails harmlessly while the directory still holds other bytecode.
    if let Err(e) = fs::remove_dir(dir) {
        tracing::debug!(error = %e, dir = %dir.display(), "Keeping bytecode cache directory");
    }
}
