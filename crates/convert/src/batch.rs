use crate::error::{Error, ErrorKind, Result};
use crate::execute::{Executor, Toolchain};
use crate::guard::should_skip;
use crate::job::ConversionJob;
use crate::mode::{Direction, Mode};
use decompyler_tree::{Walker, is_within, resolve};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Everything a run needs to know, fixed for its whole duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: Mode,
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    /// Skip outputs that are already up to date (see [`should_skip`]).
    pub smart: bool,
    /// Log both source and destination for every converted file.
    pub verbose: bool,
}

/// Tally of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: u64,
    pub skipped: u64,
    pub failed: u64,
    pub destination_root: PathBuf,
}

impl RunSummary {
    fn new(destination_root: PathBuf) -> Self {
        Self { converted: 0, skipped: 0, failed: 0, destination_root }
    }

    /// Files successfully converted.
    pub fn processed(&self) -> u64 {
        self.converted
    }

    /// Returns `true` if no file failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Progress reported while a [`Batch`] runs, one event per file (plus
/// [`Wiped`](Self::Wiped) at most once, before any file).
pub enum BatchEvent {
    /// The existing destination root was deleted after confirmation.
    Wiped(PathBuf),
    Converted(ConversionJob),
    /// The output was judged up to date.
    Skipped(ConversionJob),
    /// Converting (or even reading) the file at `source` failed. The run
    /// carries on regardless.
    Failed { source: PathBuf, error: Error },
}

/// Answers yes/no questions before destructive steps.
///
/// Implemented for any `Fn(&str) -> bool`, so callers can pass an
/// interactive prompt or a fixed answer as a closure.
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, question: &str) -> bool {
        self(question)
    }
}

/// A configured conversion run: walk, filter, guard, execute, tally.
pub struct Batch<'a> {
    options: RunOptions,
    executor: Executor<'a>,
}

impl<'a> Batch<'a> {
    /// Prepare a run. Fails before any file is touched if `toolchain` can't
    /// serve the requested mode.
    ///
    /// Both roots are resolved to absolute paths here, so every later
    /// containment check and every job path is independent of how the roots
    /// were spelled (`.`, `..`, symlinks, relative to the working directory).
    pub fn new(mut options: RunOptions, toolchain: Toolchain<'a>) -> Result<Self> {
        let executor = Executor::new(options.mode, toolchain, options.verbose)?;
        options.source_root =
            resolve(&options.source_root).or_raise(|| ErrorKind::SourceRoot(options.source_root.clone()))?;
        options.destination_root = resolve(&options.destination_root)
            .or_raise(|| ErrorKind::DestinationRoot(options.destination_root.clone()))?;
        Ok(Self { options, executor })
    }

    /// Convert every matching file under the source root.
    ///
    /// Files are processed one at a time, to completion, in walk order.
    /// Per-file failures are reported through `report` as
    /// [`BatchEvent::Failed`] and counted; only problems with the roots
    /// themselves end the run early.
    ///
    /// When decompiling into an existing, non-empty destination root,
    /// `confirm` decides whether it is wiped first. Declining merges the new
    /// output into the existing contents.
    #[instrument(skip_all, fields(
        mode = %self.options.mode.direction(),
        source_root = %self.options.source_root.display(),
        destination_root = %self.options.destination_root.display(),
    ))]
    pub fn run(&self, confirm: &dyn Confirm, mut report: impl FnMut(BatchEvent)) -> Result<RunSummary> {
        let RunOptions { mode, source_root, destination_root, smart, .. } = &self.options;
        if !source_root.is_dir() {
            exn::bail!(ErrorKind::SourceRoot(source_root.clone()));
        }
        if mode.direction() == Direction::Decompile && self.wipe_destination(confirm)? {
            report(BatchEvent::Wiped(destination_root.clone()));
        }
        fs::create_dir_all(destination_root).or_raise(|| ErrorKind::DestinationRoot(destination_root.clone()))?;

        let mut walker = Walker::new(source_root);
        // Never feed our own output back in as input.
        if destination_root != source_root && is_within(destination_root, source_root) {
            walker = walker.exclude(destination_root);
        }

        let mut summary = RunSummary::new(destination_root.clone());
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let source = e.path().to_path_buf();
                    tracing::warn!(source = %source.display(), error = %e, "Could not read source tree entry");
                    summary.failed += 1;
                    report(BatchEvent::Failed { source, error: e.raise(ErrorKind::Walk) });
                    continue;
                },
            };
            let Some(job) = ConversionJob::plan(*mode, entry, destination_root) else {
                continue;
            };
            if should_skip(&job, *smart) {
                tracing::debug!(source = %job.source.display(), "Output up to date; skipping");
                summary.skipped += 1;
                report(BatchEvent::Skipped(job));
                continue;
            }
            match self.executor.execute(&job) {
                Ok(()) => {
                    summary.converted += 1;
                    report(BatchEvent::Converted(job));
                },
                Err(error) => {
                    tracing::warn!(source = %job.source.display(), error = ?error, "Conversion failed");
                    summary.failed += 1;
                    report(BatchEvent::Failed { source: job.source, error });
                },
            }
        }

        tracing::info!(
            converted = summary.converted,
            skipped = summary.skipped,
            failed = summary.failed,
            "Batch complete"
        );
        Ok(summary)
    }

    /// Ask to delete an existing, non-empty destination root. Returns `true`
    /// if it was deleted.
    fn wipe_destination(&self, confirm: &dyn Confirm) -> Result<bool> {
        let RunOptions { source_root, destination_root, .. } = &self.options;
        let raise = || ErrorKind::DestinationRoot(destination_root.clone());
        if !destination_root.exists() {
            return Ok(false);
        }
        if !destination_root.is_dir() {
            exn::bail!(raise());
        }
        if is_empty_dir(destination_root).or_raise(raise)? {
            return Ok(false);
        }
        if is_within(source_root, destination_root) {
            tracing::warn!(
                destination_root = %destination_root.display(),
                "Destination contains the source tree; refusing to offer a wipe"
            );
            return Ok(false);
        }
        if !confirm.confirm(&format!("Output folder {} exists. Wipe it first?", destination_root.display())) {
            tracing::debug!("Wipe declined; merging into existing output");
            return Ok(false);
        }
        fs::remove_dir_all(destination_root).or_raise(raise)?;
        tracing::info!(destination_root = %destination_root.display(), "Wiped destination root");
        Ok(true)
    }
}

fn is_empty_dir(path: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
