//! Mirror a tree of Python source into bytecode, or bytecode back into
//! source, one file at a time.
//!
//! A [`Batch`] walks the source root, turns each matching file into a
//! [`ConversionJob`], consults the incremental [`should_skip`] guard and hands
//! the rest to an [`Executor`]. Failures stay scoped to the file that caused
//! them.

mod batch;
pub mod error;
mod execute;
#[cfg(test)]
mod fake;
mod guard;
mod job;
mod mode;

pub use crate::batch::{Batch, BatchEvent, Confirm, RunOptions, RunSummary};
pub use crate::execute::{Executor, Toolchain};
pub use crate::guard::should_skip;
pub use crate::job::ConversionJob;
pub use crate::mode::{BYTECODE_EXTENSIONS, Direction, Mode, SOURCE_EXTENSION, Variant};
