//! Incremental ("smart") skipping of up-to-date outputs.

use crate::job::ConversionJob;
use crate::mode::Direction;
use decompyler_tree::fingerprint;
use std::path::Path;

/// Decide whether `job` can be skipped because its output is already there.
///
/// Never skips unless `smart` is enabled or while the destination is missing.
/// Otherwise the rule depends on the direction:
///
/// - **Decompile**: the destination existing is enough. Source text and
///   bytecode can't be compared byte-for-byte, so content is not checked.
/// - **Compile**: skip only when source and destination fingerprints are
///   equal. A fingerprint that cannot be computed counts as "different".
pub fn should_skip(job: &ConversionJob, smart: bool) -> bool {
    if !smart || !job.destination.exists() {
        return false;
    }
    match job.direction {
        Direction::Decompile => true,
        Direction::Compile => same_content(&job.source, &job.destination),
    }
}

fn same_content(source: &Path, destination: &Path) -> bool {
    match (fingerprint(source), fingerprint(destination)) {
        (Ok(a), Ok(b)) => a == b,
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!(error = %e, "Could not fingerprint file; treating as changed");
            false
        },
    }
}
