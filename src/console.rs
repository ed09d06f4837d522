//! User-facing terminal output. Diagnostics go through `tracing` to stderr;
//! everything here is the tool's actual report and goes to stdout.

use decompyler_convert::{BatchEvent, Direction, Mode, RunSummary};
use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdin. Anything but an explicit yes, including
/// end of input, counts as no.
pub fn confirm(question: &str) -> bool {
    let stdin = io::stdin();
    let stdout = io::stdout();
    ask(question, &mut stdin.lock(), &mut stdout.lock()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not read confirmation; assuming no");
        false
    })
}

fn ask(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// The line reported for a [`BatchEvent`]. Skipped files are only listed
/// when `verbose` is set.
pub fn event_line(event: &BatchEvent, verbose: bool) -> Option<String> {
    let line = match event {
        BatchEvent::Wiped(path) => format!("Wiped: {}", path.display()),
        BatchEvent::Converted(job) if verbose => {
            format!("[OK] {} -> {}", job.source.display(), job.destination.display())
        },
        BatchEvent::Converted(job) => format!("[OK] {}", job.destination.display()),
        BatchEvent::Skipped(job) if verbose => format!("[SKIP] {}", job.relative.display()),
        BatchEvent::Skipped(_) => return None,
        BatchEvent::Failed { source, error } => format!("[ERR] {}: {error}", source.display()),
    };
    Some(line)
}

/// The closing lines printed after a run.
pub fn summary_lines(mode: Mode, summary: &RunSummary) -> Vec<String> {
    let done = match mode.direction() {
        Direction::Decompile => format!("Done. Decompiled {} files.", summary.processed()),
        Direction::Compile => {
            format!("Done. Compiled {} .{} files.", summary.processed(), mode.output_extension())
        },
    };
    vec![
        done,
        format!("Saved to: {}", summary.destination_root.display()),
        format!("Skipped: {}, Failed: {}", summary.skipped, summary.failed),
    ]
}
