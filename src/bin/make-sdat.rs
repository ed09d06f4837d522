use decompyler::cli::{self, MakeSdat};
use decompyler::init_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: MakeSdat = match cli::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    init_logging(false);

    match decompyler_archive::pack(&args.folder, &args.archive, |name| println!("Added: {name}")) {
        Ok(summary) => {
            println!("Created: {}", summary.archive.display());
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::debug!(error = ?e, "Packing failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}
