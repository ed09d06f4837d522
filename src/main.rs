use decompyler::cli::{self, Cli};
use decompyler::{console, init_logging};
use decompyler_config::Config;
use decompyler_convert::{Batch, BatchEvent, Direction, RunOptions, Toolchain};
use decompyler_toolchain::{Python, PythonVersion, Runner, Uncompyle};
use std::fmt::{Debug, Display};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli: Cli = match cli::parse(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    init_logging(cli.verbose);
    run(&cli)
}

fn run(cli: &Cli) -> ExitCode {
    let invocation = match cli.invocation() {
        Ok(invocation) => invocation,
        Err(e) => return fail(e),
    };
    let config = match Config::load(cli.config.as_deref()).and_then(|config| config.overridden_by(cli.overrides())) {
        Ok(config) => config,
        Err(e) => return fail(e),
    };
    tracing::debug!(?config, "Resolved configuration");

    let runner = Runner::new(config.timeout());
    let decompiler;
    let compiler;
    let toolchain = match invocation.mode.direction() {
        Direction::Decompile => {
            decompiler = match Uncompyle::resolve(config.decompiler.as_deref(), runner) {
                Ok(decompiler) => decompiler,
                Err(e) => return fail(e),
            };
            tracing::info!(decompiler = %decompiler.path().display(), "Using decompiler");
            Toolchain::decompiler(&decompiler)
        },
        Direction::Compile => {
            compiler = match Python::resolve(config.python.as_deref(), runner) {
                Ok(compiler) => compiler,
                Err(e) => return fail(e),
            };
            if let Some(required) = &config.python_version {
                let checked = required.parse::<PythonVersion>().and_then(|required| compiler.require(required));
                if let Err(e) = checked {
                    return fail(e);
                }
            }
            tracing::info!(interpreter = %compiler.interpreter().display(), "Using Python interpreter");
            Toolchain::compiler(&compiler)
        },
    };

    let options = RunOptions {
        mode: invocation.mode,
        source_root: invocation.source_root,
        destination_root: invocation.destination_root,
        smart: cli.smart,
        verbose: cli.verbose,
    };
    let batch = match Batch::new(options, toolchain) {
        Ok(batch) => batch,
        Err(e) => return fail(e),
    };
    let answer = cli.wipe_answer();
    let confirm = move |question: &str| answer.unwrap_or_else(|| console::confirm(question));
    let report = |event: BatchEvent| {
        if let Some(line) = console::event_line(&event, cli.verbose) {
            println!("{line}");
        }
    };
    let summary = match batch.run(&confirm, report) {
        Ok(summary) => summary,
        Err(e) => return fail(e),
    };

    for line in console::summary_lines(invocation.mode, &summary) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

fn fail<E: Display + Debug>(err: E) -> ExitCode {
    tracing::debug!(error = ?err, "Aborting");
    eprintln!("error: {err}");
    ExitCode::FAILURE
}
