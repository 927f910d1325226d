//! kot - cat for S3
//!
//! Streams objects from S3-compatible storage to stdout, with shell
//! completion of `s3://` references.

use clap::{CommandFactory, Parser};
use clap_complete::env::CompleteEnv;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kot::commands::{self, Cli};
use kot::exit_code::ExitCode;

fn main() {
    // Answers completion requests from the shell and exits; must run before
    // any runtime exists since the completer starts its own
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let exit_code = runtime.block_on(commands::execute(cli));

    std::process::exit(exit_code.as_i32());
}

/// Initialize tracing subscriber for logging
///
/// Logs go to stderr; stdout carries object data.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
