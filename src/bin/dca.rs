//! `dca` command-line entry point.
//!
//! Usage:
//!
//! ```text
//! dca [--config <path>] [--token <token>] [--output-pretty] [--verbose] <command>
//! ```
//!
//! Every invocation prints exactly one JSON envelope on stdout and exits
//! non-zero when the envelope reports a failure. Diagnostics go to stderr.

use clap::Parser;
use dca::cli::{self, Cli, CliError};
use dca::{output, telemetry};
use std::io;
use std::process::ExitCode;
use tokio::runtime::Builder;

fn main() -> ExitCode {
    let args = Cli::parse();
    let pretty = args.output_pretty;
    if !telemetry::init(args.verbose) {
        tracing::debug!("tracing subscriber already installed");
    }

    let result = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
        .and_then(|runtime| runtime.block_on(cli::run(args)));

    let mut stdout = io::stdout().lock();
    let written = match &result {
        Ok(data) => output::write_success(&mut stdout, data, pretty),
        Err(err) => output::write_failure(&mut stdout, &err.to_string(), pretty),
    };
    if let Err(err) = written {
        tracing::error!(error = %err, "failed to write result envelope");
        return ExitCode::FAILURE;
    }
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
