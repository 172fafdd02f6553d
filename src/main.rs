//! Binary entry point.

use std::process::ExitCode;

use clap::Parser as _;

use dotsync_cli::cli::Cli;
use dotsync_cli::commands;
use dotsync_cli::logging::{self, Logger};

fn main() -> ExitCode {
    // No-op outside Windows; enables VT processing for the styled output.
    let _ = enable_ansi_support::enable_ansi_support();

    let cli = Cli::parse();
    logging::init(cli.verbose);
    let log = Logger::new(cli.verbose);

    match commands::dispatch(&cli, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
