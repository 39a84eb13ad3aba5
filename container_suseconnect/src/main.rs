//! `container-suseconnect` entry-point: install the log sink, run the command.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use container_suseconnect::cli::{Cli, execute};
use container_suseconnect::error::AppError;
use container_suseconnect::logging::{init_logging, log_path};

fn main() -> ExitCode {
    let Cli { log_file, command } = Cli::parse();
    let path = log_file.unwrap_or_else(log_path);
    if let Err(err) = init_logging(&path).map_err(AppError::from) {
        report_without_sink(&err);
        return err.exit_code();
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.is_logged() {
                tracing::debug!(code = err.code(), "command failed: {err}");
            } else {
                tracing::error!("{err}");
            }
            err.exit_code()
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "no log sink is installed when logging initialisation fails"
)]
fn report_without_sink(err: &AppError) {
    eprintln!("container-suseconnect: {err}");
}
