mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod progress;

use std::process::ExitCode;

use clap::Parser;
use hippo_logging::hippo_error;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::initialize(cli.verbose, cli.log_file.as_deref());

    match app::run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            hippo_error!("{err:#}");
            eprintln!("[ERROR] {err:#}");
            ExitCode::FAILURE
        }
    }
}
