//! `relief` command-line front end.
//!
//! # Responsibility
//! - Build runtime config from environment and flags.
//! - Open the relief database and run exactly one subcommand per process.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use commands::{execute, CliError};
use log::info;
use relief_core::{ReliefConfig, ReliefService};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let config = cli.config(ReliefConfig::from_env());
    config.start_logging().map_err(CliError::Logging)?;
    info!(
        "event=cli_start module=cli status=ok core_version={} db_path={}",
        relief_core::core_version(),
        config.db_path().display()
    );

    let mut conn = config.open_database()?;
    let mut service = ReliefService::new(&mut conn);
    execute(&cli.command, &mut service, cli.json)
}
