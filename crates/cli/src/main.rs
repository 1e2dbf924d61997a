// reqbook CLI entry point.

use std::process;

use clap::Parser;
use reqbook_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_code;
mod host;
mod output;

use exit_code::ExitCode;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "reqbook", about = "Saved HTTP requests, per machine and per project")]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    let config = Config::load();

    // Logs go to stderr; stdout carries command output and session frames.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let format = OutputFormat::detect(cli.global.json);
    match commands::run(cli.global, cli.command, config) {
        Ok(()) => ExitCode::Success.into(),
        Err(error) => {
            output::print_anyhow_error(format, &error);
            ExitCode::from_error(&error).into()
        }
    }
}
