//! goreleases CLI - Command-line utility for fetching and installing Go
//! releases.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use goreleases_core::FetchConfig;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose > 0, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut config = FetchConfig::default().with_base_url(cli.base_url.as_str());
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    match &cli.command {
        Commands::List(args) => commands::list::execute(args, &config, formatter),
        Commands::Fetch(args) => {
            let show_progress = !cli.quiet && !cli.json && CliProgress::should_show();
            commands::fetch::execute(args, &config, formatter, show_progress)
        }
        Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
