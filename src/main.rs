use anyhow::Result;
use clap::Parser;
use dmswarm::cli_types::Cli;
use dmswarm::commands;
use dmswarm::logging::{self, LogLevel};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level is fixed here, before anything logs
    let level: LogLevel = cli.log_level.parse()?;
    logging::init(level);

    // Provider credentials (AWS_ACCESS_KEY_ID, DIGITALOCEAN_ACCESS_TOKEN, ...) may live in .env
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring .env file: {}", e),
    }

    commands::handle_command(cli)
}
