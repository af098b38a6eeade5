//! ragline CLI entry point.

use clap::Parser;

use ragline::cli::{handle_error, load_config, run, Cli};
use ragline::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, json),
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err.context("Failed to initialize logging"), json),
    };

    if let Err(err) = run(cli, &config).await {
        handle_error(err, json);
    }
}
