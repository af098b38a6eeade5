//! Command-line interface

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Load configuration from `--config`, or the project hierarchy when absent
pub fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Run the parsed command
pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Chunk(args) => commands::chunk::execute(args, config, cli.json),
        Commands::Search(args) => commands::search::execute(args, config, cli.json).await,
        Commands::Ask(args) => commands::ask::execute(args, config, cli.json).await,
        Commands::Endpoint(command) => commands::endpoint::execute(command, config, cli.json).await,
    }
}

/// Print an error chain to stderr and exit non-zero
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": chain,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1);
}
