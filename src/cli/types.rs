//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level command line
#[derive(Parser)]
#[command(name = "ragline")]
#[command(about = "ragline - grounded question answering over local documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (default: .ragline/config.yaml, .ragline/local.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Split a document into chunks and show them
    Chunk(ChunkArgs),

    /// Retrieve the chunks of a document nearest to a query
    Search(SearchArgs),

    /// Answer questions from one or more documents
    Ask(AskArgs),

    /// Manage the reranking endpoint
    #[command(subcommand)]
    Endpoint(EndpointCommands),
}

/// Where a document comes from and how it is labelled
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Language tag for the document(s)
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Use the offline lexical embedder instead of the configured service
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for `chunk`
#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Text file to chunk
    pub file: PathBuf,

    /// Maximum chunk size in characters (overrides config)
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Overlap between chunks in characters (overrides config)
    #[arg(short, long)]
    pub overlap: Option<usize>,
}

/// Arguments for `search`
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text file to index
    pub file: PathBuf,

    /// Query text
    pub query: String,

    /// Number of chunks to retrieve (overrides config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Reranking switches
    #[command(flatten)]
    pub reranking: RerankArgs,

    /// Document options
    #[command(flatten)]
    pub document: DocumentArgs,
}

/// Reranking switches shared by `search` and `ask`
#[derive(Args, Debug, Clone, Copy)]
pub struct RerankArgs {
    /// Rerank the retrieved candidates (also enabled by `reranker.enabled`)
    #[arg(long)]
    pub rerank: bool,

    /// Release the reranking endpoint when done
    #[arg(long)]
    pub release_endpoint: bool,
}

/// Arguments for `ask`
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Text files to index; each is answered from independently
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Question to ask; repeat to continue the same conversation
    #[arg(short, long = "question", required = true)]
    pub questions: Vec<String>,

    /// Reranking switches
    #[command(flatten)]
    pub reranking: RerankArgs,

    /// Document options
    #[command(flatten)]
    pub document: DocumentArgs,
}

/// `endpoint` subcommands
#[derive(Subcommand)]
pub enum EndpointCommands {
    /// Create the reranking endpoint if needed and wait until it serves
    Ensure {
        /// Endpoint name (overrides config)
        #[arg(short, long)]
        name: Option<String>,

        /// Model to serve (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Instance type (overrides config)
        #[arg(short, long)]
        instance_type: Option<String>,
    },

    /// Tear the reranking endpoint down
    Release {
        /// Endpoint name (overrides config)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show the reranking endpoint's status
    Status {
        /// Endpoint name (overrides config)
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_repeated_questions() {
        let cli = Cli::try_parse_from([
            "ragline", "ask", "mexico.txt", "-q", "What food?", "-q", "Where?", "--offline", "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.files.len(), 1);
                assert_eq!(args.questions, vec!["What food?", "Where?"]);
                assert!(args.document.offline);
                assert_eq!(args.document.language, "en");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_release_without_rerank_flag() {
        // Reranking may be switched on from config instead of the flag.
        let cli = Cli::try_parse_from([
            "ragline", "ask", "doc.txt", "-q", "q", "--release-endpoint",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask(args) => {
                assert!(!args.reranking.rerank);
                assert!(args.reranking.release_endpoint);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_search_accepts_release_endpoint() {
        let cli = Cli::try_parse_from([
            "ragline", "search", "doc.txt", "tacos", "--rerank", "--release-endpoint",
        ])
        .unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert!(args.reranking.rerank);
                assert!(args.reranking.release_endpoint);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["ragline", "search", "doc.txt", "tacos", "-k", "2"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.top_k, Some(2));
                assert_eq!(args.query, "tacos");
            }
            _ => panic!("expected search"),
        }
    }
}
