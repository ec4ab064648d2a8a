//! lexdesk CLI: the main entry point.
//!
//! Commands:
//! - `ask`: Answer a question from the case documents
//! - `rank`: Show how documents score against a query
//! - `context`: Show the context block a question would send
//! - `validate`: Check document content for upload problems
//! - `documents`: List the loaded documents
//! - `config`: Validate, show or locate the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lexdesk_config::ScoringPreset;

mod commands;

#[derive(Parser)]
#[command(
    name = "lexdesk",
    about = "lexdesk: document question answering for law firms",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file of documents (overrides the configured source)
    #[arg(short, long, global = true, value_name = "FILE")]
    documents: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question about the documents
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Scoring preset (basic or enhanced)
        #[arg(short, long)]
        preset: Option<ScoringPreset>,
    },

    /// Rank documents against a query (no network)
    Rank {
        query: String,

        #[arg(short, long)]
        preset: Option<ScoringPreset>,
    },

    /// Print the context block built for a query (no network)
    Context {
        query: String,

        #[arg(short, long)]
        preset: Option<ScoringPreset>,

        /// Maximum characters per document excerpt
        #[arg(long)]
        excerpt_limit: Option<usize>,
    },

    /// Check every document's content for upload problems
    Validate,

    /// List the loaded documents
    Documents {
        /// Only documents belonging to this case
        #[arg(long)]
        case: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate the configuration file
    Validate,
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let documents = cli.documents.as_deref();

    match cli.command {
        Commands::Ask { question, preset } => {
            commands::ask::run(&question.join(" "), preset, documents).await?
        }
        Commands::Rank { query, preset } => commands::rank::run(&query, preset, documents).await?,
        Commands::Context {
            query,
            preset,
            excerpt_limit,
        } => commands::context::run(&query, preset, excerpt_limit, documents).await?,
        Commands::Validate => commands::validate::run(documents).await?,
        Commands::Documents { case } => commands::documents::run(case.as_deref(), documents).await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
