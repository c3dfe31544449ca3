//! mnemon CLI - the main entry point.
//!
//! Commands:
//! - `init`     - Initialize config and data directory
//! - `append`   - Record a conversation turn
//! - `context`  - Assemble the prompt context for a query
//! - `search`   - Relevance search over the message log
//! - `log`      - Show recent conversation turns
//! - `stats`    - Show message log statistics
//! - `clear`    - Delete every recorded message
//! - `config`   - Inspect and validate configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "mnemon",
    about = "mnemon - conversational memory with a durable log and recency-weighted retrieval",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and data directory
    Init,

    /// Record a conversation turn in the message log
    Append {
        /// Speaker: user, assistant, or system
        role: String,

        /// The message text
        content: String,
    },

    /// Assemble the prompt context for a query
    Context {
        /// The upcoming user message
        query: String,

        /// Override the configured context token budget
        #[arg(short, long)]
        budget: Option<usize>,

        /// Emit the context as JSON instead of a transcript
        #[arg(long)]
        json: bool,
    },

    /// Search the message log for turns related to a query
    Search {
        query: String,

        /// Token budget for returned messages
        #[arg(short, long)]
        budget: Option<usize>,

        /// Maximum number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show the most recent conversation turns
    Log {
        /// How many turns to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show message log statistics
    Stats,

    /// Delete every message in the log
    Clear {
        /// Actually delete instead of printing a warning
        #[arg(long)]
        confirm: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the active configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Validate the configuration
    Validate,
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

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Append { role, content } => commands::append::run(&role, &content).await?,
        Commands::Context {
            query,
            budget,
            json,
        } => commands::context::run(&query, budget, json).await?,
        Commands::Search {
            query,
            budget,
            top_k,
        } => commands::search::run(&query, budget, top_k).await?,
        Commands::Log { limit } => commands::log::run(limit).await?,
        Commands::Stats => commands::stats::run().await?,
        Commands::Clear { confirm } => commands::clear::run(confirm).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
    }

    Ok(())
}
