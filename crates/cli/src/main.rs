//! Polymath CLI — the main entry point.
//!
//! Commands:
//! - `scan`     — Discover expertise branches in the configured repository
//! - `plugins`  — List cached expertise plugins
//! - `query`    — One-shot or interactive query with loaded expertise
//! - `fragment` — Store, retrieve, search, and delete knowledge fragments
//! - `status`   — Show configuration and storage state

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "polymath",
    about = "Polymath — pluggable expertise runtime",
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
    /// Discover expertise branches in the configured repository
    Scan,

    /// List expertise plugins available in the cache
    Plugins,

    /// Query with loaded expertise (interactive unless -m is given)
    Query {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Expertise plugins to load first (cached name or bundle path)
        #[arg(short, long)]
        expertise: Vec<String>,

        /// One-off extra context appended to the assembled context
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Knowledge fragment operations
    Fragment {
        #[command(subcommand)]
        action: FragmentAction,
    },

    /// Show configuration and storage state
    Status,
}

#[derive(Subcommand)]
enum FragmentAction {
    /// Store a fragment (JSON payload)
    Store {
        plugin: String,
        /// Fragment payload as a JSON string
        data: String,
        /// Fragment id; generated when omitted
        #[arg(short, long)]
        id: Option<String>,
    },

    /// Retrieve a fragment by id
    Get { plugin: String, id: String },

    /// List every fragment in a plugin namespace
    List { plugin: String },

    /// Search fragments by substring
    Search { plugin: String, query: String },

    /// Delete a plugin's entire fragment namespace
    Delete {
        plugin: String,
        #[arg(long)]
        confirm: bool,
    },

    /// Show storage statistics for a plugin
    Stats { plugin: String },
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
        Commands::Scan => commands::scan::run()?,
        Commands::Plugins => commands::plugin::list()?,
        Commands::Query {
            message,
            expertise,
            context,
        } => commands::query::run(message, expertise, context).await?,
        Commands::Fragment { action } => match action {
            FragmentAction::Store { plugin, data, id } => {
                commands::fragment::store(&plugin, &data, id)?
            }
            FragmentAction::Get { plugin, id } => commands::fragment::get(&plugin, &id)?,
            FragmentAction::List { plugin } => commands::fragment::list(&plugin)?,
            FragmentAction::Search { plugin, query } => {
                commands::fragment::search(&plugin, &query)?
            }
            FragmentAction::Delete { plugin, confirm } => {
                commands::fragment::delete(&plugin, confirm)?
            }
            FragmentAction::Stats { plugin } => commands::fragment::stats(&plugin)?,
        },
        Commands::Status => commands::status::run()?,
    }

    Ok(())
}

/// Resolve an expertise argument: an existing path loads as a bundle,
/// anything else is treated as a cached plugin name.
pub(crate) fn expertise_target(arg: &str) -> Option<PathBuf> {
    let path = PathBuf::from(arg);
    path.exists().then_some(path)
}
