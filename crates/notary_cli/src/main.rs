//! NotaryDB CLI
//!
//! Command-line tools for NotaryDB store management.
//!
//! # Commands
//!
//! - `init` - Create a new store
//! - `info` - Display store version and size
//! - `put` - Insert an entry and queue it for anchoring
//! - `get` - Print an entry by hash
//! - `branch` - Print an entry's provenance branch

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// NotaryDB command-line store tools.
#[derive(Parser)]
#[command(name = "notarydb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new store
    Init,

    /// Display store version and size
    Info {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Insert an entry and queue it for anchoring
    Put {
        /// Chain ID (64 hex characters)
        #[arg(short, long)]
        chain: String,

        /// Entry payload
        #[arg(short, long)]
        data: String,

        /// External ID (repeatable)
        #[arg(short, long = "ext-id")]
        ext_id: Vec<String>,

        /// Entry timestamp in seconds (defaults to now)
        #[arg(short, long)]
        timestamp: Option<u64>,
    },

    /// Print an entry by hash
    Get {
        /// Entry hash (64 hex characters)
        hash: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print an entry's provenance branch
    Branch {
        /// Entry hash (64 hex characters)
        hash: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => {
            let path = cli.path.ok_or("Store path required for init")?;
            commands::init::run(&path)?;
        }
        Commands::Info { format } => {
            let path = cli.path.ok_or("Store path required for info")?;
            commands::info::run(&path, &format)?;
        }
        Commands::Put {
            chain,
            data,
            ext_id,
            timestamp,
        } => {
            let path = cli.path.ok_or("Store path required for put")?;
            commands::put::run(&path, &chain, data, ext_id, timestamp)?;
        }
        Commands::Get { hash, format } => {
            let path = cli.path.ok_or("Store path required for get")?;
            commands::get::run(&path, &hash, &format)?;
        }
        Commands::Branch { hash, format } => {
            let path = cli.path.ok_or("Store path required for branch")?;
            commands::branch::run(&path, &hash, &format)?;
        }
        Commands::Version => {
            println!("NotaryDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("NotaryDB Core v{}", notary_core::VERSION);
            println!("Schema {}", notary_core::SchemaVersion::CURRENT);
        }
    }

    Ok(())
}
