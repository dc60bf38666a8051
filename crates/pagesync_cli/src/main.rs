//! PageSync CLI
//!
//! Command-line front end for the PageSync server.
//!
//! # Commands
//!
//! - `serve` - Run the WebSocket sync server
//! - `digest` - Print the digest of an id sequence

mod commands;

use clap::{Parser, Subcommand};
use commands::serve::ServeArgs;
use pagesync_core::{DigestAlgorithm, ItemId};
use tracing_subscriber::EnvFilter;

/// PageSync server and debugging tools.
#[derive(Parser)]
#[command(name = "pagesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the WebSocket sync server
    Serve(ServeArgs),

    /// Print the digest of an id sequence, as a viewer would compute it
    Digest {
        /// Hash algorithm (sha1, sha256)
        #[arg(short, long, default_value = "sha1")]
        digest: DigestAlgorithm,

        /// Ids in viewer order
        ids: Vec<ItemId>,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Digest { digest, ids } => commands::digest::run(digest, &ids),
        Commands::Version => {
            println!("PageSync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
