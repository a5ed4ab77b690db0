//! Copy-Trade Scorer - rates how safely a Solana wallet can be copy-traded
//!
//! # NOTE
//! - Scores describe past behavior only. They are not a forecast.
//! - Profit is measured from native SOL flow; token positions are not valued.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

// Use the library crate
use copytrade_scorer::cli::commands;
use copytrade_scorer::config::Config;

/// Copy-Trade Scorer - wallet suitability for copy trading
#[derive(Parser)]
#[command(name = "copytrade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "copytrade.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a wallet's trading history
    Analyze {
        /// Wallet address
        address: String,

        /// Read Helius enhanced transactions from a JSON file instead of the API
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of transactions to analyze
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show current configuration (secrets masked)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr so report output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("copytrade_scorer=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Analyze {
            address,
            input,
            json,
            limit,
        } => commands::analyze(&config, &address, input.as_deref(), json, limit).await,
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
