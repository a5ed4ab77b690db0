//! CLI command implementations

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::analysis::classifier::SubjectAddress;
use crate::analysis::pipeline::{analyze as analyze_batch, Analysis};
use crate::cli::render::TextReport;
use crate::config::Config;
use crate::error::Error;
use crate::source::{HeliusClient, JsonFileSource, TransactionSource};

/// Fetch a wallet's history and analyze it
///
/// Reads history from `input` when given, otherwise from the Helius API.
/// `limit` caps the raw records considered, before any decoding.
pub async fn run_analysis(
    config: &Config,
    address: &str,
    input: Option<&Path>,
    limit: Option<usize>,
) -> Result<Analysis> {
    // Reject a bad address before any network or disk access
    SubjectAddress::parse(address, config.analysis.address_format)?;

    let source: Box<dyn TransactionSource> = match input {
        Some(path) => {
            info!(path = %path.display(), "Reading transaction history from file");
            Box::new(JsonFileSource::new(path))
        }
        None => {
            if config.helius.api_key.is_empty() {
                return Err(Error::MissingEnvVar("HELIUS_API_KEY".to_string()).into());
            }
            let mut helius = config.helius.clone();
            if let Some(limit) = limit {
                helius.max_transactions = limit;
            }
            Box::new(HeliusClient::new(helius)?)
        }
    };

    let batch = source
        .fetch_batch(address, limit)
        .await
        .with_context(|| format!("Failed to fetch history from {}", source.name()))?;

    Ok(analyze_batch(&batch, address, &config.analysis, &config.scoring)?)
}

/// Analyze a wallet and print the report
pub async fn analyze(
    config: &Config,
    address: &str,
    input: Option<&Path>,
    json: bool,
    limit: Option<usize>,
) -> Result<()> {
    let analysis = run_analysis(config, address, input, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", TextReport::new(&analysis, address));
    }

    Ok(())
}

/// Show configuration (with secrets masked)
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}
