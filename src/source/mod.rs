//! Transaction sources
//!
//! Sources deliver raw Helius enhanced-transaction records for a wallet.
//! Decoding into the engine's input type happens in `wire`, one record at a
//! time.

pub mod file;
pub mod helius;
pub mod wire;

pub use file::JsonFileSource;
pub use helius::HeliusClient;
pub use wire::{decode_batch, HeliusTransaction};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::analysis::types::TransactionBatch;
use crate::error::Result;

/// A provider of transaction history for a wallet
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// Fetch raw transaction records for `address`, most recent first
    async fn fetch(&self, address: &str) -> Result<Vec<Value>>;

    /// Fetch and decode, skipping malformed records
    ///
    /// `limit` keeps only the first records fetched, before decoding, so
    /// skipped records are always within the window.
    async fn fetch_batch(&self, address: &str, limit: Option<usize>) -> Result<TransactionBatch> {
        let mut records = self.fetch(address).await?;
        let fetched = records.len();
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        let batch = decode_batch(records);
        debug!(
            source = self.name(),
            fetched,
            decoded = batch.transactions.len(),
            skipped = batch.skipped_count(),
            "Decoded transaction batch"
        );
        Ok(batch)
    }
}
