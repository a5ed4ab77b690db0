//! Shared data structures for the analysis engine
//!
//! `RawTransaction` is the engine's input boundary. It is produced by a
//! transaction source (see `crate::source`) and only ever borrowed here.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Lamports per SOL, the fixed minor-to-major unit divisor
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Convert a lamport amount to SOL
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL
}

/// True when `timestamp` (unix seconds) maps to a calendar time
pub fn has_calendar_time(timestamp: i64) -> bool {
    DateTime::from_timestamp(timestamp, 0).is_some()
}

/// Execution status of an on-chain transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum TxStatus {
    Success,
    Failed { reason: String },
}

impl TxStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TxStatus::Success)
    }
}

/// Native SOL movement inside a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeTransfer {
    pub from: String,
    pub to: String,
    /// Amount in lamports
    pub amount: u64,
}

/// SPL token movement inside a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub from: String,
    pub to: String,
    /// UI amount (already decimal-adjusted by the indexer)
    pub amount: f64,
    pub mint: String,
}

/// One historical transaction as supplied by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub signature: String,
    /// Block time, unix seconds
    pub timestamp: i64,
    /// Fee in lamports
    pub fee: u64,
    pub status: TxStatus,
    /// Indexer category label, e.g. `SWAP` or `TRANSFER`
    pub category: String,
    pub native_transfers: Vec<NativeTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
}

/// A wire record that was excluded from analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position of the record in the batch it was rejected from
    pub index: usize,
    pub signature: Option<String>,
    pub reason: String,
}

/// Decoded transactions plus the records that could not be decoded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionBatch {
    pub transactions: Vec<RawTransaction>,
    pub skipped: Vec<SkippedRecord>,
}

impl TransactionBatch {
    /// Batch of well-formed transactions with nothing skipped
    pub fn from_transactions(transactions: Vec<RawTransaction>) -> Self {
        Self {
            transactions,
            skipped: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
