//! Helius enhanced-transaction wire format
//!
//! Records are decoded one at a time so that a single malformed entry is
//! skipped instead of failing the whole batch.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::analysis::types::{
    has_calendar_time, NativeTransfer, RawTransaction, SkippedRecord, TokenTransfer,
    TransactionBatch, TxStatus,
};
use crate::error::{Error, Result};

const UNKNOWN_CATEGORY: &str = "UNKNOWN";

// Every field is optional on the wire; presence is checked while decoding

#[derive(Debug, Clone, Deserialize)]
pub struct HeliusTransaction {
    pub signature: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Option<String>,
    pub timestamp: Option<i64>,
    pub fee: Option<u64>,
    #[serde(rename = "transactionError")]
    pub transaction_error: Option<Value>,
    #[serde(rename = "nativeTransfers", default)]
    pub native_transfers: Option<Vec<HeliusNativeTransfer>>,
    #[serde(rename = "tokenTransfers", default)]
    pub token_transfers: Option<Vec<HeliusTokenTransfer>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeliusNativeTransfer {
    #[serde(rename = "fromUserAccount")]
    pub from_user_account: Option<String>,
    #[serde(rename = "toUserAccount")]
    pub to_user_account: Option<String>,
    pub amount: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeliusTokenTransfer {
    #[serde(rename = "fromUserAccount")]
    pub from_user_account: Option<String>,
    #[serde(rename = "toUserAccount")]
    pub to_user_account: Option<String>,
    pub mint: Option<String>,
    #[serde(rename = "tokenAmount")]
    pub token_amount: Option<f64>,
}

fn malformed(index: usize, reason: impl Into<String>) -> Error {
    Error::MalformedRecord {
        index,
        reason: reason.into(),
    }
}

fn status_from(error: Option<Value>) -> TxStatus {
    match error {
        None | Some(Value::Null) => TxStatus::Success,
        Some(Value::String(reason)) => TxStatus::Failed { reason },
        Some(other) => TxStatus::Failed {
            reason: other.to_string(),
        },
    }
}

impl HeliusTransaction {
    /// Convert into the engine's input type; `index` is the record's batch position
    pub fn into_raw(self, index: usize) -> Result<RawTransaction> {
        let signature = self
            .signature
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed(index, "missing signature"))?;
        let timestamp = self
            .timestamp
            .ok_or_else(|| malformed(index, "missing timestamp"))?;
        if !has_calendar_time(timestamp) {
            return Err(malformed(
                index,
                format!("timestamp {} out of range", timestamp),
            ));
        }
        let fee = self.fee.ok_or_else(|| malformed(index, "missing fee"))?;

        let native_transfers = self
            .native_transfers
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, t)| match (t.from_user_account, t.to_user_account, t.amount) {
                (Some(from), Some(to), Some(amount)) => Ok(NativeTransfer { from, to, amount }),
                _ => Err(malformed(index, format!("incomplete native transfer #{}", i))),
            })
            .collect::<Result<Vec<_>>>()?;

        // Mint and burn legs can lack an account; only that leg is dropped
        let token_transfers = self
            .token_transfers
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(i, t)| {
                match (t.from_user_account, t.to_user_account, t.token_amount) {
                    (Some(from), Some(to), Some(amount)) => Some(TokenTransfer {
                        from,
                        to,
                        amount,
                        mint: t.mint.unwrap_or_default(),
                    }),
                    _ => {
                        debug!(record = index, leg = i, "Dropped incomplete token transfer");
                        None
                    }
                }
            })
            .collect();

        Ok(RawTransaction {
            signature,
            timestamp,
            fee,
            status: status_from(self.transaction_error),
            category: self.r#type.unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            native_transfers,
            token_transfers,
        })
    }
}

/// Signature of a raw JSON record, if it carries one
fn signature_of(record: &Value) -> Option<String> {
    record
        .get("signature")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Decode one JSON record at batch position `index`
pub fn decode_record(index: usize, record: Value) -> Result<RawTransaction> {
    let tx: HeliusTransaction = serde_json::from_value(record)
        .map_err(|e| malformed(index, format!("unexpected shape: {}", e)))?;
    tx.into_raw(index)
}

/// Decode a batch, keeping every well-formed record
pub fn decode_batch(records: Vec<Value>) -> TransactionBatch {
    let mut batch = TransactionBatch::default();

    for (index, record) in records.into_iter().enumerate() {
        let signature = signature_of(&record);
        match decode_record(index, record) {
            Ok(tx) => batch.transactions.push(tx),
            Err(Error::MalformedRecord { index, reason }) => {
                batch.skipped.push(SkippedRecord {
                    index,
                    signature,
                    reason,
                });
            }
            Err(e) => batch.skipped.push(SkippedRecord {
                index,
                signature,
                reason: e.to_string(),
            }),
        }
    }

    batch
}
