//! JSON file source for offline analysis

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::source::TransactionSource;

/// Reads a JSON array of Helius enhanced transactions from disk
///
/// The file is not filtered by address; it is assumed to hold one wallet's
/// history.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TransactionSource for JsonFileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, _address: &str) -> Result<Vec<Value>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::Io(format!("{}: {}", self.path.display(), e)))?;

        let value: Value = serde_json::from_str(&contents)?;
        match value {
            Value::Array(records) => Ok(records),
            other => Err(Error::Serialization(format!(
                "expected a JSON array of transactions, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
