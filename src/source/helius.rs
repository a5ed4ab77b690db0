//! Helius API client for wallet transaction history
//!
//! Pages through `/v0/addresses/{address}/transactions` with the `before`
//! cursor and retries transient failures with exponential backoff.

use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::HeliusConfig;
use crate::error::{Error, Result};
use crate::source::TransactionSource;

/// Helius API client
pub struct HeliusClient {
    client: Client,
    config: HeliusConfig,
}

impl HeliusClient {
    pub fn new(config: HeliusConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::MissingEnvVar("HELIUS_API_KEY".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// URL for one page of history
    fn page_url(&self, address: &str, limit: u32, before: Option<&str>) -> String {
        let mut url = format!(
            "{}/v0/addresses/{}/transactions?api-key={}&limit={}",
            self.config.base_url.trim_end_matches('/'),
            address,
            self.config.api_key,
            limit
        );
        if let Some(signature) = before {
            url.push_str("&before=");
            url.push_str(signature);
        }
        url
    }

    /// Page size for the next request, or `None` once enough has been collected
    fn next_limit(&self, collected: usize) -> Option<u32> {
        let remaining = self.config.max_transactions.saturating_sub(collected);
        if remaining == 0 {
            return None;
        }
        Some(remaining.min(self.config.page_limit as usize) as u32)
    }

    /// Single request for one page (no retry)
    async fn get_page_once(&self, url: &str) -> Result<Vec<Value>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::RpcTimeout(self.config.timeout_ms)
            } else {
                Error::Rpc(format!("Helius request failed: {}", e.without_url()))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse Helius response: {}", e)))
    }

    /// Fetch one page, retrying transient failures
    async fn get_page(&self, url: &str) -> Result<Vec<Value>> {
        let backoff = ExponentialBackoff {
            initial_interval: Duration::from_millis(self.config.retry_base_delay_ms),
            max_interval: Duration::from_millis(self.config.retry_base_delay_ms * 8),
            max_elapsed_time: Some(Duration::from_millis(
                self.config.timeout_ms * (self.config.max_retries as u64 + 1),
            )),
            ..Default::default()
        };

        let max_retries = self.config.max_retries;
        let mut attempts = 0u32;

        retry(backoff, || {
            attempts += 1;
            let attempt = attempts;
            async move {
                match self.get_page_once(url).await {
                    Ok(page) => Ok(page),
                    Err(e) if e.is_retryable() && attempt <= max_retries => {
                        warn!(attempt, error = %e, "Retryable Helius error");
                        Err(backoff::Error::transient(e))
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            }
        })
        .await
    }
}

/// Map a non-success HTTP status to an error
///
/// Rate limiting and server errors are retryable; other client errors are not.
fn classify_status(status: StatusCode, body: String) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Error::Rpc(format!("Helius API error {}: {}", status, body))
    } else {
        Error::Api {
            status: status.as_u16(),
            message: body,
        }
    }
}

/// Signature of the oldest record in a page, used as the next cursor
fn last_signature(page: &[Value]) -> Option<String> {
    page.last()
        .and_then(|record| record.get("signature"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl TransactionSource for HeliusClient {
    fn name(&self) -> &'static str {
        "helius"
    }

    async fn fetch(&self, address: &str) -> Result<Vec<Value>> {
        let mut records: Vec<Value> = Vec::new();
        let mut before: Option<String> = None;

        while let Some(limit) = self.next_limit(records.len()) {
            let url = self.page_url(address, limit, before.as_deref());
            let page = self.get_page(&url).await?;
            let page_len = page.len();

            debug!(address = %address, page_len, total = records.len() + page_len, "Fetched history page");

            let cursor = last_signature(&page);
            records.extend(page);

            // A short page or a page without a usable cursor ends the history
            if page_len < limit as usize {
                break;
            }
            match cursor {
                Some(signature) => before = Some(signature),
                None => break,
            }
        }

        info!(address = %address, transactions = records.len(), "Fetched wallet history");
        Ok(records)
    }
}
