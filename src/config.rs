//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Re-export engine configs
pub use crate::analysis::pipeline::AnalysisConfig;
pub use crate::analysis::score::ScoringConfig;

use crate::analysis::metrics::WallClock;

/// Largest wall clock offset accepted, in minutes (18 hours)
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub helius: HeliusConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Helius API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeliusConfig {
    /// API key (defaults to HELIUS_API_KEY)
    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transactions requested per page (API maximum is 100)
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Stop paging once this many transactions were fetched
    #[serde(default = "default_max_transactions")]
    pub max_transactions: usize,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for HeliusConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            page_limit: default_page_limit(),
            max_transactions: default_max_transactions(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

// Default value functions
fn default_api_key() -> String {
    std::env::var("HELIUS_API_KEY").unwrap_or_default()
}

fn default_base_url() -> String {
    std::env::var("HELIUS_BASE_URL").unwrap_or_else(|_| "https://api.helius.xyz".into())
}

fn default_page_limit() -> u32 {
    100
}

fn default_max_transactions() -> usize {
    100
}

fn default_timeout_ms() -> u64 {
    10000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    250
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Start with defaults
            .set_default("helius.api_key", default_api_key())?
            .set_default("helius.base_url", default_base_url())?
            .set_default("helius.timeout_ms", default_timeout_ms() as i64)?
            .set_default("helius.max_retries", default_max_retries() as i64)?
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix COPYTRADE__)
            .add_source(
                config::Environment::with_prefix("COPYTRADE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.helius.page_limit == 0 {
            anyhow::bail!("helius.page_limit must be positive");
        }

        if self.helius.page_limit > 100 {
            anyhow::bail!(
                "helius.page_limit cannot exceed 100, got {}",
                self.helius.page_limit
            );
        }

        if self.analysis.recent_activity_limit == 0 {
            anyhow::bail!("analysis.recent_activity_limit must be positive");
        }

        if self.analysis.quick_trade_secs < 0 {
            anyhow::bail!("analysis.quick_trade_secs cannot be negative");
        }

        if let WallClock::Fixed(minutes) = self.analysis.wall_clock {
            if minutes.abs() > MAX_OFFSET_MINUTES {
                anyhow::bail!(
                    "analysis.wall_clock offset must be within ±18h, got {} minutes",
                    minutes
                );
            }
        }

        if !is_positive(self.scoring.profit_scale) {
            anyhow::bail!("scoring.profit_scale must be positive");
        }

        if !is_positive(self.scoring.assumed_window_days) {
            anyhow::bail!("scoring.assumed_window_days must be positive");
        }

        Ok(())
    }

    /// Get masked configuration for display (hide secrets)
    pub fn masked_display(&self) -> String {
        format!(
            r#"Configuration:
  Helius:
    base_url: {}
    api_key: {}
    page_limit: {}
    max_transactions: {}
    timeout: {}ms
    max_retries: {}
  Analysis:
    quick_trade: {}s
    recent_activity_limit: {}
    wall_clock: {:?}
    skip_failed: {}
    address_format: {:?}
  Scoring:
    profit_scale: {}
    drawdown_order: {:?}
    frequency_basis: {:?}
    assumed_window: {} days
    warn_low_profit: {}
"#,
            mask_url(&self.helius.base_url),
            if self.helius.api_key.is_empty() {
                "(not set)"
            } else {
                "***"
            },
            self.helius.page_limit,
            self.helius.max_transactions,
            self.helius.timeout_ms,
            self.helius.max_retries,
            self.analysis.quick_trade_secs,
            self.analysis.recent_activity_limit,
            self.analysis.wall_clock,
            self.analysis.skip_failed,
            self.analysis.address_format,
            self.scoring.profit_scale,
            self.scoring.drawdown_order,
            self.scoring.frequency_basis,
            self.scoring.assumed_window_days,
            self.scoring.warn_low_profit,
        )
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Mask URL for display (hide API keys in query params)
fn mask_url(url: &str) -> String {
    if let Some(idx) = url.find('?') {
        format!("{}?***", &url[..idx])
    } else {
        url.to_string()
    }
}
