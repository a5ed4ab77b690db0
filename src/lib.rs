//! Copy-Trade Scorer Library
//!
//! Scores a Solana wallet's transaction history for copy-trading suitability.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod source;

// Re-export commonly used types
pub use analysis::{analyze, Analysis, AnalysisConfig, ScoringConfig, WalletReport};
pub use config::Config;
pub use error::{Error, Result};
