//! Copy-Trade Analysis Engine
//!
//! Turns one wallet's transaction history into a copy-trading assessment:
//! - Trade normalization (net SOL flow per transaction)
//! - Behavioral metrics (timing, fees, win ratio, time buckets)
//! - Drawdown risk over the cumulative profit curve
//! - Weighted copy-trade score with recommendations
//! - Trading style advice
//!
//! The engine is synchronous and does no I/O.

pub mod advice;
pub mod classifier;
pub mod drawdown;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod score;
pub mod types;

pub use advice::{advise, Consideration, RiskLevel, TradingAdvice, TradingStyle};
pub use classifier::{AddressFormat, SubjectAddress};
pub use drawdown::{CurvePoint, DrawdownOrder, RiskProfile};
pub use metrics::{aggregate, ActivityRow, TimeBuckets, TradingMetrics, WallClock};
pub use normalizer::{normalize, normalize_with, Trade};
pub use pipeline::{analyze, Analysis, AnalysisConfig, WalletReport};
pub use score::{CopyTradeScore, FrequencyBasis, Recommendation, ScoreComponents, ScoringConfig};
pub use types::{RawTransaction, SkippedRecord, TransactionBatch, TxStatus};
