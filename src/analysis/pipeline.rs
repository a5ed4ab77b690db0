//! End-to-end wallet analysis

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::advice::{advise, TradingAdvice};
use crate::analysis::classifier::{AddressFormat, SubjectAddress};
use crate::analysis::drawdown::{assess, profit_curve, CurvePoint, RiskProfile};
use crate::analysis::metrics::{aggregate, TradingMetrics, WallClock};
use crate::analysis::normalizer::{normalize_with, Trade};
use crate::analysis::score::{score, CopyTradeScore, ScoringConfig};
use crate::analysis::types::{has_calendar_time, SkippedRecord, TransactionBatch};
use crate::error::Result;

/// Configuration for normalization and metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Gap (seconds) below which a trade counts as quick
    #[serde(default = "default_quick_trade_secs")]
    pub quick_trade_secs: i64,

    /// Rows kept in the recent-activity table
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,

    /// Clock used for time-of-day buckets
    #[serde(default)]
    pub wall_clock: WallClock,

    /// Drop failed transactions before analysis
    #[serde(default)]
    pub skip_failed: bool,

    #[serde(default)]
    pub address_format: AddressFormat,
}

fn default_quick_trade_secs() -> i64 {
    300
}

fn default_recent_activity_limit() -> usize {
    10
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            quick_trade_secs: default_quick_trade_secs(),
            recent_activity_limit: default_recent_activity_limit(),
            wall_clock: WallClock::default(),
            skip_failed: false,
            address_format: AddressFormat::default(),
        }
    }
}

/// Full assessment of one wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletReport {
    pub address: String,
    pub trades_analyzed: usize,
    pub skipped: Vec<SkippedRecord>,
    pub metrics: TradingMetrics,
    pub risk: RiskProfile,
    pub score: CopyTradeScore,
    pub advice: TradingAdvice,
    pub profit_curve: Vec<CurvePoint>,
}

/// Outcome of analyzing a wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Analysis {
    /// Nothing left to analyze after decoding and filtering
    NoData { skipped: Vec<SkippedRecord> },
    Report(Box<WalletReport>),
}

impl Analysis {
    pub fn report(&self) -> Option<&WalletReport> {
        match self {
            Analysis::Report(report) => Some(report),
            Analysis::NoData { .. } => None,
        }
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        match self {
            Analysis::Report(report) => &report.skipped,
            Analysis::NoData { skipped } => skipped,
        }
    }
}

/// Analyze one wallet's transaction batch
///
/// The address is validated before anything else. An empty trade list is
/// reported as `Analysis::NoData` rather than an error.
pub fn analyze(
    batch: &TransactionBatch,
    address: &str,
    analysis: &AnalysisConfig,
    scoring: &ScoringConfig,
) -> Result<Analysis> {
    let subject = SubjectAddress::parse(address, analysis.address_format)?;

    let mut skipped = batch.skipped.clone();
    for (index, tx) in batch.transactions.iter().enumerate() {
        if !has_calendar_time(tx.timestamp) {
            skipped.push(SkippedRecord {
                index,
                signature: Some(tx.signature.clone()),
                reason: format!("timestamp {} out of range", tx.timestamp),
            });
        }
    }

    if !skipped.is_empty() {
        warn!(
            address = %subject,
            skipped = skipped.len(),
            "Excluded malformed records from analysis"
        );
    }

    let trades: Vec<Trade> = normalize_with(&batch.transactions, &subject, analysis)
        .into_iter()
        .filter(|t| has_calendar_time(t.timestamp))
        .collect();
    if trades.is_empty() {
        debug!(address = %subject, "No trades to analyze");
        return Ok(Analysis::NoData { skipped });
    }

    let metrics = aggregate(&trades, analysis)?;
    let risk = assess(&trades, scoring.drawdown_order);
    let score = score(&trades, &metrics, &risk, scoring);
    let advice = advise(&metrics, &score);
    let profit_curve = profit_curve(&trades);

    debug!(
        address = %subject,
        total_trades = metrics.total_trades,
        max_drawdown = risk.max_drawdown,
        score = score.total,
        "Scored wallet"
    );

    Ok(Analysis::Report(Box::new(WalletReport {
        address: subject.as_str().to_string(),
        trades_analyzed: trades.len(),
        skipped,
        metrics,
        risk,
        score,
        advice,
        profit_curve,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score::Recommendation;
    use crate::analysis::types::{NativeTransfer, RawTransaction, TxStatus};
    use crate::error::Error;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
    const OTHER: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
    const DAY: i64 = 86_400;

    fn tx(signature: &str, timestamp: i64, lamports_in: i64) -> RawTransaction {
        let transfer = if lamports_in >= 0 {
            NativeTransfer {
                from: OTHER.to_string(),
                to: WALLET.to_string(),
                amount: lamports_in as u64,
            }
        } else {
            NativeTransfer {
                from: WALLET.to_string(),
                to: OTHER.to_string(),
                amount: lamports_in.unsigned_abs(),
            }
        };
        RawTransaction {
            signature: signature.to_string(),
            timestamp,
            fee: 5_000,
            status: TxStatus::Success,
            category: "SWAP".to_string(),
            native_transfers: vec![transfer],
            token_transfers: Vec::new(),
        }
    }

    fn utc() -> AnalysisConfig {
        AnalysisConfig {
            wall_clock: WallClock::Utc,
            ..AnalysisConfig::default()
        }
    }

    fn sample_batch() -> TransactionBatch {
        TransactionBatch::from_transactions(vec![
            tx("a", 1_700_000_000, 1_000_000_000),
            tx("b", 1_700_000_000 + DAY, -3_000_000_000),
            tx("c", 1_700_000_000 + 2 * DAY, 500_000_000),
        ])
    }

    #[test]
    fn test_invalid_address_fails_first() {
        let err = analyze(&TransactionBatch::default(), "W1", &utc(), &ScoringConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[test]
    fn test_opaque_address_accepts_short_ids() {
        let config = AnalysisConfig {
            address_format: AddressFormat::Opaque,
            ..utc()
        };
        let result = analyze(&TransactionBatch::default(), "W1", &config, &ScoringConfig::default())
            .unwrap();
        assert!(matches!(result, Analysis::NoData { .. }));
    }

    #[test]
    fn test_empty_batch_is_no_data() {
        let batch = TransactionBatch {
            transactions: Vec::new(),
            skipped: vec![SkippedRecord {
                index: 0,
                signature: None,
                reason: "missing signature".to_string(),
            }],
        };
        let result = analyze(&batch, WALLET, &utc(), &ScoringConfig::default()).unwrap();
        assert!(result.report().is_none());
        assert_eq!(result.skipped().len(), 1);
    }

    #[test]
    fn test_report_contents() {
        let result = analyze(&sample_batch(), WALLET, &utc(), &ScoringConfig::default()).unwrap();
        let report = result.report().expect("report");

        assert_eq!(report.address, WALLET);
        assert_eq!(report.trades_analyzed, 3);
        assert_eq!(report.metrics.total_trades, 3);
        assert_eq!(
            report.metrics.trading_times.day_total(),
            report.metrics.total_trades
        );
        // Chronological cumulative [1, -2, -1.5]
        assert!((report.risk.max_drawdown - 3.0).abs() < 1e-9);
        assert_eq!(report.score.components.risk, 30.0);
        assert!(report
            .score
            .recommendations
            .contains(&Recommendation::RiskTooHigh));
        assert_eq!(report.profit_curve.len(), 3);
        assert!((report.profit_curve[2].cumulative_profit + 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let result = analyze(&sample_batch(), WALLET, &utc(), &ScoringConfig::default()).unwrap();
        let score = &result.report().expect("report").score;
        let c = score.components;
        for value in [c.profit, c.consistency, c.frequency, c.risk] {
            assert!((0.0..=100.0).contains(&value));
        }
        assert!(score.total <= 100);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let batch = sample_batch();
        let first = analyze(&batch, WALLET, &utc(), &ScoringConfig::default()).unwrap();
        let second = analyze(&batch, WALLET, &utc(), &ScoringConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_skip_failed_can_empty_the_batch() {
        let mut failed = tx("f", 1_700_000_000, 1_000);
        failed.status = TxStatus::Failed {
            reason: "InstructionError".to_string(),
        };
        let batch = TransactionBatch::from_transactions(vec![failed]);
        let config = AnalysisConfig {
            skip_failed: true,
            ..utc()
        };
        let result = analyze(&batch, WALLET, &config, &ScoringConfig::default()).unwrap();
        assert!(matches!(result, Analysis::NoData { .. }));
    }

    #[test]
    fn test_extreme_timestamps_are_skipped_not_fatal() {
        let config = AnalysisConfig {
            address_format: AddressFormat::Opaque,
            ..utc()
        };
        let mut far_future = tx("max", i64::MAX, 1_000);
        far_future.native_transfers[0].to = "W1".to_string();
        let mut far_past = tx("min", i64::MIN, 1_000);
        far_past.native_transfers[0].to = "W1".to_string();

        let batch = TransactionBatch::from_transactions(vec![far_future.clone(), far_past.clone()]);
        let result = analyze(&batch, "W1", &config, &ScoringConfig::default()).unwrap();
        assert!(matches!(result, Analysis::NoData { .. }));
        assert_eq!(result.skipped().len(), 2);

        let batch = TransactionBatch::from_transactions(vec![
            far_future,
            tx("ok", 1_700_000_000, 1_000),
            far_past,
        ]);
        let result = analyze(&batch, WALLET, &utc(), &ScoringConfig::default()).unwrap();
        let report = result.report().expect("report");
        assert_eq!(report.trades_analyzed, 1);
        let skipped: Vec<usize> = report.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![0, 2]);
    }

    #[test]
    fn test_report_serializes_with_outcome_tag() {
        let result = analyze(&sample_batch(), WALLET, &utc(), &ScoringConfig::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "report");
        assert_eq!(json["trades_analyzed"], 3);
    }
}
