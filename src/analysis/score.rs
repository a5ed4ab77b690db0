//! Copy-Trade Score Computation
//!
//! Copy-trade score measures how safely a wallet can be mirrored. Formula:
//! - Profit (35%): average profit per trade, scaled
//! - Consistency (25%): share of profitable trades
//! - Frequency (20%): trades per day, lower is easier to follow
//! - Risk (20%): maximum drawdown of cumulative profit
//!
//! Every component is clamped to 0-100 and the weighted total is rounded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::drawdown::{DrawdownOrder, RiskProfile};
use crate::analysis::metrics::TradingMetrics;
use crate::analysis::normalizer::Trade;

pub const WEIGHT_PROFIT: f64 = 0.35;
pub const WEIGHT_CONSISTENCY: f64 = 0.25;
pub const WEIGHT_FREQUENCY: f64 = 0.20;
pub const WEIGHT_RISK: f64 = 0.20;

/// Components below this value raise a warning
const WARNING_THRESHOLD: f64 = 50.0;
const HIGHLY_SUITABLE_MIN: u8 = 80;
const MODERATELY_SUITABLE_MIN: u8 = 60;
const SECS_PER_DAY: f64 = 86_400.0;

/// How trades-per-day is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBasis {
    /// Trade count over the whole days spanned by the data (at least one)
    #[default]
    ObservedSpan,
    /// Trade count over `assumed_window_days`
    FixedWindow,
}

/// Configuration for copy-trade scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Multiplier from average SOL profit per trade to profit score
    #[serde(default = "default_profit_scale")]
    pub profit_scale: f64,

    /// Scan order for the drawdown walk
    #[serde(default)]
    pub drawdown_order: DrawdownOrder,

    #[serde(default)]
    pub frequency_basis: FrequencyBasis,

    /// History length assumed by `FrequencyBasis::FixedWindow`
    #[serde(default = "default_assumed_window_days")]
    pub assumed_window_days: f64,

    /// Add a low profit margin warning to the recommendations
    #[serde(default)]
    pub warn_low_profit: bool,
}

fn default_profit_scale() -> f64 {
    100.0
}

fn default_assumed_window_days() -> f64 {
    30.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            profit_scale: default_profit_scale(),
            drawdown_order: DrawdownOrder::default(),
            frequency_basis: FrequencyBasis::default(),
            assumed_window_days: default_assumed_window_days(),
            warn_low_profit: false,
        }
    }
}

/// Component scores, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub profit: f64,
    pub consistency: f64,
    pub frequency: f64,
    pub risk: f64,
}

impl ScoreComponents {
    /// Rounded weighted total, 0-100
    pub fn weighted_total(&self) -> u8 {
        let raw = self.profit * WEIGHT_PROFIT
            + self.consistency * WEIGHT_CONSISTENCY
            + self.frequency * WEIGHT_FREQUENCY
            + self.risk * WEIGHT_RISK;
        raw.round().clamp(0.0, 100.0) as u8
    }

    pub fn is_low_profit(&self) -> bool {
        self.profit < WARNING_THRESHOLD
    }

    pub fn is_frequency_too_high(&self) -> bool {
        self.frequency < WARNING_THRESHOLD
    }

    pub fn is_risk_too_high(&self) -> bool {
        self.risk < WARNING_THRESHOLD
    }
}

/// Suitability statements, verdict first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    HighlySuitable,
    ModeratelySuitable,
    NotRecommended,
    LowProfitMargins,
    FrequencyTooHigh,
    RiskTooHigh,
}

impl Recommendation {
    /// Primary verdict for a total score
    pub fn verdict(total: u8) -> Self {
        if total >= HIGHLY_SUITABLE_MIN {
            Recommendation::HighlySuitable
        } else if total >= MODERATELY_SUITABLE_MIN {
            Recommendation::ModeratelySuitable
        } else {
            Recommendation::NotRecommended
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Recommendation::LowProfitMargins
                | Recommendation::FrequencyTooHigh
                | Recommendation::RiskTooHigh
        )
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Recommendation::HighlySuitable => "Highly suitable for copytrading",
            Recommendation::ModeratelySuitable => "Moderately suitable for copytrading",
            Recommendation::NotRecommended => "Not recommended for copytrading",
            Recommendation::LowProfitMargins => "Low profit margins",
            Recommendation::FrequencyTooHigh => "Trading frequency too high for safe copytrading",
            Recommendation::RiskTooHigh => "Risk level may be too high",
        };
        f.write_str(text)
    }
}

/// Copy-trade suitability score for one wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopyTradeScore {
    pub total: u8,
    pub components: ScoreComponents,
    pub trades_per_day: f64,
    pub breakdown: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

/// Average trades per day under the configured basis
pub fn trades_per_day(trades: &[Trade], config: &ScoringConfig) -> f64 {
    let count = trades.len() as f64;
    match config.frequency_basis {
        FrequencyBasis::ObservedSpan => {
            let newest = trades.iter().map(|t| t.timestamp).max();
            let oldest = trades.iter().map(|t| t.timestamp).min();
            let span_secs = match (newest, oldest) {
                (Some(newest), Some(oldest)) => newest.abs_diff(oldest) as f64,
                _ => 0.0,
            };
            count / (span_secs / SECS_PER_DAY).ceil().max(1.0)
        }
        FrequencyBasis::FixedWindow => count / config.assumed_window_days,
    }
}

/// Step score for trading frequency
pub fn frequency_score(trades_per_day: f64) -> f64 {
    if trades_per_day <= 5.0 {
        100.0
    } else if trades_per_day <= 10.0 {
        80.0
    } else if trades_per_day <= 20.0 {
        50.0
    } else {
        20.0
    }
}

/// Step score for maximum drawdown (1.0 reads as 100%)
pub fn risk_score(max_drawdown: f64) -> f64 {
    if max_drawdown == 0.0 {
        100.0
    } else if max_drawdown < 0.1 {
        90.0
    } else if max_drawdown < 0.2 {
        70.0
    } else if max_drawdown < 0.3 {
        50.0
    } else {
        30.0
    }
}

/// Score a wallet from its trades, metrics and risk profile
pub fn score(
    trades: &[Trade],
    metrics: &TradingMetrics,
    risk: &RiskProfile,
    config: &ScoringConfig,
) -> CopyTradeScore {
    let per_day = trades_per_day(trades, config);
    let win_fraction = metrics.profitable_trades_ratio / 100.0;

    let components = ScoreComponents {
        profit: (metrics.average_profit * config.profit_scale).clamp(0.0, 100.0),
        consistency: (win_fraction * 100.0).clamp(0.0, 100.0),
        frequency: frequency_score(per_day),
        risk: risk_score(risk.max_drawdown),
    };
    let total = components.weighted_total();

    let breakdown = vec![
        format!("Average profit per trade: {:.2} SOL", metrics.average_profit),
        format!("Trades per day: {:.1}", per_day),
        format!("Win rate: {:.1}%", win_fraction * 100.0),
        format!("Maximum drawdown: {:.1}%", risk.max_drawdown * 100.0),
    ];

    let mut recommendations = vec![Recommendation::verdict(total)];
    if config.warn_low_profit && components.is_low_profit() {
        recommendations.push(Recommendation::LowProfitMargins);
    }
    if components.is_frequency_too_high() {
        recommendations.push(Recommendation::FrequencyTooHigh);
    }
    if components.is_risk_too_high() {
        recommendations.push(Recommendation::RiskTooHigh);
    }

    CopyTradeScore {
        total,
        components,
        trades_per_day: per_day,
        breakdown,
        recommendations,
    }
}
