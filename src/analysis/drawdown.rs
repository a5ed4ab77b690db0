//! Drawdown / risk calculation over the cumulative profit curve

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::Trade;

/// Order in which trades are accumulated when measuring drawdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawdownOrder {
    /// Oldest trade first (stable re-sort by timestamp)
    #[default]
    Chronological,
    /// Most recent trade first, exactly as normalized
    RecencyFirst,
}

/// Risk derived from the profit sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskProfile {
    /// Largest peak-to-current decline of cumulative profit, in SOL
    pub max_drawdown: f64,
    /// Highest cumulative profit reached (never below the flat start)
    pub peak_profit: f64,
    /// Cumulative profit at the end of the scan
    pub final_profit: f64,
    pub scan_order: DrawdownOrder,
}

/// One point of the cumulative profit curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub timestamp: i64,
    pub profit: f64,
    pub cumulative_profit: f64,
}

/// Trades in the requested scan order
fn ordered(trades: &[Trade], order: DrawdownOrder) -> Vec<&Trade> {
    let mut refs: Vec<&Trade> = trades.iter().collect();
    if order == DrawdownOrder::Chronological {
        refs.sort_by_key(|t| t.timestamp);
    }
    refs
}

/// Walk the profit sequence and measure the drawdown
pub fn assess(trades: &[Trade], order: DrawdownOrder) -> RiskProfile {
    let mut cumulative = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;

    for trade in ordered(trades, order) {
        cumulative += trade.profit;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = peak - cumulative;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }

    RiskProfile {
        max_drawdown,
        peak_profit: peak,
        final_profit: cumulative,
        scan_order: order,
    }
}

/// Maximum drawdown of the cumulative profit, in SOL
pub fn compute_max_drawdown(trades: &[Trade], order: DrawdownOrder) -> f64 {
    assess(trades, order).max_drawdown
}

/// Chronological per-trade and cumulative profit series
pub fn profit_curve(trades: &[Trade]) -> Vec<CurvePoint> {
    let mut cumulative = 0.0;
    ordered(trades, DrawdownOrder::Chronological)
        .into_iter()
        .map(|t| {
            cumulative += t.profit;
            CurvePoint {
                timestamp: t.timestamp,
                profit: t.profit,
                cumulative_profit: cumulative,
            }
        })
        .collect()
}
