//! Trading advice derived from metrics and score
//!
//! Classifies the trading style, labels the risk level, estimates a monthly
//! return and lists the considerations a follower should weigh.

use serde::Serialize;
use std::fmt;

use crate::analysis::metrics::TradingMetrics;
use crate::analysis::score::CopyTradeScore;

/// Quick-trade share above which the wallet looks automated
const BOT_QUICK_SHARE: f64 = 0.5;
/// Mean gap (hours) under which the wallet is a day trader
const DAY_TRADING_MAX_HOURS: f64 = 24.0;
/// Mean gap (hours) under which activity needs constant attention
const VERY_ACTIVE_MAX_HOURS: f64 = 1.0;
/// Win rate (percent) considered a consistent strategy
const STRONG_WIN_RATE_PCT: f64 = 60.0;
/// Average fee (SOL) considered efficient
const LOW_FEE_SOL: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingStyle {
    HighFrequencyBot,
    DayTrading,
    SwingTrading,
}

impl fmt::Display for TradingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradingStyle::HighFrequencyBot => "High-frequency bot trading",
            TradingStyle::DayTrading => "Day trading",
            TradingStyle::SwingTrading => "Swing trading",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_risk_score(risk_score: f64) -> Self {
        if risk_score >= 80.0 {
            RiskLevel::Low
        } else if risk_score >= 60.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "Low risk",
            RiskLevel::Moderate => "Moderate risk",
            RiskLevel::High => "High risk",
        })
    }
}

/// A point a follower should weigh before copying
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Consideration {
    VeryActive,
    ManageableGap { hours: f64 },
    StrongWinRate { pct: f64 },
    RiskyWinRate { pct: f64 },
    LowFees,
    HighFees,
    QuickTrades { count: usize },
}

impl fmt::Display for Consideration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consideration::VeryActive => {
                write!(f, "Very active trading - requires quick execution and high attention")
            }
            Consideration::ManageableGap { hours } => write!(
                f,
                "Average {:.1} hours between trades - manageable for copytrading",
                hours
            ),
            Consideration::StrongWinRate { pct } => write!(
                f,
                "Strong win rate of {:.1}% indicates consistent strategy",
                pct
            ),
            Consideration::RiskyWinRate { pct } => {
                write!(f, "Win rate of {:.1}% suggests high-risk strategy", pct)
            }
            Consideration::LowFees => write!(f, "Low fees indicate efficient trading"),
            Consideration::HighFees => write!(f, "Higher fees may impact overall profitability"),
            Consideration::QuickTrades { count } => write!(
                f,
                "{} quick trades (under 5 minutes) may be difficult to copy manually",
                count
            ),
        }
    }
}

/// Advice summary for one wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingAdvice {
    pub style: TradingStyle,
    pub risk_level: RiskLevel,
    /// Total profit over total fees paid, percent; absent when no fees were paid
    pub expected_monthly_roi: Option<f64>,
    pub considerations: Vec<Consideration>,
}

pub fn classify_style(metrics: &TradingMetrics) -> TradingStyle {
    if metrics.quick_trade_share() > BOT_QUICK_SHARE {
        TradingStyle::HighFrequencyBot
    } else if metrics.trading_frequency_hours < DAY_TRADING_MAX_HOURS {
        TradingStyle::DayTrading
    } else {
        TradingStyle::SwingTrading
    }
}

/// Return on fees spent, treating the history as one month
pub fn expected_monthly_roi(metrics: &TradingMetrics) -> Option<f64> {
    let fees_paid = metrics.total_trades as f64 * metrics.average_fee;
    if fees_paid > 0.0 {
        Some(metrics.total_profit / fees_paid * 100.0)
    } else {
        None
    }
}

pub fn advise(metrics: &TradingMetrics, score: &CopyTradeScore) -> TradingAdvice {
    let mut considerations = Vec::with_capacity(4);

    if metrics.trading_frequency_hours < VERY_ACTIVE_MAX_HOURS {
        considerations.push(Consideration::VeryActive);
    } else {
        considerations.push(Consideration::ManageableGap {
            hours: metrics.trading_frequency_hours,
        });
    }

    let pct = metrics.profitable_trades_ratio;
    if pct >= STRONG_WIN_RATE_PCT {
        considerations.push(Consideration::StrongWinRate { pct });
    } else {
        considerations.push(Consideration::RiskyWinRate { pct });
    }

    if metrics.average_fee < LOW_FEE_SOL {
        considerations.push(Consideration::LowFees);
    } else {
        considerations.push(Consideration::HighFees);
    }

    if metrics.quick_trade_count > 0 {
        considerations.push(Consideration::QuickTrades {
            count: metrics.quick_trade_count,
        });
    }

    TradingAdvice {
        style: classify_style(metrics),
        risk_level: RiskLevel::from_risk_score(score.components.risk),
        expected_monthly_roi: expected_monthly_roi(metrics),
        considerations,
    }
}
