//! Plain-text rendering of an analysis

use std::fmt;

use crate::analysis::pipeline::{Analysis, WalletReport};
use crate::analysis::types::SkippedRecord;

/// Human-readable report for terminal output
pub struct TextReport<'a> {
    analysis: &'a Analysis,
    address: &'a str,
}

impl<'a> TextReport<'a> {
    pub fn new(analysis: &'a Analysis, address: &'a str) -> Self {
        Self { analysis, address }
    }
}

fn write_skipped(f: &mut fmt::Formatter<'_>, skipped: &[SkippedRecord]) -> fmt::Result {
    if skipped.is_empty() {
        return Ok(());
    }
    writeln!(f, "\nSkipped records:")?;
    for record in skipped {
        writeln!(
            f,
            "  #{} {}: {}",
            record.index,
            record.signature.as_deref().unwrap_or("(no signature)"),
            record.reason
        )?;
    }
    Ok(())
}

fn write_report(f: &mut fmt::Formatter<'_>, report: &WalletReport) -> fmt::Result {
    let metrics = &report.metrics;
    let score = &report.score;
    let c = &score.components;

    writeln!(f, "\n=== COPY-TRADE ANALYSIS ===\n")?;
    writeln!(f, "Wallet: {}", report.address)?;
    writeln!(
        f,
        "{} trades analyzed, {} records skipped",
        report.trades_analyzed,
        report.skipped.len()
    )?;

    writeln!(f, "\nScore: {}/100", score.total)?;
    writeln!(f, "  Profit:      {:>5.1}", c.profit)?;
    writeln!(f, "  Consistency: {:>5.1}", c.consistency)?;
    writeln!(f, "  Frequency:   {:>5.1}", c.frequency)?;
    writeln!(f, "  Risk:        {:>5.1}", c.risk)?;
    for line in &score.breakdown {
        writeln!(f, "  {}", line)?;
    }

    writeln!(f, "\nRecommendations:")?;
    for recommendation in &score.recommendations {
        let marker = if recommendation.is_warning() { "!" } else { "-" };
        writeln!(f, "  {} {}", marker, recommendation)?;
    }

    writeln!(f, "\nMetrics:")?;
    writeln!(f, "  Total profit: {:.4} SOL", metrics.total_profit)?;
    writeln!(f, "  Average fee: {:.6} SOL", metrics.average_fee)?;
    writeln!(
        f,
        "  Average gap: {:.2} hours",
        metrics.trading_frequency_hours
    )?;
    writeln!(f, "  Quick trades: {}", metrics.quick_trade_count)?;
    writeln!(f, "  Win rate: {:.1}%", metrics.profitable_trades_ratio)?;
    let times = &metrics.trading_times;
    writeln!(
        f,
        "  Trading times: morning {}, afternoon {}, evening {}, weekend {}",
        times.morning, times.afternoon, times.evening, times.weekend
    )?;

    writeln!(f, "\nRisk:")?;
    writeln!(
        f,
        "  Max drawdown: {:.4} SOL ({:?})",
        report.risk.max_drawdown, report.risk.scan_order
    )?;
    writeln!(f, "  Peak profit: {:.4} SOL", report.risk.peak_profit)?;

    let advice = &report.advice;
    writeln!(f, "\nAdvice:")?;
    writeln!(f, "  Style: {}", advice.style)?;
    writeln!(f, "  Risk level: {}", advice.risk_level)?;
    match advice.expected_monthly_roi {
        Some(roi) => writeln!(f, "  Expected monthly ROI: {:.1}%", roi)?,
        None => writeln!(f, "  Expected monthly ROI: n/a")?,
    }
    for consideration in &advice.considerations {
        writeln!(f, "  - {}", consideration)?;
    }

    if !metrics.recent_activity.is_empty() {
        writeln!(f, "\nRecent activity:")?;
        for row in &metrics.recent_activity {
            writeln!(
                f,
                "  {}  {:<12} fee {}  profit {:>9}  {}",
                row.time, row.category, row.fee, row.profit, row.signature
            )?;
        }
    }

    write_skipped(f, &report.skipped)
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.analysis {
            Analysis::Report(report) => write_report(f, report),
            Analysis::NoData { skipped } => {
                writeln!(f, "\nNo trades to analyze for {}", self.address)?;
                writeln!(f, "0 trades analyzed, {} records skipped", skipped.len())?;
                write_skipped(f, skipped)
            }
        }
    }
}
