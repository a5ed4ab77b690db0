//! Metrics Aggregator
//!
//! Computes behavioral metrics over a descending-by-recency trade list:
//! - Fee and profit averages, win ratio
//! - Inter-trade timing (mean gap, quick trades)
//! - Time-of-day and weekend distribution
//! - A bounded recent-activity projection for display

use chrono::{DateTime, Datelike, FixedOffset, Local, Offset, TimeZone, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::Trade;
use crate::analysis::AnalysisConfig;
use crate::error::{Error, Result};

const SECS_PER_HOUR: f64 = 3600.0;

/// Wall clock used for hour-of-day and day-of-week bucketing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallClock {
    /// Host time zone
    #[default]
    Local,
    Utc,
    /// Fixed offset east of UTC, in minutes
    Fixed(i32),
}

impl WallClock {
    /// Offset in effect at `instant`
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            WallClock::Local => Local.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            WallClock::Utc => Utc.fix(),
            WallClock::Fixed(minutes) => {
                FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
            }
        }
    }

    /// Convert a unix timestamp into this wall clock
    ///
    /// Returns `None` when the timestamp has no calendar representation.
    pub fn localize(&self, timestamp: i64) -> Option<DateTime<FixedOffset>> {
        let instant = DateTime::from_timestamp(timestamp, 0)?;
        Some(instant.with_timezone(&self.offset_at(&instant)))
    }
}

/// Part of the day a trade falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    /// [06:00, 12:00)
    Morning,
    /// [12:00, 18:00)
    Afternoon,
    /// [18:00, 06:00)
    Evening,
}

impl DayPart {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DayPart::Morning,
            12..=17 => DayPart::Afternoon,
            _ => DayPart::Evening,
        }
    }
}

/// Trade counts per time bucket
///
/// morning + afternoon + evening always equals the trade count; weekend
/// overlaps the other three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeBuckets {
    pub morning: usize,
    pub afternoon: usize,
    pub evening: usize,
    pub weekend: usize,
}

impl TimeBuckets {
    fn record(&mut self, local: &DateTime<FixedOffset>) {
        match DayPart::from_hour(local.hour()) {
            DayPart::Morning => self.morning += 1,
            DayPart::Afternoon => self.afternoon += 1,
            DayPart::Evening => self.evening += 1,
        }
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            self.weekend += 1;
        }
    }

    pub fn day_total(&self) -> usize {
        self.morning + self.afternoon + self.evening
    }
}

/// Display row for the recent-activity table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow {
    pub signature: String,
    pub time: String,
    pub category: String,
    pub fee: String,
    pub profit: String,
}

impl ActivityRow {
    fn project(trade: &Trade, local: &DateTime<FixedOffset>) -> Self {
        Self {
            signature: trade.signature.clone(),
            time: local.format("%Y-%m-%d %H:%M:%S").to_string(),
            category: trade.category.clone(),
            fee: format!("{:.4}", trade.fee),
            profit: format!("{:.4}", trade.profit),
        }
    }
}

/// Aggregate trading behavior over one wallet's trades
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingMetrics {
    pub total_trades: usize,
    /// SOL
    pub average_fee: f64,
    /// Mean gap between consecutive trades, in hours
    pub trading_frequency_hours: f64,
    pub quick_trade_count: usize,
    /// Percentage of trades with positive profit, 0-100
    pub profitable_trades_ratio: f64,
    pub total_profit: f64,
    pub average_profit: f64,
    pub trading_times: TimeBuckets,
    pub recent_activity: Vec<ActivityRow>,
}

impl TradingMetrics {
    /// Share of trades made less than the quick-trade threshold after the previous one
    pub fn quick_trade_share(&self) -> f64 {
        if self.total_trades == 0 {
            return 0.0;
        }
        self.quick_trade_count as f64 / self.total_trades as f64
    }
}

/// Absolute gaps in seconds between each trade and the one before it
pub fn inter_trade_gaps(trades: &[Trade]) -> Vec<u64> {
    trades
        .windows(2)
        .map(|pair| pair[1].timestamp.abs_diff(pair[0].timestamp))
        .collect()
}

/// Aggregate metrics over `trades` (expected most recent first)
///
/// Returns `Error::EmptyInput` when there is nothing to aggregate and
/// `Error::TimestampOutOfRange` when a trade has no calendar time.
pub fn aggregate(trades: &[Trade], config: &AnalysisConfig) -> Result<TradingMetrics> {
    if trades.is_empty() {
        return Err(Error::EmptyInput);
    }

    let local_times = trades
        .iter()
        .map(|t| {
            config
                .wall_clock
                .localize(t.timestamp)
                .ok_or(Error::TimestampOutOfRange(t.timestamp))
        })
        .collect::<Result<Vec<_>>>()?;

    let total_trades = trades.len();
    let count = total_trades as f64;

    let gaps = inter_trade_gaps(trades);
    let (trading_frequency_hours, quick_trade_count) = if gaps.is_empty() {
        (0.0, 0)
    } else {
        let mean_gap = gaps.iter().map(|&g| g as f64).sum::<f64>() / gaps.len() as f64;
        let threshold = config.quick_trade_secs.max(0).unsigned_abs();
        let quick = gaps.iter().filter(|&&g| g < threshold).count();
        (mean_gap / SECS_PER_HOUR, quick)
    };

    let profitable = trades.iter().filter(|t| t.is_profitable()).count();
    let total_profit: f64 = trades.iter().map(|t| t.profit).sum();
    let total_fees: f64 = trades.iter().map(|t| t.fee).sum();

    let mut trading_times = TimeBuckets::default();
    for local in &local_times {
        trading_times.record(local);
    }

    let recent_activity = trades
        .iter()
        .zip(&local_times)
        .take(config.recent_activity_limit)
        .map(|(t, local)| ActivityRow::project(t, local))
        .collect();

    Ok(TradingMetrics {
        total_trades,
        average_fee: total_fees / count,
        trading_frequency_hours,
        quick_trade_count,
        profitable_trades_ratio: profitable as f64 / count * 100.0,
        total_profit,
        average_profit: total_profit / count,
        trading_times,
        recent_activity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-06 is a Saturday
    const SAT_0000_UTC: i64 = 1_704_499_200;
    const HOUR: i64 = 3600;

    fn utc_config() -> AnalysisConfig {
        AnalysisConfig {
            wall_clock: WallClock::Utc,
            ..AnalysisConfig::default()
        }
    }

    fn trade(timestamp: i64, profit: f64) -> Trade {
        Trade {
            signature: format!("sig-{}", timestamp),
            timestamp,
            fee: 0.000005,
            category: "SWAP".to_string(),
            profit,
            native_transfers: Vec::new(),
            token_transfers: Vec::new(),
        }
    }

    #[test]
    fn test_empty_input_is_signaled() {
        let err = aggregate(&[], &utc_config()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn test_single_trade_has_no_gaps() {
        let metrics = aggregate(&[trade(SAT_0000_UTC, 1.0)], &utc_config()).unwrap();
        assert_eq!(metrics.total_trades, 1);
        assert_eq!(metrics.trading_frequency_hours, 0.0);
        assert_eq!(metrics.quick_trade_count, 0);
        assert!((metrics.profitable_trades_ratio - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaps_and_quick_trades() {
        // Descending: gaps of 60s, 299s, 300s, 7200s
        let t0 = SAT_0000_UTC + 10 * HOUR;
        let trades = vec![
            trade(t0, 1.0),
            trade(t0 - 60, -1.0),
            trade(t0 - 359, 0.0),
            trade(t0 - 659, 2.0),
            trade(t0 - 7859, -0.5),
        ];

        assert_eq!(inter_trade_gaps(&trades), vec![60, 299, 300, 7200]);

        let metrics = aggregate(&trades, &utc_config()).unwrap();
        assert_eq!(metrics.quick_trade_count, 2);
        let expected_hours = (60.0 + 299.0 + 300.0 + 7200.0) / 4.0 / 3600.0;
        assert!((metrics.trading_frequency_hours - expected_hours).abs() < 1e-12);
        assert!((metrics.profitable_trades_ratio - 40.0).abs() < 1e-9);
        assert!((metrics.total_profit - 1.5).abs() < 1e-12);
        assert!((metrics.average_profit - 0.3).abs() < 1e-12);
        assert!((metrics.average_fee - 0.000005).abs() < 1e-15);
    }

    #[test]
    fn test_time_bucket_boundaries() {
        let trades: Vec<Trade> = [0, 5, 6, 11, 12, 17, 18, 23]
            .iter()
            .rev()
            .map(|h| trade(SAT_0000_UTC + h * HOUR, 0.0))
            .collect();

        let buckets = aggregate(&trades, &utc_config()).unwrap().trading_times;
        assert_eq!(buckets.morning, 2);
        assert_eq!(buckets.afternoon, 2);
        assert_eq!(buckets.evening, 4);
        assert_eq!(buckets.weekend, 8);
        assert_eq!(buckets.day_total(), trades.len());
    }

    #[test]
    fn test_weekend_counts_saturday_and_sunday_only() {
        let day = 24 * HOUR;
        // Fri 23:00, Sat 09:00, Sun 15:00, Mon 01:00 (UTC)
        let trades = vec![
            trade(SAT_0000_UTC + 2 * day + HOUR, 0.0),
            trade(SAT_0000_UTC + day + 15 * HOUR, 0.0),
            trade(SAT_0000_UTC + 9 * HOUR, 0.0),
            trade(SAT_0000_UTC - HOUR, 0.0),
        ];
        let buckets = aggregate(&trades, &utc_config()).unwrap().trading_times;
        assert_eq!(buckets.weekend, 2);
        assert_eq!(buckets.day_total(), 4);
    }

    #[test]
    fn test_fixed_offset_shifts_buckets() {
        // 04:00 UTC is 09:30 at +05:30
        let trades = vec![trade(SAT_0000_UTC + 4 * HOUR, 0.0)];
        let config = AnalysisConfig {
            wall_clock: WallClock::Fixed(330),
            ..AnalysisConfig::default()
        };
        let buckets = aggregate(&trades, &config).unwrap().trading_times;
        assert_eq!(buckets.morning, 1);
        assert_eq!(buckets.evening, 0);
    }

    #[test]
    fn test_recent_activity_window() {
        let trades: Vec<Trade> = (0..15)
            .map(|i| trade(SAT_0000_UTC - i * HOUR, 0.123456))
            .collect();

        let metrics = aggregate(&trades, &utc_config()).unwrap();
        assert_eq!(metrics.total_trades, 15);
        assert_eq!(metrics.recent_activity.len(), 10);
        assert_eq!(metrics.recent_activity[0].signature, trades[0].signature);
        assert_eq!(metrics.recent_activity[0].profit, "0.1235");
        assert_eq!(metrics.recent_activity[0].fee, "0.0000");
        assert_eq!(metrics.recent_activity[0].time, "2024-01-06 00:00:00");
    }

    #[test]
    fn test_extreme_timestamp_gaps_do_not_overflow() {
        let far = vec![trade(i64::MAX, 0.0), trade(i64::MIN, 0.0)];
        assert_eq!(inter_trade_gaps(&far), vec![u64::MAX]);
    }

    #[test]
    fn test_unrepresentable_timestamp_is_rejected() {
        assert!(WallClock::Utc.localize(i64::MAX).is_none());
        let trades = vec![trade(i64::MAX, 1.0), trade(SAT_0000_UTC, 1.0)];
        let err = aggregate(&trades, &utc_config()).unwrap_err();
        assert!(matches!(err, Error::TimestampOutOfRange(i64::MAX)));
    }

    #[test]
    fn test_ratio_bounds() {
        let all_losing: Vec<Trade> = (0..5).map(|i| trade(SAT_0000_UTC - i, -1.0)).collect();
        let metrics = aggregate(&all_losing, &utc_config()).unwrap();
        assert_eq!(metrics.profitable_trades_ratio, 0.0);
        assert!((metrics.quick_trade_share() - 0.8).abs() < 1e-12);
    }
}
