//! # Trade-In Trends
//!
//! Splits a date range into equal-width buckets and reports offer value
//! and acceptance per bucket.
//!
//! ```text
//!   range: 90 days, 15 buckets  →  width = ceil(90 / 15) = 6 days
//!
//!   [d0, d6) [d6, d12) ... [d84, d90]
//!                              └── last bucket also takes the range end
//! ```
//!
//! Empty buckets are still emitted, with zero count, rate and value, so the
//! timeline always covers the whole range.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{percentage, DateRange};
use crate::money::Money;
use crate::types::TradeIn;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TradeInBucket {
    #[ts(as = "String")]
    pub bucket_start: DateTime<Utc>,
    #[ts(as = "String")]
    pub bucket_end: DateTime<Utc>,
    pub count: usize,
    pub accepted_count: usize,
    pub average_offer: Money,
    /// Percent of trade-ins accepted, 0 when the bucket is empty.
    pub acceptance_rate: f64,
    /// Sum of accepted offers only.
    pub total_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TradeInTrends {
    pub bucket_days: i64,
    pub timeline: Vec<TradeInBucket>,
    pub total_trade_ins: usize,
    pub acceptance_rate: f64,
    pub total_value: Money,
}

/// Builds the bucketed trade-in timeline for `range`.
///
/// Bucket width is `ceil(total_days / target_buckets)` days, at least one.
pub fn trade_in_trends(trade_ins: &[TradeIn], range: DateRange, target_buckets: u32) -> TradeInTrends {
    let span_secs = range.duration().num_seconds().max(0);
    let total_days = ceil_div(span_secs, SECONDS_PER_DAY);
    let bucket_days = ceil_div(total_days, i64::from(target_buckets.max(1))).max(1);
    let bucket_count = ceil_div(total_days, bucket_days).max(1);
    let width = Duration::days(bucket_days);

    let timeline: Vec<TradeInBucket> = (0..bucket_count)
        .map(|i| {
            let bucket_start = range.start() + width * (i as i32);
            let bucket_end = (bucket_start + width).min(range.end());
            let last = i == bucket_count - 1;

            let members: Vec<&TradeIn> = trade_ins
                .iter()
                .filter(|t| {
                    t.timestamp >= bucket_start
                        && (t.timestamp < bucket_end || (last && t.timestamp <= range.end()))
                })
                .collect();

            summarize_bucket(bucket_start, bucket_end, &members)
        })
        .collect();

    let total_trade_ins: usize = timeline.iter().map(|b| b.count).sum();
    let accepted: usize = timeline.iter().map(|b| b.accepted_count).sum();

    TradeInTrends {
        bucket_days,
        total_value: timeline.iter().map(|b| b.total_value).sum(),
        acceptance_rate: percentage(accepted, total_trade_ins),
        total_trade_ins,
        timeline,
    }
}

fn summarize_bucket(
    bucket_start: DateTime<Utc>,
    bucket_end: DateTime<Utc>,
    members: &[&TradeIn],
) -> TradeInBucket {
    let offered: Money = members.iter().map(|t| t.offer_amount).sum();
    let accepted: Vec<&&TradeIn> = members.iter().filter(|t| t.accepted).collect();

    TradeInBucket {
        bucket_start,
        bucket_end,
        count: members.len(),
        accepted_count: accepted.len(),
        average_offer: Money::average(offered, members.len()),
        acceptance_rate: percentage(accepted.len(), members.len()),
        total_value: accepted.iter().map(|t| t.offer_amount).sum(),
    }
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}
