//! # Analytics
//!
//! Read-only aggregations over the shop's records.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Analytics Pipeline                              │
//! │                                                                         │
//! │   &[Sale] ──┬──► sales::summarize_sales(range)   totals, top products  │
//! │             ├──► sales::seasonal_patterns()      months, seasons, peak │
//! │             └──► customers::lifetime_values()    CLV per customer      │
//! │                                                                         │
//! │   &[TradeIn] ──► trade_ins::trade_in_trends(range) bucketed timeline   │
//! │                                                                         │
//! │   &[WarrantyClaim] ──► warranty::claim_statistics()                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function takes borrowed slices and returns fresh report structs.
//! The same inputs always produce the same output.

pub mod customers;
pub mod sales;
pub mod trade_ins;
pub mod warranty;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

pub use customers::{average_lifetime_value, lifetime_values, CustomerLifetimeValue};
pub use sales::{
    seasonal_patterns, summarize_sales, MonthlyRevenue, ProductSales, SalesSummary, Season,
    SeasonTotal, SeasonalPatterns,
};
pub use trade_ins::{trade_in_trends, TradeInBucket, TradeInTrends};
pub use warranty::{claim_statistics, ClaimStatistics, StatusCount};

/// An inclusive time window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[ts(as = "String")]
    start: DateTime<Utc>,
    #[ts(as = "String")]
    end: DateTime<Utc>,
}

impl DateRange {
    /// Builds a range, rejecting an end before the start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(DateRange { start, end })
    }

    /// The `days` days leading up to `now`, starting at midnight UTC.
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use handset_core::analytics::DateRange;
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 3, 31, 15, 0, 0).unwrap();
    /// let range = DateRange::lookback(now, 30);
    /// assert_eq!(range.start(), Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    /// assert_eq!(range.end(), now);
    /// ```
    pub fn lookback(now: DateTime<Utc>, days: u32) -> Self {
        let start = (now - Duration::days(i64::from(days)))
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(now);
        DateRange { start, end: now }
    }

    /// The trailing window `[now − days, now]`, to the instant.
    pub fn trailing(now: DateTime<Utc>, days: u32) -> Self {
        DateRange {
            start: now - Duration::days(i64::from(days)),
            end: now,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive at both ends.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// `numerator / denominator × 100`, or 0 when the denominator is 0.
pub(crate) fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}
