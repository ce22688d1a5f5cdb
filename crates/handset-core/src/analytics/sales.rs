//! # Sales Analytics
//!
//! Revenue totals, top products and calendar bucketing.
//!
//! ## Season Map
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┐
//! │  Winter  │  Spring  │  Summer  │   Fall   │
//! │ Dec Jan  │ Mar Apr  │ Jun Jul  │ Sep Oct  │
//! │   Feb    │   May    │   Aug    │   Nov    │
//! └──────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! Every sale lands in exactly one month bucket and one season, so the four
//! season totals always add up to total revenue.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::DateRange;
use crate::money::Money;
use crate::types::Sale;

// =============================================================================
// Range Summary
// =============================================================================

/// One row of the top-products ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub name: String,
    pub quantity: i64,
    pub revenue: Money,
}

/// Sales activity inside a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: usize,
    pub total_revenue: Money,
    /// Zero when the range holds no sales.
    pub average_transaction: Money,
    pub top_products: Vec<ProductSales>,
}

/// Summarizes the sales whose timestamp falls inside `range` (inclusive).
///
/// Products are ranked by units sold and grouped by the line's product
/// name, not by device id. Ties keep the order in which a product was first
/// seen.
pub fn summarize_sales(sales: &[Sale], range: DateRange, top_n: usize) -> SalesSummary {
    let in_range: Vec<&Sale> = sales.iter().filter(|s| range.contains(s.timestamp)).collect();

    let total_revenue: Money = in_range.iter().map(|s| s.total).sum();

    SalesSummary {
        total_sales: in_range.len(),
        total_revenue,
        average_transaction: Money::average(total_revenue, in_range.len()),
        top_products: top_products(&in_range, top_n),
    }
}

fn top_products(sales: &[&Sale], top_n: usize) -> Vec<ProductSales> {
    let mut ranking: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for line in sales.iter().flat_map(|s| s.items.iter()) {
        let slot = *index.entry(line.name.as_str()).or_insert_with(|| {
            ranking.push(ProductSales {
                name: line.name.clone(),
                quantity: 0,
                revenue: Money::zero(),
            });
            ranking.len() - 1
        });
        ranking[slot].quantity += line.quantity;
        ranking[slot].revenue += line.line_total();
    }

    // stable: equal quantities stay in first-seen order
    ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranking.truncate(top_n);
    ranking
}

// =============================================================================
// Seasonal Patterns
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Season for a calendar month (1 = January).
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }
}

/// Revenue and sale count for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Money,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SeasonTotal {
    pub season: Season,
    pub revenue: Money,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPatterns {
    /// Chronological.
    pub monthly_revenue: Vec<MonthlyRevenue>,
    /// Always four entries, Winter through Fall.
    pub seasonal_totals: Vec<SeasonTotal>,
    /// `None` when there are no sales at all.
    pub peak_month: Option<String>,
    pub peak_season: Option<Season>,
}

/// Buckets every sale (no date filter) by month and season.
///
/// Peaks are the buckets with the highest revenue. On a tie the earliest
/// month wins, and among seasons the first in Winter→Fall order. The order
/// of `sales` never affects either peak.
pub fn seasonal_patterns(sales: &[Sale]) -> SeasonalPatterns {
    let mut months: BTreeMap<String, (Money, usize)> = BTreeMap::new();
    let mut seasons: Vec<SeasonTotal> = Season::ALL
        .iter()
        .map(|&season| SeasonTotal {
            season,
            revenue: Money::zero(),
            count: 0,
        })
        .collect();

    for sale in sales {
        let key = format!("{:04}-{:02}", sale.timestamp.year(), sale.timestamp.month());
        let bucket = months.entry(key).or_insert((Money::zero(), 0));
        bucket.0 += sale.total;
        bucket.1 += 1;

        let season = Season::from_month(sale.timestamp.month());
        if let Some(total) = seasons.iter_mut().find(|t| t.season == season) {
            total.revenue += sale.total;
            total.count += 1;
        }
    }

    let monthly_revenue: Vec<MonthlyRevenue> = months
        .into_iter()
        .map(|(month, (revenue, count))| MonthlyRevenue { month, revenue, count })
        .collect();

    let peak_month = first_max(monthly_revenue.iter().map(|m| (m.revenue, &m.month))).cloned();
    let peak_season = first_max(
        seasons
            .iter()
            .filter(|t| t.count > 0)
            .map(|t| (t.revenue, &t.season)),
    )
    .copied();

    SeasonalPatterns {
        monthly_revenue,
        seasonal_totals: seasons,
        peak_month,
        peak_season,
    }
}

/// Key of the first entry holding the maximum value.
fn first_max<'a, K>(entries: impl Iterator<Item = (Money, &'a K)>) -> Option<&'a K> {
    let mut best: Option<(Money, &'a K)> = None;
    for (value, key) in entries {
        match best {
            Some((top, _)) if value <= top => {}
            _ => best = Some((value, key)),
        }
    }
    best.map(|(_, key)| key)
}

// =============================================================================
// Unit Tests
// =============================================================================
