//! # Insights Service
//!
//! Dashboard and analytics views composed from the tables and the pure
//! analytics in `handset_core::analytics`.
//!
//! ## Views
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  dashboard()            revenue (all time, today), stock alerts,       │
//! │                         active repairs, recent sales                   │
//! │                                                                         │
//! │  business_insights(d)   trade-in trends over d days, CLV ranking,      │
//! │                         seasonal patterns (all sales)                  │
//! │                                                                         │
//! │  sales_report(d)        sales summary over d days, active repairs      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each view is computed under a single read lock, so its numbers agree
//! with each other even while sales are being completed.

use handset_core::analytics::{
    average_lifetime_value, lifetime_values, seasonal_patterns, summarize_sales, trade_in_trends,
    CustomerLifetimeValue, DateRange, SalesSummary, SeasonalPatterns, TradeInTrends,
};
use handset_core::inventory;
use handset_core::{Money, Sale};
use serde::Serialize;
use tracing::debug;

use crate::database::Database;

/// Front page of the back office.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub shop_name: String,
    pub currency: String,
    pub total_revenue: Money,
    /// Revenue since midnight UTC.
    pub today_revenue: Money,
    pub today_sales: usize,
    /// Devices with `0 < quantity < ` the configured threshold.
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub active_repairs: usize,
    pub inventory_value: Money,
    /// Newest first.
    pub recent_sales: Vec<Sale>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInsights {
    pub range: DateRange,
    pub trade_in_trends: TradeInTrends,
    /// Top spenders, bounded by the configured display limit.
    pub customer_lifetime_values: Vec<CustomerLifetimeValue>,
    /// Average over every customer with a purchase, not just the top list.
    pub average_lifetime_value: Money,
    pub top_customer: Option<CustomerLifetimeValue>,
    pub seasonal_patterns: SeasonalPatterns,
    /// Accepted trade-in offers inside the range.
    pub total_trade_in_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub range: DateRange,
    pub summary: SalesSummary,
    pub active_repairs: usize,
}

/// Read-only analytics over the store.
#[derive(Debug, Clone)]
pub struct InsightsService {
    db: Database,
}

impl InsightsService {
    pub fn new(db: Database) -> Self {
        InsightsService { db }
    }

    pub async fn dashboard(&self) -> Dashboard {
        let config = self.db.config();
        let now = self.db.now();
        let today = DateRange::lookback(now, 0);
        let tables = self.db.tables.read().await;

        let sales = tables.sales.all();
        let todays: Vec<&Sale> = sales.iter().filter(|s| today.contains(s.timestamp)).collect();

        let mut recent = sales.to_vec();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(config.insights.recent_sales);

        let dashboard = Dashboard {
            shop_name: config.shop.name.clone(),
            currency: config.shop.currency.clone(),
            total_revenue: sales.iter().map(|s| s.total).sum(),
            today_revenue: todays.iter().map(|s| s.total).sum(),
            today_sales: todays.len(),
            low_stock_count: inventory::low_stock(tables.devices.all(), config.inventory.low_stock_threshold).len(),
            out_of_stock_count: inventory::out_of_stock(tables.devices.all()).len(),
            active_repairs: tables.repairs.all().iter().filter(|t| t.is_active()).count(),
            inventory_value: inventory::inventory_value(tables.devices.all()),
            recent_sales: recent,
        };

        debug!(
            today_sales = dashboard.today_sales,
            low_stock = dashboard.low_stock_count,
            active_repairs = dashboard.active_repairs,
            "Dashboard computed"
        );
        dashboard
    }

    /// Trade-in trends over the last `days` days. Lifetime values and
    /// seasonal patterns always cover every sale.
    pub async fn business_insights(&self, days: u32) -> BusinessInsights {
        let config = self.db.config();
        let range = DateRange::lookback(self.db.now(), days);
        let tables = self.db.tables.read().await;

        let trends = trade_in_trends(tables.trade_ins.all(), range, config.insights.trade_in_buckets);
        let all_values = lifetime_values(tables.sales.all(), tables.customers.all());
        let average = average_lifetime_value(&all_values);
        let top_customer = all_values.first().cloned();

        let mut shown = all_values;
        shown.truncate(config.insights.clv_limit);

        debug!(
            days,
            customers = shown.len(),
            trade_ins = trends.total_trade_ins,
            "Business insights computed"
        );

        BusinessInsights {
            range,
            total_trade_in_value: trends.total_value,
            trade_in_trends: trends,
            customer_lifetime_values: shown,
            average_lifetime_value: average,
            top_customer,
            seasonal_patterns: seasonal_patterns(tables.sales.all()),
        }
    }

    /// Sales summary over the last `days` days.
    pub async fn sales_report(&self, days: u32) -> SalesReport {
        let range = DateRange::lookback(self.db.now(), days);
        let top_n = self.db.config().insights.top_products;
        let tables = self.db.tables.read().await;

        SalesReport {
            range,
            summary: summarize_sales(tables.sales.all(), range, top_n),
            active_repairs: tables.repairs.all().iter().filter(|t| t.is_active()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::fixture_db;

    #[tokio::test]
    async fn test_dashboard_over_fixtures() {
        let dashboard = fixture_db().insights().dashboard().await;

        assert_eq!(dashboard.total_revenue, Money::from_cents(871_249));
        assert_eq!(dashboard.today_sales, 1);
        assert_eq!(dashboard.today_revenue, Money::from_cents(64_584));
        assert_eq!(dashboard.low_stock_count, 5);
        assert_eq!(dashboard.out_of_stock_count, 1);
        assert_eq!(dashboard.active_repairs, 3);
        assert_eq!(dashboard.recent_sales.len(), 5);
        assert_eq!(dashboard.recent_sales[0].id, 12);
    }

    #[tokio::test]
    async fn test_business_insights() {
        let insights = fixture_db().insights().business_insights(90).await;

        assert_eq!(insights.customer_lifetime_values.len(), 6);
        let top = insights.top_customer.unwrap();
        assert_eq!(top.customer_id, 3);
        assert_eq!(top.total_spent, Money::from_cents(190_948));
        assert_eq!(insights.total_trade_in_value, Money::from_cents(116_300));
        assert_eq!(insights.seasonal_patterns.peak_month.as_deref(), Some("2026-06"));
    }

    #[tokio::test]
    async fn test_lifetime_values_ignore_window() {
        let insights = fixture_db().insights().business_insights(0).await;

        assert_eq!(insights.trade_in_trends.total_trade_ins, 0);
        assert_eq!(insights.customer_lifetime_values.len(), 6);
        assert_eq!(insights.top_customer.unwrap().total_spent, Money::from_cents(190_948));
    }

    #[tokio::test]
    async fn test_sales_report_window() {
        let report = fixture_db().insights().sales_report(0).await;
        assert_eq!(report.summary.total_sales, 1);
        assert_eq!(report.summary.average_transaction, Money::from_cents(64_584));
        assert_eq!(report.active_repairs, 3);
    }
}
