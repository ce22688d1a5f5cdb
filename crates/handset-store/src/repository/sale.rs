//! # Sale Repository
//!
//! Checkout and sales history.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       complete_sale(request)                            │
//! │                                                                         │
//! │  1. VALIDATE (no lock)                                                 │
//! │     └── non-empty cart, quantities 1..=999, discount ≤ 100%            │
//! │                                                                         │
//! │  2. WRITE LOCK                                                         │
//! │     ├── customer exists (when not a walk-in)                           │
//! │     └── price_lines() → every device exists with enough stock          │
//! │                                                                         │
//! │  3. COMMIT (cannot fail past this point)                               │
//! │     ├── insert Sale { SALE###, snapshot lines, totals }                │
//! │     ├── decrement each device's quantity                               │
//! │     └── append sale id to customer's purchase history                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are immutable once created; there is no update or delete.

use handset_core::analytics::{summarize_sales, DateRange, SalesSummary};
use handset_core::checkout::{compute_totals, price_lines, CheckoutRequest};
use handset_core::identity::{business_code, prefix};
use handset_core::{Customer, Entity, EntityId, Money, Sale};
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{StoreError, StoreResult};

/// Repository for sale operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: Database,
}

impl SaleRepository {
    pub fn new(db: Database) -> Self {
        SaleRepository { db }
    }

    /// All sales, newest first.
    pub async fn get_all(&self) -> Vec<Sale> {
        let tables = self.db.tables.read().await;
        newest_first(tables.sales.all().to_vec())
    }

    pub async fn get_by_id(&self, id: EntityId) -> StoreResult<Sale> {
        let tables = self.db.tables.read().await;
        tables.sales.require(id).cloned()
    }

    /// Completes a sale from a register cart.
    ///
    /// Inserting the sale, decrementing stock and recording the sale on the
    /// customer happen under one write lock. On any error nothing changes.
    pub async fn complete_sale(&self, request: CheckoutRequest) -> StoreResult<Sale> {
        request.validate()?;
        let tax_rate = self.db.config().tax_rate();
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;

        if let Some(customer_id) = request.customer_id {
            if !tables.customers.contains(customer_id) {
                return Err(StoreError::invalid_reference(Customer::KIND, customer_id));
            }
        }

        let devices = &tables.devices;
        let lines = price_lines(&request.lines, move |id| devices.get(id))?;
        let totals = compute_totals(&lines, request.discount_bps, tax_rate);

        let sale = tables
            .sales
            .insert_with(|id| Sale {
                id,
                sale_code: business_code(prefix::SALE, id),
                customer_id: request.customer_id,
                items: lines,
                subtotal: totals.subtotal,
                discount: totals.discount,
                discount_bps: request.discount_bps,
                tax: totals.tax,
                total: totals.total,
                payment_method: request.payment_method,
                timestamp: now,
            })
            .clone();

        for line in &sale.items {
            if let Some(device) = tables.devices.get_mut(line.device_id) {
                device.quantity -= line.quantity;
            }
        }
        if let Some(customer_id) = sale.customer_id {
            if let Some(customer) = tables.customers.get_mut(customer_id) {
                customer.purchase_history.push(sale.id);
            }
        }

        info!(
            id = sale.id,
            code = %sale.sale_code,
            customer_id = ?sale.customer_id,
            lines = sale.items.len(),
            total = %sale.total,
            "Sale completed"
        );
        Ok(sale)
    }

    /// The `limit` most recent sales, newest first.
    pub async fn get_recent(&self, limit: usize) -> Vec<Sale> {
        let mut sales = self.get_all().await;
        sales.truncate(limit);
        sales
    }

    /// A customer's sales, newest first.
    pub async fn get_by_customer(&self, customer_id: EntityId) -> Vec<Sale> {
        let tables = self.db.tables.read().await;
        let sales: Vec<Sale> = tables
            .sales
            .all()
            .iter()
            .filter(|s| s.customer_id == Some(customer_id))
            .cloned()
            .collect();

        debug!(customer_id, count = sales.len(), "Sales by customer");
        newest_first(sales)
    }

    /// Sales inside the range (inclusive), newest first.
    pub async fn get_in_range(&self, range: DateRange) -> Vec<Sale> {
        let tables = self.db.tables.read().await;
        newest_first(
            tables
                .sales
                .all()
                .iter()
                .filter(|s| range.contains(s.timestamp))
                .cloned()
                .collect(),
        )
    }

    /// Sum of every sale's total.
    pub async fn get_total_revenue(&self) -> Money {
        let tables = self.db.tables.read().await;
        tables.sales.all().iter().map(|s| s.total).sum()
    }

    /// Count, revenue, average and top products for a date range.
    pub async fn sales_analytics(&self, range: DateRange) -> SalesSummary {
        let top_n = self.db.config().insights.top_products;
        let tables = self.db.tables.read().await;
        let summary = summarize_sales(tables.sales.all(), range, top_n);

        debug!(
            start = %range.start(),
            end = %range.end(),
            total_sales = summary.total_sales,
            "Sales analytics computed"
        );
        summary
    }
}

/// Stable sort, so sales sharing a timestamp keep insertion order.
fn newest_first(mut sales: Vec<Sale>) -> Vec<Sale> {
    sales.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sales
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{fixture_db, fixture_now};
    use handset_core::checkout::CartLine;
    use handset_core::{CoreError, PaymentMethod};

    fn cart(customer_id: Option<EntityId>, lines: &[(EntityId, i64)]) -> CheckoutRequest {
        CheckoutRequest {
            customer_id,
            lines: lines
                .iter()
                .map(|&(device_id, quantity)| CartLine { device_id, quantity })
                .collect(),
            discount_bps: 0,
            payment_method: PaymentMethod::Cash,
        }
    }

    #[tokio::test]
    async fn test_complete_sale_commits_everything() {
        let db = fixture_db();
        let mut request = cart(Some(7), &[(7, 2)]);
        request.discount_bps = 1000;
        request.payment_method = PaymentMethod::CreditCard;

        let sale = db.sales().complete_sale(request).await.unwrap();

        assert_eq!(sale.id, 13);
        assert_eq!(sale.sale_code, "SALE013");
        assert_eq!(sale.subtotal, Money::from_cents(49_800));
        assert_eq!(sale.discount, Money::from_cents(4_980));
        assert_eq!(sale.tax, Money::from_cents(3_586));
        assert_eq!(sale.total, Money::from_cents(48_406));
        assert_eq!(sale.timestamp, fixture_now());
        assert_eq!(sale.items[0].name, "Apple AirPods Pro");

        assert_eq!(db.devices().get_by_id(7).await.unwrap().quantity, 23);
        assert_eq!(db.customers().get_by_id(7).await.unwrap().purchase_history, vec![13]);
        assert_eq!(db.sales().get_by_id(13).await.unwrap(), sale);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let db = fixture_db();
        let err = db.sales().complete_sale(cart(Some(1), &[(7, 1), (6, 3)])).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { device_id: 6, available: 2, requested: 3, .. })
        ));
        assert_eq!(db.sales().get_all().await.len(), 12);
        assert_eq!(db.devices().get_by_id(7).await.unwrap().quantity, 25);
        assert_eq!(db.customers().get_by_id(1).await.unwrap().purchase_history, vec![1, 5]);
    }

    #[tokio::test]
    async fn test_repeated_lines_are_merged_before_stock_check() {
        let db = fixture_db();
        let result = db.sales().complete_sale(cart(None, &[(10, 1), (10, 2)])).await;
        assert!(result.is_err());

        let sale = db.sales().complete_sale(cart(None, &[(10, 1), (10, 1)])).await.unwrap();
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].quantity, 2);
        assert_eq!(db.devices().get_by_id(10).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_reference_failures() {
        let db = fixture_db();
        let unknown_customer = db.sales().complete_sale(cart(Some(99), &[(7, 1)])).await.unwrap_err();
        assert!(matches!(unknown_customer, StoreError::InvalidReference { id: 99, .. }));

        let unknown_device = db.sales().complete_sale(cart(None, &[(99, 1)])).await.unwrap_err();
        assert!(unknown_device.is_not_found());

        let empty = db.sales().complete_sale(cart(None, &[])).await.unwrap_err();
        assert!(matches!(empty, StoreError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_history_queries() {
        let repo = fixture_db().sales();

        let recent: Vec<EntityId> = repo.get_recent(3).await.iter().map(|s| s.id).collect();
        assert_eq!(recent, vec![12, 11, 10]);

        let davids: Vec<EntityId> = repo.get_by_customer(4).await.iter().map(|s| s.id).collect();
        assert_eq!(davids, vec![12, 6]);

        assert_eq!(repo.get_total_revenue().await, Money::from_cents(871_249));
    }

    #[tokio::test]
    async fn test_sales_analytics_for_june() {
        let repo = fixture_db().sales();
        let range = DateRange::lookback(fixture_now(), 29);
        let summary = repo.sales_analytics(range).await;

        // 2026-06-01 00:00 onwards: sales 5 through 12
        assert_eq!(summary.total_sales, 8);
        assert_eq!(summary.top_products[0].name, "Spigen Clear Case iPhone 14 Pro");
        assert_eq!(summary.top_products[0].quantity, 6);
        assert!(summary.top_products.len() <= 5);
        assert_eq!(repo.get_in_range(range).await.len(), 8);
    }
}
