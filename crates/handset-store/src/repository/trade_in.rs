//! # Trade-In Repository
//!
//! Trade-in offers, their valuation and acceptance trends.

use handset_core::analytics::{trade_in_trends, DateRange, TradeInTrends};
use handset_core::drafts::{NewTradeIn, TradeInUpdate};
use handset_core::trade_in;
use handset_core::{Customer, Entity, EntityId, Money, TradeIn, TradeInCondition};
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{StoreError, StoreResult};

/// Repository for trade-in operations.
#[derive(Debug, Clone)]
pub struct TradeInRepository {
    db: Database,
}

impl TradeInRepository {
    pub fn new(db: Database) -> Self {
        TradeInRepository { db }
    }

    /// All trade-ins, newest first.
    pub async fn get_all(&self) -> Vec<TradeIn> {
        self.filtered(|_| true).await
    }

    pub async fn get_by_id(&self, id: EntityId) -> StoreResult<TradeIn> {
        let tables = self.db.tables.read().await;
        tables.trade_ins.require(id).cloned()
    }

    /// Records an offer. A named customer must exist; walk-ins pass `None`.
    pub async fn create(&self, draft: NewTradeIn) -> StoreResult<TradeIn> {
        draft.validate()?;
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;
        if let Some(customer_id) = draft.customer_id {
            if !tables.customers.contains(customer_id) {
                return Err(StoreError::invalid_reference(Customer::KIND, customer_id));
            }
        }

        let record = tables.trade_ins.insert_with(|id| draft.into_record(id, now)).clone();

        info!(
            id = record.id,
            code = %record.trade_in_code,
            offer = %record.offer_amount,
            accepted = record.accepted,
            "Trade-in recorded"
        );
        Ok(record)
    }

    pub async fn update(&self, id: EntityId, update: TradeInUpdate) -> StoreResult<TradeIn> {
        let mut tables = self.db.tables.write().await;
        let record = tables.trade_ins.require_mut(id)?;
        record.apply(update)?;

        debug!(id, accepted = record.accepted, "Trade-in updated");
        Ok(record.clone())
    }

    pub async fn delete(&self, id: EntityId) -> StoreResult<()> {
        let mut tables = self.db.tables.write().await;
        tables.trade_ins.remove(id)?;

        info!(id, "Trade-in deleted");
        Ok(())
    }

    pub async fn get_by_customer(&self, customer_id: EntityId) -> Vec<TradeIn> {
        self.filtered(|t| t.customer_id == Some(customer_id)).await
    }

    /// Offer for a handset by model and graded condition.
    pub fn evaluate_device(&self, brand: &str, model: &str, condition: TradeInCondition) -> Money {
        let offer = trade_in::evaluate_device(brand, model, condition);
        debug!(brand, model, ?condition, offer = %offer, "Trade-in evaluated");
        offer
    }

    /// Acceptance and value trends over `range`, bucketed per config.
    pub async fn trends(&self, range: DateRange) -> TradeInTrends {
        let buckets = self.db.config().insights.trade_in_buckets;
        let tables = self.db.tables.read().await;
        trade_in_trends(tables.trade_ins.all(), range, buckets)
    }

    async fn filtered(&self, keep: impl Fn(&TradeIn) -> bool) -> Vec<TradeIn> {
        let tables = self.db.tables.read().await;
        let mut records: Vec<TradeIn> = tables
            .trade_ins
            .all()
            .iter()
            .filter(|t| keep(*t))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{fixture_db, fixture_now};

    fn draft(customer_id: Option<EntityId>) -> NewTradeIn {
        NewTradeIn {
            customer_id,
            brand: "Google".to_string(),
            model: "Pixel 8 Pro".to_string(),
            condition: TradeInCondition::Good,
            offer_amount: Money::from_major(300),
            accepted: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_order() {
        let repo = fixture_db().trade_ins();
        let record = repo.create(draft(Some(7))).await.unwrap();

        assert_eq!(record.trade_in_code, "TRADE007");
        assert_eq!(record.timestamp, fixture_now());
        assert_eq!(repo.get_all().await[0].id, 7);
        assert_eq!(repo.get_by_customer(7).await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_checks_customer() {
        let repo = fixture_db().trade_ins();
        assert!(repo.create(draft(Some(70))).await.is_err());
        assert!(repo.create(draft(None)).await.is_ok());
    }

    #[tokio::test]
    async fn test_evaluate_device() {
        let repo = fixture_db().trade_ins();
        assert_eq!(
            repo.evaluate_device("Apple", "iPhone 14 Pro", TradeInCondition::Excellent),
            Money::from_major(600)
        );
        assert_eq!(
            repo.evaluate_device("Samsung", "Galaxy S21", TradeInCondition::Good),
            Money::from_major(225)
        );
        assert_eq!(
            repo.evaluate_device("Nokia", "3310", TradeInCondition::Poor),
            Money::from_major(50)
        );
    }

    #[tokio::test]
    async fn test_update_acceptance() {
        let repo = fixture_db().trade_ins();
        let record = repo
            .update(
                2,
                TradeInUpdate {
                    accepted: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(record.accepted);
        assert!(repo.update(99, TradeInUpdate::default()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_trends_over_lookback() {
        let repo = fixture_db().trade_ins();
        let trends = repo.trends(DateRange::lookback(fixture_now(), 90)).await;

        assert_eq!(trends.total_trade_ins, 6);
        assert_eq!(trends.total_value, Money::from_cents(116_300));
        let bucket_total: usize = trends.timeline.iter().map(|b| b.count).sum();
        assert_eq!(bucket_total, 6);
    }
}
