//! # Warranty Claim Repository
//!
//! Claims raised against suppliers for devices the shop sold.
//!
//! ## Claim Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pending ──► Submitted ──┬──► Approved ──┬──► Closed                   │
//! │                          └──► Rejected ──┘                              │
//! │                                                                         │
//! │  Approved, Rejected and Closed stamp resolution_date the first time.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A claim must point at an existing sale and supplier when it is created.
//! Sale id and claim date never change afterwards.

use handset_core::analytics::{claim_statistics, ClaimStatistics};
use handset_core::drafts::{NewWarrantyClaim, WarrantyClaimUpdate};
use handset_core::{Entity, EntityId, Sale, Supplier, WarrantyClaim, WarrantyClaimStatus};
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{StoreError, StoreResult};

/// Repository for warranty claim operations.
#[derive(Debug, Clone)]
pub struct WarrantyClaimRepository {
    db: Database,
}

impl WarrantyClaimRepository {
    pub fn new(db: Database) -> Self {
        WarrantyClaimRepository { db }
    }

    /// All claims, newest claim date first.
    pub async fn get_all(&self) -> Vec<WarrantyClaim> {
        self.get_by_status(None).await
    }

    pub async fn get_by_id(&self, id: EntityId) -> StoreResult<WarrantyClaim> {
        let tables = self.db.tables.read().await;
        tables.warranty_claims.require(id).cloned()
    }

    /// Claims raised against one sale.
    pub async fn get_by_sale_id(&self, sale_id: EntityId) -> Vec<WarrantyClaim> {
        self.filtered(|c| c.sale_id == sale_id).await
    }

    /// Opens a pending claim.
    ///
    /// ## Errors
    /// - `InvalidReference` when the sale or the supplier does not exist
    /// - `Core(Validation)` for a blank description or negative amount
    pub async fn create(&self, draft: NewWarrantyClaim) -> StoreResult<WarrantyClaim> {
        draft.validate()?;
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;
        if !tables.sales.contains(draft.sale_id) {
            return Err(StoreError::invalid_reference(Sale::KIND, draft.sale_id));
        }
        if !tables.suppliers.contains(draft.supplier_id) {
            return Err(StoreError::invalid_reference(Supplier::KIND, draft.supplier_id));
        }

        let claim = tables
            .warranty_claims
            .insert_with(|id| draft.into_record(id, now))
            .clone();

        info!(
            id = claim.id,
            sale_id = claim.sale_id,
            supplier_id = claim.supplier_id,
            amount = %claim.claim_amount,
            "Warranty claim opened"
        );
        Ok(claim)
    }

    pub async fn update(&self, id: EntityId, update: WarrantyClaimUpdate) -> StoreResult<WarrantyClaim> {
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;
        let claim = tables.warranty_claims.require_mut(id)?;
        let from = claim.status;
        claim.apply(update, now)?;

        if claim.status != from {
            info!(id, %from, to = %claim.status, "Warranty claim status changed");
        } else {
            debug!(id, "Warranty claim updated");
        }
        Ok(claim.clone())
    }

    pub async fn delete(&self, id: EntityId) -> StoreResult<()> {
        let mut tables = self.db.tables.write().await;
        tables.warranty_claims.remove(id)?;

        info!(id, "Warranty claim deleted");
        Ok(())
    }

    /// Claims in `status`, or every claim for `None`. Newest first.
    pub async fn get_by_status(&self, status: Option<WarrantyClaimStatus>) -> Vec<WarrantyClaim> {
        self.filtered(|c| status.map_or(true, |s| c.status == s)).await
    }

    /// Counts per status plus claimed and approved amounts.
    pub async fn claim_statistics(&self) -> ClaimStatistics {
        let tables = self.db.tables.read().await;
        let stats = claim_statistics(tables.warranty_claims.all());
        debug!(total = stats.total, approved = %stats.approved_amount, "Claim statistics computed");
        stats
    }

    async fn filtered(&self, keep: impl Fn(&WarrantyClaim) -> bool) -> Vec<WarrantyClaim> {
        let tables = self.db.tables.read().await;
        let mut claims: Vec<WarrantyClaim> = tables
            .warranty_claims
            .all()
            .iter()
            .filter(|c| keep(*c))
            .cloned()
            .collect();
        claims.sort_by(|a, b| b.claim_date.cmp(&a.claim_date));
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{fixture_db, fixture_now};
    use handset_core::{CoreError, Money};

    fn draft(sale_id: EntityId, supplier_id: EntityId) -> NewWarrantyClaim {
        NewWarrantyClaim {
            sale_id,
            supplier_id,
            issue_description: "Earbud left channel silent".to_string(),
            serial_number: "H3KAPP00007".to_string(),
            claim_amount: Money::from_cents(17_000),
        }
    }

    #[tokio::test]
    async fn test_create_requires_sale_and_supplier() {
        let repo = fixture_db().warranty_claims();

        let err = repo.create(draft(99, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference { entity: "Sale", id: 99 }));

        let err = repo.create(draft(8, 99)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference { entity: "Supplier", id: 99 }));

        let claim = repo.create(draft(8, 1)).await.unwrap();
        assert_eq!(claim.id, 5);
        assert_eq!(claim.status, WarrantyClaimStatus::Pending);
        assert_eq!(claim.claim_date, fixture_now());
        assert_eq!(repo.get_all().await.len(), 5);
    }

    #[tokio::test]
    async fn test_resolution_date_stamped_once() {
        let repo = fixture_db().warranty_claims();
        let approve = WarrantyClaimUpdate {
            status: Some(WarrantyClaimStatus::Approved),
            supplier_response: Some("Covered".to_string()),
            ..Default::default()
        };

        let claim = repo.update(2, approve).await.unwrap();
        assert_eq!(claim.resolution_date, Some(fixture_now()));

        let closed = repo
            .update(
                1,
                WarrantyClaimUpdate {
                    status: Some(WarrantyClaimStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(closed.resolution_date.map(|d| d.to_rfc3339()), Some("2026-05-02T12:00:00+00:00".to_string()));
    }

    #[tokio::test]
    async fn test_pending_cannot_jump_to_approved() {
        let repo = fixture_db().warranty_claims();
        let err = repo
            .update(
                4,
                WarrantyClaimUpdate {
                    status: Some(WarrantyClaimStatus::Approved),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::InvalidStatusTransition { .. })));
        assert_eq!(repo.get_by_id(4).await.unwrap().status, WarrantyClaimStatus::Pending);
    }

    #[tokio::test]
    async fn test_finders_and_statistics() {
        let repo = fixture_db().warranty_claims();

        let order: Vec<EntityId> = repo.get_all().await.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
        assert_eq!(repo.get_by_status(Some(WarrantyClaimStatus::Rejected)).await[0].id, 3);
        assert_eq!(repo.get_by_sale_id(5).await.len(), 1);

        let stats = repo.claim_statistics().await;
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count_of(WarrantyClaimStatus::Pending), 1);
        assert_eq!(stats.total_claim_amount, Money::from_cents(112_000));
        assert_eq!(stats.approved_amount, Money::from_cents(42_000));

        repo.delete(3).await.unwrap();
        assert!(repo.get_by_id(3).await.is_err());
    }
}
