//! # Supplier Order Repository
//!
//! Purchase orders and the reorder suggestions that feed them.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create()              update(status)          update(status)           │
//! │  ──────────► Pending ─────────────► Ordered ─────────────► Received     │
//! │                 │                      │                   (+ stock)    │
//! │                 └──────────┬───────────┘                                │
//! │                            ▼                                            │
//! │                        Cancelled                                        │
//! │                                                                         │
//! │  Received and Cancelled orders are read-only.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Receiving
//! The move to Received and the stock increase for every line commit
//! together under the write lock. The update is applied to a copy first;
//! the table only changes once every line's device is known to exist.

use handset_core::drafts::{NewSupplierOrder, SupplierOrderUpdate};
use handset_core::reorder::{evaluate_devices, suggest_reorders, to_order_items, ReorderSuggestion};
use handset_core::{Device, Entity, EntityId, Supplier, SupplierOrder, SupplierOrderItem, SupplierOrderStatus};
use tracing::{debug, info};

use crate::database::{Database, Tables};
use crate::error::{StoreError, StoreResult};

/// Repository for supplier order operations.
#[derive(Debug, Clone)]
pub struct SupplierOrderRepository {
    db: Database,
}

impl SupplierOrderRepository {
    pub fn new(db: Database) -> Self {
        SupplierOrderRepository { db }
    }

    /// All orders, most recent order date first.
    pub async fn get_all(&self) -> Vec<SupplierOrder> {
        self.filtered(|_| true).await
    }

    pub async fn get_by_id(&self, id: EntityId) -> StoreResult<SupplierOrder> {
        let tables = self.db.tables.read().await;
        tables.supplier_orders.require(id).cloned()
    }

    /// Places a pending order. The supplier and every line's device must
    /// exist.
    pub async fn create(&self, draft: NewSupplierOrder) -> StoreResult<SupplierOrder> {
        draft.validate()?;
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;
        if !tables.suppliers.contains(draft.supplier_id) {
            return Err(StoreError::invalid_reference(Supplier::KIND, draft.supplier_id));
        }
        check_devices(&tables, &draft.items)?;

        let order = tables
            .supplier_orders
            .insert_with(|id| draft.into_record(id, now))
            .clone();

        info!(
            id = order.id,
            supplier_id = order.supplier_id,
            lines = order.items.len(),
            total_cost = %order.total_cost,
            "Supplier order created"
        );
        Ok(order)
    }

    /// Applies an update. Moving to Received adds every line's quantity
    /// to its device's stock in the same commit.
    pub async fn update(&self, id: EntityId, update: SupplierOrderUpdate) -> StoreResult<SupplierOrder> {
        let mut tables = self.db.tables.write().await;
        let current = tables.supplier_orders.require(id)?;

        let receiving = update.status == Some(SupplierOrderStatus::Received)
            && current.status != SupplierOrderStatus::Received;
        let items_replaced = update.items.is_some();

        let mut next = current.clone();
        next.apply(update)?;
        if receiving || items_replaced {
            check_devices(&tables, &next.items)?;
        }

        if receiving {
            for item in &next.items {
                if let Some(device) = tables.devices.get_mut(item.device_id) {
                    device.quantity += item.quantity;
                }
            }
            info!(
                id,
                lines = next.items.len(),
                units = next.items.iter().map(|i| i.quantity).sum::<i64>(),
                "Supplier order received"
            );
        } else {
            debug!(id, status = %next.status, "Supplier order updated");
        }

        tables.supplier_orders.replace(next.clone())?;
        Ok(next)
    }

    /// Shorthand for an update that only changes status.
    pub async fn update_status(&self, id: EntityId, status: SupplierOrderStatus) -> StoreResult<SupplierOrder> {
        self.update(
            id,
            SupplierOrderUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Removes an order. Stock already received stays on hand.
    pub async fn delete(&self, id: EntityId) -> StoreResult<()> {
        let mut tables = self.db.tables.write().await;
        let removed = tables.supplier_orders.remove(id)?;

        info!(id, status = %removed.status, "Supplier order deleted");
        Ok(())
    }

    pub async fn get_by_supplier(&self, supplier_id: EntityId) -> Vec<SupplierOrder> {
        self.filtered(|o| o.supplier_id == supplier_id).await
    }

    pub async fn get_by_status(&self, status: SupplierOrderStatus) -> Vec<SupplierOrder> {
        self.filtered(|o| o.status == status).await
    }

    // =========================================================================
    // Reorder Suggestions
    // =========================================================================

    /// Devices that should be restocked, most urgent first.
    pub async fn get_suggested_items(&self) -> Vec<ReorderSuggestion> {
        let policy = self.db.config().reorder_policy();
        let now = self.db.now();
        let tables = self.db.tables.read().await;

        let suggestions = suggest_reorders(tables.devices.all(), tables.sales.all(), now, &policy);
        debug!(count = suggestions.len(), window_days = policy.window_days, "Reorder suggestions computed");
        suggestions
    }

    /// Projection for every device, including those that need nothing.
    pub async fn stock_projection(&self) -> Vec<ReorderSuggestion> {
        let policy = self.db.config().reorder_policy();
        let now = self.db.now();
        let tables = self.db.tables.read().await;
        evaluate_devices(tables.devices.all(), tables.sales.all(), now, &policy)
    }

    /// Turns approved suggestions into one pending order for `supplier_id`.
    ///
    /// Suggestions with a zero quantity are skipped; if nothing is left the
    /// order fails validation.
    pub async fn create_from_suggestions(
        &self,
        supplier_id: EntityId,
        suggestions: &[ReorderSuggestion],
        notes: impl Into<String>,
    ) -> StoreResult<SupplierOrder> {
        let draft = NewSupplierOrder {
            supplier_id,
            expected_delivery: None,
            items: to_order_items(suggestions),
            notes: notes.into(),
        };
        self.create(draft).await
    }

    async fn filtered(&self, keep: impl Fn(&SupplierOrder) -> bool) -> Vec<SupplierOrder> {
        let tables = self.db.tables.read().await;
        let mut orders: Vec<SupplierOrder> = tables
            .supplier_orders
            .all()
            .iter()
            .filter(|o| keep(*o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        orders
    }
}

fn check_devices(tables: &Tables, items: &[SupplierOrderItem]) -> StoreResult<()> {
    match items.iter().find(|item| !tables.devices.contains(item.device_id)) {
        Some(missing) => Err(StoreError::invalid_reference(Device::KIND, missing.device_id)),
        None => Ok(()),
    }
}
