//! # Repair Repository
//!
//! Repair tickets and their status progression.
//!
//! ```text
//!   Received ──► Diagnosed ──► In Progress ──► Completed
//!       │            │              │
//!       └────────────┴──────────────┴────────► Cancelled
//! ```
//!
//! Creating a ticket appends it to the customer's repair history under the
//! same write lock.

use handset_core::drafts::{NewRepairTicket, RepairTicketUpdate};
use handset_core::{Customer, Entity, EntityId, RepairStatus, RepairTicket};
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{StoreError, StoreResult};

/// Repository for repair ticket operations.
#[derive(Debug, Clone)]
pub struct RepairRepository {
    db: Database,
}

impl RepairRepository {
    pub fn new(db: Database) -> Self {
        RepairRepository { db }
    }

    /// All tickets, most recently received first.
    pub async fn get_all(&self) -> Vec<RepairTicket> {
        let tables = self.db.tables.read().await;
        newest_first(tables.repairs.all().to_vec())
    }

    pub async fn get_by_id(&self, id: EntityId) -> StoreResult<RepairTicket> {
        let tables = self.db.tables.read().await;
        tables.repairs.require(id).cloned()
    }

    /// Opens a ticket in status Received. The customer must exist.
    pub async fn create(&self, draft: NewRepairTicket) -> StoreResult<RepairTicket> {
        draft.validate()?;
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;
        let customer_id = draft.customer_id;
        if !tables.customers.contains(customer_id) {
            return Err(StoreError::invalid_reference(Customer::KIND, customer_id));
        }

        let ticket = tables.repairs.insert_with(|id| draft.into_record(id, now)).clone();
        if let Some(customer) = tables.customers.get_mut(customer_id) {
            customer.repair_history.push(ticket.id);
        }

        info!(id = ticket.id, code = %ticket.ticket_code, customer_id, "Repair ticket opened");
        Ok(ticket)
    }

    /// Edits description, diagnosis and costs. Status is left alone.
    pub async fn update(&self, id: EntityId, update: RepairTicketUpdate) -> StoreResult<RepairTicket> {
        let mut tables = self.db.tables.write().await;
        let ticket = tables.repairs.require_mut(id)?;
        ticket.apply(update)?;

        debug!(id, "Repair ticket updated");
        Ok(ticket.clone())
    }

    /// Moves a ticket to `status`. Completing stamps the completion date.
    pub async fn update_status(&self, id: EntityId, status: RepairStatus) -> StoreResult<RepairTicket> {
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;
        let ticket = tables.repairs.require_mut(id)?;
        let from = ticket.status;
        ticket.set_status(status, now)?;

        info!(id, %from, to = %status, "Repair status changed");
        Ok(ticket.clone())
    }

    /// Removes a ticket and drops it from the customer's repair history.
    pub async fn delete(&self, id: EntityId) -> StoreResult<()> {
        let mut tables = self.db.tables.write().await;
        let removed = tables.repairs.remove(id)?;

        if let Some(customer) = tables.customers.get_mut(removed.customer_id) {
            customer.repair_history.retain(|ticket_id| *ticket_id != id);
        }

        info!(id, code = %removed.ticket_code, "Repair ticket deleted");
        Ok(())
    }

    pub async fn get_by_status(&self, status: RepairStatus) -> Vec<RepairTicket> {
        self.filtered(|t| t.status == status).await
    }

    pub async fn get_by_customer(&self, customer_id: EntityId) -> Vec<RepairTicket> {
        self.filtered(|t| t.customer_id == customer_id).await
    }

    /// Tickets neither Completed nor Cancelled.
    pub async fn get_active_repairs(&self) -> Vec<RepairTicket> {
        let active = self.filtered(RepairTicket::is_active).await;
        debug!(count = active.len(), "Active repairs");
        active
    }

    async fn filtered(&self, keep: impl Fn(&RepairTicket) -> bool) -> Vec<RepairTicket> {
        let tables = self.db.tables.read().await;
        newest_first(tables.repairs.all().iter().filter(|t| keep(*t)).cloned().collect())
    }
}

fn newest_first(mut tickets: Vec<RepairTicket>) -> Vec<RepairTicket> {
    tickets.sort_by(|a, b| b.date_received.cmp(&a.date_received));
    tickets
}
