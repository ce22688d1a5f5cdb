//! # Lifecycles
//!
//! Status state machines for repair tickets, warranty claims and supplier
//! orders.
//!
//! ## Repair Ticket
//! ```text
//!   Received ──► Diagnosed ──► In Progress ──► Completed
//!      │             │              │
//!      └─────────────┴──────────────┴────────► Cancelled
//! ```
//! `Completed` stamps `dateCompleted`. Both end states are final.
//!
//! ## Warranty Claim
//! ```text
//!   Pending ──► Submitted ──┬──► Approved ──┐
//!                           └──► Rejected ──┴──► Closed
//! ```
//! Approved, Rejected and Closed stamp `resolutionDate` once.
//!
//! ## Supplier Order
//! ```text
//!   Pending ──► Ordered ──► Received
//!      │           │
//!      └───────────┴──────► Cancelled
//! ```
//! `Received` adds every line's quantity to stock (see handset-store).

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::EntityId;

/// A status enum with a transition table.
pub trait Lifecycle: Copy + Eq + fmt::Display {
    /// No further transitions once reached.
    fn is_terminal(self) -> bool;

    /// Whether `self → next` is a legal move.
    fn can_transition_to(self, next: Self) -> bool;
}

/// Checks a status change, returning a descriptive error when it is illegal.
pub fn check_transition<S: Lifecycle>(
    entity: &'static str,
    id: EntityId,
    from: S,
    to: S,
) -> CoreResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidStatusTransition {
            entity,
            id,
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

// =============================================================================
// Repair Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RepairStatus {
    Received,
    Diagnosed,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl RepairStatus {
    pub const ALL: [RepairStatus; 5] = [
        RepairStatus::Received,
        RepairStatus::Diagnosed,
        RepairStatus::InProgress,
        RepairStatus::Completed,
        RepairStatus::Cancelled,
    ];

    /// The next step on the bench, if any.
    pub fn next(self) -> Option<RepairStatus> {
        match self {
            RepairStatus::Received => Some(RepairStatus::Diagnosed),
            RepairStatus::Diagnosed => Some(RepairStatus::InProgress),
            RepairStatus::InProgress => Some(RepairStatus::Completed),
            RepairStatus::Completed | RepairStatus::Cancelled => None,
        }
    }
}

impl Lifecycle for RepairStatus {
    fn is_terminal(self) -> bool {
        matches!(self, RepairStatus::Completed | RepairStatus::Cancelled)
    }

    fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == self || next == RepairStatus::Cancelled || self.next() == Some(next)
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepairStatus::Received => "Received",
            RepairStatus::Diagnosed => "Diagnosed",
            RepairStatus::InProgress => "In Progress",
            RepairStatus::Completed => "Completed",
            RepairStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Warranty Claim Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum WarrantyClaimStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
    Closed,
}

impl WarrantyClaimStatus {
    pub const ALL: [WarrantyClaimStatus; 5] = [
        WarrantyClaimStatus::Pending,
        WarrantyClaimStatus::Submitted,
        WarrantyClaimStatus::Approved,
        WarrantyClaimStatus::Rejected,
        WarrantyClaimStatus::Closed,
    ];

    /// Entering one of these stamps the resolution date.
    pub fn is_resolution(self) -> bool {
        matches!(
            self,
            WarrantyClaimStatus::Approved
                | WarrantyClaimStatus::Rejected
                | WarrantyClaimStatus::Closed
        )
    }
}

impl Lifecycle for WarrantyClaimStatus {
    fn is_terminal(self) -> bool {
        self == WarrantyClaimStatus::Closed
    }

    /// Repeating the current status is always allowed so that notes and
    /// responses can be edited without moving the claim.
    fn can_transition_to(self, next: Self) -> bool {
        use WarrantyClaimStatus::*;

        if next == self {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Submitted)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (Approved, Closed)
                | (Rejected, Closed)
        )
    }
}

impl fmt::Display for WarrantyClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WarrantyClaimStatus::Pending => "Pending",
            WarrantyClaimStatus::Submitted => "Submitted",
            WarrantyClaimStatus::Approved => "Approved",
            WarrantyClaimStatus::Rejected => "Rejected",
            WarrantyClaimStatus::Closed => "Closed",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Supplier Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SupplierOrderStatus {
    Pending,
    Ordered,
    Received,
    Cancelled,
}

impl SupplierOrderStatus {
    pub const ALL: [SupplierOrderStatus; 4] = [
        SupplierOrderStatus::Pending,
        SupplierOrderStatus::Ordered,
        SupplierOrderStatus::Received,
        SupplierOrderStatus::Cancelled,
    ];
}

impl Lifecycle for SupplierOrderStatus {
    fn is_terminal(self) -> bool {
        matches!(
            self,
            SupplierOrderStatus::Received | SupplierOrderStatus::Cancelled
        )
    }

    fn can_transition_to(self, next: Self) -> bool {
        use SupplierOrderStatus::*;

        if self.is_terminal() {
            return false;
        }
        if next == self {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Ordered) | (Ordered, Received) | (Pending, Cancelled) | (Ordered, Cancelled)
        )
    }
}

impl fmt::Display for SupplierOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SupplierOrderStatus::Pending => "Pending",
            SupplierOrderStatus::Ordered => "Ordered",
            SupplierOrderStatus::Received => "Received",
            SupplierOrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
