//! # handset-core: Pure Business Logic for Handset POS
//!
//! Everything the phone shop's back office decides lives here as plain
//! functions over borrowed data. No I/O, no clocks: callers pass `now`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Handset POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           handset-report / dashboard frontend                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │   handset-store: tables, repositories, insights, config         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ borrowed slices                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ handset-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   types · money · identity · validation · drafts · lifecycle   │   │
//! │  │   checkout · inventory · trade_in · analytics · reorder        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Customers, devices, sales, repairs, suppliers, orders,
//!   trade-ins, warranty claims
//! - [`money`] - Integer-cent money
//! - [`identity`] - Id allocation and `CUST###`-style codes
//! - [`validation`] - Field-level input checks
//! - [`drafts`] - Create payloads and partial updates
//! - [`lifecycle`] - Repair, warranty and supplier-order state machines
//! - [`checkout`] - Cart pricing and sale totals
//! - [`inventory`] - Stock levels
//! - [`trade_in`] - Trade-in valuation
//! - [`analytics`] - Sales, CLV, trade-in trends, warranty statistics
//! - [`reorder`] - Velocity-based reorder suggestions
//!
//! ## Example Usage
//!
//! ```rust
//! use handset_core::money::Money;
//! use handset_core::types::TaxRate;
//!
//! let phone = Money::from_major(699);
//! let tax = phone.calculate_tax(TaxRate::default());
//! assert_eq!(tax.cents(), 5592);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod checkout;
pub mod drafts;
pub mod error;
pub mod identity;
pub mod inventory;
pub mod lifecycle;
pub mod money;
pub mod reorder;
pub mod trade_in;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use identity::{Entity, IdAllocator};
pub use lifecycle::{Lifecycle, RepairStatus, SupplierOrderStatus, WarrantyClaimStatus};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Low-stock threshold given to devices that don't set their own.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Below this many units a device counts as critically low.
pub const DEFAULT_CRITICAL_STOCK_LEVEL: i64 = 5;

/// Most lines allowed on a cart or purchase order.
pub const MAX_CART_LINES: usize = 100;

/// Most units of one device on a single line.
///
/// Catches typos such as 1000 for 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;
