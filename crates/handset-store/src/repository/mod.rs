//! # Repository Module
//!
//! Per-entity access to the shop's tables.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller (report binary, frontend bridge)                               │
//! │       │                                                                 │
//! │       │  db.sales().complete_sale(request)                             │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── validate request            (handset-core, no lock)               │
//! │  ├── take write lock                                                   │
//! │  ├── check references, price lines                                     │
//! │  └── insert + decrement stock + customer history                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Tables (Arc<RwLock<..>>)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository offers `get_all`, `get_by_id`, `create`, `update` and
//! (where records may be removed) `delete`, plus the finders its screen
//! needs.
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers, search, store credit
//! - [`DeviceRepository`](device::DeviceRepository) - Inventory and stock filters
//! - [`SaleRepository`](sale::SaleRepository) - Checkout and sales history
//! - [`RepairRepository`](repair::RepairRepository) - Repair tickets
//! - [`SupplierRepository`](supplier::SupplierRepository) - Suppliers
//! - [`SupplierOrderRepository`](supplier_order::SupplierOrderRepository) - Purchase orders and reorder suggestions
//! - [`TradeInRepository`](trade_in::TradeInRepository) - Trade-ins and valuation
//! - [`WarrantyClaimRepository`](warranty::WarrantyClaimRepository) - Warranty claims

pub mod customer;
pub mod device;
pub mod repair;
pub mod sale;
pub mod supplier;
pub mod supplier_order;
pub mod trade_in;
pub mod warranty;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::config::ShopConfig;
    use crate::database::{Clock, Database};

    /// 18:00 UTC on the day of the last fixture sale.
    pub fn fixture_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 30, 18, 0, 0).unwrap()
    }

    pub fn fixture_db() -> Database {
        Database::new(ShopConfig::default())
            .unwrap()
            .with_clock(Clock::Fixed(fixture_now()))
    }
}
