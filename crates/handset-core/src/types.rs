//! # Domain Types
//!
//! The records a phone shop keeps.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Customer ◄──────── Sale ───────► SaleLine ───► Device                 │
//! │     ▲                 ▲                            ▲                    │
//! │     │                 │                            │                    │
//! │  RepairTicket    WarrantyClaim ──► Supplier ◄── SupplierOrder           │
//! │     ▲                                               │                   │
//! │  TradeIn                                   SupplierOrderItem ──► Device │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! Every record has a numeric `id` (positive, unique per collection, never
//! reused) and, for most, a human-readable code such as `CUST004` that is
//! derived from the id at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::identity::Entity;
use crate::lifecycle::{Lifecycle, RepairStatus, SupplierOrderStatus, WarrantyClaimStatus};
use crate::money::Money;

/// Numeric identity key shared by every collection.
pub type EntityId = u32;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (800 bps = 8%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The rate as a percentage, for display only.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    /// The shop's register rate of 8%.
    fn default() -> Self {
        TaxRate(800)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: EntityId,
    /// Human-readable code, `CUST###`.
    pub customer_code: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[ts(as = "String")]
    pub registration_date: DateTime<Utc>,
    /// Sale ids, oldest first.
    #[serde(default)]
    pub purchase_history: Vec<EntityId>,
    /// Repair ticket ids, oldest first.
    #[serde(default)]
    pub repair_history: Vec<EntityId>,
    /// Credit the customer can spend in store.
    #[serde(default)]
    pub store_credit: Money,
}

impl Entity for Customer {
    const KIND: &'static str = "Customer";

    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// Device
// =============================================================================

/// What kind of stock item a device is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DeviceCategory {
    #[default]
    Smartphone,
    Tablet,
    Accessory,
}

/// Physical condition of a stocked device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DeviceCondition {
    #[default]
    New,
    Refurbished,
    Used,
}

/// A stocked device or accessory.
///
/// `quantity` is the only stock signal. Sales decrement it, supplier
/// receipts increment it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: EntityId,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub category: DeviceCategory,
    #[serde(default)]
    pub condition: DeviceCondition,
    pub quantity: i64,
    pub sale_price: Money,
    /// Purchase cost per unit, used as the reorder unit cost.
    pub cost: Money,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub imei: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[ts(as = "String")]
    pub date_added: DateTime<Utc>,
}

pub(crate) fn default_low_stock_threshold() -> i64 {
    crate::DEFAULT_LOW_STOCK_THRESHOLD
}

impl Device {
    /// Display name, e.g. "Apple iPhone 13".
    pub fn name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }

    /// Checks whether `quantity` units can be sold right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

impl Entity for Device {
    const KIND: &'static str = "Device";

    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// Sale
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
}

/// A line on a sale. Name and price are frozen at the time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub device_id: EntityId,
    pub name: String,
    pub quantity: i64,
    /// Unit price at the time of sale.
    pub price: Money,
}

impl SaleLine {
    /// `price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// A completed sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: EntityId,
    /// Human-readable code, `SALE###`.
    pub sale_code: String,
    /// `None` for walk-in sales.
    #[serde(default)]
    pub customer_id: Option<EntityId>,
    pub items: Vec<SaleLine>,
    pub subtotal: Money,
    /// Discount amount taken off the subtotal.
    #[serde(default)]
    pub discount: Money,
    /// Discount percentage in basis points, as entered at the register.
    #[serde(default)]
    pub discount_bps: u32,
    pub tax: Money,
    pub total: Money,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Sale {
    /// Units of one device sold on this sale.
    pub fn units_of(&self, device_id: EntityId) -> i64 {
        self.items
            .iter()
            .filter(|line| line.device_id == device_id)
            .map(|line| line.quantity)
            .sum()
    }
}

impl Entity for Sale {
    const KIND: &'static str = "Sale";

    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// Repair Ticket
// =============================================================================

/// A device booked in for repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RepairTicket {
    pub id: EntityId,
    /// Human-readable code, `REP###`.
    pub ticket_code: String,
    pub customer_id: EntityId,
    pub device_imei: String,
    #[serde(default)]
    pub device_model: String,
    pub issue_description: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    pub status: RepairStatus,
    pub estimated_cost: Money,
    #[serde(default)]
    pub actual_cost: Option<Money>,
    #[ts(as = "String")]
    pub date_received: DateTime<Utc>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date_completed: Option<DateTime<Utc>>,
}

impl RepairTicket {
    /// Still on the bench: neither completed nor cancelled.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

impl Entity for RepairTicket {
    const KIND: &'static str = "Repair ticket";

    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SupplierStatus {
    #[default]
    Active,
    Inactive,
}

/// A wholesaler the shop buys stock from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: EntityId,
    /// Human-readable code, `SUP###`.
    pub supplier_code: String,
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: SupplierStatus,
}

impl Entity for Supplier {
    const KIND: &'static str = "Supplier";

    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// Supplier Order
// =============================================================================

/// One line on a purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrderItem {
    pub device_id: EntityId,
    pub quantity: i64,
    pub unit_cost: Money,
}

impl SupplierOrderItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_cost.multiply_quantity(self.quantity)
    }
}

/// A purchase order placed with a supplier.
///
/// `total_cost` is derived from `items` and is never set directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrder {
    pub id: EntityId,
    pub supplier_id: EntityId,
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expected_delivery: Option<DateTime<Utc>>,
    pub status: SupplierOrderStatus,
    pub items: Vec<SupplierOrderItem>,
    pub total_cost: Money,
    #[serde(default)]
    pub notes: String,
}

impl SupplierOrder {
    /// Sum of `quantity × unit_cost` over the lines.
    pub fn total_for(items: &[SupplierOrderItem]) -> Money {
        items.iter().map(SupplierOrderItem::line_total).sum()
    }
}

impl Entity for SupplierOrder {
    const KIND: &'static str = "Supplier order";

    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// Trade-In
// =============================================================================

/// Graded condition of a handset offered for trade-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TradeInCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// A trade-in offer made to a customer, accepted or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TradeIn {
    pub id: EntityId,
    /// Human-readable code, `TRADE###`.
    pub trade_in_code: String,
    #[serde(default)]
    pub customer_id: Option<EntityId>,
    pub brand: String,
    pub model: String,
    pub condition: TradeInCondition,
    pub offer_amount: Money,
    pub accepted: bool,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Entity for TradeIn {
    const KIND: &'static str = "Trade-in";

    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// Warranty Claim
// =============================================================================

/// A warranty claim raised against a supplier for a sold device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyClaim {
    pub id: EntityId,
    pub sale_id: EntityId,
    pub supplier_id: EntityId,
    #[ts(as = "String")]
    pub claim_date: DateTime<Utc>,
    pub issue_description: String,
    #[serde(default)]
    pub serial_number: String,
    pub claim_amount: Money,
    pub status: WarrantyClaimStatus,
    #[serde(default)]
    pub supplier_response: String,
    /// Stamped the first time the claim reaches Approved, Rejected or Closed.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub resolution_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolution_notes: String,
}

impl Entity for WarrantyClaim {
    const KIND: &'static str = "Warranty claim";

    fn id(&self) -> EntityId {
        self.id
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
