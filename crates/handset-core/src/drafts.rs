//! # Drafts and Patches
//!
//! Create payloads (`New*`) and partial updates (`*Update`) for every
//! editable record, with the rules for turning them into records.
//!
//! ```text
//!   NewCustomer ──validate()──► into_record(id, now) ──► Customer
//!   CustomerUpdate ──────────► Customer::apply(update)
//! ```
//!
//! Every `apply` checks all of its inputs before touching the record, so a
//! failed update leaves the record exactly as it was. Ids, codes and
//! creation timestamps never appear in an update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::identity::{business_code, prefix, Entity};
use crate::lifecycle::{
    check_transition, Lifecycle, RepairStatus, SupplierOrderStatus, WarrantyClaimStatus,
};
use crate::money::Money;
use crate::types::{
    Customer, Device, DeviceCategory, DeviceCondition, EntityId, RepairTicket, Supplier,
    SupplierOrder, SupplierOrderItem, SupplierStatus, TradeIn, TradeInCondition, WarrantyClaim,
};
use crate::validation::{
    validate_amount, validate_email, validate_imei, validate_line_count, validate_phone,
    validate_quantity, validate_required, validate_stock_level, validate_text,
};

const MAX_NAME_LEN: usize = 100;

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewCustomer {
    pub fn validate(&self) -> CoreResult<()> {
        validate_required("name", &self.name, MAX_NAME_LEN)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        Ok(())
    }

    /// Builds the record with empty histories and no store credit.
    pub fn into_record(self, id: EntityId, now: DateTime<Utc>) -> Customer {
        Customer {
            id,
            customer_code: business_code(prefix::CUSTOMER, id),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            registration_date: now,
            purchase_history: Vec::new(),
            repair_history: Vec::new(),
            store_credit: Money::zero(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Customer {
    pub fn apply(&mut self, update: CustomerUpdate) -> CoreResult<()> {
        if let Some(name) = &update.name {
            validate_required("name", name, MAX_NAME_LEN)?;
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if let Some(phone) = &update.phone {
            validate_phone(phone)?;
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = update.phone {
            self.phone = phone.trim().to_string();
        }
        Ok(())
    }
}

// =============================================================================
// Devices
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub category: DeviceCategory,
    #[serde(default)]
    pub condition: DeviceCondition,
    pub quantity: i64,
    pub sale_price: Money,
    pub cost: Money,
    #[serde(default = "crate::types::default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub imei: String,
    #[serde(default)]
    pub serial_number: Option<String>,
}

/// Accessories carry no IMEI; an empty one is accepted for any category.
fn validate_optional_imei(imei: &str) -> CoreResult<()> {
    if !imei.trim().is_empty() {
        validate_imei(imei)?;
    }
    Ok(())
}

impl NewDevice {
    pub fn validate(&self) -> CoreResult<()> {
        validate_required("brand", &self.brand, MAX_NAME_LEN)?;
        validate_required("model", &self.model, MAX_NAME_LEN)?;
        validate_stock_level("quantity", self.quantity)?;
        validate_stock_level("lowStockThreshold", self.low_stock_threshold)?;
        validate_amount("salePrice", self.sale_price)?;
        validate_amount("cost", self.cost)?;
        validate_optional_imei(&self.imei)?;
        Ok(())
    }

    pub fn into_record(self, id: EntityId, now: DateTime<Utc>) -> Device {
        Device {
            id,
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            category: self.category,
            condition: self.condition,
            quantity: self.quantity,
            sale_price: self.sale_price,
            cost: self.cost,
            low_stock_threshold: self.low_stock_threshold,
            imei: self.imei.trim().to_string(),
            serial_number: self.serial_number,
            date_added: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<DeviceCategory>,
    pub condition: Option<DeviceCondition>,
    pub quantity: Option<i64>,
    pub sale_price: Option<Money>,
    pub cost: Option<Money>,
    pub low_stock_threshold: Option<i64>,
    pub imei: Option<String>,
    pub serial_number: Option<String>,
}

impl Device {
    pub fn apply(&mut self, update: DeviceUpdate) -> CoreResult<()> {
        if let Some(brand) = &update.brand {
            validate_required("brand", brand, MAX_NAME_LEN)?;
        }
        if let Some(model) = &update.model {
            validate_required("model", model, MAX_NAME_LEN)?;
        }
        if let Some(quantity) = update.quantity {
            validate_stock_level("quantity", quantity)?;
        }
        if let Some(threshold) = update.low_stock_threshold {
            validate_stock_level("lowStockThreshold", threshold)?;
        }
        if let Some(price) = update.sale_price {
            validate_amount("salePrice", price)?;
        }
        if let Some(cost) = update.cost {
            validate_amount("cost", cost)?;
        }
        if let Some(imei) = &update.imei {
            validate_optional_imei(imei)?;
        }

        if let Some(brand) = update.brand {
            self.brand = brand.trim().to_string();
        }
        if let Some(model) = update.model {
            self.model = model.trim().to_string();
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(condition) = update.condition {
            self.condition = condition;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = update.sale_price {
            self.sale_price = price;
        }
        if let Some(cost) = update.cost {
            self.cost = cost;
        }
        if let Some(threshold) = update.low_stock_threshold {
            self.low_stock_threshold = threshold;
        }
        if let Some(imei) = update.imei {
            self.imei = imei.trim().to_string();
        }
        if update.serial_number.is_some() {
            self.serial_number = update.serial_number;
        }
        Ok(())
    }
}

// =============================================================================
// Repair Tickets
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewRepairTicket {
    pub customer_id: EntityId,
    pub device_imei: String,
    #[serde(default)]
    pub device_model: String,
    pub issue_description: String,
    pub estimated_cost: Money,
}

impl NewRepairTicket {
    pub fn validate(&self) -> CoreResult<()> {
        validate_imei(&self.device_imei)?;
        validate_required("issueDescription", &self.issue_description, 2000)?;
        validate_amount("estimatedCost", self.estimated_cost)?;
        Ok(())
    }

    /// Builds a freshly received ticket.
    pub fn into_record(self, id: EntityId, now: DateTime<Utc>) -> RepairTicket {
        RepairTicket {
            id,
            ticket_code: business_code(prefix::REPAIR, id),
            customer_id: self.customer_id,
            device_imei: self.device_imei.trim().to_string(),
            device_model: self.device_model.trim().to_string(),
            issue_description: self.issue_description.trim().to_string(),
            diagnosis: None,
            status: RepairStatus::Received,
            estimated_cost: self.estimated_cost,
            actual_cost: None,
            date_received: now,
            date_completed: None,
        }
    }
}

/// Field edits on a ticket. Status moves go through
/// [`RepairTicket::set_status`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RepairTicketUpdate {
    pub issue_description: Option<String>,
    pub diagnosis: Option<String>,
    pub estimated_cost: Option<Money>,
    pub actual_cost: Option<Money>,
}

impl RepairTicket {
    pub fn apply(&mut self, update: RepairTicketUpdate) -> CoreResult<()> {
        if let Some(issue) = &update.issue_description {
            validate_required("issueDescription", issue, 2000)?;
        }
        if let Some(diagnosis) = &update.diagnosis {
            validate_text("diagnosis", diagnosis)?;
        }
        if let Some(cost) = update.estimated_cost {
            validate_amount("estimatedCost", cost)?;
        }
        if let Some(cost) = update.actual_cost {
            validate_amount("actualCost", cost)?;
        }

        if let Some(issue) = update.issue_description {
            self.issue_description = issue.trim().to_string();
        }
        if update.diagnosis.is_some() {
            self.diagnosis = update.diagnosis;
        }
        if let Some(cost) = update.estimated_cost {
            self.estimated_cost = cost;
        }
        if update.actual_cost.is_some() {
            self.actual_cost = update.actual_cost;
        }
        Ok(())
    }

    /// Moves the ticket along its lifecycle. Completing stamps the
    /// completion date; no other move stamps anything.
    pub fn set_status(&mut self, status: RepairStatus, now: DateTime<Utc>) -> CoreResult<()> {
        check_transition(Self::KIND, self.id, self.status, status)?;

        if status == RepairStatus::Completed && self.status != RepairStatus::Completed {
            self.date_completed = Some(now);
        }
        self.status = status;
        Ok(())
    }
}

// =============================================================================
// Suppliers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub status: SupplierStatus,
}

impl NewSupplier {
    pub fn validate(&self) -> CoreResult<()> {
        validate_required("name", &self.name, MAX_NAME_LEN)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        Ok(())
    }

    pub fn into_record(self, id: EntityId) -> Supplier {
        Supplier {
            id,
            supplier_code: business_code(prefix::SUPPLIER, id),
            name: self.name.trim().to_string(),
            contact_person: self.contact_person.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<SupplierStatus>,
}

impl Supplier {
    pub fn apply(&mut self, update: SupplierUpdate) -> CoreResult<()> {
        if let Some(name) = &update.name {
            validate_required("name", name, MAX_NAME_LEN)?;
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if let Some(phone) = &update.phone {
            validate_phone(phone)?;
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(contact) = update.contact_person {
            self.contact_person = contact.trim().to_string();
        }
        if let Some(email) = update.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = update.phone {
            self.phone = phone.trim().to_string();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }
}

// =============================================================================
// Supplier Orders
// =============================================================================

fn validate_order_items(items: &[SupplierOrderItem]) -> CoreResult<()> {
    validate_line_count("items", items.len())?;
    for item in items {
        validate_quantity(item.quantity)?;
        validate_amount("unitCost", item.unit_cost)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplierOrder {
    pub supplier_id: EntityId,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expected_delivery: Option<DateTime<Utc>>,
    pub items: Vec<SupplierOrderItem>,
    #[serde(default)]
    pub notes: String,
}

impl NewSupplierOrder {
    pub fn validate(&self) -> CoreResult<()> {
        validate_order_items(&self.items)?;
        validate_text("notes", &self.notes)?;
        Ok(())
    }

    /// Builds a pending order with its total derived from the lines.
    pub fn into_record(self, id: EntityId, now: DateTime<Utc>) -> SupplierOrder {
        SupplierOrder {
            id,
            supplier_id: self.supplier_id,
            order_date: now,
            expected_delivery: self.expected_delivery,
            status: SupplierOrderStatus::Pending,
            total_cost: SupplierOrder::total_for(&self.items),
            items: self.items,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrderUpdate {
    #[ts(as = "Option<String>")]
    pub expected_delivery: Option<DateTime<Utc>>,
    pub status: Option<SupplierOrderStatus>,
    pub items: Option<Vec<SupplierOrderItem>>,
    pub notes: Option<String>,
}

impl SupplierOrder {
    /// Applies an update. Replacing the lines recomputes `total_cost`.
    ///
    /// Orders that are Received or Cancelled are read-only.
    pub fn apply(&mut self, update: SupplierOrderUpdate) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(CoreError::RecordLocked {
                entity: Self::KIND,
                id: self.id,
                status: self.status.to_string(),
            });
        }
        if let Some(status) = update.status {
            check_transition(Self::KIND, self.id, self.status, status)?;
        }
        if let Some(items) = &update.items {
            validate_order_items(items)?;
        }
        if let Some(notes) = &update.notes {
            validate_text("notes", notes)?;
        }

        if update.expected_delivery.is_some() {
            self.expected_delivery = update.expected_delivery;
        }
        if let Some(items) = update.items {
            self.total_cost = SupplierOrder::total_for(&items);
            self.items = items;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }
}

// =============================================================================
// Trade-Ins
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewTradeIn {
    #[serde(default)]
    pub customer_id: Option<EntityId>,
    pub brand: String,
    pub model: String,
    pub condition: TradeInCondition,
    pub offer_amount: Money,
    #[serde(default)]
    pub accepted: bool,
}

impl NewTradeIn {
    pub fn validate(&self) -> CoreResult<()> {
        validate_required("brand", &self.brand, MAX_NAME_LEN)?;
        validate_required("model", &self.model, MAX_NAME_LEN)?;
        validate_amount("offerAmount", self.offer_amount)?;
        Ok(())
    }

    pub fn into_record(self, id: EntityId, now: DateTime<Utc>) -> TradeIn {
        TradeIn {
            id,
            trade_in_code: business_code(prefix::TRADE_IN, id),
            customer_id: self.customer_id,
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            condition: self.condition,
            offer_amount: self.offer_amount,
            accepted: self.accepted,
            timestamp: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TradeInUpdate {
    pub condition: Option<TradeInCondition>,
    pub offer_amount: Option<Money>,
    pub accepted: Option<bool>,
}

impl TradeIn {
    pub fn apply(&mut self, update: TradeInUpdate) -> CoreResult<()> {
        if let Some(offer) = update.offer_amount {
            validate_amount("offerAmount", offer)?;
            self.offer_amount = offer;
        }
        if let Some(condition) = update.condition {
            self.condition = condition;
        }
        if let Some(accepted) = update.accepted {
            self.accepted = accepted;
        }
        Ok(())
    }
}

// =============================================================================
// Warranty Claims
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewWarrantyClaim {
    pub sale_id: EntityId,
    pub supplier_id: EntityId,
    pub issue_description: String,
    #[serde(default)]
    pub serial_number: String,
    pub claim_amount: Money,
}

impl NewWarrantyClaim {
    pub fn validate(&self) -> CoreResult<()> {
        validate_required("issueDescription", &self.issue_description, 2000)?;
        validate_amount("claimAmount", self.claim_amount)?;
        Ok(())
    }

    /// Builds a pending claim with no supplier response yet.
    pub fn into_record(self, id: EntityId, now: DateTime<Utc>) -> WarrantyClaim {
        WarrantyClaim {
            id,
            sale_id: self.sale_id,
            supplier_id: self.supplier_id,
            claim_date: now,
            issue_description: self.issue_description.trim().to_string(),
            serial_number: self.serial_number.trim().to_string(),
            claim_amount: self.claim_amount,
            status: WarrantyClaimStatus::Pending,
            supplier_response: String::new(),
            resolution_date: None,
            resolution_notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyClaimUpdate {
    pub issue_description: Option<String>,
    pub serial_number: Option<String>,
    pub claim_amount: Option<Money>,
    pub status: Option<WarrantyClaimStatus>,
    pub supplier_response: Option<String>,
    pub resolution_notes: Option<String>,
}

impl WarrantyClaim {
    /// Applies an update. Entering Approved, Rejected or Closed stamps the
    /// resolution date unless one is already set.
    pub fn apply(&mut self, update: WarrantyClaimUpdate, now: DateTime<Utc>) -> CoreResult<()> {
        if let Some(status) = update.status {
            check_transition(Self::KIND, self.id, self.status, status)?;
        }
        if let Some(issue) = &update.issue_description {
            validate_required("issueDescription", issue, 2000)?;
        }
        if let Some(amount) = update.claim_amount {
            validate_amount("claimAmount", amount)?;
        }
        if let Some(response) = &update.supplier_response {
            validate_text("supplierResponse", response)?;
        }
        if let Some(notes) = &update.resolution_notes {
            validate_text("resolutionNotes", notes)?;
        }

        if let Some(issue) = update.issue_description {
            self.issue_description = issue.trim().to_string();
        }
        if let Some(serial) = update.serial_number {
            self.serial_number = serial.trim().to_string();
        }
        if let Some(amount) = update.claim_amount {
            self.claim_amount = amount;
        }
        if let Some(response) = update.supplier_response {
            self.supplier_response = response;
        }
        if let Some(notes) = update.resolution_notes {
            self.resolution_notes = notes;
        }
        if let Some(status) = update.status {
            if status.is_resolution() && self.resolution_date.is_none() {
                self.resolution_date = Some(now);
            }
            self.status = status;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 10, 30, 0).unwrap()
    }

    fn claim() -> WarrantyClaim {
        NewWarrantyClaim {
            sale_id: 2,
            supplier_id: 1,
            issue_description: "Screen flicker".to_string(),
            serial_number: "SN-1".to_string(),
            claim_amount: Money::from_major(120),
        }
        .into_record(1, now())
    }

    fn order() -> SupplierOrder {
        NewSupplierOrder {
            supplier_id: 1,
            expected_delivery: None,
            items: vec![SupplierOrderItem {
                device_id: 1,
                quantity: 5,
                unit_cost: Money::from_major(400),
            }],
            notes: String::new(),
        }
        .into_record(7, now())
    }

    #[test]
    fn test_new_customer_gets_code_and_empty_history() {
        let customer = NewCustomer {
            name: "  Dana Lee ".to_string(),
            email: "dana@example.com".to_string(),
            phone: "555-0199".to_string(),
        }
        .into_record(12, now());

        assert_eq!(customer.customer_code, "CUST012");
        assert_eq!(customer.name, "Dana Lee");
        assert!(customer.purchase_history.is_empty());
        assert!(customer.store_credit.is_zero());
        assert_eq!(customer.registration_date, now());
    }

    #[test]
    fn test_failed_customer_update_changes_nothing() {
        let mut customer = NewCustomer {
            name: "Dana Lee".to_string(),
            email: "dana@example.com".to_string(),
            phone: "555-0199".to_string(),
        }
        .into_record(1, now());
        let before = customer.clone();

        let result = customer.apply(CustomerUpdate {
            name: Some("Dana Kim".to_string()),
            email: Some("not-an-email".to_string()),
            phone: None,
        });

        assert!(result.is_err());
        assert_eq!(customer, before);
    }

    #[test]
    fn test_device_update_rejects_negative_stock() {
        let mut device = NewDevice {
            brand: "Apple".to_string(),
            model: "iPhone 13".to_string(),
            category: DeviceCategory::Smartphone,
            condition: DeviceCondition::New,
            quantity: 4,
            sale_price: Money::from_major(699),
            cost: Money::from_major(500),
            low_stock_threshold: 10,
            imei: "356938035643809".to_string(),
            serial_number: None,
        }
        .into_record(1, now());

        let result = device.apply(DeviceUpdate {
            quantity: Some(-1),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(device.quantity, 4);
    }

    #[test]
    fn test_repair_completion_stamps_date() {
        let mut ticket = NewRepairTicket {
            customer_id: 1,
            device_imei: "356938035643809".to_string(),
            device_model: "iPhone 13".to_string(),
            issue_description: "Cracked screen".to_string(),
            estimated_cost: Money::from_major(150),
        }
        .into_record(3, now());
        assert_eq!(ticket.ticket_code, "REP003");
        assert_eq!(ticket.status, RepairStatus::Received);

        let later = now() + Duration::hours(5);
        ticket.set_status(RepairStatus::Diagnosed, later).unwrap();
        assert!(ticket.date_completed.is_none());
        ticket.set_status(RepairStatus::InProgress, later).unwrap();
        ticket.set_status(RepairStatus::Completed, later).unwrap();
        assert_eq!(ticket.date_completed, Some(later));

        assert!(ticket.set_status(RepairStatus::Cancelled, later).is_err());
    }

    #[test]
    fn test_order_items_replacement_recomputes_total() {
        let mut order = order();
        assert_eq!(order.total_cost, Money::from_major(2000));

        order
            .apply(SupplierOrderUpdate {
                items: Some(vec![
                    SupplierOrderItem { device_id: 1, quantity: 2, unit_cost: Money::from_major(400) },
                    SupplierOrderItem { device_id: 2, quantity: 3, unit_cost: Money::from_major(100) },
                ]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(order.total_cost, Money::from_major(1100));
    }

    #[test]
    fn test_received_order_is_locked() {
        let mut order = order();
        order
            .apply(SupplierOrderUpdate { status: Some(SupplierOrderStatus::Ordered), ..Default::default() })
            .unwrap();
        order
            .apply(SupplierOrderUpdate { status: Some(SupplierOrderStatus::Received), ..Default::default() })
            .unwrap();

        let err = order
            .apply(SupplierOrderUpdate { notes: Some("late".to_string()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, CoreError::RecordLocked { .. }));
    }

    #[test]
    fn test_resolution_date_is_stamped_once() {
        let mut claim = claim();
        let t1 = now() + Duration::days(1);
        let t2 = now() + Duration::days(9);

        claim
            .apply(WarrantyClaimUpdate { status: Some(WarrantyClaimStatus::Submitted), ..Default::default() }, t1)
            .unwrap();
        assert!(claim.resolution_date.is_none());

        claim
            .apply(WarrantyClaimUpdate { status: Some(WarrantyClaimStatus::Approved), ..Default::default() }, t1)
            .unwrap();
        assert_eq!(claim.resolution_date, Some(t1));

        claim
            .apply(WarrantyClaimUpdate { status: Some(WarrantyClaimStatus::Closed), ..Default::default() }, t2)
            .unwrap();
        assert_eq!(claim.resolution_date, Some(t1));
        assert_eq!(claim.status, WarrantyClaimStatus::Closed);
    }

    #[test]
    fn test_claim_cannot_skip_submission() {
        let mut claim = claim();
        let result = claim.apply(
            WarrantyClaimUpdate { status: Some(WarrantyClaimStatus::Approved), ..Default::default() },
            now(),
        );
        assert!(result.is_err());
        assert_eq!(claim.status, WarrantyClaimStatus::Pending);
        assert!(claim.resolution_date.is_none());
    }
}
