//! # Checkout
//!
//! Turns a cart into priced sale lines and totals.
//!
//! ## Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = Σ price × qty                                              │
//! │  discount = subtotal × discount_bps / 10000     (rounded half up)      │
//! │  tax      = (subtotal − discount) × tax_bps / 10000                    │
//! │  total    = subtotal − discount + tax                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing is pure: it reads device snapshots and returns lines. The store
//! applies the stock decrement under the same lock it used to read them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Device, EntityId, PaymentMethod, SaleLine, TaxRate};
use crate::validation::{validate_bps, validate_line_count, validate_quantity};

/// One line in the register cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub device_id: EntityId,
    pub quantity: i64,
}

/// Everything the register submits to complete a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// `None` for a walk-in customer.
    #[serde(default)]
    pub customer_id: Option<EntityId>,
    pub lines: Vec<CartLine>,
    /// Discount percentage in basis points (1000 = 10%).
    #[serde(default)]
    pub discount_bps: u32,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Money breakdown of a priced cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

impl CheckoutRequest {
    /// Shape checks that need no device data.
    pub fn validate(&self) -> CoreResult<()> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        validate_line_count("lines", self.lines.len())?;
        for line in &self.lines {
            validate_quantity(line.quantity)?;
        }
        validate_bps("discount", self.discount_bps)?;
        Ok(())
    }
}

/// Merges repeated device lines, keeping first-seen order.
pub fn merge_lines(lines: &[CartLine]) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.device_id == line.device_id) {
            Some(existing) => existing.quantity += line.quantity,
            None => merged.push(line.clone()),
        }
    }
    merged
}

/// Prices a cart against the current devices.
///
/// Snapshots each device's name and sale price into the line. Fails if a
/// device is missing or short on stock, considering merged quantities.
pub fn price_lines<'a, F>(lines: &[CartLine], mut lookup: F) -> CoreResult<Vec<SaleLine>>
where
    F: FnMut(EntityId) -> Option<&'a Device>,
{
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    merge_lines(lines)
        .into_iter()
        .map(|line| {
            let device = lookup(line.device_id).ok_or(CoreError::DeviceNotFound(line.device_id))?;

            if !device.can_sell(line.quantity) {
                return Err(CoreError::InsufficientStock {
                    device_id: device.id,
                    name: device.name(),
                    available: device.quantity,
                    requested: line.quantity,
                });
            }

            Ok(SaleLine {
                device_id: device.id,
                name: device.name(),
                quantity: line.quantity,
                price: device.sale_price,
            })
        })
        .collect()
}

/// Computes subtotal, discount, tax and total for priced lines.
pub fn compute_totals(lines: &[SaleLine], discount_bps: u32, tax_rate: TaxRate) -> SaleTotals {
    let subtotal: Money = lines.iter().map(SaleLine::line_total).sum();
    let discount = subtotal.portion_bps(discount_bps);
    let taxable = subtotal - discount;
    let tax = taxable.calculate_tax(tax_rate);

    SaleTotals {
        subtotal,
        discount,
        tax,
        total: taxable + tax,
    }
}
