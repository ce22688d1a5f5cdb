//! # Reorder Suggestions
//!
//! Projects how long each device's stock will last at its recent sales
//! velocity and recommends restock quantities.
//!
//! ## Projection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  units    = Σ qty of device sold in [now − 30d, now]                    │
//! │  velocity = units / 30                           (units per day)       │
//! │  days     = stock / velocity                     (999 if velocity = 0) │
//! │  suggest  = max(0, ceil(velocity × 30) − stock)                        │
//! │                                                                         │
//! │  needs reorder:  velocity > 0  AND  days < 30                          │
//! │  priority:       High < 14 days ≤ Medium < 30 days ≤ Low               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A device that has not sold in the window is never flagged, even at zero
//! stock. Nothing here mutates stock or creates orders.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::analytics::DateRange;
use crate::money::Money;
use crate::types::{Device, EntityId, Sale, SupplierOrderItem};

/// Days of stock reported for a device that is not selling.
pub const NO_VELOCITY_DAYS: f64 = 999.0;

/// Tunables for the projection. Defaults match the register's behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPolicy {
    /// Trailing window used to measure velocity.
    pub window_days: u32,
    /// Days of projected demand a reorder should cover.
    pub cover_days: u32,
    /// Reorder when fewer days of stock than this remain.
    pub reorder_threshold_days: u32,
    /// High priority when fewer days of stock than this remain.
    pub high_priority_days: u32,
}

impl Default for ReorderPolicy {
    fn default() -> Self {
        ReorderPolicy {
            window_days: 30,
            cover_days: 30,
            reorder_threshold_days: 30,
            high_priority_days: 14,
        }
    }
}

/// Restock urgency. Orders High first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReorderPriority {
    High,
    Medium,
    Low,
}

/// Projection for one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReorderSuggestion {
    pub device_id: EntityId,
    pub name: String,
    pub current_stock: i64,
    /// Units sold in the window.
    pub units_sold: i64,
    /// Units per day.
    pub velocity: f64,
    /// Rounded to whole days; 999 when the device is not selling.
    pub days_of_stock: f64,
    pub suggested_quantity: i64,
    /// Device cost per unit.
    pub unit_cost: Money,
    /// `suggested_quantity × unit_cost`.
    pub estimated_cost: Money,
    pub priority: ReorderPriority,
    pub needs_reorder: bool,
    #[serde(skip)]
    #[ts(skip)]
    raw_days: f64,
}

/// Units sold per device across sales inside `window`.
pub fn units_sold_in(sales: &[Sale], window: DateRange) -> HashMap<EntityId, i64> {
    let mut units: HashMap<EntityId, i64> = HashMap::new();
    for sale in sales.iter().filter(|s| window.contains(s.timestamp)) {
        for line in &sale.items {
            *units.entry(line.device_id).or_insert(0) += line.quantity;
        }
    }
    units
}

/// Velocity of one device over the policy window ending at `now`.
pub fn sales_velocity(device_id: EntityId, sales: &[Sale], now: DateTime<Utc>, policy: &ReorderPolicy) -> f64 {
    let window = DateRange::trailing(now, policy.window_days);
    let units = units_sold_in(sales, window).get(&device_id).copied().unwrap_or(0);
    velocity(units, policy)
}

fn velocity(units: i64, policy: &ReorderPolicy) -> f64 {
    if policy.window_days == 0 {
        return 0.0;
    }
    units.max(0) as f64 / f64::from(policy.window_days)
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}

/// Projects one device given the units it sold in the window.
pub fn project(device: &Device, units_sold: i64, policy: &ReorderPolicy) -> ReorderSuggestion {
    let units_sold = units_sold.max(0);
    let velocity = velocity(units_sold, policy);
    let stock = device.quantity;

    // stock / (units / window), kept in one division for exact results
    let raw_days = if velocity > 0.0 {
        stock as f64 * f64::from(policy.window_days) / units_sold as f64
    } else {
        NO_VELOCITY_DAYS
    };

    let demand = if policy.window_days == 0 {
        0
    } else {
        ceil_div(units_sold * i64::from(policy.cover_days), i64::from(policy.window_days))
    };
    let suggested_quantity = (demand - stock).max(0);

    let selling = velocity > 0.0;
    let priority = if selling && raw_days < f64::from(policy.high_priority_days) {
        ReorderPriority::High
    } else if selling && raw_days < f64::from(policy.reorder_threshold_days) {
        ReorderPriority::Medium
    } else {
        ReorderPriority::Low
    };

    ReorderSuggestion {
        device_id: device.id,
        name: device.name(),
        current_stock: stock,
        units_sold,
        velocity,
        days_of_stock: raw_days.round(),
        suggested_quantity,
        unit_cost: device.cost,
        estimated_cost: device.cost.multiply_quantity(suggested_quantity),
        priority,
        needs_reorder: selling && raw_days < f64::from(policy.reorder_threshold_days),
        raw_days,
    }
}

/// Projects every device, most urgent first.
///
/// Sorted by priority, then by ascending days of stock. Equal entries keep
/// device order.
pub fn evaluate_devices(
    devices: &[Device],
    sales: &[Sale],
    now: DateTime<Utc>,
    policy: &ReorderPolicy,
) -> Vec<ReorderSuggestion> {
    let units = units_sold_in(sales, DateRange::trailing(now, policy.window_days));

    let mut projections: Vec<ReorderSuggestion> = devices
        .iter()
        .map(|device| project(device, units.get(&device.id).copied().unwrap_or(0), policy))
        .collect();

    projections.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.raw_days.total_cmp(&b.raw_days))
    });
    projections
}

/// Only the devices that need restocking, most urgent first.
pub fn suggest_reorders(
    devices: &[Device],
    sales: &[Sale],
    now: DateTime<Utc>,
    policy: &ReorderPolicy,
) -> Vec<ReorderSuggestion> {
    evaluate_devices(devices, sales, now, policy)
        .into_iter()
        .filter(|s| s.needs_reorder)
        .collect()
}

/// Purchase-order lines for the suggestions, skipping zero quantities.
pub fn to_order_items(suggestions: &[ReorderSuggestion]) -> Vec<SupplierOrderItem> {
    suggestions
        .iter()
        .filter(|s| s.suggested_quantity > 0)
        .map(|s| SupplierOrderItem {
            device_id: s.device_id,
            quantity: s.suggested_quantity,
            unit_cost: s.unit_cost,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceCategory, DeviceCondition, PaymentMethod, SaleLine};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap()
    }

    fn device(id: EntityId, quantity: i64) -> Device {
        Device {
            id,
            brand: "Google".to_string(),
            model: format!("Pixel {id}"),
            category: DeviceCategory::Smartphone,
            condition: DeviceCondition::New,
            quantity,
            sale_price: Money::from_major(500),
            cost: Money::from_major(350),
            low_stock_threshold: 10,
            imei: String::new(),
            serial_number: None,
            date_added: now() - Duration::days(200),
        }
    }

    fn sale(id: EntityId, days_ago: i64, lines: &[(EntityId, i64)]) -> Sale {
        Sale {
            id,
            sale_code: format!("SALE{id:03}"),
            customer_id: None,
            items: lines
                .iter()
                .map(|&(device_id, quantity)| SaleLine {
                    device_id,
                    name: format!("Google Pixel {device_id}"),
                    quantity,
                    price: Money::from_major(500),
                })
                .collect(),
            subtotal: Money::zero(),
            discount: Money::zero(),
            discount_bps: 0,
            tax: Money::zero(),
            total: Money::zero(),
            payment_method: PaymentMethod::Cash,
            timestamp: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_slow_seller_is_low_priority() {
        let devices = vec![device(1, 10)];
        let sales = vec![
            sale(1, 2, &[(1, 2)]),
            sale(2, 10, &[(1, 3)]),
            sale(3, 20, &[(1, 1)]),
        ];
        let all = evaluate_devices(&devices, &sales, now(), &ReorderPolicy::default());

        let d = &all[0];
        assert!((d.velocity - 0.2).abs() < 1e-9);
        assert_eq!(d.days_of_stock, 50.0);
        assert_eq!(d.priority, ReorderPriority::Low);
        assert!(!d.needs_reorder);
        assert_eq!(d.suggested_quantity, 0);
    }

    #[test]
    fn test_fast_seller_is_high_priority() {
        let devices = vec![device(1, 5)];
        let sales = vec![sale(1, 1, &[(1, 12)]), sale(2, 15, &[(1, 8)])];
        let all = evaluate_devices(&devices, &sales, now(), &ReorderPolicy::default());

        let e = &all[0];
        assert!((e.velocity - 20.0 / 30.0).abs() < 1e-9);
        assert_eq!(e.days_of_stock, 8.0);
        assert_eq!(e.priority, ReorderPriority::High);
        assert!(e.needs_reorder);
        assert_eq!(e.suggested_quantity, 15);
        assert_eq!(e.estimated_cost, Money::from_major(350 * 15));
    }

    #[test]
    fn test_old_sales_do_not_count() {
        let sales = vec![sale(1, 31, &[(1, 50)])];
        let v = sales_velocity(1, &sales, now(), &ReorderPolicy::default());
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_idle_empty_device_is_never_flagged() {
        let devices = vec![device(1, 0)];
        let all = evaluate_devices(&devices, &[], now(), &ReorderPolicy::default());

        assert_eq!(all[0].velocity, 0.0);
        assert_eq!(all[0].days_of_stock, NO_VELOCITY_DAYS);
        assert_eq!(all[0].priority, ReorderPriority::Low);
        assert!(!all[0].needs_reorder);
        assert!(suggest_reorders(&devices, &[], now(), &ReorderPolicy::default()).is_empty());
    }

    #[test]
    fn test_medium_priority_band() {
        // 15 units in 30 days → 0.5/day, 10 in stock → 20 days
        let devices = vec![device(1, 10)];
        let sales = vec![sale(1, 3, &[(1, 15)])];
        let all = evaluate_devices(&devices, &sales, now(), &ReorderPolicy::default());
        assert_eq!(all[0].priority, ReorderPriority::Medium);
        assert!(all[0].needs_reorder);
        assert_eq!(all[0].suggested_quantity, 5);
    }

    #[test]
    fn test_ordering_by_priority_then_days() {
        let devices = vec![device(1, 10), device(2, 2), device(3, 8), device(4, 1), device(5, 50)];
        let sales = vec![sale(1, 1, &[(1, 15), (2, 30), (3, 15), (4, 3), (5, 1)])];
        let all = evaluate_devices(&devices, &sales, now(), &ReorderPolicy::default());

        for pair in all.windows(2) {
            assert!(pair[0].priority <= pair[1].priority);
            if pair[0].priority == pair[1].priority {
                assert!(pair[0].days_of_stock <= pair[1].days_of_stock);
            }
        }
        let ids: Vec<EntityId> = all.iter().map(|s| s.device_id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1, 5]);
    }

    #[test]
    fn test_suggested_quantity_never_negative() {
        let devices: Vec<Device> = (1..=6).map(|id| device(id, i64::from(id) * 7)).collect();
        let sales = vec![sale(1, 1, &[(1, 3), (2, 40), (3, 1), (6, 100)])];
        for s in evaluate_devices(&devices, &sales, now(), &ReorderPolicy::default()) {
            assert!(s.suggested_quantity >= 0);
            assert!(s.velocity >= 0.0);
        }
    }

    #[test]
    fn test_order_items_from_suggestions() {
        let devices = vec![device(1, 5)];
        let sales = vec![sale(1, 1, &[(1, 20)])];
        let suggestions = suggest_reorders(&devices, &sales, now(), &ReorderPolicy::default());
        let items = to_order_items(&suggestions);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 15);
        assert_eq!(items[0].unit_cost, Money::from_major(350));
    }
}
