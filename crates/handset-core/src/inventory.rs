//! Stock level classification and inventory filters.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Device;

/// How worried the shop floor should be about a device's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StockLevel {
    OutOfStock,
    Critical,
    Low,
    InStock,
}

impl Device {
    /// Classifies stock against the shop's critical level and the device's
    /// own low-stock threshold.
    ///
    /// ```text
    ///   0            critical        threshold
    ///   │ OutOfStock │ Critical │ Low │ InStock ...
    /// ```
    pub fn stock_level(&self, critical_level: i64) -> StockLevel {
        if self.quantity <= 0 {
            StockLevel::OutOfStock
        } else if self.quantity < critical_level {
            StockLevel::Critical
        } else if self.quantity < self.low_stock_threshold {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }

    /// Stock valued at cost.
    pub fn stock_value(&self) -> Money {
        self.cost.multiply_quantity(self.quantity.max(0))
    }
}

/// Devices running low but not yet out: `0 < quantity < threshold`.
pub fn low_stock<'a>(devices: impl IntoIterator<Item = &'a Device>, threshold: i64) -> Vec<&'a Device> {
    devices
        .into_iter()
        .filter(|d| d.quantity > 0 && d.quantity < threshold)
        .collect()
}

/// Devices with nothing on hand.
pub fn out_of_stock<'a>(devices: impl IntoIterator<Item = &'a Device>) -> Vec<&'a Device> {
    devices.into_iter().filter(|d| d.quantity == 0).collect()
}

/// Total stock value at cost.
pub fn inventory_value<'a>(devices: impl IntoIterator<Item = &'a Device>) -> Money {
    devices.into_iter().map(Device::stock_value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceCategory, DeviceCondition};
    use chrono::Utc;

    fn device(id: u32, quantity: i64) -> Device {
        Device {
            id,
            brand: "Samsung".to_string(),
            model: format!("Galaxy {id}"),
            category: DeviceCategory::Smartphone,
            condition: DeviceCondition::New,
            quantity,
            sale_price: Money::from_major(300),
            cost: Money::from_major(200),
            low_stock_threshold: 10,
            imei: String::new(),
            serial_number: None,
            date_added: Utc::now(),
        }
    }

    #[test]
    fn test_stock_levels() {
        assert_eq!(device(1, 0).stock_level(5), StockLevel::OutOfStock);
        assert_eq!(device(1, 4).stock_level(5), StockLevel::Critical);
        assert_eq!(device(1, 5).stock_level(5), StockLevel::Low);
        assert_eq!(device(1, 9).stock_level(5), StockLevel::Low);
        assert_eq!(device(1, 10).stock_level(5), StockLevel::InStock);
    }

    #[test]
    fn test_low_stock_excludes_empty_shelves() {
        let devices = vec![device(1, 0), device(2, 3), device(3, 10), device(4, 9)];
        let ids: Vec<u32> = low_stock(&devices, 10).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 4]);

        let empty: Vec<u32> = out_of_stock(&devices).iter().map(|d| d.id).collect();
        assert_eq!(empty, vec![1]);
    }

    #[test]
    fn test_inventory_value() {
        let devices = vec![device(1, 2), device(2, 3)];
        assert_eq!(inventory_value(&devices), Money::from_major(1000));
    }
}
