//! # Device Repository
//!
//! Inventory records and stock filters.
//!
//! ## Stock Signal
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity is the only stock signal. It moves three ways:               │
//! │                                                                         │
//! │  checkout        ──► SaleRepository::complete_sale      (− qty)        │
//! │  order receipt   ──► SupplierOrderRepository::update    (+ qty)        │
//! │  manual count    ──► DeviceRepository::update_stock     (= qty)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use handset_core::drafts::{DeviceUpdate, NewDevice};
use handset_core::inventory::{self, StockLevel};
use handset_core::validation::validate_stock_level;
use handset_core::{Device, EntityId, Money};
use serde::Serialize;
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{StoreError, StoreResult};

/// One row of the stock report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStatus {
    pub device_id: EntityId,
    pub name: String,
    pub quantity: i64,
    pub level: StockLevel,
    pub stock_value: Money,
}

/// Repository for device operations.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    db: Database,
}

impl DeviceRepository {
    pub fn new(db: Database) -> Self {
        DeviceRepository { db }
    }

    /// All devices in insertion order.
    pub async fn get_all(&self) -> Vec<Device> {
        let tables = self.db.tables.read().await;
        tables.devices.all().to_vec()
    }

    pub async fn get_by_id(&self, id: EntityId) -> StoreResult<Device> {
        let tables = self.db.tables.read().await;
        tables.devices.require(id).cloned()
    }

    pub async fn get_by_imei(&self, imei: &str) -> StoreResult<Device> {
        let imei = imei.trim();
        if imei.is_empty() {
            return Err(StoreError::not_found("Device", "(empty IMEI)"));
        }

        let tables = self.db.tables.read().await;
        tables
            .devices
            .all()
            .iter()
            .find(|d| d.imei == imei)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Device", imei))
    }

    pub async fn create(&self, draft: NewDevice) -> StoreResult<Device> {
        draft.validate()?;
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;
        let device = tables.devices.insert_with(|id| draft.into_record(id, now)).clone();

        info!(id = device.id, name = %device.name(), quantity = device.quantity, "Device created");
        Ok(device)
    }

    pub async fn update(&self, id: EntityId, update: DeviceUpdate) -> StoreResult<Device> {
        let mut tables = self.db.tables.write().await;
        let device = tables.devices.require_mut(id)?;
        device.apply(update)?;

        debug!(id, "Device updated");
        Ok(device.clone())
    }

    /// Sets the on-hand quantity to an absolute count.
    pub async fn update_stock(&self, id: EntityId, quantity: i64) -> StoreResult<Device> {
        validate_stock_level("quantity", quantity)?;

        let mut tables = self.db.tables.write().await;
        let device = tables.devices.require_mut(id)?;
        let previous = device.quantity;
        device.quantity = quantity;

        debug!(id, previous, quantity, "Stock level set");
        Ok(device.clone())
    }

    /// Removes a device. Sales that sold it keep their snapshot lines.
    pub async fn delete(&self, id: EntityId) -> StoreResult<()> {
        let mut tables = self.db.tables.write().await;
        let removed = tables.devices.remove(id)?;

        info!(id, name = %removed.name(), "Device deleted");
        Ok(())
    }

    /// Devices with `0 < quantity < threshold`.
    pub async fn get_low_stock(&self, threshold: i64) -> Vec<Device> {
        let tables = self.db.tables.read().await;
        let devices: Vec<Device> = inventory::low_stock(tables.devices.all(), threshold)
            .into_iter()
            .cloned()
            .collect();

        debug!(threshold, count = devices.len(), "Low stock query");
        devices
    }

    pub async fn get_out_of_stock(&self) -> Vec<Device> {
        let tables = self.db.tables.read().await;
        inventory::out_of_stock(tables.devices.all())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Classifies every device against the configured critical level.
    pub async fn stock_report(&self) -> Vec<StockStatus> {
        let critical = self.db.config().inventory.critical_stock_level;
        let tables = self.db.tables.read().await;

        tables
            .devices
            .all()
            .iter()
            .map(|d| StockStatus {
                device_id: d.id,
                name: d.name(),
                quantity: d.quantity,
                level: d.stock_level(critical),
                stock_value: d.stock_value(),
            })
            .collect()
    }

    /// Total stock on hand valued at cost.
    pub async fn inventory_value(&self) -> Money {
        let tables = self.db.tables.read().await;
        inventory::inventory_value(tables.devices.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{fixture_db, fixture_now};
    use handset_core::{DeviceCategory, DeviceCondition};

    fn case_draft() -> NewDevice {
        NewDevice {
            brand: "Spigen".to_string(),
            model: "Tough Armor Pixel 8 Pro".to_string(),
            category: DeviceCategory::Accessory,
            condition: DeviceCondition::New,
            quantity: 20,
            sale_price: Money::from_cents(2_499),
            cost: Money::from_cents(800),
            low_stock_threshold: 10,
            imei: String::new(),
            serial_number: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_imei() {
        let repo = fixture_db().devices();
        assert_eq!(repo.get_by_imei("356938035643806").await.unwrap().id, 6);
        assert!(repo.get_by_imei("000000000000000").await.unwrap_err().is_not_found());
        // Accessories have no IMEI; an empty lookup must not match them.
        assert!(repo.get_by_imei("").await.is_err());
    }

    #[tokio::test]
    async fn test_create_stamps_date_added() {
        let repo = fixture_db().devices();
        let device = repo.create(case_draft()).await.unwrap();
        assert_eq!(device.id, 11);
        assert_eq!(device.date_added, fixture_now());
        assert_eq!(repo.get_all().await.len(), 11);
    }

    #[tokio::test]
    async fn test_create_rejects_short_imei() {
        let repo = fixture_db().devices();
        let mut draft = case_draft();
        draft.imei = "12345".to_string();
        assert!(repo.create(draft).await.is_err());
    }

    #[tokio::test]
    async fn test_low_and_out_of_stock() {
        let repo = fixture_db().devices();
        let low: Vec<EntityId> = repo.get_low_stock(10).await.iter().map(|d| d.id).collect();
        assert_eq!(low, vec![1, 3, 6, 9, 10]);

        let out: Vec<EntityId> = repo.get_out_of_stock().await.iter().map(|d| d.id).collect();
        assert_eq!(out, vec![4]);
    }

    #[tokio::test]
    async fn test_update_stock() {
        let repo = fixture_db().devices();
        assert_eq!(repo.update_stock(4, 6).await.unwrap().quantity, 6);
        assert!(repo.get_out_of_stock().await.is_empty());
        assert!(repo.update_stock(4, -1).await.is_err());
        assert!(repo.update_stock(99, 1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_stock_report_levels() {
        let report = fixture_db().devices().stock_report().await;
        let level_of = |id: EntityId| report.iter().find(|r| r.device_id == id).map(|r| r.level);

        assert_eq!(level_of(4), Some(StockLevel::OutOfStock));
        assert_eq!(level_of(6), Some(StockLevel::Critical));
        assert_eq!(level_of(1), Some(StockLevel::Low));
        assert_eq!(level_of(2), Some(StockLevel::InStock));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = fixture_db().devices();
        repo.delete(8).await.unwrap();
        assert!(repo.get_by_id(8).await.is_err());
        assert!(repo.delete(8).await.is_err());
    }
}
