//! # Supplier Repository

use handset_core::drafts::{NewSupplier, SupplierUpdate};
use handset_core::{EntityId, Supplier, SupplierStatus};
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{StoreError, StoreResult};

/// Repository for supplier operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    db: Database,
}

impl SupplierRepository {
    pub fn new(db: Database) -> Self {
        SupplierRepository { db }
    }

    /// All suppliers sorted by name, case-insensitively.
    pub async fn get_all(&self) -> Vec<Supplier> {
        let tables = self.db.tables.read().await;
        let mut suppliers = tables.suppliers.all().to_vec();
        suppliers.sort_by_cached_key(|s| s.name.to_lowercase());
        suppliers
    }

    pub async fn get_by_id(&self, id: EntityId) -> StoreResult<Supplier> {
        let tables = self.db.tables.read().await;
        tables.suppliers.require(id).cloned()
    }

    /// Looks up a supplier by `SUP###` code, ignoring case.
    pub async fn get_by_supplier_code(&self, code: &str) -> StoreResult<Supplier> {
        let code = code.trim();
        let tables = self.db.tables.read().await;
        tables
            .suppliers
            .all()
            .iter()
            .find(|s| s.supplier_code.eq_ignore_ascii_case(code))
            .cloned()
            .ok_or_else(|| StoreError::not_found("Supplier", code))
    }

    pub async fn create(&self, draft: NewSupplier) -> StoreResult<Supplier> {
        draft.validate()?;

        let mut tables = self.db.tables.write().await;
        let supplier = tables.suppliers.insert_with(|id| draft.into_record(id)).clone();

        info!(id = supplier.id, code = %supplier.supplier_code, "Supplier created");
        Ok(supplier)
    }

    pub async fn update(&self, id: EntityId, update: SupplierUpdate) -> StoreResult<Supplier> {
        let mut tables = self.db.tables.write().await;
        let supplier = tables.suppliers.require_mut(id)?;
        supplier.apply(update)?;

        debug!(id, status = ?supplier.status, "Supplier updated");
        Ok(supplier.clone())
    }

    /// Removes a supplier. Existing orders and claims keep its id.
    pub async fn delete(&self, id: EntityId) -> StoreResult<()> {
        let mut tables = self.db.tables.write().await;
        let removed = tables.suppliers.remove(id)?;

        info!(id, code = %removed.supplier_code, "Supplier deleted");
        Ok(())
    }

    /// Suppliers with status Active, in name order.
    pub async fn get_active_suppliers(&self) -> Vec<Supplier> {
        self.get_all()
            .await
            .into_iter()
            .filter(|s| s.status == SupplierStatus::Active)
            .collect()
    }
}
