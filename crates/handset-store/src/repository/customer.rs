//! # Customer Repository
//!
//! Customer records, search and store credit.
//!
//! Purchase and repair histories are append-only lists of ids maintained by
//! the sale and repair repositories; an update here never touches them.

use handset_core::drafts::{CustomerUpdate, NewCustomer};
use handset_core::validation::{validate_positive_amount, validate_search_query};
use handset_core::{Customer, EntityId, Money};
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{StoreError, StoreResult};

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: Database,
}

impl CustomerRepository {
    pub fn new(db: Database) -> Self {
        CustomerRepository { db }
    }

    /// All customers sorted by name, case-insensitively.
    pub async fn get_all(&self) -> Vec<Customer> {
        let tables = self.db.tables.read().await;
        let mut customers = tables.customers.all().to_vec();
        customers.sort_by_cached_key(|c| c.name.to_lowercase());
        customers
    }

    pub async fn get_by_id(&self, id: EntityId) -> StoreResult<Customer> {
        let tables = self.db.tables.read().await;
        tables.customers.require(id).cloned()
    }

    /// Looks up a customer by `CUST###` code, ignoring case.
    pub async fn get_by_customer_code(&self, code: &str) -> StoreResult<Customer> {
        let tables = self.db.tables.read().await;
        let code = code.trim();
        tables
            .customers
            .all()
            .iter()
            .find(|c| c.customer_code.eq_ignore_ascii_case(code))
            .cloned()
            .ok_or_else(|| StoreError::not_found("Customer", code))
    }

    pub async fn create(&self, draft: NewCustomer) -> StoreResult<Customer> {
        draft.validate()?;
        let now = self.db.now();

        let mut tables = self.db.tables.write().await;
        let customer = tables
            .customers
            .insert_with(|id| draft.into_record(id, now))
            .clone();

        info!(id = customer.id, code = %customer.customer_code, "Customer created");
        Ok(customer)
    }

    pub async fn update(&self, id: EntityId, update: CustomerUpdate) -> StoreResult<Customer> {
        let mut tables = self.db.tables.write().await;
        let customer = tables.customers.require_mut(id)?;
        customer.apply(update)?;

        debug!(id, "Customer updated");
        Ok(customer.clone())
    }

    /// Removes a customer. Their past sales stay, attributed to an id that
    /// no longer resolves.
    pub async fn delete(&self, id: EntityId) -> StoreResult<()> {
        let mut tables = self.db.tables.write().await;
        let removed = tables.customers.remove(id)?;

        info!(id, code = %removed.customer_code, "Customer deleted");
        Ok(())
    }

    /// Case-insensitive match on name or email, raw substring on phone.
    ///
    /// An empty query returns every customer in name order.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Customer>> {
        let query = validate_search_query(query)?;
        if query.is_empty() {
            return Ok(self.get_all().await);
        }
        let needle = query.to_lowercase();

        let results: Vec<Customer> = self
            .get_all()
            .await
            .into_iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
                    || c.phone.contains(&query)
            })
            .collect();

        debug!(query = %query, count = results.len(), "Customer search");
        Ok(results)
    }

    /// Adds to a customer's store credit and returns the updated record.
    pub async fn add_store_credit(&self, id: EntityId, amount: Money) -> StoreResult<Customer> {
        validate_positive_amount("amount", amount)?;

        let mut tables = self.db.tables.write().await;
        let customer = tables.customers.require_mut(id)?;
        customer.store_credit += amount;

        debug!(id, amount = amount.cents(), balance = customer.store_credit.cents(), "Store credit added");
        Ok(customer.clone())
    }
}
