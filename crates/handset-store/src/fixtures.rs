//! # Fixtures
//!
//! The seed data set. The shop ships with one embedded into the binary;
//! a directory can replace it file by file.
//!
//! ```text
//!   fixtures/
//!   ├── customers.json        ├── suppliers.json
//!   ├── devices.json          ├── supplier_orders.json
//!   ├── sales.json            ├── trade_ins.json
//!   ├── repairs.json          └── warranty_claims.json
//! ```
//!
//! Money fields are integer cents, keys are camelCase.

use std::path::Path;

use handset_core::{
    Customer, Device, RepairTicket, Sale, Supplier, SupplierOrder, TradeIn, WarrantyClaim,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

const CUSTOMERS: &str = include_str!("../fixtures/customers.json");
const DEVICES: &str = include_str!("../fixtures/devices.json");
const SALES: &str = include_str!("../fixtures/sales.json");
const REPAIRS: &str = include_str!("../fixtures/repairs.json");
const SUPPLIERS: &str = include_str!("../fixtures/suppliers.json");
const SUPPLIER_ORDERS: &str = include_str!("../fixtures/supplier_orders.json");
const TRADE_INS: &str = include_str!("../fixtures/trade_ins.json");
const WARRANTY_CLAIMS: &str = include_str!("../fixtures/warranty_claims.json");

/// Every collection the store holds, as plain vectors.
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub customers: Vec<Customer>,
    pub devices: Vec<Device>,
    pub sales: Vec<Sale>,
    pub repairs: Vec<RepairTicket>,
    pub suppliers: Vec<Supplier>,
    pub supplier_orders: Vec<SupplierOrder>,
    pub trade_ins: Vec<TradeIn>,
    pub warranty_claims: Vec<WarrantyClaim>,
}

impl FixtureSet {
    /// The data set compiled into the crate.
    pub fn embedded() -> StoreResult<Self> {
        Ok(FixtureSet {
            customers: parse("customers.json", CUSTOMERS)?,
            devices: parse("devices.json", DEVICES)?,
            sales: parse("sales.json", SALES)?,
            repairs: parse("repairs.json", REPAIRS)?,
            suppliers: parse("suppliers.json", SUPPLIERS)?,
            supplier_orders: parse("supplier_orders.json", SUPPLIER_ORDERS)?,
            trade_ins: parse("trade_ins.json", TRADE_INS)?,
            warranty_claims: parse("warranty_claims.json", WARRANTY_CLAIMS)?,
        })
    }

    /// Reads a fixture directory. Files that are absent fall back to the
    /// embedded copy; files that are present must parse.
    pub fn from_dir(dir: &Path) -> StoreResult<Self> {
        info!(dir = %dir.display(), "Loading fixtures from directory");

        Ok(FixtureSet {
            customers: load(dir, "customers.json", CUSTOMERS)?,
            devices: load(dir, "devices.json", DEVICES)?,
            sales: load(dir, "sales.json", SALES)?,
            repairs: load(dir, "repairs.json", REPAIRS)?,
            suppliers: load(dir, "suppliers.json", SUPPLIERS)?,
            supplier_orders: load(dir, "supplier_orders.json", SUPPLIER_ORDERS)?,
            trade_ins: load(dir, "trade_ins.json", TRADE_INS)?,
            warranty_claims: load(dir, "warranty_claims.json", WARRANTY_CLAIMS)?,
        })
    }
}

fn parse<T: DeserializeOwned>(name: &str, contents: &str) -> StoreResult<Vec<T>> {
    serde_json::from_str(contents).map_err(|e| StoreError::Fixture {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn load<T: DeserializeOwned>(dir: &Path, name: &str, embedded: &str) -> StoreResult<Vec<T>> {
    let path = dir.join(name);
    if !path.exists() {
        debug!(file = name, "Fixture file absent, using embedded copy");
        return parse(name, embedded);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| StoreError::Fixture {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    let rows: Vec<T> = parse(name, &contents)?;
    debug!(file = name, count = rows.len(), "Loaded fixture file");
    Ok(rows)
}
