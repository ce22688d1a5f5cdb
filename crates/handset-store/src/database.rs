//! # Database Handle
//!
//! The shop's in-memory tables behind one lock, and the repositories over
//! them.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Database (Clone)                               │
//! │                                                                         │
//! │  ShopConfig::load() ──► Database::new(config)                          │
//! │                             │  fixtures: embedded or [fixtures].dir    │
//! │                             ▼                                           │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │  Arc<RwLock<Tables>>                                          │     │
//! │  │  customers · devices · sales · repairs · suppliers ·          │     │
//! │  │  supplier_orders · trade_ins · warranty_claims                │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │        ▲            ▲                ▲                                  │
//! │  db.customers()  db.sales()   db.insights()   ... (cheap clones)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads share the lock. Every write, including the multi-table ones
//! (checkout, order receipt), holds the write lock for its whole duration,
//! so other callers see either all of it or none of it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use handset_core::{
    Customer, Device, RepairTicket, Sale, Supplier, SupplierOrder, TradeIn, WarrantyClaim,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::ShopConfig;
use crate::error::StoreResult;
use crate::fixtures::FixtureSet;
use crate::insights::InsightsService;
use crate::repository::customer::CustomerRepository;
use crate::repository::device::DeviceRepository;
use crate::repository::repair::RepairRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::supplier::SupplierRepository;
use crate::repository::supplier_order::SupplierOrderRepository;
use crate::repository::trade_in::TradeInRepository;
use crate::repository::warranty::WarrantyClaimRepository;
use crate::table::Table;

// =============================================================================
// Clock
// =============================================================================

/// Source of "now" for timestamps and analytics windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    /// Always returns the same instant. Used by tests and replayed reports.
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub customers: Table<Customer>,
    pub devices: Table<Device>,
    pub sales: Table<Sale>,
    pub repairs: Table<RepairTicket>,
    pub suppliers: Table<Supplier>,
    pub supplier_orders: Table<SupplierOrder>,
    pub trade_ins: Table<TradeIn>,
    pub warranty_claims: Table<WarrantyClaim>,
}

impl Tables {
    fn seeded(set: FixtureSet) -> StoreResult<Self> {
        Ok(Tables {
            customers: Table::seeded(set.customers)?,
            devices: Table::seeded(set.devices)?,
            sales: Table::seeded(set.sales)?,
            repairs: Table::seeded(set.repairs)?,
            suppliers: Table::seeded(set.suppliers)?,
            supplier_orders: Table::seeded(set.supplier_orders)?,
            trade_ins: Table::seeded(set.trade_ins)?,
            warranty_claims: Table::seeded(set.warranty_claims)?,
        })
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main handle providing repository access.
///
/// ## Usage
/// ```rust,no_run
/// use handset_store::{Database, ShopConfig};
///
/// # async fn run() -> handset_store::StoreResult<()> {
/// let db = Database::new(ShopConfig::load(None)?)?;
/// let low = db.devices().get_low_stock(10).await;
/// let dashboard = db.insights().dashboard().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pub(crate) tables: Arc<RwLock<Tables>>,
    config: Arc<ShopConfig>,
    clock: Clock,
}

impl Database {
    /// Loads fixtures as the config says (embedded set, or `[fixtures].dir`).
    pub fn new(config: ShopConfig) -> StoreResult<Self> {
        let fixtures = match &config.fixtures.dir {
            Some(dir) => FixtureSet::from_dir(dir)?,
            None => FixtureSet::embedded()?,
        };
        Self::from_fixtures(fixtures, config)
    }

    /// Builds a database over the given seed data.
    pub fn from_fixtures(fixtures: FixtureSet, config: ShopConfig) -> StoreResult<Self> {
        let tables = Tables::seeded(fixtures)?;

        info!(
            customers = tables.customers.len(),
            devices = tables.devices.len(),
            sales = tables.sales.len(),
            repairs = tables.repairs.len(),
            "Store initialized"
        );

        Ok(Database {
            tables: Arc::new(RwLock::new(tables)),
            config: Arc::new(config),
            clock: Clock::System,
        })
    }

    /// A database with no records at all.
    pub fn empty(config: ShopConfig) -> Self {
        Database {
            tables: Arc::new(RwLock::new(Tables::default())),
            config: Arc::new(config),
            clock: Clock::System,
        }
    }

    /// Replaces the clock used for timestamps and analytics windows.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Takes a copy of every table.
    pub async fn snapshot(&self) -> FixtureSet {
        let tables = self.tables.read().await;
        FixtureSet {
            customers: tables.customers.all().to_vec(),
            devices: tables.devices.all().to_vec(),
            sales: tables.sales.all().to_vec(),
            repairs: tables.repairs.all().to_vec(),
            suppliers: tables.suppliers.all().to_vec(),
            supplier_orders: tables.supplier_orders.all().to_vec(),
            trade_ins: tables.trade_ins.all().to_vec(),
            warranty_claims: tables.warranty_claims.all().to_vec(),
        }
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.clone())
    }

    pub fn devices(&self) -> DeviceRepository {
        DeviceRepository::new(self.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.clone())
    }

    pub fn repairs(&self) -> RepairRepository {
        RepairRepository::new(self.clone())
    }

    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.clone())
    }

    pub fn supplier_orders(&self) -> SupplierOrderRepository {
        SupplierOrderRepository::new(self.clone())
    }

    pub fn trade_ins(&self) -> TradeInRepository {
        TradeInRepository::new(self.clone())
    }

    pub fn warranty_claims(&self) -> WarrantyClaimRepository {
        WarrantyClaimRepository::new(self.clone())
    }

    /// Dashboard and analytics composed over the repositories.
    pub fn insights(&self) -> InsightsService {
        InsightsService::new(self.clone())
    }
}
