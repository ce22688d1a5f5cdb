//! # handset-store: Data Layer for Handset POS
//!
//! In-memory tables seeded from JSON fixtures, the repositories that own
//! every mutation of them, and the insights service that reads them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Handset POS Data Flow                            │
//! │                                                                         │
//! │  handset-report / frontend bridge                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  handset-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Insights   │  │   │
//! │  │   │ (database.rs) │    │ customer.rs   │    │ dashboard    │  │   │
//! │  │   │               │◄───│ sale.rs       │    │ CLV, trends  │  │   │
//! │  │   │ RwLock<Tables>│    │ repair.rs ... │    │ sales report │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │ seeded by                                          │   │
//! │  │   ┌───────▼───────┐    ┌───────────────┐                       │   │
//! │  │   │   Fixtures    │    │  ShopConfig   │                       │   │
//! │  │   │ (embedded or  │    │ handset.toml  │                       │   │
//! │  │   │  directory)   │    │ + HANDSET_*   │                       │   │
//! │  │   └───────────────┘    └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  handset-core (pure rules and analytics)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`database`] - The shared handle, its tables and clock
//! - [`repository`] - One repository per entity
//! - [`insights`] - Dashboard and analytics views
//! - [`config`] - Shop configuration
//! - [`fixtures`] - Seed data loading
//! - [`table`] - A single in-memory collection
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use handset_store::{Database, ShopConfig};
//!
//! # async fn run() -> handset_store::StoreResult<()> {
//! let db = Database::new(ShopConfig::load(None)?)?;
//!
//! let customers = db.customers().search("diaz").await?;
//! let suggestions = db.supplier_orders().get_suggested_items().await;
//! let insights = db.insights().business_insights(90).await;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod database;
pub mod error;
pub mod fixtures;
pub mod insights;
pub mod repository;
pub mod table;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ShopConfig;
pub use database::{Clock, Database};
pub use error::{StoreError, StoreResult};
pub use fixtures::FixtureSet;
pub use insights::{BusinessInsights, Dashboard, InsightsService, SalesReport};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::device::{DeviceRepository, StockStatus};
pub use repository::repair::RepairRepository;
pub use repository::sale::SaleRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::supplier_order::SupplierOrderRepository;
pub use repository::trade_in::TradeInRepository;
pub use repository::warranty::WarrantyClaimRepository;
