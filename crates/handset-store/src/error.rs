//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (validation, stock, lifecycle)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds missing records, bad references,      │
//! │       │                     fixture and config failures                │
//! │       ▼                                                                 │
//! │  Caller (report binary, frontend bridge) decides to retry or report    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation returning an error has left the tables untouched.

use handset_core::{CoreError, EntityId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id in the table.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A create referenced a parent record that does not exist.
    ///
    /// ## When This Occurs
    /// - Warranty claim for an unknown sale or supplier
    /// - Supplier order for an unknown supplier or device
    /// - Repair ticket for an unknown customer
    #[error("Invalid reference: {entity} {id} does not exist")]
    InvalidReference { entity: &'static str, id: EntityId },

    /// Two fixture records share an id.
    #[error("Duplicate {entity} id in fixtures: {id}")]
    DuplicateId { entity: &'static str, id: EntityId },

    /// Fixture file could not be read or parsed.
    #[error("Fixture {name} failed to load: {reason}")]
    Fixture { name: String, reason: String },

    /// Config file could not be read or parsed.
    #[error("Config load failed: {0}")]
    ConfigLoadFailed(String),

    /// Config values are inconsistent.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Business rule violation from handset-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_reference(entity: &'static str, id: EntityId) -> Self {
        StoreError::InvalidReference { entity, id }
    }

    /// True for lookups that found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. } | StoreError::Core(CoreError::DeviceNotFound(_))
        )
    }
}

impl From<handset_core::ValidationError> for StoreError {
    fn from(err: handset_core::ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
