//! # Error Types
//!
//! Domain-specific error types for handset-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  handset-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  handset-store errors (separate crate)                                 │
//! │  └── StoreError       - Missing records, bad references, fixtures      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal. The caller decides whether to retry or report.

use thiserror::Error;

use crate::types::EntityId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A device referenced by a cart or order line does not exist.
    #[error("Device not found: {0}")]
    DeviceNotFound(EntityId),

    /// Not enough units on hand to complete a sale.
    ///
    /// ## When This Occurs
    /// ```text
    /// Cart: iPhone 13 × 3
    ///      │
    ///      ▼
    /// Device #4 quantity = 2
    ///      │
    ///      ▼
    /// InsufficientStock { device_id: 4, available: 2, requested: 3 }
    /// ```
    #[error("Insufficient stock for {name} (device {device_id}): available {available}, requested {requested}")]
    InsufficientStock {
        device_id: EntityId,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was attempted with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A status change that the entity's lifecycle does not allow.
    #[error("{entity} {id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        entity: &'static str,
        id: EntityId,
        from: String,
        to: String,
    },

    /// Editing a record that has reached a terminal status.
    #[error("{entity} {id} is {status} and can no longer be edited")]
    RecordLocked {
        entity: &'static str,
        id: EntityId,
        status: String,
    },

    /// A date range whose end precedes its start.
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: String, end: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic runs, so nothing has been touched yet.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. malformed email or IMEI).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
