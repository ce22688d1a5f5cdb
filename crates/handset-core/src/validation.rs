//! # Validation Module
//!
//! Input validation for everything the shop staff can type in.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Shapes and enum values                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, formats                                 │
//! │  └── Quantities, prices, percentages                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: handset-store                                                │
//! │  └── References to other records (customer, supplier, sale, device)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use handset_core::validation::{validate_imei, validate_quantity};
//!
//! validate_imei("356938035643809").unwrap();
//! validate_quantity(2).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted free-text field (issue descriptions, notes).
const MAX_TEXT_LEN: usize = 2000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, length-limited text field.
///
/// ```rust
/// use handset_core::validation::validate_required;
///
/// assert!(validate_required("name", "Alice Johnson", 100).is_ok());
/// assert!(validate_required("name", "   ", 100).is_err());
/// ```
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an optional free-text field such as notes.
pub fn validate_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@`, with something on both sides
/// - The domain part contains a dot
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email, 254)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(invalid("must contain exactly one @")),
    };

    if local.is_empty() || domain.is_empty() {
        return Err(invalid("must have a name and a domain"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

/// Validates a phone number.
///
/// Separators (spaces, dashes, dots, parentheses, a leading `+`) are
/// allowed. At least seven digits must remain.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    validate_required("phone", phone, 32)?;

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')' | '+');
    if !phone.chars().all(allowed) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "may contain only digits and separators".to_string(),
        });
    }

    if phone.chars().filter(char::is_ascii_digit).count() < 7 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain at least 7 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a handset IMEI.
///
/// ## Rules
/// - Exactly 15 ASCII digits
///
/// The Luhn check digit is not verified; refurbished stock often arrives
/// with IMEIs transcribed from boxes.
///
/// ```rust
/// use handset_core::validation::validate_imei;
///
/// assert!(validate_imei("356938035643809").is_ok());
/// assert!(validate_imei("35693803564380").is_err());
/// assert!(validate_imei("35693803564380X").is_err());
/// ```
pub fn validate_imei(imei: &str) -> ValidationResult<()> {
    let imei = imei.trim();

    if imei.is_empty() {
        return Err(ValidationError::Required {
            field: "imei".to_string(),
        });
    }

    if imei.len() != 15 || !imei.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "imei".to_string(),
            reason: "must be exactly 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
///
/// An empty query is fine; callers treat it as "match everything".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity on a cart or order line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an on-hand stock level. Zero is allowed.
pub fn validate_stock_level(field: &str, qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a price, cost or offer. Zero is allowed.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an amount that must be strictly positive, such as store credit
/// being added.
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage in basis points (0 to 10000).
///
/// Used for both the register tax rate and checkout discounts.
pub fn validate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines on a cart or purchase order.
pub fn validate_line_count(field: &str, lines: usize) -> ValidationResult<()> {
    if lines == 0 {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if lines > MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "Bob Smith", 100).is_ok());
        assert!(validate_required("name", "", 100).is_err());
        assert!(validate_required("name", &"a".repeat(101), 100).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("alice.example.com").is_err());
        assert!(validate_email("alice@@example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@localhost").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("555-0101").is_ok());
        assert!(validate_phone("+1 (555) 010-1234").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_validate_imei() {
        assert!(validate_imei("356938035643809").is_ok());
        assert!(validate_imei("").is_err());
        assert!(validate_imei("3569380356438091").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_amount("price", Money::zero()).is_ok());
        assert!(validate_amount("price", Money::from_cents(-1)).is_err());
        assert!(validate_positive_amount("credit", Money::zero()).is_err());
        assert!(validate_positive_amount("credit", Money::from_major(25)).is_ok());
    }

    #[test]
    fn test_validate_bps() {
        assert!(validate_bps("discount", 0).is_ok());
        assert!(validate_bps("discount", 10000).is_ok());
        assert!(validate_bps("discount", 10001).is_err());
    }

    #[test]
    fn test_validate_line_count() {
        assert!(validate_line_count("items", 0).is_err());
        assert!(validate_line_count("items", 3).is_ok());
        assert!(validate_line_count("items", MAX_CART_LINES + 1).is_err());
    }
}
