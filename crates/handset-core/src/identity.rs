//! # Identity
//!
//! Numeric id allocation and the human-readable business codes derived
//! from it.
//!
//! ```text
//!   existing ids: 1 2 3 4        highest issued: 4
//!   delete 4  ──►  existing: 1 2 3   highest issued: 4
//!   next_id() ──►  5                 (4 is never handed out again)
//! ```
//!
//! Each table owns one allocator, so there is a single place that decides
//! the next id for a collection.

use crate::types::EntityId;

/// A record with a numeric identity key.
pub trait Entity: Clone {
    /// Human-readable entity name used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> EntityId;
}

/// Hands out ids for one collection.
///
/// Next id is `max(existing ids, highest ever issued) + 1`.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    high_water: EntityId,
}

impl IdAllocator {
    /// Seeds the allocator from ids already present in a collection.
    pub fn seeded(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let mut allocator = IdAllocator::default();
        for id in ids {
            allocator.observe(id);
        }
        allocator
    }

    /// Records an id that entered the collection from outside the allocator.
    pub fn observe(&mut self, id: EntityId) {
        self.high_water = self.high_water.max(id);
    }

    /// The id the next call to [`IdAllocator::next_id`] will return.
    pub fn peek(&self) -> EntityId {
        self.high_water + 1
    }

    pub fn next_id(&mut self) -> EntityId {
        self.high_water += 1;
        self.high_water
    }
}

/// Formats a business code such as `CUST004`.
///
/// The number is zero-padded to three digits and grows wider past 999.
///
/// ```rust
/// use handset_core::identity::business_code;
///
/// assert_eq!(business_code("REP", 7), "REP007");
/// assert_eq!(business_code("SALE", 1234), "SALE1234");
/// ```
pub fn business_code(prefix: &str, id: EntityId) -> String {
    format!("{prefix}{id:03}")
}

/// Prefixes for each coded collection.
pub mod prefix {
    pub const CUSTOMER: &str = "CUST";
    pub const SALE: &str = "SALE";
    pub const REPAIR: &str = "REP";
    pub const SUPPLIER: &str = "SUP";
    pub const TRADE_IN: &str = "TRADE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_allocator_continues_after_max() {
        let mut ids = IdAllocator::seeded([3, 1, 2]);
        assert_eq!(ids.peek(), 4);
        assert_eq!(ids.next_id(), 4);
        assert_eq!(ids.next_id(), 5);
    }

    #[test]
    fn test_empty_collection_starts_at_one() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut ids = IdAllocator::seeded([1, 2, 3]);
        assert_eq!(ids.next_id(), 4);

        // Record 4 is deleted from the table; the allocator is untouched
        assert_eq!(ids.next_id(), 5);
    }

    #[test]
    fn test_business_code_padding() {
        assert_eq!(business_code(prefix::CUSTOMER, 4), "CUST004");
        assert_eq!(business_code(prefix::TRADE_IN, 42), "TRADE042");
        assert_eq!(business_code(prefix::SUPPLIER, 100), "SUP100");
    }
}
