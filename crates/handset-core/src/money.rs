//! # Money Module
//!
//! The `Money` type: every price, cost, total and offer in the shop.
//!
//! ## Integer Cents
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale of $599.99 + 8% tax                                              │
//! │                                                                         │
//! │  float:   599.99 * 0.08 = 47.999199999999995                           │
//! │  cents:   59999 * 800 bps = 4799.92 → 4800 cents ($48.00)              │
//! │                                                                         │
//! │  Revenue totals, CLV sums and averages all stay exact in cents.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use handset_core::money::Money;
//!
//! let phone = Money::from_major(599);
//! let case = Money::from_cents(1999);
//! assert_eq!((phone + case).cents(), 61899);
//!
//! // Averages round half away from zero and never divide by zero
//! assert_eq!(Money::average(Money::from_cents(15000), 2).cents(), 7500);
//! assert!(Money::average(Money::from_cents(15000), 0).is_zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in cents.
///
/// Serialized as a bare integer so fixture files and reports carry cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use handset_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(450).cents(), 45000);
    /// ```
    #[inline]
    pub const fn from_major(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at the given rate, rounding half up.
    ///
    /// ```rust
    /// use handset_core::money::Money;
    /// use handset_core::types::TaxRate;
    ///
    /// // $599.99 at 8% = $47.9992 → $48.00
    /// let tax = Money::from_cents(59999).calculate_tax(TaxRate::from_bps(800));
    /// assert_eq!(tax.cents(), 4800);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.portion_bps(rate.bps())
    }

    /// Returns `bps` basis points of this amount (1000 bps = 10%).
    ///
    /// Used for percentage discounts at checkout. i128 keeps large
    /// amounts from overflowing before the division.
    pub fn portion_bps(&self, bps: u32) -> Money {
        let portion = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money(portion as i64)
    }

    /// Multiplies a unit price by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Divides a total evenly over `count` items.
    ///
    /// Rounds half away from zero. An empty denominator yields zero rather
    /// than a panic, which is what every average in the reports wants.
    pub fn average(total: Money, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }

        let n = count as i64;
        let quotient = total.0 / n;
        let remainder = total.0 % n;

        if remainder.abs() * 2 >= n {
            Money(quotient + total.0.signum())
        } else {
            Money(quotient)
        }
    }

    /// Converts to a float in whole currency units, for chart output only.
    #[inline]
    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as `$1234.50` with no digit grouping. Localized display is the
/// frontend's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major() {
        let money = Money::from_major(600);
        assert_eq!(money.cents(), 60000);
        assert_eq!(money.dollars(), 600);
        assert_eq!(money.cents_part(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(59999).to_string(), "$599.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_tax_at_shop_rate() {
        // $100.00 at 8% = $8.00
        let tax = Money::from_major(100).calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 800);
    }

    #[test]
    fn test_portion_rounds_half_up() {
        // 10% of $0.05 = 0.5 cents → 1 cent
        assert_eq!(Money::from_cents(5).portion_bps(1000).cents(), 1);
        // 15% of $200.00
        assert_eq!(Money::from_major(200).portion_bps(1500).cents(), 3000);
    }

    #[test]
    fn test_average() {
        assert_eq!(Money::average(Money::from_major(150), 2), Money::from_major(75));
        // 1000 / 3 = 333.33 → 333
        assert_eq!(Money::average(Money::from_cents(1000), 3).cents(), 333);
        // 1001 / 2 = 500.5 → 501
        assert_eq!(Money::average(Money::from_cents(1001), 2).cents(), 501);
        // -1001 / 2 = -500.5 → -501
        assert_eq!(Money::average(Money::from_cents(-1001), 2).cents(), -501);
    }

    #[test]
    fn test_average_of_nothing_is_zero() {
        assert!(Money::average(Money::from_major(99), 0).is_zero());
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1999)).unwrap();
        assert_eq!(json, "1999");
    }
}
