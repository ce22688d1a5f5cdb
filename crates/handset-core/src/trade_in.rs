//! Trade-in valuation.
//!
//! An offer is the model's base price scaled by a condition multiplier,
//! rounded to whole currency units.

use crate::money::Money;
use crate::types::TradeInCondition;

/// Base offers in whole units for the models the shop prices explicitly.
const BASE_PRICES: &[(&str, i64)] = &[
    ("iPhone 14 Pro", 600),
    ("iPhone 13", 500),
    ("iPhone 12 Pro", 450),
    ("Galaxy S23 Ultra", 550),
    ("Galaxy S21", 300),
    ("Pixel 8 Pro", 400),
    ("Pixel 6", 350),
];

/// Base offer for any model not in the table.
const FALLBACK_BASE: i64 = 200;

impl TradeInCondition {
    /// Share of the base price offered, in percent.
    pub fn multiplier_pct(self) -> i64 {
        match self {
            TradeInCondition::Excellent => 100,
            TradeInCondition::Good => 75,
            TradeInCondition::Fair => 50,
            TradeInCondition::Poor => 25,
        }
    }
}

/// Base price for a model in whole units. Matching is exact on the model
/// name; the brand does not take part.
pub fn base_price(model: &str) -> i64 {
    let model = model.trim();
    BASE_PRICES
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, price)| *price)
        .unwrap_or(FALLBACK_BASE)
}

/// Evaluates a handset for trade-in.
///
/// ```rust
/// use handset_core::trade_in::evaluate_device;
/// use handset_core::types::TradeInCondition;
///
/// let offer = evaluate_device("Apple", "iPhone 13", TradeInCondition::Good);
/// assert_eq!(offer.dollars(), 375);
/// ```
pub fn evaluate_device(_brand: &str, model: &str, condition: TradeInCondition) -> Money {
    let units = (base_price(model) * condition.multiplier_pct() + 50) / 100;
    Money::from_major(units)
}
