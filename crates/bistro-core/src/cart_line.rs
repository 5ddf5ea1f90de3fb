//! # Cart Line
//!
//! One entry in the cart: a frozen [`CartLineSummary`] plus its own
//! quantity stepper.
//!
//! ## Repricing Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  created:           price = summary.price  (options included)           │
//! │  quantity changed:  price = price_single × quantity                     │
//! │                                                                         │
//! │  price_single is the product's base unit price captured when the line   │
//! │  was added. The selection is never re-read; once in the cart, only      │
//! │  quantity scales the line.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{ParamId, ProductId};
use crate::config::QuantityBounds;
use crate::error::CoreResult;
use crate::money::Money;
use crate::order::{CartLineSummary, OrderLine, ParamSnapshot};
use crate::quantity::{QuantityControl, QuantityOutcome};

/// Identity of a cart line.
///
/// Adding the same product twice yields two lines with distinct ids, so
/// removal targets exactly one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(Uuid);

impl LineId {
    pub fn new() -> Self {
        LineId(Uuid::new_v4())
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A product configuration in the cart.
#[derive(Debug)]
pub struct CartLine {
    id: LineId,
    product_id: ProductId,
    name: String,
    quantity: QuantityControl,
    price_single: Money,
    price: Money,
    params: IndexMap<ParamId, ParamSnapshot>,
    added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line seeded with the summary's quantity.
    ///
    /// Fails if the summary's amount lies outside `bounds`.
    pub fn new(summary: CartLineSummary, bounds: QuantityBounds) -> CoreResult<Self> {
        let quantity = QuantityControl::with_value(bounds, summary.amount)?;

        Ok(CartLine {
            id: LineId::new(),
            product_id: summary.id,
            name: summary.name,
            quantity,
            price_single: summary.price_single,
            price: summary.price,
            params: summary.params,
            added_at: Utc::now(),
        })
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> &QuantityControl {
        &self.quantity
    }

    /// Shorthand for `quantity().value()`.
    pub fn amount(&self) -> i64 {
        self.quantity.value()
    }

    pub fn price_single(&self) -> Money {
        self.price_single
    }

    /// Current line price.
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn params(&self) -> &IndexMap<ParamId, ParamSnapshot> {
        &self.params
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn set_quantity(&mut self, value: i64) -> QuantityOutcome {
        let outcome = self.quantity.set_value(value);
        self.after_quantity(outcome)
    }

    pub fn set_quantity_input(&mut self, raw: &str) -> QuantityOutcome {
        let outcome = self.quantity.set_input(raw);
        self.after_quantity(outcome)
    }

    pub fn increment(&mut self) -> QuantityOutcome {
        let outcome = self.quantity.increment();
        self.after_quantity(outcome)
    }

    pub fn decrement(&mut self) -> QuantityOutcome {
        let outcome = self.quantity.decrement();
        self.after_quantity(outcome)
    }

    fn after_quantity(&mut self, outcome: QuantityOutcome) -> QuantityOutcome {
        if let QuantityOutcome::Updated(update) = outcome {
            self.price = self.price_single.multiply_quantity(update.current);
            debug!(line = %self.id, amount = update.current, price = %self.price, "Line repriced");
        }
        outcome
    }

    /// The line as it goes into the order payload.
    pub fn get_data(&self) -> OrderLine {
        OrderLine {
            id: self.product_id.clone(),
            name: self.name.clone(),
            amount: self.quantity.value(),
            price_single: self.price_single,
            price: self.price,
            params: self.params.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::OptionId;
    use crate::error::CoreError;

    pub(crate) fn summary(amount: i64, price_single: i64, price: i64) -> CartLineSummary {
        let mut options = IndexMap::new();
        options.insert(OptionId::from("cream"), "Sour cream".to_string());

        let mut params = IndexMap::new();
        params.insert(
            ParamId::from("sauce"),
            ParamSnapshot {
                label: "Sauce".to_string(),
                options,
            },
        );

        CartLineSummary {
            id: ProductId::from("pizza"),
            name: "Nonna Alba's Pizza".to_string(),
            amount,
            price_single: Money::from_major(price_single),
            price: Money::from_major(price),
            params,
        }
    }

    #[test]
    fn test_new_line_mirrors_summary() {
        let summary = summary(2, 20, 38);
        let line = CartLine::new(summary.clone(), QuantityBounds::default()).unwrap();

        let data = line.get_data();
        assert_eq!(data.id, summary.id);
        assert_eq!(data.name, summary.name);
        assert_eq!(data.amount, summary.amount);
        assert_eq!(data.price_single, summary.price_single);
        assert_eq!(data.price, summary.price);
        assert_eq!(data.params, summary.params);
    }

    #[test]
    fn test_quantity_change_reprices_from_base_unit_price() {
        let mut line = CartLine::new(summary(2, 20, 38), QuantityBounds::default()).unwrap();

        assert!(line.set_quantity(3).is_updated());
        assert_eq!(line.amount(), 3);
        assert_eq!(line.price(), Money::from_major(60));

        assert!(line.decrement().is_updated());
        assert_eq!(line.price(), Money::from_major(40));
    }

    #[test]
    fn test_rejected_quantity_keeps_price() {
        let mut line = CartLine::new(summary(2, 20, 38), QuantityBounds::default()).unwrap();

        assert!(!line.set_quantity_input("x").is_updated());
        assert!(!line.set_quantity(0).is_updated());
        assert!(!line.set_quantity(2).is_updated());

        assert_eq!(line.price(), Money::from_major(38));
    }

    #[test]
    fn test_round_trip_after_quantity_change() {
        let summary = summary(1, 20, 19);
        let mut line = CartLine::new(summary.clone(), QuantityBounds::default()).unwrap();
        line.increment();

        let data = line.get_data();
        assert_eq!(data.id, summary.id);
        assert_eq!(data.name, summary.name);
        assert_eq!(data.price_single, summary.price_single);
        assert_eq!(data.params, summary.params);
        assert_eq!(data.amount, 2);
        assert_eq!(data.price, Money::from_major(40));
    }

    #[test]
    fn test_amount_outside_bounds_rejected() {
        let err = CartLine::new(summary(12, 20, 240), QuantityBounds::default()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_lines_get_distinct_ids() {
        let a = CartLine::new(summary(1, 20, 20), QuantityBounds::default()).unwrap();
        let b = CartLine::new(summary(1, 20, 20), QuantityBounds::default()).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
