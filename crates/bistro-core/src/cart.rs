//! # Cart Aggregator
//!
//! Owns the ordered list of cart lines and the totals derived from it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  View Action              Cart Method              Lines Change         │
//! │  ───────────              ───────────              ────────────         │
//! │                                                                         │
//! │  "Add to cart" ──────────► add(summary) ─────────► lines.push(line)    │
//! │                                                                         │
//! │  Line "+" / "−" / typed ─► set_line_quantity*() ─► line reprices       │
//! │                                                                         │
//! │  Line "remove" ──────────► remove(line_id) ──────► lines.remove(i)     │
//! │                                                                         │
//! │  Every change above ─────► update() ─────────────► totals recomputed   │
//! │                                                    from scratch         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//! item_count   = Σ line.amount
//! subtotal     = Σ line.price
//! delivery_fee = item_count == 0 ? 0 : config.delivery_fee
//! total        = subtotal + delivery_fee
//! ```
//! The fee waiver is decided before the total is summed, so an empty cart
//! always shows a total of zero.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::cart_line::{CartLine, LineId};
use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};
use crate::events::{Notifier, Subscription};
use crate::money::Money;
use crate::order::{CartLineSummary, DeliveryContact, OrderPayload};
use crate::quantity::QuantityOutcome;

/// Derived cart figures. A view of the line list, never a source of truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    #[serde(rename = "totalNumber")]
    pub item_count: i64,

    #[serde(rename = "subtotalPrice")]
    pub subtotal: Money,

    pub delivery_fee: Money,

    #[serde(rename = "totalPrice")]
    pub total: Money,
}

impl CartTotals {
    /// Sums the totals over `lines`.
    pub fn compute(lines: &[CartLine], flat_fee: Money) -> Self {
        let item_count: i64 = lines.iter().map(CartLine::amount).sum();
        let subtotal: Money = lines.iter().map(CartLine::price).sum();

        let delivery_fee = if item_count == 0 {
            Money::zero()
        } else {
            flat_fee
        };

        CartTotals {
            item_count,
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}

/// What the cart announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    LineAdded(LineId),
    LineRemoved(LineId),
    Cleared,
    TotalsUpdated(CartTotals),
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines keep insertion order; the same product added twice is two lines
/// - The line list changes only through `add`, `remove` and `clear`
/// - `totals()` always equals `CartTotals::compute(lines, fee)`
#[derive(Debug)]
pub struct Cart {
    config: EngineConfig,
    lines: Vec<CartLine>,
    totals: CartTotals,
    events: Notifier<CartEvent>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new(config: EngineConfig) -> Self {
        Cart {
            config,
            lines: Vec::new(),
            totals: CartTotals::default(),
            events: Notifier::new(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // =========================================================================
    // Line Collection
    // =========================================================================

    /// Appends a new line built from `summary` and recomputes totals.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::cart::Cart;
    /// use bistro_core::config::EngineConfig;
    /// use bistro_core::order::CartLineSummary;
    /// use bistro_core::Money;
    ///
    /// let mut cart = Cart::new(EngineConfig::default());
    /// cart.add(CartLineSummary {
    ///     id: "salad".into(),
    ///     name: "Salad".to_string(),
    ///     amount: 2,
    ///     price_single: Money::from_major(9),
    ///     price: Money::from_major(18),
    ///     params: Default::default(),
    /// }).unwrap();
    ///
    /// let totals = cart.totals();
    /// assert_eq!(totals.item_count, 2);
    /// assert_eq!(totals.total, Money::from_major(38)); // 18 + 20 delivery
    /// ```
    pub fn add(&mut self, summary: CartLineSummary) -> CoreResult<LineId> {
        let line = CartLine::new(summary, self.config.quantity)?;
        let id = line.id();

        info!(line = %id, product = %line.product_id(), amount = line.amount(), "Line added");
        self.lines.push(line);
        self.events.publish(CartEvent::LineAdded(id));
        self.update();

        Ok(id)
    }

    /// Removes the line with `id` and recomputes totals.
    ///
    /// Removing a line that is not in the cart is an error and changes
    /// nothing.
    pub fn remove(&mut self, id: LineId) -> CoreResult<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|line| line.id() == id)
            .ok_or(CoreError::LineNotFound(id))?;

        let line = self.lines.remove(index);
        info!(line = %id, product = %line.product_id(), "Line removed");
        self.events.publish(CartEvent::LineRemoved(id));
        self.update();

        Ok(line)
    }

    /// Drops every line (after a submitted order).
    pub fn clear(&mut self) {
        self.lines.clear();
        info!("Cart cleared");
        self.events.publish(CartEvent::Cleared);
        self.update();
    }

    // =========================================================================
    // Line Quantity
    // =========================================================================

    pub fn set_line_quantity(&mut self, id: LineId, value: i64) -> CoreResult<QuantityOutcome> {
        self.with_line(id, |line| line.set_quantity(value))
    }

    pub fn set_line_quantity_input(&mut self, id: LineId, raw: &str) -> CoreResult<QuantityOutcome> {
        self.with_line(id, |line| line.set_quantity_input(raw))
    }

    pub fn increment_line(&mut self, id: LineId) -> CoreResult<QuantityOutcome> {
        self.with_line(id, CartLine::increment)
    }

    pub fn decrement_line(&mut self, id: LineId) -> CoreResult<QuantityOutcome> {
        self.with_line(id, CartLine::decrement)
    }

    /// Runs a quantity operation on one line; an accepted change reprices
    /// the line and then the cart before this returns.
    fn with_line<F>(&mut self, id: LineId, op: F) -> CoreResult<QuantityOutcome>
    where
        F: FnOnce(&mut CartLine) -> QuantityOutcome,
    {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.id() == id)
            .ok_or(CoreError::LineNotFound(id))?;

        let outcome = op(line);
        if outcome.is_updated() {
            self.update();
        }
        Ok(outcome)
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Recomputes every total from the current lines.
    pub fn update(&mut self) -> CartTotals {
        self.totals = CartTotals::compute(&self.lines, self.config.delivery_fee);
        debug!(
            items = self.totals.item_count,
            subtotal = %self.totals.subtotal,
            delivery_fee = %self.totals.delivery_fee,
            total = %self.totals.total,
            "Cart totals updated"
        );
        self.events.publish(CartEvent::TotalsUpdated(self.totals));
        self.totals
    }

    // =========================================================================
    // Order
    // =========================================================================

    /// Builds the payload for the order endpoint.
    ///
    /// The contact is trimmed and must be complete. The cart itself is left
    /// untouched; clear it once the transport reports success.
    pub fn build_order_payload(&self, contact: &DeliveryContact) -> CoreResult<OrderPayload> {
        let contact = contact.validated()?;
        let products = self.lines.iter().map(CartLine::get_data).collect();
        let payload = OrderPayload::new(contact, self.totals, products);

        info!(
            lines = payload.products.len(),
            total = %payload.total_price,
            "Order payload built"
        );
        Ok(payload)
    }

    pub fn subscribe(&mut self) -> Subscription<CartEvent> {
        self.events.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
