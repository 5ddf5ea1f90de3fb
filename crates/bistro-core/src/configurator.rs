//! # Product Configurator
//!
//! One menu entry: a product definition plus the user's current option
//! selection and quantity, with an always-fresh line price.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  option ticked ──► apply_selection / toggle_option ──┐                  │
//! │                                                      ├──► reprice()     │
//! │  "+" / "−" / typed ──► set_quantity* ──► Updated? ───┘        │         │
//! │                                                               ▼         │
//! │                                              PriceChanged (if moved)    │
//! │                                                                         │
//! │  "Add to cart" ──► add_to_cart() ──► CartLineSummary + AddToCart event  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expanded/collapsed state is set by the [`MenuCoordinator`](crate::menu::MenuCoordinator),
//! which keeps at most one configurator expanded.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{OptionId, ParamId, ProductDefinition, ProductId};
use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};
use crate::events::{Notifier, Subscription};
use crate::money::Money;
use crate::order::CartLineSummary;
use crate::pricing;
use crate::quantity::{QuantityControl, QuantityOutcome};
use crate::selection::Selection;

/// Accordion state of one configurator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disclosure {
    #[default]
    Collapsed,
    Expanded,
}

/// What a configurator announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfiguratorEvent {
    PriceChanged { product: ProductId, price: Money },
    DisclosureChanged { product: ProductId, state: Disclosure },
    AddToCart(CartLineSummary),
}

/// State owner for one product on the menu.
#[derive(Debug)]
pub struct ProductConfigurator {
    definition: ProductDefinition,
    selection: Selection,
    quantity: QuantityControl,
    price: Money,
    disclosure: Disclosure,
    events: Notifier<ConfiguratorEvent>,
}

impl ProductConfigurator {
    /// Creates a configurator showing the default options and default quantity.
    pub fn new(definition: ProductDefinition, config: &EngineConfig) -> Self {
        let selection = Selection::defaults_for(&definition);
        let quantity = QuantityControl::new(config.quantity);
        let price = pricing::compute_price(&definition, &selection, quantity.value());

        ProductConfigurator {
            definition,
            selection,
            quantity,
            price,
            disclosure: Disclosure::Collapsed,
            events: Notifier::new(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn id(&self) -> &ProductId {
        &self.definition.id
    }

    pub fn definition(&self) -> &ProductDefinition {
        &self.definition
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn quantity(&self) -> &QuantityControl {
        &self.quantity
    }

    /// Current line price (unit price × quantity).
    pub fn price(&self) -> Money {
        self.price
    }

    /// Current price of one unit with the selected options.
    pub fn unit_price(&self) -> Money {
        pricing::unit_price(&self.definition, &self.selection)
    }

    pub fn disclosure(&self) -> Disclosure {
        self.disclosure
    }

    pub fn is_expanded(&self) -> bool {
        self.disclosure == Disclosure::Expanded
    }

    /// Image layers the view should show: `"<param>-<option>"` for every
    /// selected option the product defines.
    pub fn visible_images(&self) -> Vec<String> {
        self.selection
            .iter()
            .filter(|(param, option)| self.definition.option(param, option).is_some())
            .map(|(param, option)| format!("{param}-{option}"))
            .collect()
    }

    /// Prices this product for an arbitrary selection and quantity without
    /// touching the configurator's own state.
    pub fn compute_price(&self, selection: &Selection, quantity: i64) -> Money {
        pricing::compute_price(&self.definition, selection, quantity)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Replaces the whole selection snapshot (a form "change").
    ///
    /// Every referenced parameter and option must exist on the product;
    /// otherwise nothing changes.
    pub fn apply_selection(&mut self, selection: Selection) -> CoreResult<Money> {
        for (param, option) in selection.iter() {
            self.ensure_option(param, option)?;
        }
        self.selection = selection;
        Ok(self.reprice())
    }

    pub fn select_option(&mut self, param: &ParamId, option: &OptionId) -> CoreResult<Money> {
        self.ensure_option(param, option)?;
        self.selection.select(param.clone(), option.clone());
        Ok(self.reprice())
    }

    pub fn deselect_option(&mut self, param: &ParamId, option: &OptionId) -> CoreResult<Money> {
        self.ensure_option(param, option)?;
        self.selection.deselect(param, option);
        Ok(self.reprice())
    }

    pub fn toggle_option(&mut self, param: &ParamId, option: &OptionId) -> CoreResult<Money> {
        self.ensure_option(param, option)?;
        self.selection.toggle(param.clone(), option.clone());
        Ok(self.reprice())
    }

    fn ensure_option(&self, param: &ParamId, option: &OptionId) -> CoreResult<()> {
        let parameter =
            self.definition
                .parameter(param)
                .ok_or_else(|| CoreError::ParameterNotFound {
                    product: self.id().clone(),
                    param: param.clone(),
                })?;

        if !parameter.options.contains_key(option) {
            return Err(CoreError::OptionNotFound {
                product: self.id().clone(),
                param: param.clone(),
                option: option.clone(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Quantity
    // =========================================================================

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
        if outcome.is_updated() {
            self.reprice();
        }
        outcome
    }

    fn reprice(&mut self) -> Money {
        let price =
            pricing::compute_price(&self.definition, &self.selection, self.quantity.value());

        if price != self.price {
            debug!(product = %self.id(), from = %self.price, to = %price, "Price changed");
            self.price = price;
            self.events.publish(ConfiguratorEvent::PriceChanged {
                product: self.id().clone(),
                price,
            });
        }
        price
    }

    // =========================================================================
    // Cart Handoff
    // =========================================================================

    /// Packages the current configuration without announcing it.
    pub fn summary(&self) -> CartLineSummary {
        CartLineSummary {
            id: self.id().clone(),
            name: self.definition.name.clone(),
            amount: self.quantity.value(),
            price_single: self.definition.price,
            price: self.price,
            params: pricing::snapshot_params(&self.definition, &self.selection),
        }
    }

    /// Raises the "add to cart" intent and returns its summary.
    ///
    /// The configurator keeps its selection and quantity afterwards.
    pub fn add_to_cart(&mut self) -> CartLineSummary {
        let summary = self.summary();
        debug!(product = %summary.id, amount = summary.amount, price = %summary.price, "Add to cart");
        self.events
            .publish(ConfiguratorEvent::AddToCart(summary.clone()));
        summary
    }

    // =========================================================================
    // Accordion / Observers
    // =========================================================================

    pub(crate) fn set_disclosure(&mut self, state: Disclosure) {
        if self.disclosure == state {
            return;
        }
        self.disclosure = state;
        self.events.publish(ConfiguratorEvent::DisclosureChanged {
            product: self.id().clone(),
            state,
        });
    }

    pub fn subscribe(&mut self) -> Subscription<ConfiguratorEvent> {
        self.events.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
