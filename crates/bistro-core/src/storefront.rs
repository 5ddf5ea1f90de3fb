//! # Storefront
//!
//! Wires the menu to the cart the way the page does: a configurator's
//! "add to cart" intent becomes a new cart line.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog ──► MenuCoordinator ──► ProductConfigurator (one per product)  │
//! │                                        │                                │
//! │                                        │ add_to_cart() → summary        │
//! │                                        ▼                                │
//! │                                      Cart ──► build_order_payload()     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use crate::cart::Cart;
use crate::cart_line::LineId;
use crate::catalog::{Catalog, ProductId};
use crate::config::EngineConfig;
use crate::error::CoreResult;
use crate::menu::{AccordionTransition, MenuCoordinator};
use crate::order::{DeliveryContact, OrderPayload};

/// A menu and a cart sharing one engine configuration.
#[derive(Debug)]
pub struct Storefront {
    menu: MenuCoordinator,
    cart: Cart,
}

impl Storefront {
    /// Builds the menu for `catalog` and an empty cart.
    ///
    /// Fails if `config` is inconsistent (bad quantity bounds, negative fee).
    pub fn from_catalog(catalog: &Catalog, config: EngineConfig) -> CoreResult<Self> {
        config.validate()?;

        let menu = MenuCoordinator::from_catalog(catalog, &config);
        let cart = Cart::new(config);

        Ok(Storefront { menu, cart })
    }

    pub fn menu(&self) -> &MenuCoordinator {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut MenuCoordinator {
        &mut self.menu
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Expands or collapses a product's detail view.
    pub fn toggle(&mut self, product: &ProductId) -> CoreResult<AccordionTransition> {
        self.menu.toggle(product)
    }

    /// Adds the product's current configuration to the cart.
    pub fn add_to_cart(&mut self, product: &ProductId) -> CoreResult<LineId> {
        let summary = self.menu.configurator_mut(product)?.add_to_cart();
        self.cart.add(summary)
    }

    /// Builds the order payload and, once built, empties the cart.
    ///
    /// On a contact error the cart is left as it was.
    pub fn submit_order(&mut self, contact: &DeliveryContact) -> CoreResult<OrderPayload> {
        let payload = self.cart.build_order_payload(contact)?;
        self.cart.clear();
        info!(total = %payload.total_price, items = payload.total_number, "Order submitted");
        Ok(payload)
    }
}
