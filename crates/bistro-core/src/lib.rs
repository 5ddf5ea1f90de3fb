//! # bistro-core: Pricing and Cart Logic for the Bistro Storefront
//!
//! This crate holds every rule of the storefront: how a configured product
//! is priced, how quantities are accepted, and how the cart adds up. It
//! performs no I/O; rendering, networking and persistence belong to the
//! front-end that drives it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Front-end (apps/kiosk)                         │   │
//! │  │    catalog JSON ──► commands on stdin ──► order JSON on stdout  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ method calls                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │configurator│  │   cart    │  │ validation│  │   │
//! │  │   │ Products  │  │  Pricing   │  │ CartLine  │  │   rules   │  │   │
//! │  │   │  Params   │  │  Quantity  │  │  Totals   │  │  checks   │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Product definitions, parameters and options
//! - [`selection`] - Which options the user ticked
//! - [`pricing`] - Unit/line price with the default-option rule
//! - [`quantity`] - Bounded quantity stepper
//! - [`configurator`] - One product on the menu
//! - [`menu`] - Single-open accordion over all configurators
//! - [`cart_line`] / [`cart`] - Cart lines and totals
//! - [`order`] - Summaries and the order payload
//! - [`storefront`] - Menu and cart wired together
//! - [`config`] - Engine configuration
//! - [`events`] - Observer channels
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] / [`validation`] - Error types and rule checks
//!
//! ## Design Principles
//!
//! 1. **Explicit Configuration**: quantity bounds and delivery fee are passed
//!    in at construction, never read from globals
//! 2. **Integer Money**: all monetary values are in cents (i64)
//! 3. **Derived Totals**: cart totals are recomputed from the lines on every
//!    change
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bistro_core::{Catalog, DeliveryContact, EngineConfig, Money, Storefront};
//!
//! let catalog: Catalog = serde_json::from_str(r#"[
//!     { "id": "cake", "name": "Cake", "price": 1200,
//!       "params": { "size": { "label": "Size", "type": "radios", "options": {
//!           "small": { "label": "Small", "price": 0, "default": true },
//!           "big":   { "label": "Big",   "price": 400 } } } } }
//! ]"#).unwrap();
//!
//! let mut shop = Storefront::from_catalog(&catalog, EngineConfig::default()).unwrap();
//! shop.add_to_cart(&"cake".into()).unwrap();
//!
//! let payload = shop
//!     .submit_order(&DeliveryContact::new("Main Street 1", "555-0100"))
//!     .unwrap();
//! assert_eq!(payload.total_price, Money::from_major(32)); // 12 + 20 delivery
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod cart_line;
pub mod catalog;
pub mod config;
pub mod configurator;
pub mod error;
pub mod events;
pub mod menu;
pub mod money;
pub mod order;
pub mod pricing;
pub mod quantity;
pub mod selection;
pub mod storefront;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartEvent, CartTotals};
pub use cart_line::{CartLine, LineId};
pub use catalog::{Catalog, OptionId, ParamId, ProductDefinition, ProductId};
pub use config::{EngineConfig, QuantityBounds};
pub use configurator::{ConfiguratorEvent, Disclosure, ProductConfigurator};
pub use error::{CoreError, CoreResult, ValidationError};
pub use menu::{AccordionTransition, MenuCoordinator};
pub use money::Money;
pub use order::{CartLineSummary, DeliveryContact, OrderLine, OrderPayload};
pub use quantity::{QuantityControl, QuantityOutcome};
pub use selection::Selection;
pub use storefront::Storefront;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Starting value of a fresh quantity stepper.
pub const DEFAULT_QUANTITY: i64 = 1;

/// Smallest quantity a stepper accepts.
pub const MIN_QUANTITY: i64 = 1;

/// Largest quantity a stepper accepts.
///
/// Single digit so the stepper input never needs more than one character.
pub const MAX_QUANTITY: i64 = 9;

/// Hard ceiling for a configured `quantity.max`.
///
/// Keeps `unit price × quantity` and the cart sum far from `i64` overflow.
pub const MAX_QUANTITY_CEILING: i64 = 999;

/// Flat delivery fee, charged once per non-empty cart.
pub const DEFAULT_DELIVERY_FEE: Money = Money::from_major(20);
