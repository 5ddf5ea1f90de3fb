//! # Engine Configuration
//!
//! The explicit configuration every component receives at construction.
//!
//! ## Defaults
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity.default_value   1                                             │
//! │  quantity.min             1                                             │
//! │  quantity.max             9                                             │
//! │  delivery_fee             20.00  (2000 cents)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## TOML Shape (as embedded in kiosk.toml)
//! ```toml
//! [engine]
//! delivery_fee = 2000
//!
//! [engine.quantity]
//! default_value = 1
//! min = 1
//! max = 9
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{self, ValidationResult};
use crate::{DEFAULT_DELIVERY_FEE, DEFAULT_QUANTITY, MAX_QUANTITY, MIN_QUANTITY};

/// Bounds and starting value for every quantity stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityBounds {
    pub default_value: i64,
    pub min: i64,
    pub max: i64,
}

impl QuantityBounds {
    /// Whether `value` lies in `[min, max]`.
    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_quantity_bounds(self)
    }
}

impl Default for QuantityBounds {
    fn default() -> Self {
        QuantityBounds {
            default_value: DEFAULT_QUANTITY,
            min: MIN_QUANTITY,
            max: MAX_QUANTITY,
        }
    }
}

/// Configuration of the pricing engine and cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub quantity: QuantityBounds,

    /// Flat fee charged whenever the cart holds at least one item.
    pub delivery_fee: Money,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            quantity: QuantityBounds::default(),
            delivery_fee: DEFAULT_DELIVERY_FEE,
        }
    }
}

impl EngineConfig {
    /// Checks bounds and fee.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::config::EngineConfig;
    ///
    /// let mut config = EngineConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.quantity.min = 5;
    /// config.quantity.max = 2;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> ValidationResult<()> {
        self.quantity.validate()?;
        if self.delivery_fee.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "delivery_fee".to_string(),
            });
        }
        Ok(())
    }
}
