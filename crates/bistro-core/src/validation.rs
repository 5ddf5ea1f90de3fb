//! # Validation Module
//!
//! Input validation for data that enters the engine from outside:
//! catalog entries, configuration, and the delivery contact on an order.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog load                                                 │
//! │  ├── Product id / name present, base price ≥ 0                         │
//! │  └── Product ids unique                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine construction                                          │
//! │  └── min ≤ default ≤ max, delivery fee ≥ 0                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Runtime input                                                │
//! │  ├── Quantity: rejected in place by QuantityControl (never an error)   │
//! │  └── Contact: address / phone present when building the order         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::validation::validate_contact;
//!
//! let (address, phone) = validate_contact("  Main Street 1 ", "555-0100").unwrap();
//! assert_eq!(address, "Main Street 1");
//! assert!(validate_contact("", "555-0100").is_err());
//! ```

use crate::catalog::ProductDefinition;
use crate::config::QuantityBounds;
use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_QUANTITY_CEILING;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates one product definition.
///
/// ## Rules
/// - `id` and `name` must not be blank
/// - Base price must be non-negative
///
/// Option deltas are not checked: a negative delta is a legitimate discount.
pub fn validate_product(product: &ProductDefinition) -> ValidationResult<()> {
    require("product id", product.id.as_str())?;
    require("product name", &product.name)?;
    validate_non_negative("product price", product.price)?;
    Ok(())
}

// =============================================================================
// Configuration Validators
// =============================================================================

/// Validates quantity stepper bounds.
///
/// ## Rules
/// - `min` must be non-negative
/// - `min ≤ max`
/// - `max ≤ MAX_QUANTITY_CEILING`
/// - `default_value` lies in `[min, max]`
pub fn validate_quantity_bounds(bounds: &QuantityBounds) -> ValidationResult<()> {
    if bounds.min < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity.min".to_string(),
        });
    }

    if bounds.min > bounds.max {
        return Err(ValidationError::InvalidBounds {
            field: "quantity".to_string(),
            reason: format!("min {} is greater than max {}", bounds.min, bounds.max),
        });
    }

    if bounds.max > MAX_QUANTITY_CEILING {
        return Err(ValidationError::OutOfRange {
            field: "quantity.max".to_string(),
            min: bounds.min,
            max: MAX_QUANTITY_CEILING,
        });
    }

    if !bounds.contains(bounds.default_value) {
        return Err(ValidationError::OutOfRange {
            field: "quantity.default_value".to_string(),
            min: bounds.min,
            max: bounds.max,
        });
    }

    Ok(())
}

/// Validates that a quantity lies within bounds.
///
/// Used when seeding a control from data (e.g. a summary being added to the
/// cart), never for interactive input.
pub fn validate_quantity(value: i64, bounds: &QuantityBounds) -> ValidationResult<()> {
    if !bounds.contains(value) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(())
}

/// Validates that an amount is not negative.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates the delivery contact of an order.
///
/// ## Returns
/// The trimmed `(address, phone)` pair.
pub fn validate_contact(address: &str, phone: &str) -> ValidationResult<(String, String)> {
    let address = require("address", address)?;
    let phone = require("phone", phone)?;
    Ok((address.to_string(), phone.to_string()))
}

fn require<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
