//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bistro-core errors (this file)                                        │
//! │  ├── CoreError        - Structural misuse of the engine                │
//! │  └── ValidationError  - Catalog / config / contact validation          │
//! │                                                                         │
//! │  kiosk errors (app)                                                    │
//! │  └── KioskError       - What the terminal prints                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → KioskError → stderr               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! A rejected quantity (non-numeric, out of range, unchanged) is a normal
//! outcome of `QuantityControl::set_value`, reported as
//! [`QuantityOutcome`](crate::quantity::QuantityOutcome). The control resyncs
//! and nothing is raised.

use thiserror::Error;

use crate::catalog::{OptionId, ParamId, ProductId};
use crate::cart_line::LineId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent requests the engine cannot honour because they refer to
/// things that do not exist (or no longer exist).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not part of the loaded menu.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Parameter is not defined on the product.
    #[error("Product {product} has no parameter '{param}'")]
    ParameterNotFound { product: ProductId, param: ParamId },

    /// Option is not defined on the parameter.
    #[error("Parameter '{param}' of {product} has no option '{option}'")]
    OptionNotFound {
        product: ProductId,
        param: ParamId,
        option: OptionId,
    },

    /// Cart line is not in the cart.
    ///
    /// ## When This Occurs
    /// - The line was already removed (double click on "remove")
    /// - The cart was cleared after an order was submitted
    #[error("Cart line not found: {0}")]
    LineNotFound(LineId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Bounds are inverted or do not contain the default.
    #[error("{field}: {reason}")]
    InvalidBounds { field: String, reason: String },

    /// Duplicate value (e.g., two products with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
