//! # Catalog Types
//!
//! Product definitions as delivered by the catalog supplier.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog                                         │
//! │                                                                         │
//! │  ┌──────────────────┐      ┌──────────────────┐     ┌────────────────┐ │
//! │  │ ProductDefinition│ 1..n │    Parameter     │ 1..n│  ParamOption   │ │
//! │  │ ──────────────── │─────►│ ──────────────── │────►│ ────────────── │ │
//! │  │ id               │      │ label            │     │ label          │ │
//! │  │ name             │      │ kind (radios,    │     │ price (delta)  │ │
//! │  │ price (base)     │      │  checkboxes, ..) │     │ default flag   │ │
//! │  └──────────────────┘      └──────────────────┘     └────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Definitions are read-only at runtime. Only the user's selection and
//! quantity change; see [`crate::selection`].
//!
//! ## Wire Format
//! ```json
//! [{
//!   "id": "pizza",
//!   "name": "Nonna Alba's Pizza",
//!   "price": 2000,
//!   "params": {
//!     "sauce": {
//!       "label": "Sauce",
//!       "type": "radios",
//!       "options": {
//!         "tomato": { "label": "Tomato", "price": 0, "default": true },
//!         "cream":  { "label": "Sour cream", "price": 200 }
//!       }
//!     }
//!   }
//! }]
//! ```

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[ts(export)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }
    };
}

string_id!(
    /// Catalog identifier of a product (e.g. `"pizza"`).
    ProductId
);
string_id!(
    /// Identifier of a parameter within one product (e.g. `"sauce"`).
    ParamId
);
string_id!(
    /// Identifier of an option within one parameter (e.g. `"tomato"`).
    OptionId
);

// =============================================================================
// Parameter Kind
// =============================================================================

/// How the view renders a parameter.
///
/// Purely descriptive. The engine does not enforce single choice for
/// `Radios` or `Select`: whatever the selection snapshot holds is priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ParameterKind {
    Radios,
    #[default]
    Checkboxes,
    Select,
}

// =============================================================================
// Option / Parameter / Product
// =============================================================================

/// One choice within a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParamOption {
    /// Display label.
    pub label: String,

    /// Price delta in cents. May be zero.
    #[serde(default)]
    pub price: Money,

    /// Whether the option's price is already included in the base price.
    #[serde(rename = "default", default)]
    pub is_default: bool,
}

/// A configurable aspect of a product (e.g. size, toppings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Parameter {
    pub label: String,

    #[serde(rename = "type", default)]
    pub kind: ParameterKind,

    #[serde(default)]
    pub options: IndexMap<OptionId, ParamOption>,
}

impl Parameter {
    /// Iterates the ids of options flagged as default.
    pub fn default_options(&self) -> impl Iterator<Item = &OptionId> {
        self.options
            .iter()
            .filter(|(_, option)| option.is_default)
            .map(|(id, _)| id)
    }
}

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDefinition {
    pub id: ProductId,

    pub name: String,

    /// Base unit price in cents. Includes the price of every default option.
    pub price: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub params: IndexMap<ParamId, Parameter>,
}

impl ProductDefinition {
    /// Looks up a parameter by id.
    pub fn parameter(&self, param: &ParamId) -> Option<&Parameter> {
        self.params.get(param)
    }

    /// Looks up one option of one parameter.
    pub fn option(&self, param: &ParamId, option: &OptionId) -> Option<&ParamOption> {
        self.params.get(param)?.options.get(option)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The full menu, in the order the supplier listed it.
///
/// ## Invariants
/// - Product ids are unique
/// - Every product passes [`validation::validate_product`]
///
/// Deserializing a `Catalog` enforces both, so a catalog that exists is a
/// valid one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ProductDefinition>", into = "Vec<ProductDefinition>")]
pub struct Catalog {
    products: Vec<ProductDefinition>,
}

impl Catalog {
    /// Builds a catalog, validating every product and id uniqueness.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::catalog::{Catalog, ProductDefinition};
    /// use bistro_core::Money;
    ///
    /// let salad = ProductDefinition {
    ///     id: "salad".into(),
    ///     name: "Nonno Alberto's Salad".to_string(),
    ///     price: Money::from_major(9),
    ///     description: None,
    ///     params: Default::default(),
    /// };
    /// let catalog = Catalog::new(vec![salad.clone()]).unwrap();
    /// assert_eq!(catalog.len(), 1);
    ///
    /// assert!(Catalog::new(vec![salad.clone(), salad]).is_err());
    /// ```
    pub fn new(products: Vec<ProductDefinition>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for product in &products {
            validation::validate_product(product)?;
            if !seen.insert(product.id.clone()) {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: product.id.to_string(),
                });
            }
        }
        Ok(Catalog { products })
    }

    pub fn products(&self) -> &[ProductDefinition] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&ProductDefinition> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl TryFrom<Vec<ProductDefinition>> for Catalog {
    type Error = ValidationError;

    fn try_from(products: Vec<ProductDefinition>) -> Result<Self, Self::Error> {
        Catalog::new(products)
    }
}

impl From<Catalog> for Vec<ProductDefinition> {
    fn from(catalog: Catalog) -> Self {
        catalog.products
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Pizza with a default sauce (6.00, baked into the base price) and
    /// an optional topping (5.00). Base price 20.00.
    pub(crate) fn pizza() -> ProductDefinition {
        let json = r#"{
            "id": "pizza",
            "name": "Nonna Alba's Pizza",
            "price": 2000,
            "params": {
                "sauce": {
                    "label": "Sauce",
                    "type": "radios",
                    "options": {
                        "tomato": { "label": "Tomato", "price": 600, "default": true },
                        "cream": { "label": "Sour cream", "price": 500 }
                    }
                }
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    pub(crate) fn salad() -> ProductDefinition {
        ProductDefinition {
            id: ProductId::from("salad"),
            name: "Nonno Alberto's Salad".to_string(),
            price: Money::from_major(9),
            description: Some("A salad with olives".to_string()),
            params: IndexMap::new(),
        }
    }

    #[test]
    fn test_deserialize_product() {
        let product = pizza();
        assert_eq!(product.price, Money::from_major(20));

        let sauce = product.parameter(&ParamId::from("sauce")).unwrap();
        assert_eq!(sauce.kind, ParameterKind::Radios);
        assert_eq!(sauce.options.len(), 2);

        let tomato = product
            .option(&ParamId::from("sauce"), &OptionId::from("tomato"))
            .unwrap();
        assert!(tomato.is_default);

        let cream = product
            .option(&ParamId::from("sauce"), &OptionId::from("cream"))
            .unwrap();
        assert!(!cream.is_default);
        assert_eq!(cream.price, Money::from_major(5));
    }

    #[test]
    fn test_parameter_kind_defaults_to_checkboxes() {
        let param: Parameter = serde_json::from_str(
            r#"{ "label": "Toppings", "options": { "olives": { "label": "Olives" } } }"#,
        )
        .unwrap();
        assert_eq!(param.kind, ParameterKind::Checkboxes);
        assert!(param.options[&OptionId::from("olives")].price.is_zero());
    }

    #[test]
    fn test_default_options() {
        let product = pizza();
        let sauce = product.parameter(&ParamId::from("sauce")).unwrap();
        let defaults: Vec<_> = sauce.default_options().collect();
        assert_eq!(defaults, vec![&OptionId::from("tomato")]);
    }

    #[test]
    fn test_parameters_and_options_keep_listed_order() {
        let product: ProductDefinition = serde_json::from_str(
            r#"{
                "id": "pizza", "name": "Pizza", "price": 2000,
                "params": {
                    "sauce": { "label": "Sauce", "options": {
                        "tomato": { "label": "Tomato" },
                        "cream": { "label": "Sour cream" } } },
                    "crust": { "label": "Crust", "options": {
                        "standard": { "label": "Standard" } } }
                }
            }"#,
        )
        .unwrap();

        let params: Vec<_> = product.params.keys().map(ParamId::as_str).collect();
        assert_eq!(params, vec!["sauce", "crust"]);

        let sauce: Vec<_> = product.params[&ParamId::from("sauce")]
            .options
            .keys()
            .map(OptionId::as_str)
            .collect();
        assert_eq!(sauce, vec!["tomato", "cream"]);

        let json = serde_json::to_string(&product).unwrap();
        assert!(json.find("\"sauce\"") < json.find("\"crust\""));
        assert!(json.find("\"tomato\"") < json.find("\"cream\""));
    }

    #[test]
    fn test_catalog_keeps_listed_order() {
        let catalog = Catalog::new(vec![salad(), pizza()]).unwrap();
        let ids: Vec<_> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["salad", "pizza"]);
        assert!(catalog.get(&ProductId::from("pizza")).is_some());
        assert!(catalog.get(&ProductId::from("cake")).is_none());
    }

    #[test]
    fn test_catalog_rejects_duplicates_on_deserialize() {
        let product = serde_json::to_string(&salad()).unwrap();
        let json = format!("[{product},{product}]");
        let err = serde_json::from_str::<Catalog>(&json).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_catalog_rejects_negative_price() {
        let mut product = salad();
        product.price = Money::from_cents(-1);
        assert!(Catalog::new(vec![product]).is_err());
    }
}
