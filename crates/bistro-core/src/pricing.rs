//! # Pricing
//!
//! Pure price computation for one configured product.
//!
//! ## The Default-Option Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The base price already contains every DEFAULT option.                  │
//! │                                                                         │
//! │                     selected              not selected                  │
//! │                ┌──────────────────┬──────────────────────┐              │
//! │   default      │  +0 (in base)    │  − delta (refund)    │              │
//! │                ├──────────────────┼──────────────────────┤              │
//! │   non-default  │  + delta (extra) │  +0                  │              │
//! │                └──────────────────┴──────────────────────┘              │
//! │                                                                         │
//! │  unit price = base + Σ cell   ;   line price = unit price × quantity    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use indexmap::IndexMap;

use crate::catalog::{ParamId, ProductDefinition};
use crate::money::Money;
use crate::order::ParamSnapshot;
use crate::selection::Selection;

/// Price of one unit of `product` configured as `selection`.
///
/// Walks every option of every parameter; options in the selection that
/// the product does not define are ignored.
pub fn unit_price(product: &ProductDefinition, selection: &Selection) -> Money {
    let mut price = product.price;

    for (param_id, param) in &product.params {
        for (option_id, option) in &param.options {
            let selected = selection.is_selected(param_id, option_id);

            if selected && !option.is_default {
                price += option.price;
            } else if !selected && option.is_default {
                price -= option.price;
            }
        }
    }

    price
}

/// Line price: unit price × quantity.
///
/// ## Example
/// ```rust
/// use bistro_core::catalog::ProductDefinition;
/// use bistro_core::pricing::compute_price;
/// use bistro_core::selection::Selection;
/// use bistro_core::Money;
///
/// let pizza: ProductDefinition = serde_json::from_str(r#"{
///     "id": "pizza", "name": "Pizza", "price": 2000,
///     "params": { "sauce": { "label": "Sauce", "options": {
///         "tomato": { "label": "Tomato", "price": 600, "default": true },
///         "cream":  { "label": "Sour cream", "price": 500 } } } }
/// }"#).unwrap();
///
/// // Cream added (+5), default tomato dropped (−6): 19 per unit.
/// let selection: Selection = [("sauce", "cream")].into_iter().collect();
/// assert_eq!(compute_price(&pizza, &selection, 2), Money::from_major(38));
/// ```
pub fn compute_price(product: &ProductDefinition, selection: &Selection, quantity: i64) -> Money {
    unit_price(product, selection).multiply_quantity(quantity)
}

/// Labels of the selected options, grouped by parameter.
///
/// Every parameter of the product appears, with an empty option map when
/// nothing in it is selected.
pub fn snapshot_params(
    product: &ProductDefinition,
    selection: &Selection,
) -> IndexMap<ParamId, ParamSnapshot> {
    product
        .params
        .iter()
        .map(|(param_id, param)| {
            let options = param
                .options
                .iter()
                .filter(|(option_id, _)| selection.is_selected(param_id, option_id))
                .map(|(option_id, option)| (option_id.clone(), option.label.clone()))
                .collect();

            (
                param_id.clone(),
                ParamSnapshot {
                    label: param.label.clone(),
                    options,
                },
            )
        })
        .collect()
}
