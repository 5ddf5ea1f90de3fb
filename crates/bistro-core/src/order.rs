//! # Order Data
//!
//! The data records that travel between components and out of the core:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductConfigurator ──CartLineSummary──► Cart ──► CartLine             │
//! │                                                       │                 │
//! │                                              get_data │ OrderLine       │
//! │                                                       ▼                 │
//! │  Cart::build_order_payload(contact) ─────────► OrderPayload ──► transport│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names on the wire follow the storefront's JSON (`amount`,
//! `priceSingle`, `totalNumber`, ...), since the order endpoint consumes
//! them as-is.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartTotals;
use crate::catalog::{OptionId, ParamId, ProductId};
use crate::money::Money;
use crate::validation::{self, ValidationResult};

/// Labels of the options selected in one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParamSnapshot {
    pub label: String,
    pub options: IndexMap<OptionId, String>,
}

/// Frozen picture of a configured product at the moment it is added.
///
/// The cart builds a line from this alone; it never reads the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineSummary {
    pub id: ProductId,
    pub name: String,

    /// Quantity chosen in the configurator.
    pub amount: i64,

    /// Base unit price of the product (without option deltas).
    pub price_single: Money,

    /// Line price: unit price with option deltas × amount.
    pub price: Money,

    pub params: IndexMap<ParamId, ParamSnapshot>,
}

/// One product entry of a submitted order (a cart line's `get_data`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub id: ProductId,
    pub name: String,
    pub amount: i64,
    pub price_single: Money,
    pub price: Money,
    pub params: IndexMap<ParamId, ParamSnapshot>,
}

/// Where the order goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryContact {
    pub address: String,
    pub phone: String,
}

impl DeliveryContact {
    pub fn new(address: impl Into<String>, phone: impl Into<String>) -> Self {
        DeliveryContact {
            address: address.into(),
            phone: phone.into(),
        }
    }

    /// Trims both fields and requires them to be non-empty.
    pub fn validated(&self) -> ValidationResult<DeliveryContact> {
        let (address, phone) = validation::validate_contact(&self.address, &self.phone)?;
        Ok(DeliveryContact { address, phone })
    }
}

/// Everything the order endpoint receives.
///
/// Immutable once built: later cart mutations do not affect a payload that
/// is already on its way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderPayload {
    pub address: String,
    pub phone: String,
    pub total_price: Money,
    pub subtotal_price: Money,
    pub total_number: i64,
    pub delivery_fee: Money,
    pub products: Vec<OrderLine>,
}

impl OrderPayload {
    pub fn new(contact: DeliveryContact, totals: CartTotals, products: Vec<OrderLine>) -> Self {
        OrderPayload {
            address: contact.address,
            phone: contact.phone,
            total_price: totals.total,
            subtotal_price: totals.subtotal,
            total_number: totals.item_count,
            delivery_fee: totals.delivery_fee,
            products,
        }
    }

    /// Serializes the payload for the transport collaborator.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
