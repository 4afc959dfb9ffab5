//! Cart lines, variation selections, and summaries.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{CartItemId, ProductId};

/// A buyer's variation selection, e.g. `{"color": "Red", "size": "M"}`.
///
/// Stored as a `BTreeMap` so comparisons are canonical: two selections with
/// the same key/value pairs are equal regardless of insertion order.
pub type Variations = BTreeMap<String, String>;

/// One line in the cart.
///
/// The backend embeds a snapshot of the referenced product in each line;
/// lines for products deleted since the snapshot may carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Variations::is_empty")]
    pub variations: Variations,
}

impl CartItem {
    /// Line price: (discount price ?? price) × quantity.
    ///
    /// Lines without an embedded product snapshot price at zero, matching
    /// the original front-end's fallback.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        let unit = self
            .product
            .as_ref()
            .map_or(Decimal::ZERO, Product::effective_price);
        unit * Decimal::from(self.quantity)
    }

    /// Whether this line is for the given product with exactly the given
    /// variation selection (structural, order-independent comparison).
    #[must_use]
    pub fn matches(&self, product_id: ProductId, variations: &Variations) -> bool {
        self.product_id == product_id && self.variations == *variations
    }

    /// Stock available for this line, per the embedded product snapshot:
    /// the matched variant's stock when the selection names one, otherwise
    /// the product-level figure. `None` when the snapshot carries neither.
    #[must_use]
    pub fn available_stock(&self) -> Option<i64> {
        let product = self.product.as_ref()?;
        product
            .variant_for(&self.variations)
            .map(|variant| variant.stock)
            .or(product.stock)
    }
}

/// Server cart summary: `GET /api/cart/summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSummary {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_quantity: u32,
    #[serde(default)]
    pub total_price: Decimal,
}

impl CartSummary {
    /// Sum of line totals, derived from the embedded product snapshots.
    ///
    /// Should agree with the server-reported `total_price`; used to
    /// recompute totals after locally applied mutations.
    #[must_use]
    pub fn derived_total(items: &[CartItem]) -> Decimal {
        items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn derived_quantity(items: &[CartItem]) -> u32 {
        items.iter().map(|item| item.quantity).sum()
    }
}
