//! Product entity, variants, drafts, and patches.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Variations;
use crate::types::{ProductId, ProductStatus};

/// Option strings offered per variation type, e.g. `"color" -> ["Red", "Blue"]`.
///
/// A `BTreeMap` keeps variation types in a canonical order regardless of how
/// the backend happened to serialize them.
pub type VariationOptions = BTreeMap<String, Vec<String>>;

/// A concrete product variant: one choice per variation type plus its own
/// price and stock figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub variation_values: BTreeMap<String, String>,
    pub price: Decimal,
    pub stock: i64,
}

/// A catalog product.
///
/// Wire format matches the backend: camelCase `discountPrice` and
/// timestamps, snake_case everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(
        rename = "discountPrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_price: Option<Decimal>,
    pub status: ProductStatus,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<VariationOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ProductVariant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer actually pays: the discount price when present,
    /// otherwise the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }

    /// The variant whose `variation_values` exactly match the buyer's
    /// selection, if any. The comparison is structural, so key order in the
    /// selection does not matter.
    #[must_use]
    pub fn variant_for(&self, selection: &Variations) -> Option<&ProductVariant> {
        self.variants
            .as_ref()?
            .iter()
            .find(|variant| variant.variation_values == *selection)
    }

    /// The price for a concrete selection: the matched variant's own price
    /// when one exists, otherwise the discounted list price.
    #[must_use]
    pub fn price_for(&self, selection: &Variations) -> Decimal {
        self.variant_for(selection)
            .map_or_else(|| self.effective_price(), |variant| variant.price)
    }
}

/// Validation errors for product input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// Title is empty or whitespace-only.
    #[error("product title cannot be blank")]
    BlankTitle,
    /// Price is negative.
    #[error("product price cannot be negative")]
    NegativePrice,
    /// Discount price is negative.
    #[error("discount price cannot be negative")]
    NegativeDiscountPrice,
    /// Stock is negative.
    #[error("product stock cannot be negative")]
    NegativeStock,
}

/// Input for creating or fully updating a product.
///
/// Validated client-side before any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(
        rename = "discountPrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_price: Option<Decimal>,
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<VariationOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl ProductDraft {
    /// Create a draft with the default `available` status.
    #[must_use]
    pub fn new(title: impl Into<String>, price: Decimal) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            price,
            discount_price: None,
            status: ProductStatus::default(),
            variations: None,
            stock: None,
        }
    }

    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns an error when the title is blank or any money/stock figure is
    /// negative.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.title.trim().is_empty() {
            return Err(ProductValidationError::BlankTitle);
        }
        if self.price.is_sign_negative() {
            return Err(ProductValidationError::NegativePrice);
        }
        if self
            .discount_price
            .is_some_and(|price| price.is_sign_negative())
        {
            return Err(ProductValidationError::NegativeDiscountPrice);
        }
        if self.stock.is_some_and(|stock| stock < 0) {
            return Err(ProductValidationError::NegativeStock);
        }
        Ok(())
    }
}

/// Partial product update; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(rename = "discountPrice", skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// A patch that only changes the status.
    #[must_use]
    pub fn status(status: ProductStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(price: Decimal, discount: Option<Decimal>) -> Product {
        Product {
            id: ProductId::new(1),
            title: "Mug".to_string(),
            description: "A mug".to_string(),
            price,
            discount_price: discount,
            status: ProductStatus::Available,
            images: vec![],
            variations: None,
            variants: None,
            stock: Some(5),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn variant(pairs: &[(&str, &str)], price: &str, stock: i64) -> ProductVariant {
        ProductVariant {
            variation_values: pairs
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
            price: dec(price),
            stock,
        }
    }

    fn selection(pairs: &[(&str, &str)]) -> Variations {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        assert_eq!(
            product(dec("20"), Some(dec("15"))).effective_price(),
            dec("15")
        );
        assert_eq!(product(dec("20"), None).effective_price(), dec("20"));
    }

    #[test]
    fn test_draft_validation() {
        assert!(ProductDraft::new("Mug", dec("9.99")).validate().is_ok());
        assert_eq!(
            ProductDraft::new("  ", dec("9.99")).validate(),
            Err(ProductValidationError::BlankTitle)
        );
        assert_eq!(
            ProductDraft::new("Mug", dec("-1")).validate(),
            Err(ProductValidationError::NegativePrice)
        );

        let mut draft = ProductDraft::new("Mug", dec("9.99"));
        draft.stock = Some(-3);
        assert_eq!(
            draft.validate(),
            Err(ProductValidationError::NegativeStock)
        );
    }

    #[test]
    fn test_variant_for_matches_selection_structurally() {
        let mut product = product(dec("20"), Some(dec("15")));
        product.variants = Some(vec![
            variant(&[("color", "Red"), ("size", "M")], "22.00", 4),
            variant(&[("color", "Blue"), ("size", "M")], "24.00", 0),
        ]);

        // Same pairs, opposite insertion order.
        let matched = product
            .variant_for(&selection(&[("size", "M"), ("color", "Red")]))
            .expect("variant matched");
        assert_eq!(matched.price, dec("22.00"));
        assert_eq!(matched.stock, 4);

        assert!(product
            .variant_for(&selection(&[("color", "Green"), ("size", "M")]))
            .is_none());
        assert!(product.variant_for(&selection(&[("color", "Red")])).is_none());
    }

    #[test]
    fn test_price_for_prefers_matched_variant() {
        let mut product = product(dec("20"), Some(dec("15")));
        product.variants = Some(vec![variant(&[("color", "Red")], "22.00", 4)]);

        // A matched variant's price wins over the discounted list price.
        assert_eq!(
            product.price_for(&selection(&[("color", "Red")])),
            dec("22.00")
        );
        // No match falls back to discountPrice ?? price.
        assert_eq!(
            product.price_for(&selection(&[("color", "Blue")])),
            dec("15")
        );
        // No variants at all behaves like effective_price.
        product.variants = None;
        assert_eq!(product.price_for(&Variations::new()), dec("15"));
    }

    #[test]
    fn test_wire_format_uses_camel_case_discount() {
        let json = serde_json::to_value(product(dec("20"), Some(dec("15")))).unwrap();
        assert!(json.get("discountPrice").is_some());
        assert!(json.get("discount_price").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_missing_optionals_deserialize() {
        let json = serde_json::json!({
            "id": 2,
            "title": "Plain",
            "description": "",
            "price": "5.00",
            "status": "available",
            "createdAt": "2026-01-05T10:00:00Z",
            "updatedAt": "2026-01-05T10:00:00Z"
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(product.discount_price.is_none());
        assert!(product.images.is_empty());
        assert!(product.variants.is_none());
    }
}
