//! Cart store.
//!
//! Owns the cart lines plus derived count and total. Mutations apply the
//! server's response directly to local state instead of refetching the whole
//! cart, so two rapid mutations can no longer race on a trailing refetch;
//! [`CartStore::refresh`] remains available for the initial load and for
//! reconciling against server-computed totals.

use rust_decimal::Decimal;
use tracing::instrument;

use taskmart_core::{CartItem, CartItemId, CartSummary, ProductId, Variations};

use crate::api::CartApi;
use crate::error::ApiError;

/// In-memory cart state.
#[derive(Debug)]
pub struct CartStore {
    api: CartApi,
    items: Vec<CartItem>,
    count: u32,
    total: Decimal,
    error: Option<String>,
}

impl CartStore {
    /// Create an empty store; call [`refresh`](Self::refresh) to load.
    #[must_use]
    pub const fn new(api: CartApi) -> Self {
        Self {
            api,
            items: Vec::new(),
            count: 0,
            total: Decimal::ZERO,
            error: None,
        }
    }

    /// The current cart lines.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total quantity across all lines.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Cart total. Server-reported after a [`refresh`](Self::refresh),
    /// derived from line prices after locally applied mutations.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Error message from the most recent failed operation, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the full cart summary; server-computed totals win.
    ///
    /// # Errors
    ///
    /// On failure the previous state is kept and the error message is set.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.error = None;
        match self.api.summary().await {
            Ok(CartSummary {
                items,
                total_quantity,
                total_price,
            }) => {
                self.items = items;
                self.count = total_quantity;
                self.total = total_price;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Add a product to the cart, upserting the returned line by id.
    ///
    /// # Errors
    ///
    /// On failure the cart is unchanged and the error message is set.
    #[instrument(skip(self, variations), fields(product_id = %product_id, quantity))]
    pub async fn add_to_cart(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        variations: Variations,
    ) -> Result<CartItem, ApiError> {
        self.error = None;
        match self.api.add(product_id, quantity, &variations).await {
            Ok(item) => {
                self.upsert(item.clone());
                Ok(item)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Change a line's quantity, replacing the returned line by id.
    ///
    /// # Errors
    ///
    /// On failure the cart is unchanged and the error message is set.
    #[instrument(skip(self), fields(id = %id, quantity))]
    pub async fn update_item(
        &mut self,
        id: CartItemId,
        quantity: u32,
    ) -> Result<CartItem, ApiError> {
        self.error = None;
        match self.api.update(id, quantity).await {
            Ok(item) => {
                self.upsert(item.clone());
                Ok(item)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// On failure the cart is unchanged and the error message is set.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove_item(&mut self, id: CartItemId) -> Result<(), ApiError> {
        self.error = None;
        match self.api.remove(id).await {
            Ok(()) => {
                self.items.retain(|item| item.id != id);
                self.recompute();
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Empty the cart, resetting local state directly.
    ///
    /// # Errors
    ///
    /// On failure the cart is unchanged and the error message is set.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<(), ApiError> {
        self.error = None;
        match self.api.clear().await {
            Ok(()) => {
                self.items.clear();
                self.count = 0;
                self.total = Decimal::ZERO;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Quantity of the line matching the product and the exact variation
    /// selection (structural, order-independent comparison); 0 when absent.
    #[must_use]
    pub fn item_count(&self, product_id: ProductId, variations: &Variations) -> u32 {
        self.items
            .iter()
            .find(|item| item.matches(product_id, variations))
            .map_or(0, |item| item.quantity)
    }

    fn upsert(&mut self, item: CartItem) {
        if let Some(slot) = self.items.iter_mut().find(|line| line.id == item.id) {
            *slot = item;
        } else {
            self.items.push(item);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.count = CartSummary::derived_quantity(&self.items);
        self.total = CartSummary::derived_total(&self.items);
    }
}

/// Format an amount as US dollars, e.g. `$1,234.50`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let int_grouped: String = grouped.chars().rev().collect();

    format!("{sign}${int_grouped}.{frac_part}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_price_plain() {
        assert_eq!(format_price(dec("0")), "$0.00");
        assert_eq!(format_price(dec("9.9")), "$9.90");
        assert_eq!(format_price(dec("19.99")), "$19.99");
    }

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(dec("1234.5")), "$1,234.50");
        assert_eq!(format_price(dec("1234567.89")), "$1,234,567.89");
    }

    #[test]
    fn test_format_price_rounds_and_signs() {
        assert_eq!(format_price(dec("2.346")), "$2.35");
        assert_eq!(format_price(dec("-42")), "-$42.00");
    }
}
