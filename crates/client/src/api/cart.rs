//! Cart API client: `/api/cart`.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use taskmart_core::{CartItem, CartItemId, CartSummary, ProductId, Variations};

use super::{ApiClient, check_status, read_json};
use crate::error::ApiError;

#[derive(Serialize)]
struct AddToCartRequest<'a> {
    product_id: ProductId,
    quantity: u32,
    variations: &'a Variations,
}

#[derive(Serialize)]
struct UpdateCartItemRequest {
    quantity: u32,
}

/// Client for the cart endpoints.
#[derive(Debug, Clone)]
pub struct CartApi {
    client: ApiClient,
}

impl CartApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the cart summary: all lines plus server-computed totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<CartSummary, ApiError> {
        let response = self
            .client
            .request(Method::GET, "/api/cart/summary")
            .send()
            .await?;
        read_json(response).await
    }

    /// Add a product to the cart; returns the affected line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// addition (e.g. insufficient stock).
    #[instrument(skip(self, variations), fields(product_id = %product_id, quantity))]
    pub async fn add(
        &self,
        product_id: ProductId,
        quantity: u32,
        variations: &Variations,
    ) -> Result<CartItem, ApiError> {
        let response = self
            .client
            .request(Method::POST, "/api/cart/add")
            .json(&AddToCartRequest {
                product_id,
                quantity,
                variations,
            })
            .send()
            .await?;
        read_json(response).await
    }

    /// Change a line's quantity; returns the updated line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id, quantity))]
    pub async fn update(&self, id: CartItemId, quantity: u32) -> Result<CartItem, ApiError> {
        let response = self
            .client
            .request(Method::PUT, &format!("/api/cart/update/{id}"))
            .json(&UpdateCartItemRequest { quantity })
            .send()
            .await?;
        read_json(response).await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove(&self, id: CartItemId) -> Result<(), ApiError> {
        let response = self
            .client
            .request(Method::DELETE, &format!("/api/cart/remove/{id}"))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .request(Method::DELETE, "/api/cart/clear")
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
