//! Product API client: `/api/products`.
//!
//! Products are sent either as plain JSON or, when image uploads are
//! involved, as multipart forms. The backend cannot parse multipart bodies
//! on native PUT requests, so multipart updates go through POST with a
//! `_method=PUT` override part.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use taskmart_core::{Product, ProductDraft, ProductId, ProductPatch};

use super::{ApiClient, check_status, read_json};
use crate::error::ApiError;

/// An image file to upload alongside a product.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Client for the product endpoints.
#[derive(Debug, Clone)]
pub struct ProductApi {
    client: ApiClient,
}

impl ProductApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the full product collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let response = self
            .client
            .request(Method::GET, "/api/products")
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        let response = self
            .client
            .request(Method::GET, &format!("/api/products/{id}"))
            .send()
            .await?;
        read_json(response).await
    }

    /// Create a product from a JSON payload; returns the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// payload.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let response = self
            .client
            .request(Method::POST, "/api/products")
            .json(draft)
            .send()
            .await?;
        read_json(response).await
    }

    /// Create a product with image uploads via multipart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, an image has an invalid MIME
    /// type, or the backend rejects the payload.
    #[instrument(skip(self, draft, images), fields(title = %draft.title, images = images.len()))]
    pub async fn create_with_images(
        &self,
        draft: &ProductDraft,
        images: Vec<ImageUpload>,
    ) -> Result<Product, ApiError> {
        let form = multipart_form(draft, images, None)?;
        let response = self
            .client
            .request(Method::POST, "/api/products")
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    /// Fully update a product from a JSON payload; returns the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// payload.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, ApiError> {
        let response = self
            .client
            .request(Method::PUT, &format!("/api/products/{id}"))
            .json(draft)
            .send()
            .await?;
        read_json(response).await
    }

    /// Update a product with image uploads.
    ///
    /// Goes through `POST /api/products/{id}` with a `_method=PUT` override
    /// part; the backend does not accept multipart on native PUT.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, an image has an invalid MIME
    /// type, or the backend rejects the payload.
    #[instrument(skip(self, draft, images), fields(id = %id, images = images.len()))]
    pub async fn update_with_images(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        images: Vec<ImageUpload>,
    ) -> Result<Product, ApiError> {
        let form = multipart_form(draft, images, Some("PUT"))?;
        let response = self
            .client
            .request(Method::POST, &format!("/api/products/{id}"))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    /// Partially update a product; returns the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// payload.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn patch(&self, id: ProductId, patch: &ProductPatch) -> Result<Product, ApiError> {
        let response = self
            .client
            .request(Method::PATCH, &format!("/api/products/{id}"))
            .json(patch)
            .send()
            .await?;
        read_json(response).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        let response = self
            .client
            .request(Method::DELETE, &format!("/api/products/{id}"))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Build the multipart form for a product draft plus image uploads.
fn multipart_form(
    draft: &ProductDraft,
    images: Vec<ImageUpload>,
    method_override: Option<&str>,
) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("description", draft.description.clone())
        .text("price", draft.price.to_string())
        .text("status", draft.status.to_string());

    if let Some(method) = method_override {
        form = form.text("_method", method.to_string());
    }
    if let Some(discount) = draft.discount_price {
        form = form.text("discountPrice", discount.to_string());
    }
    if let Some(stock) = draft.stock {
        form = form.text("stock", stock.to_string());
    }
    if let Some(variations) = &draft.variations {
        form = form.text("variations", serde_json::to_string(variations)?);
    }

    for image in images {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;
        form = form.part("images[]", part);
    }

    Ok(form)
}
