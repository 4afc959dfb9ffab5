//! Product collection store.

use tracing::instrument;

use taskmart_core::{Product, ProductDraft, ProductId, ProductPatch};

use super::StoreError;
use crate::api::{ImageUpload, ProductApi};

/// In-memory product catalog, reconciled by id after each mutation.
#[derive(Debug)]
pub struct ProductStore {
    api: ProductApi,
    products: Vec<Product>,
    error: Option<String>,
    loaded: bool,
}

impl ProductStore {
    /// Create an empty store; call [`refresh`](Self::refresh) to load.
    #[must_use]
    pub const fn new(api: ProductApi) -> Self {
        Self {
            api,
            products: Vec::new(),
            error: None,
            loaded: false,
        }
    }

    /// The current catalog.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Error string from the most recent failed operation, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether an initial fetch has completed successfully.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetch the full catalog, replacing local state.
    ///
    /// # Errors
    ///
    /// On failure the previous catalog is kept and the error string is set
    /// to "Failed to fetch products".
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.error = None;
        match self.api.list().await {
            Ok(products) => {
                self.products = products;
                self.loaded = true;
                Ok(())
            }
            Err(err) => {
                self.error = Some("Failed to fetch products".to_string());
                Err(err.into())
            }
        }
    }

    /// Create a product and append the server's copy.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid input, or an API error (and
    /// sets the error string) when the backend call fails.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&mut self, draft: &ProductDraft) -> Result<Product, StoreError> {
        draft.validate()?;

        self.error = None;
        match self.api.create(draft).await {
            Ok(product) => {
                self.products.push(product.clone());
                Ok(product)
            }
            Err(err) => {
                self.error = Some("Failed to create product".to_string());
                Err(err.into())
            }
        }
    }

    /// Create a product with image uploads and append the server's copy.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid input, or an API error (and
    /// sets the error string) when the backend call fails.
    #[instrument(skip(self, draft, images), fields(title = %draft.title, images = images.len()))]
    pub async fn create_with_images(
        &mut self,
        draft: &ProductDraft,
        images: Vec<ImageUpload>,
    ) -> Result<Product, StoreError> {
        draft.validate()?;

        self.error = None;
        match self.api.create_with_images(draft, images).await {
            Ok(product) => {
                self.products.push(product.clone());
                Ok(product)
            }
            Err(err) => {
                self.error = Some("Failed to create product".to_string());
                Err(err.into())
            }
        }
    }

    /// Fully update a product and replace the local copy by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid input, or an API error (and
    /// sets the error string) when the backend call fails.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update(
        &mut self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, StoreError> {
        draft.validate()?;

        self.error = None;
        match self.api.update(id, draft).await {
            Ok(product) => {
                self.replace(id, product.clone());
                Ok(product)
            }
            Err(err) => {
                self.error = Some("Failed to update product".to_string());
                Err(err.into())
            }
        }
    }

    /// Update a product with image uploads and replace the local copy by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid input, or an API error (and
    /// sets the error string) when the backend call fails.
    #[instrument(skip(self, draft, images), fields(id = %id, images = images.len()))]
    pub async fn update_with_images(
        &mut self,
        id: ProductId,
        draft: &ProductDraft,
        images: Vec<ImageUpload>,
    ) -> Result<Product, StoreError> {
        draft.validate()?;

        self.error = None;
        match self.api.update_with_images(id, draft, images).await {
            Ok(product) => {
                self.replace(id, product.clone());
                Ok(product)
            }
            Err(err) => {
                self.error = Some("Failed to update product".to_string());
                Err(err.into())
            }
        }
    }

    /// Partially update a product and replace the local copy by id.
    ///
    /// # Errors
    ///
    /// Returns an API error (and sets the error string) when the backend
    /// call fails.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn patch(
        &mut self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, StoreError> {
        self.error = None;
        match self.api.patch(id, patch).await {
            Ok(product) => {
                self.replace(id, product.clone());
                Ok(product)
            }
            Err(err) => {
                self.error = Some("Failed to update product".to_string());
                Err(err.into())
            }
        }
    }

    /// Delete a product and drop the local copy by id.
    ///
    /// # Errors
    ///
    /// On failure the catalog is unchanged and the error string is set to
    /// "Failed to delete product".
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&mut self, id: ProductId) -> Result<(), StoreError> {
        self.error = None;
        match self.api.delete(id).await {
            Ok(()) => {
                self.products.retain(|product| product.id != id);
                Ok(())
            }
            Err(err) => {
                self.error = Some("Failed to delete product".to_string());
                Err(err.into())
            }
        }
    }

    /// Fetch a single product without touching the catalog.
    ///
    /// # Errors
    ///
    /// Returns an API error (and sets the error string) when the backend
    /// call fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&mut self, id: ProductId) -> Result<Product, StoreError> {
        self.error = None;
        match self.api.get(id).await {
            Ok(product) => Ok(product),
            Err(err) => {
                self.error = Some("Failed to fetch product".to_string());
                Err(err.into())
            }
        }
    }

    fn replace(&mut self, id: ProductId, product: Product) {
        if let Some(slot) = self.products.iter_mut().find(|product| product.id == id) {
            *slot = product;
        }
    }
}
