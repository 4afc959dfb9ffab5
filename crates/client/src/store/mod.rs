//! Client-side state stores.
//!
//! Each store owns the in-memory copy of one server-side collection and
//! mediates every mutation through the corresponding API client:
//!
//! - create: validate client-side, call the API, append the server's copy
//!   exactly once (optimistic append - no follow-up fetch)
//! - update/patch: call the API, replace the matching record by id
//! - delete: call the API, drop the matching record by id
//!
//! Failed operations leave the previous collection intact, record a generic
//! user-facing error string, and propagate the underlying error. There is no
//! request deduplication, no optimistic rollback, and no retry.

mod cart;
mod products;
mod tasks;

pub use cart::{CartStore, format_price};
pub use products::ProductStore;
pub use tasks::TaskStore;

use thiserror::Error;

use taskmart_core::{ProductValidationError, TaskValidationError};

use crate::error::ApiError;

/// Errors surfaced by store operations.
///
/// Validation failures happen before any network call; API failures happen
/// after and additionally set the store's error string.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Task input rejected client-side.
    #[error(transparent)]
    InvalidTask(#[from] TaskValidationError),

    /// Product input rejected client-side.
    #[error(transparent)]
    InvalidProduct(#[from] ProductValidationError),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
