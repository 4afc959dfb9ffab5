//! Shared primitive types.
//!
//! Newtype wrappers and enums used throughout the workspace.

pub mod email;
pub mod id;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{CartItemId, ProductId, TaskId, UserId};
pub use status::{ProductStatus, TaskStatus};
