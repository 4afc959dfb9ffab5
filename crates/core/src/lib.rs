//! TaskMart Core - Shared types library.
//!
//! This crate provides common types used across all TaskMart components:
//! - `client` - API clients and client-side state stores
//! - `cli` - Command-line front-end
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`task`] - Task entity, drafts, and patches
//! - [`product`] - Product entity, variants, drafts, and patches
//! - [`cart`] - Cart lines, variation selections, and summaries
//! - [`user`] - User identity and session data

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod product;
pub mod task;
pub mod types;
pub mod user;

pub use cart::*;
pub use product::*;
pub use task::*;
pub use types::*;
pub use user::*;
