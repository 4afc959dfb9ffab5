//! TaskMart client - the synchronization layer between a front-end and the
//! TaskMart REST backend.
//!
//! # Architecture
//!
//! - [`api`] - Typed REST clients (auth, tasks, products, cart). Thin
//!   wrappers over `reqwest` that construct bearer-token headers and map
//!   status codes to errors. No retries, no deduplication.
//! - [`store`] - Client-side state containers, one per collection. Each
//!   mutation calls the API and reconciles local state by id; failures leave
//!   the previous state intact and record a user-facing error string.
//! - [`session`] - The auth session state machine with on-disk persistence
//!   (the browser localStorage analog).
//! - [`filter`] - Client-side search/status filtering for list views.
//! - [`config`] - Environment-driven configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use taskmart_client::{ApiClient, ClientConfig, SessionStore, TaskStore};
//!
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::new(&config)?;
//!
//! let mut session = SessionStore::new(client.auth(), client.clone(), config.data_dir.clone());
//! session.login("ada@example.com", "hunter2!").await?;
//!
//! let mut tasks = TaskStore::with_cache(client.tasks(), session.task_cache_path());
//! tasks.refresh().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod session;
pub mod store;

pub use api::{ApiClient, AuthApi, CartApi, ImageUpload, ProductApi, TaskApi};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use filter::{ProductFilter, TaskFilter};
pub use session::{AuthState, SessionError, SessionStore};
pub use store::{CartStore, ProductStore, StoreError, TaskStore, format_price};
