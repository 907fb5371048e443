//! Data-store client for the Foodshare gateway
//!
//! This crate provides the authenticated handle the gateway uses to reach its
//! managed Supabase data store:
//!
//! - **Environment-based configuration**: the store URL and secret service
//!   key are loaded once at cold start; a missing secret is fatal
//! - **Single-shot operations**: one HTTP call per operation, no retry or
//!   backoff (that policy belongs to the caller)
//! - **Request correlation**: every request carries a unique ID for tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use foodshare_store_client::{ServiceConfig, StoreClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Cold start: load the secret once, fail fast if absent
//!     let client = StoreClient::new()?;
//!
//!     // One read
//!     if let Some(record) = client.fetch_record("posts", "42").await? {
//!         println!("Found: {record}");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;

pub use client::{EndpointStatus, StoreClient};
pub use config::ServiceConfig;
pub use error::{StoreError, StoreResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{EndpointStatus, StoreClient};
    pub use crate::config::ServiceConfig;
    pub use crate::error::{StoreError, StoreResult};
}
