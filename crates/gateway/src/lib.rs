//! The Foodshare backend gateway function
//!
//! This crate is the Rust completion of the platform's serverless request
//! stub: a single externally-triggered handler backed by a managed data
//! store. Each invocation is stateless and independent; the only process-wide
//! state is the immutable configuration loaded once at cold start.
//!
//! Control flow per invocation:
//!
//! 1. validate the invocation shape
//! 2. perform at most one data-store call
//! 3. map the result (or failure) to a structured response
//!
//! # Example
//!
//! ```rust,no_run
//! use foodshare_gateway::{Gateway, Invocation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Cold start: fails fast if SUPABASE_KEY is absent
//!     let gateway = Gateway::from_env()?;
//!
//!     let response = gateway.handle(Invocation::ping()).await;
//!     assert_eq!(response.status, 200);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod handler;
pub mod invocation;

pub use handler::Gateway;
pub use invocation::{
    ErrorInfo, GatewayRequest, Invocation, InvocationResponse, ResponseEnvelope,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::handler::Gateway;
    pub use crate::invocation::{Invocation, InvocationResponse};
}
