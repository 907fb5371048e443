//! Core utilities for the Foodshare gateway
//!
//! This crate provides the shared functionality used across the gateway
//! workspace:
//!
//! - **Error handling**: structured errors with codes, context, and recovery
//!   suggestions, grouped into the gateway's three failure categories
//!   (configuration, validation, dependency)
//! - **Validation**: fluent checks for the inbound invocation contract

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{is_valid_table_name, ValidationResult, Validator};
}
