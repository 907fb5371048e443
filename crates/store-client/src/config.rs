//! Configuration for the data-store client
//!
//! The gateway reads its configuration from the environment exactly once at
//! cold start. The store URL is fixed and non-secret; the service key is a
//! secret with no default, and its absence is fatal.

use crate::error::{StoreError, StoreResult};
use std::env;
use std::time::Duration;

/// Default production Supabase project URL
const DEFAULT_STORE_URL: &str = "https://achyjrdkriusgdbxvswl.supabase.co";

/// Environment variable holding the secret service key
pub const SERVICE_KEY_VAR: &str = "SUPABASE_KEY";

/// Environment variable overriding the store URL (local stacks)
pub const STORE_URL_VAR: &str = "SUPABASE_URL";

/// Environment variable overriding the request timeout in seconds
pub const TIMEOUT_VAR: &str = "FOODSHARE_GATEWAY_TIMEOUT_SECS";

/// Service configuration, loaded once at cold start and immutable afterwards
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the Supabase project
    pub store_url: String,
    /// REST endpoint (derived from `store_url`)
    pub rest_url: String,
    /// Secret service key, sourced from the environment
    pub service_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    ///
    /// Reads the following:
    /// - `SUPABASE_KEY`: secret service key (required, no default)
    /// - `SUPABASE_URL`: store URL override (optional, non-secret)
    /// - `FOODSHARE_GATEWAY_TIMEOUT_SECS`: request timeout (optional, default 30)
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an explicit variable lookup
    ///
    /// `from_env` funnels through this so the missing-secret path is
    /// deterministic under test.
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_key = lookup(SERVICE_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| StoreError::missing_secret(SERVICE_KEY_VAR))?;

        let store_url =
            lookup(STORE_URL_VAR).unwrap_or_else(|| DEFAULT_STORE_URL.to_string());

        let timeout = lookup(TIMEOUT_VAR)
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let config = Self::assemble(store_url, service_key, timeout);
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from explicit parts (tests, local harnesses)
    #[must_use]
    pub fn with_parts(store_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self::assemble(store_url.into(), service_key.into(), Duration::from_secs(30))
    }

    fn assemble(store_url: String, service_key: String, timeout: Duration) -> Self {
        let store_url = store_url.trim_end_matches('/').to_string();
        let rest_url = format!("{store_url}/rest/v1");
        Self {
            store_url,
            rest_url,
            service_key,
            timeout,
        }
    }

    /// Builder-style method to set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> StoreResult<()> {
        if self.store_url.is_empty() {
            return Err(StoreError::config("store_url cannot be empty"));
        }

        if !self.store_url.starts_with("http://") && !self.store_url.starts_with("https://") {
            return Err(StoreError::config(
                "store_url must start with http:// or https://",
            ));
        }

        if self.service_key.trim().is_empty() {
            return Err(StoreError::config("service_key cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(StoreError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
