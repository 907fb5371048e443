//! Authenticated data-store client
//!
//! A thin handle over the Supabase REST surface. The client performs exactly
//! one HTTP call per operation: no retry, no backoff, no circuit breaking.
//! That policy, if ever needed, belongs to the caller.

use crate::config::ServiceConfig;
use crate::error::{StoreError, StoreResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// API key header for Supabase
const APIKEY_HEADER: &str = "apikey";

/// Prefer header asking PostgREST to return inserted rows
const PREFER_REPRESENTATION: &str = "return=representation";

/// Data-store client for the Foodshare gateway
///
/// Wraps `reqwest` with the Supabase auth convention (apikey header plus a
/// bearer token) and request correlation IDs. Each operation issues a single
/// request and surfaces any failure as a typed [`StoreError`].
#[derive(Clone)]
pub struct StoreClient {
    inner: Client,
    config: Arc<ServiceConfig>,
}

impl StoreClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> StoreResult<Self> {
        let config = ServiceConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ServiceConfig) -> StoreResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static("foodshare-store-client/1.0"),
        );

        let key_value = HeaderValue::from_str(&config.service_key)
            .map_err(|_| StoreError::config("service_key contains invalid header characters"))?;
        default_headers.insert(APIKEY_HEADER, key_value);

        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key))
            .map_err(|_| StoreError::config("service_key contains invalid header characters"))?;
        default_headers.insert(AUTHORIZATION, bearer);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(StoreError::Transport)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Fetch a single record by ID
    ///
    /// GET /rest/v1/{table}?id=eq.{id}&limit=1
    ///
    /// An empty result set maps to `Ok(None)`; every transport or store-side
    /// failure is a typed error.
    #[instrument(skip(self), fields(request_id))]
    pub async fn fetch_record(&self, table: &str, id: &str) -> StoreResult<Option<Value>> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.table_url(table);
        let id_filter = format!("eq.{id}");

        let start = Instant::now();
        let response = self
            .inner
            .get(&url)
            .query(&[("id", id_filter.as_str()), ("limit", "1")])
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await?;

        let rows: Vec<Value> = Self::handle_response(response).await?;
        debug!(
            request_id = %request_id,
            table = %table,
            found = !rows.is_empty(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched record"
        );

        Ok(rows.into_iter().next())
    }

    /// Insert a single record
    ///
    /// POST /rest/v1/{table}
    ///
    /// Asks the store to return the inserted row.
    #[instrument(skip(self, record), fields(request_id))]
    pub async fn insert_record<B: Serialize + ?Sized>(
        &self,
        table: &str,
        record: &B,
    ) -> StoreResult<Value> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.table_url(table);

        let start = Instant::now();
        let response = self
            .inner
            .post(&url)
            .header(X_REQUEST_ID, &request_id)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(record)
            .send()
            .await?;

        let rows: Vec<Value> = Self::handle_response(response).await?;
        debug!(
            request_id = %request_id,
            table = %table,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Inserted record"
        );

        rows.into_iter().next().ok_or_else(|| {
            StoreError::UnexpectedResponse("insert returned no representation".to_string())
        })
    }

    /// Check that the store's REST endpoint is reachable
    #[instrument(skip(self), fields(request_id))]
    pub async fn probe(&self) -> StoreResult<EndpointStatus> {
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}/", self.config.rest_url);

        let start = Instant::now();
        let response = self
            .inner
            .get(&url)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await?;
        let elapsed = start.elapsed();

        Ok(EndpointStatus {
            url,
            status_code: response.status().as_u16(),
            response_time: elapsed,
            is_healthy: response.status().is_success(),
        })
    }

    /// Endpoint URL for a table
    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.config.rest_url, table)
    }

    /// Handle an HTTP response and deserialize the success body
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> StoreResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(StoreError::Transport)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(StoreError::rejected(status.as_u16(), truncate(&message)))
        }
    }
}

/// Endpoint status information
#[derive(Debug, Clone, Serialize)]
pub struct EndpointStatus {
    /// URL that was checked
    pub url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Response time
    pub response_time: Duration,
    /// Whether the endpoint is healthy
    pub is_healthy: bool,
}

/// Keep store error bodies to a loggable size
fn truncate(message: &str) -> String {
    const MAX: usize = 512;
    if message.len() <= MAX {
        message.to_string()
    } else {
        let mut end = MAX;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &message[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> StoreClient {
        let config = ServiceConfig::with_parts(server.base_url(), "test-service-key");
        StoreClient::with_config(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let config = ServiceConfig::with_parts("http://localhost:54321", "key");
        assert!(StoreClient::with_config(config).is_ok());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short"), "short");
        let long = "x".repeat(600);
        assert!(truncate(&long).ends_with("..."));
        assert!(truncate(&long).len() < 600);
    }

    #[tokio::test]
    async fn test_fetch_record_found() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/posts")
                .query_param("id", "eq.42")
                .query_param("limit", "1")
                .header("apikey", "test-service-key")
                .header("authorization", "Bearer test-service-key");
            then.status(200)
                .json_body(json!([{"id": 42, "title": "Fresh Bread"}]));
        });

        let client = client_for(&server);
        let record = client.fetch_record("posts", "42").await.unwrap();

        mock.assert();
        assert_eq!(record.unwrap()["title"], "Fresh Bread");
    }

    #[tokio::test]
    async fn test_fetch_record_absent() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/posts");
            then.status(200).json_body(json!([]));
        });

        let client = client_for(&server);
        let record = client.fetch_record("posts", "missing").await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_insert_record_returns_representation() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/posts")
                .header("prefer", "return=representation")
                .json_body(json!({"title": "Soup"}));
            then.status(201)
                .json_body(json!([{"id": 7, "title": "Soup"}]));
        });

        let client = client_for(&server);
        let inserted = client
            .insert_record("posts", &json!({"title": "Soup"}))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(inserted["id"], 7);
    }

    #[tokio::test]
    async fn test_store_rejection_is_typed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/posts");
            then.status(401).body("bad apikey");
        });

        let client = client_for(&server);
        let err = client.fetch_record("posts", "1").await.unwrap_err();
        assert!(err.is_auth());
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_probe_reports_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/");
            then.status(200).json_body(json!({"swagger": "2.0"}));
        });

        let client = client_for(&server);
        let status = client.probe().await.unwrap();
        assert!(status.is_healthy);
        assert_eq!(status.status_code, 200);
    }
}
