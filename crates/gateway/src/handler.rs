//! The gateway request handler
//!
//! One invocation in, one response out. The handler validates the invocation
//! shape, performs at most one data-store operation, and maps every failure
//! to a structured response. Nothing escapes as a panic or error once the
//! gateway is constructed; only configuration loading can fail, and it fails
//! before serving starts.

use crate::invocation::{GatewayRequest, Invocation, InvocationResponse};
use chrono::Utc;
use foodshare_gateway_core::error::{Error, Result};
use foodshare_gateway_core::validation::Validator;
use foodshare_store_client::{ServiceConfig, StoreClient, StoreError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

/// The Foodshare gateway function
///
/// Stateless across invocations: the only shared state is the immutable
/// configuration captured inside the store client at cold start. Cloning is
/// cheap, so the hosting platform may fan out invocations freely.
#[derive(Clone)]
pub struct Gateway {
    client: StoreClient,
}

impl Gateway {
    /// Cold start: load configuration from the environment and build the
    /// gateway
    ///
    /// A missing or invalid secret is fatal; the gateway never starts
    /// serving with a broken configuration.
    pub fn from_env() -> Result<Self> {
        let client = StoreClient::new().map_err(map_config_error)?;
        Ok(Self { client })
    }

    /// Build a gateway from explicit configuration
    pub fn with_config(config: ServiceConfig) -> Result<Self> {
        let client = StoreClient::with_config(config).map_err(map_config_error)?;
        Ok(Self { client })
    }

    /// Build a gateway over an existing store client
    #[must_use]
    pub fn with_client(client: StoreClient) -> Self {
        Self { client }
    }

    /// Access the underlying store client
    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.client
    }

    /// Handle one invocation
    ///
    /// Never fails: every error is mapped to a response. Performs at most
    /// one data-store call.
    #[instrument(skip(self, invocation), fields(method = %invocation.method, path = %invocation.path))]
    pub async fn handle(&self, invocation: Invocation) -> InvocationResponse {
        let method = invocation.method.to_uppercase();
        let check = Validator::new()
            .one_of("method", &method, &["GET", "POST"])
            .validate();
        if !check.is_valid() {
            return validation_failure(405, "METHOD_NOT_ALLOWED", &check);
        }

        let request: GatewayRequest = match serde_json::from_value(invocation.body) {
            Ok(request) => request,
            Err(err) => {
                return InvocationResponse::error(
                    400,
                    "VALIDATION_ERROR",
                    format!("Invalid invocation body: {err}"),
                );
            }
        };

        let check = Validator::new().required("op", &request.op).validate();
        if !check.is_valid() {
            return validation_failure(400, "VALIDATION_ERROR", &check);
        }

        debug!(op = %request.op, "Dispatching invocation");

        match request.op.as_str() {
            "ping" => self.ping(),
            "get" => self.get_record(request.payload).await,
            "insert" => self.insert_record(request.payload).await,
            other => InvocationResponse::error(
                400,
                "UNKNOWN_OPERATION",
                format!("Unknown operation: {other}"),
            ),
        }
    }

    /// `ping`: liveness without touching the data store
    fn ping(&self) -> InvocationResponse {
        InvocationResponse::success(
            200,
            json!({
                "ok": true,
                "service": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": Utc::now().to_rfc3339(),
            }),
        )
    }

    /// `get`: fetch a single record by table and ID
    async fn get_record(&self, payload: Option<Value>) -> InvocationResponse {
        let params: GetParams = match parse_payload(payload) {
            Ok(params) => params,
            Err(response) => return response,
        };

        let check = Validator::new()
            .table_name("payload.table", &params.table)
            .required("payload.id", &params.id)
            .validate();
        if !check.is_valid() {
            return validation_failure(400, "VALIDATION_ERROR", &check);
        }

        match self.client.fetch_record(&params.table, &params.id).await {
            Ok(Some(record)) => InvocationResponse::success(200, record),
            Ok(None) => InvocationResponse::error(
                404,
                "NOT_FOUND",
                format!("No record with id {} in {}", params.id, params.table),
            ),
            Err(err) => dependency_failure("get", &err),
        }
    }

    /// `insert`: write a single record
    async fn insert_record(&self, payload: Option<Value>) -> InvocationResponse {
        let params: InsertParams = match parse_payload(payload) {
            Ok(params) => params,
            Err(response) => return response,
        };

        let check = Validator::new()
            .table_name("payload.table", &params.table)
            .json_object("payload.record", &params.record)
            .validate();
        if !check.is_valid() {
            return validation_failure(400, "VALIDATION_ERROR", &check);
        }

        match self.client.insert_record(&params.table, &params.record).await {
            Ok(inserted) => InvocationResponse::success(201, inserted),
            Err(err) => dependency_failure("insert", &err),
        }
    }
}

/// Payload for the `get` operation
#[derive(Debug, Deserialize)]
struct GetParams {
    table: String,
    id: String,
}

/// Payload for the `insert` operation
#[derive(Debug, Deserialize)]
struct InsertParams {
    table: String,
    record: Value,
}

/// Deserialize an operation payload, mapping absence and shape mismatches
/// to client-error responses
fn parse_payload<T: DeserializeOwned>(
    payload: Option<Value>,
) -> std::result::Result<T, InvocationResponse> {
    let payload = payload.ok_or_else(|| {
        InvocationResponse::error(400, "VALIDATION_ERROR", "payload is required")
    })?;
    serde_json::from_value(payload).map_err(|err| {
        InvocationResponse::error(400, "VALIDATION_ERROR", format!("Invalid payload: {err}"))
    })
}

/// Map a failed validation to a client-error response
fn validation_failure(
    status: u16,
    code: &str,
    check: &foodshare_gateway_core::validation::ValidationResult,
) -> InvocationResponse {
    let message = check
        .errors()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    InvocationResponse::error(status, code, message)
}

/// Map a store failure to an internal-error response
///
/// The failure is logged here, exactly once, and never retried.
fn dependency_failure(op: &str, err: &StoreError) -> InvocationResponse {
    error!(op = op, error = %err, "Data-store call failed");

    let (status, code) = if err.is_transport() {
        (502, "STORE_UNREACHABLE")
    } else if err.is_auth() {
        (502, "DEPENDENCY_ERROR")
    } else {
        (500, "DEPENDENCY_ERROR")
    };

    InvocationResponse::error(status, code, "Data store request failed")
}

/// Map store configuration errors to the core taxonomy at cold start
fn map_config_error(err: StoreError) -> Error {
    match err {
        StoreError::MissingSecret(var) => Error::missing_secret(&var),
        other => Error::config(other.to_string()).with_source(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A gateway whose store is unroutable; fine for paths that must never
    /// reach the store.
    fn offline_gateway() -> Gateway {
        let config = ServiceConfig::with_parts("http://127.0.0.1:9", "test-key");
        Gateway::with_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_ping_succeeds_without_store() {
        let gateway = offline_gateway();
        let response = gateway.handle(Invocation::ping()).await;

        assert_eq!(response.status, 200);
        assert_eq!(response.body["data"]["ok"], true);
    }

    #[tokio::test]
    async fn test_ping_is_idempotent_in_shape() {
        let gateway = offline_gateway();
        let first = gateway.handle(Invocation::ping()).await;
        let second = gateway.handle(Invocation::ping()).await;

        assert_eq!(first.status, second.status);
        assert_eq!(first.body["success"], second.body["success"]);
        assert_eq!(first.body["data"]["ok"], second.body["data"]["ok"]);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_method() {
        let gateway = offline_gateway();
        let invocation = Invocation {
            method: "DELETE".to_string(),
            path: "/".to_string(),
            body: json!({"op": "ping"}),
        };

        let response = gateway.handle(invocation).await;
        assert_eq!(response.status, 405);
        assert_eq!(response.body["error"]["code"], "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn test_rejects_missing_op() {
        let gateway = offline_gateway();
        let response = gateway.handle(Invocation::post(json!({}))).await;

        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_rejects_unknown_op() {
        let gateway = offline_gateway();
        let response = gateway
            .handle(Invocation::post(json!({"op": "drop_everything"})))
            .await;

        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"]["code"], "UNKNOWN_OPERATION");
    }

    #[tokio::test]
    async fn test_rejects_bad_table_name() {
        let gateway = offline_gateway();
        let response = gateway
            .handle(Invocation::post(json!({
                "op": "get",
                "payload": {"table": "users; drop table users", "id": "1"}
            })))
            .await;

        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_rejects_missing_payload() {
        let gateway = offline_gateway();
        let response = gateway.handle(Invocation::post(json!({"op": "get"}))).await;

        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unreachable_store_maps_to_bad_gateway() {
        let gateway = offline_gateway();
        let response = gateway
            .handle(Invocation::post(json!({
                "op": "get",
                "payload": {"table": "posts", "id": "1"}
            })))
            .await;

        assert_eq!(response.status, 502);
        assert_eq!(response.body["error"]["code"], "STORE_UNREACHABLE");
    }
}
