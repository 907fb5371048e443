//! Inbound invocation contract and response envelope
//!
//! The gateway receives HTTP-style invocations from the hosting platform:
//! a method, a path, and a JSON body carrying `{op, payload}`. Responses
//! carry a status code and a JSON envelope.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An inbound HTTP-style invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// HTTP method of the trigger
    pub method: String,
    /// Request path (recorded for tracing; the gateway is a single function)
    #[serde(default = "default_path")]
    pub path: String,
    /// JSON body carrying the gateway contract
    #[serde(default)]
    pub body: Value,
}

fn default_path() -> String {
    "/".to_string()
}

impl Invocation {
    /// Build a POST invocation with the given body
    #[must_use]
    pub fn post(body: Value) -> Self {
        Self {
            method: "POST".to_string(),
            path: default_path(),
            body,
        }
    }

    /// Build a ping invocation
    #[must_use]
    pub fn ping() -> Self {
        Self::post(json!({"op": "ping"}))
    }
}

/// The request carried in an invocation body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    /// Operation name
    pub op: String,
    /// Operation payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Error info in a response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Symbolic error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Response envelope returned in every invocation body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Whether the operation succeeded
    pub success: bool,
    /// Operation result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error details on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// A structured invocation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Value,
}

impl InvocationResponse {
    /// Build a success response with the given status and data
    #[must_use]
    pub fn success(status: u16, data: Value) -> Self {
        let envelope = ResponseEnvelope {
            success: true,
            data: Some(data),
            error: None,
        };
        Self {
            status,
            body: serde_json::to_value(envelope).unwrap_or(Value::Null),
        }
    }

    /// Build an error response with the given status, code and message
    #[must_use]
    pub fn error(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        let envelope = ResponseEnvelope {
            success: false,
            data: None,
            error: Some(ErrorInfo {
                code: code.into(),
                message: message.into(),
            }),
        };
        Self {
            status,
            body: serde_json::to_value(envelope).unwrap_or(Value::Null),
        }
    }

    /// Whether the response carries a success envelope
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
