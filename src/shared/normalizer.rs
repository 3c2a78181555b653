//! Error normalization
//!
//! Every failure coming back from the tokenization or storefront APIs is
//! funnelled through [`normalize`] so the checkout flow only ever deals with
//! one shape: a display message, a short code, and optional raw details kept
//! for diagnostics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shown when no request could reach the server.
pub const CONNECTIVITY_MESSAGE: &str = "could not connect to server, check your internet connection";

/// Fallback when the server answered with an error but no readable message.
pub const SERVER_ERROR_MESSAGE: &str = "The server responded with an error";

/// Fallback for a transport failure that carried no message of its own.
pub const TRANSPORT_ERROR_MESSAGE: &str = "Unknown request error";

/// Fallback for anything else.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

pub const CODE_REQUEST_ERROR: &str = "REQUEST_ERROR";
pub const CODE_TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
pub const CODE_UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Raw failure observed while talking to an external endpoint.
#[derive(Debug)]
pub enum ApiFailure {
    /// The server answered with a non-success status.
    Response { status: u16, body: Option<Value> },

    /// The request was sent but no response came back.
    NoResponse { reason: String },

    /// The request could not even be built or dispatched.
    Transport { message: String },

    /// Any other error value, e.g. a malformed response body.
    Error(Box<dyn std::error::Error + Send + Sync>),

    /// A failure that is not an error value at all.
    Thrown(Value),
}

impl ApiFailure {
    /// Wrap an arbitrary message as a generic error.
    pub fn error(message: impl Into<String>) -> Self {
        let message: String = message.into();
        ApiFailure::Error(message.into())
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return ApiFailure::Transport { message: err.to_string() };
        }
        if err.is_decode() {
            return ApiFailure::Error(Box::new(err));
        }
        if let Some(status) = err.status() {
            return ApiFailure::Response { status: status.as_u16(), body: None };
        }
        // connect, timeout, request and body errors
        ApiFailure::NoResponse { reason: err.to_string() }
    }
}

impl From<serde_json::Error> for ApiFailure {
    fn from(err: serde_json::Error) -> Self {
        ApiFailure::Error(Box::new(err))
    }
}

/// Uniform error shape surfaced to the checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Coarse classification of a normalized error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Nothing came back; retrying may help.
    Network,
    /// The external service rejected the request.
    Server,
    /// Anything else.
    Unexpected,
}

impl NormalizedError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn kind(&self) -> FailureKind {
        if self.code == CODE_REQUEST_ERROR {
            FailureKind::Network
        } else if self.code.parse::<u16>().is_ok() {
            FailureKind::Server
        } else {
            FailureKind::Unexpected
        }
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        self.code.parse().ok()
    }
}

/// Map any [`ApiFailure`] into a [`NormalizedError`]. Never panics.
pub fn normalize(failure: ApiFailure) -> NormalizedError {
    match failure {
        ApiFailure::Response { status, body } => {
            let message = body
                .as_ref()
                .and_then(extract_message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string());
            NormalizedError {
                message,
                code: status.to_string(),
                details: body,
            }
        }
        ApiFailure::NoResponse { .. } => {
            NormalizedError::new(CONNECTIVITY_MESSAGE, CODE_REQUEST_ERROR)
        }
        ApiFailure::Transport { message } => {
            let message = if message.is_empty() {
                TRANSPORT_ERROR_MESSAGE.to_string()
            } else {
                message
            };
            NormalizedError::new(message, CODE_TRANSPORT_ERROR)
        }
        ApiFailure::Error(err) => {
            let message = err.to_string();
            let message = if message.is_empty() {
                UNEXPECTED_ERROR_MESSAGE.to_string()
            } else {
                message
            };
            NormalizedError::new(message, CODE_UNKNOWN_ERROR)
        }
        ApiFailure::Thrown(value) => {
            NormalizedError::new(UNEXPECTED_ERROR_MESSAGE, CODE_UNKNOWN_ERROR).with_details(value)
        }
    }
}

/// Pull a human readable message out of an error body.
///
/// Checks `message`, then `error`, then the first entry of `errors`. A
/// string-typed field wins even when empty; the caller then falls back to
/// the generic server message.
fn extract_message(body: &Value) -> Option<String> {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Some(error.to_string());
    }
    match body.get("errors").and_then(Value::as_array).and_then(|e| e.first()) {
        Some(Value::String(first)) => Some(first.clone()),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Some(other) => Some(other.to_string()),
        None => None,
    }
}
