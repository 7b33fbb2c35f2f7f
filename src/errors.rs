use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Outcome of a failed call to the backend collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Host unreachable, connection reset, or any other request error.
    Network(String),
    /// The request exceeded the configured timeout.
    Timeout,
    /// The circuit breaker rejected the call without contacting the backend.
    CircuitOpen,
    /// The endpoint does not exist (HTTP 404).
    NotFound,
    /// Any other non-success status, with the backend's message when it sent one.
    ServerError { status: u16, message: String },
    /// The body was not the JSON shape we expected.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Timeout => write!(f, "Request timed out"),
            FetchError::CircuitOpen => write!(f, "Backend circuit is open"),
            FetchError::NotFound => write!(f, "Endpoint not found"),
            FetchError::ServerError { status, message } => {
                write!(f, "Backend returned {}: {}", status, message)
            }
            FetchError::Decode(msg) => write!(f, "Failed to decode response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    /// Classifies a `reqwest` failure that happened before a status was available.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }

    /// Maps a non-success status and its body text.
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 404 {
            return FetchError::NotFound;
        }
        FetchError::ServerError {
            status,
            message: backend_message(body),
        }
    }

    /// Whether the backend could not be reached at all.
    ///
    /// Only these count toward opening the circuit breaker. Any status,
    /// 5xx included, comes from a reachable backend and must not trip it.
    pub fn is_transport_failure(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout => true,
            FetchError::ServerError { .. }
            | FetchError::CircuitOpen
            | FetchError::NotFound
            | FetchError::Decode(_) => false,
        }
    }
}

/// Pulls a readable message out of a backend error body.
///
/// Django REST Framework answers with `{"detail": "..."}` or a map of field
/// errors; anything else is passed through as text.
fn backend_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "Unknown error".to_string();
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail").and_then(|d| d.as_str()) {
            Some(detail) => detail.to_string(),
            None => trimmed.to_string(),
        },
        _ => trimmed.to_string(),
    }
}

/// Read operations never fail; write operations only fall back on reachability problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Substitute synthetic data tagged `isMockData`.
    Fallback,
    /// Hand the error to the caller.
    Propagate,
}

impl FallbackPolicy {
    pub fn for_error(kind: OperationKind, err: &FetchError) -> Self {
        match (kind, err) {
            (OperationKind::Read, _) => FallbackPolicy::Fallback,
            (
                OperationKind::Write,
                FetchError::Network(_)
                | FetchError::Timeout
                | FetchError::CircuitOpen
                | FetchError::NotFound,
            ) => FallbackPolicy::Fallback,
            (OperationKind::Write, FetchError::ServerError { .. } | FetchError::Decode(_)) => {
                FallbackPolicy::Propagate
            }
        }
    }
}

/// Application-specific error types for the gateway.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Bad request error (invalid input).
    BadRequest(String),
    /// An error the backend reported that we pass through to the caller.
    Upstream { status: u16, message: String },
    /// Error interacting with the backend.
    ExternalApiError(String),
    /// Internal server error.
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Upstream { status, message } => {
                write!(f, "Backend error {}: {}", status, message)
            }
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status code and JSON body.
    ///
    /// Backend validation errors keep their 4xx status and message so the
    /// dashboard can show them in its error banner.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream { status, message } => {
                let status = StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                tracing::warn!("Propagating backend error {}: {}", status, message);
                (status, message.clone())
            }
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "External service error".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::ServerError { status, message } => AppError::Upstream { status, message },
            other => AppError::ExternalApiError(other.to_string()),
        }
    }
}
