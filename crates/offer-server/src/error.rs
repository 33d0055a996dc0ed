//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use offer_runtime::RuntimeError;
use serde_json::json;
use std::fmt;

/// Server error type
#[derive(Debug)]
pub enum ServerError {
    /// The rules engine failed while evaluating one request
    EngineError(String),

    /// Invalid request
    InvalidRequest(String),

    /// No rule package is active yet
    NotReady,

    /// Internal server error
    InternalError(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::EngineError(msg) => write!(f, "Engine error: {}", msg),
            ServerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ServerError::NotReady => write!(f, "Rules engine not ready"),
            ServerError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // evaluation details stay in the logs; callers get a
            // generic internal error
            ServerError::EngineError(msg) => {
                tracing::error!("Engine error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Offer evaluation failed".to_string(),
                )
            }
            ServerError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Rules engine not ready".to_string(),
            ),
            ServerError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<RuntimeError> for ServerError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::NotReady => ServerError::NotReady,
            RuntimeError::EvaluationFailed(e) => ServerError::EngineError(e.to_string()),
            RuntimeError::LoadFailed(msg) => ServerError::InternalError(msg),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::InternalError(err.to_string())
    }
}
