//! API endpoint handlers
//!
//! HTTP request handlers for all REST API endpoints.

use super::types::*;
use crate::error::ServerError;
use crate::service;
use axum::{extract::State, http::StatusCode, Json};
use offer_runtime::ContainerStatus;

/// Health check endpoint
///
/// Reports DOWN with 503 until a rule package has been activated, so
/// load balancers keep traffic away from a container that would only
/// answer 503 on the evaluation endpoint anyway.
pub(super) async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status) = if state.container.is_ready() {
        (StatusCode::OK, "UP")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "DOWN")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Offer evaluation endpoint
#[axum::debug_handler]
pub(super) async fn evaluate_offer(
    State(state): State<AppState>,
    Json(payload): Json<OfferRequestPayload>,
) -> Result<Json<OfferResponsePayload>, ServerError> {
    let response = service::evaluate_offer(&state.container, payload)?;
    Ok(Json(response))
}

/// Rules status endpoint
pub(super) async fn rules_status(State(state): State<AppState>) -> Json<ContainerStatus> {
    Json(state.container.describe())
}
