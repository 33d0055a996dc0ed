//! Router creation and configuration
//!
//! Creates the Axum router for the REST API endpoints.

use super::handlers::*;
use super::types::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use offer_runtime::RuntimeContainer;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create REST API router
pub fn create_router(container: Arc<RuntimeContainer>) -> Router {
    let state = AppState { container };

    Router::new()
        .route("/health", get(health))
        .route("/v1/offers/evaluate", post(evaluate_offer))
        .route("/v1/rules/status", get(rules_status))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
