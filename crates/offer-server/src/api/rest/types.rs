//! REST API type definitions
//!
//! Request and response types for the REST API endpoints.

use chrono::NaiveDate;
use offer_runtime::RuntimeContainer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub container: Arc<RuntimeContainer>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Offer evaluation request payload
#[derive(Debug, Clone, Deserialize)]
pub struct OfferRequestPayload {
    pub offer_id: String,

    pub customer_id: String,

    /// Customer segment tag, e.g. "PREMIUM"
    pub customer_segment: String,

    /// Order amount; decimal, non-negative
    pub order_amount: Decimal,

    pub product_category: String,

    /// Defaults to false when omitted
    #[serde(default)]
    pub is_first_time_customer: Option<bool>,

    /// Optional offer expiry date (ISO 8601)
    #[serde(default)]
    pub offer_valid_until: Option<NaiveDate>,
}

/// Offer evaluation response payload
#[derive(Debug, Serialize)]
pub struct OfferResponsePayload {
    pub offer_id: String,

    pub offer_applicable: bool,

    pub discount_percentage: Decimal,

    /// Rounded to 2 fraction digits, half-up
    pub discount_amount: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_offer_type: Option<String>,

    /// Amount payable after discount, rounded to 2 fraction digits
    pub final_amount: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}
