//! REST API
//!
//! Endpoints:
//! - `POST /v1/offers/evaluate` - run one offer through the rules
//! - `GET /v1/rules/status` - active package coordinate/version
//! - `GET /health` - UP when a rule package is active

mod handlers;
mod router;
pub mod types;

pub use router::create_router;
