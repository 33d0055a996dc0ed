//! Offer decision HTTP server
//!
//! REST surface over the offer runtime container: evaluate offers,
//! report rules-engine status, health.

pub mod api;
pub mod config;
pub mod error;
pub mod service;
