//! Error types for the registry layer

use offer_core::Coordinate;
use thiserror::Error;

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while resolving artifacts
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No artifact exists at the requested coordinate/version
    #[error("Artifact not found: {coordinate}")]
    NotFound { coordinate: Coordinate },

    /// HTTP request failed or the registry answered with an error
    #[error("Registry API error: {0}")]
    ApiError(String),

    /// The registry's response could not be decoded
    #[error("Failed to parse registry response: {0}")]
    ParseError(String),

    /// Generic error
    #[error("Registry error: {0}")]
    Other(String),
}
