//! Runtime error taxonomy
//!
//! Load failures are fatal at startup but merely logged when the
//! poller hits them; everything else is scoped to the single
//! operation that triggered it.

use offer_core::{EvaluationError, PackageError};
use offer_registry::RegistryError;
use thiserror::Error;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors raised by the runtime container and its sessions
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A rule package could not be fetched, parsed or verified
    #[error("Failed to load rule package: {0}")]
    LoadFailed(String),

    /// A session was requested before the first successful load
    #[error("No rule package loaded yet")]
    NotReady,

    /// The rule package failed while evaluating a single request
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(#[from] EvaluationError),
}

impl From<RegistryError> for RuntimeError {
    fn from(err: RegistryError) -> Self {
        RuntimeError::LoadFailed(err.to_string())
    }
}

impl From<PackageError> for RuntimeError {
    fn from(err: PackageError) -> Self {
        RuntimeError::LoadFailed(err.to_string())
    }
}
