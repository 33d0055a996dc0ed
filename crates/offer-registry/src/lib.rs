//! Artifact registry clients
//!
//! The registry is the source of truth for compiled rule packages.
//! This crate defines the [`ArtifactResolver`] seam the runtime polls
//! through, an HTTP implementation for a remote registry, and an
//! in-memory implementation for tests and demos.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use http::HttpArtifactRegistry;
pub use memory::InMemoryRegistry;
pub use traits::{ArtifactResolver, CompiledArtifact};
