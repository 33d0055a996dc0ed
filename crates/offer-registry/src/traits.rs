//! The artifact resolver seam
//!
//! The runtime container and the version poller only depend on this
//! trait; the registry behind it can be a remote HTTP service or an
//! in-memory store.

use crate::error::RegistryResult;
use async_trait::async_trait;
use offer_core::{Coordinate, VersionId, VersionSelector};

/// Raw bytes of a compiled rule package at a resolved version.
///
/// The resolver does not interpret the content; compiling it into a
/// [`RulePackage`](offer_core::RulePackage) is the runtime's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// Version the registry resolved
    pub version: VersionId,

    /// Artifact content as fetched
    pub content: String,
}

impl CompiledArtifact {
    pub fn new(version: VersionId, content: impl Into<String>) -> Self {
        Self {
            version,
            content: content.into(),
        }
    }
}

/// Resolves compiled rule packages from an artifact registry
#[async_trait]
pub trait ArtifactResolver: Send + Sync {
    /// Fetch the artifact the selector resolves to.
    ///
    /// `Latest` asks the registry for its newest version; `Exact`
    /// pins one. Fails when the coordinate (or pinned version) does
    /// not exist.
    async fn fetch_latest(
        &self,
        coordinate: &Coordinate,
        selector: &VersionSelector,
    ) -> RegistryResult<CompiledArtifact>;

    /// Ask whether a version newer than `current` exists.
    ///
    /// Returns `Ok(None)` when the registry has nothing newer. Which
    /// version counts as "newer" is entirely the registry's call.
    async fn poll_newer(
        &self,
        coordinate: &Coordinate,
        current: &VersionId,
    ) -> RegistryResult<Option<CompiledArtifact>>;
}
