//! In-memory artifact registry
//!
//! Backs the runtime tests and local demos: versions are published in
//! order, and "newer" simply means "published after the version the
//! caller holds".

use crate::error::{RegistryError, RegistryResult};
use crate::traits::{ArtifactResolver, CompiledArtifact};
use async_trait::async_trait;
use offer_core::{Coordinate, VersionId, VersionSelector};
use std::sync::RwLock;

/// An in-memory, publish-ordered artifact store
#[derive(Default)]
pub struct InMemoryRegistry {
    versions: RwLock<Vec<CompiledArtifact>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new version; it becomes the latest
    pub fn publish(&self, version: impl Into<String>, content: impl Into<String>) {
        let artifact = CompiledArtifact::new(VersionId::new(version), content);
        self.versions
            .write()
            .expect("registry lock poisoned")
            .push(artifact);
    }

    fn latest(&self) -> Option<CompiledArtifact> {
        self.versions
            .read()
            .expect("registry lock poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl ArtifactResolver for InMemoryRegistry {
    async fn fetch_latest(
        &self,
        coordinate: &Coordinate,
        selector: &VersionSelector,
    ) -> RegistryResult<CompiledArtifact> {
        let versions = self.versions.read().expect("registry lock poisoned");

        let artifact = match selector {
            VersionSelector::Latest => versions.last().cloned(),
            VersionSelector::Exact(version) => {
                versions.iter().find(|a| a.version == *version).cloned()
            }
        };

        artifact.ok_or_else(|| RegistryError::NotFound {
            coordinate: coordinate.clone(),
        })
    }

    async fn poll_newer(
        &self,
        _coordinate: &Coordinate,
        current: &VersionId,
    ) -> RegistryResult<Option<CompiledArtifact>> {
        match self.latest() {
            Some(latest) if latest.version != *current => Ok(Some(latest)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate() -> Coordinate {
        Coordinate::new("io.shaama", "offer-rules")
    }

    #[tokio::test]
    async fn test_empty_registry_not_found() {
        let registry = InMemoryRegistry::new();
        let err = registry
            .fetch_latest(&coordinate(), &VersionSelector::Latest)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_latest_is_last_published() {
        let registry = InMemoryRegistry::new();
        registry.publish("1.0.0", "v1");
        registry.publish("1.1.0", "v2");

        let artifact = registry
            .fetch_latest(&coordinate(), &VersionSelector::Latest)
            .await
            .unwrap();
        assert_eq!(artifact.version, VersionId::new("1.1.0"));
        assert_eq!(artifact.content, "v2");
    }

    #[tokio::test]
    async fn test_fetch_exact_version() {
        let registry = InMemoryRegistry::new();
        registry.publish("1.0.0", "v1");
        registry.publish("1.1.0", "v2");

        let artifact = registry
            .fetch_latest(
                &coordinate(),
                &VersionSelector::Exact(VersionId::new("1.0.0")),
            )
            .await
            .unwrap();
        assert_eq!(artifact.content, "v1");
    }

    #[tokio::test]
    async fn test_poll_newer() {
        let registry = InMemoryRegistry::new();
        registry.publish("1.0.0", "v1");

        let current = VersionId::new("1.0.0");
        assert!(registry
            .poll_newer(&coordinate(), &current)
            .await
            .unwrap()
            .is_none());

        registry.publish("1.1.0", "v2");
        let newer = registry.poll_newer(&coordinate(), &current).await.unwrap();
        assert_eq!(newer.unwrap().version, VersionId::new("1.1.0"));
    }
}
