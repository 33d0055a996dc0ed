//! HTTP artifact registry client
//!
//! Fetches compiled rule packages from a remote registry service.
//!
//! # Registry API
//!
//! ## GET /artifacts/{group}/{artifact}/latest
//!
//! Returns a JSON descriptor of the newest published version:
//!
//! ```json
//! { "version": "1.2.0", "url": "https://.../offer-rules-1.2.0.yaml" }
//! ```
//!
//! With `?after={version}` the registry answers `204 No Content`
//! when nothing newer than `version` has been published.
//!
//! ## GET /artifacts/{group}/{artifact}/versions/{version}
//!
//! Descriptor for one pinned version; `404` when it does not exist.
//!
//! The descriptor's `url` is then fetched for the raw artifact
//! content.
//!
//! # Authentication
//!
//! If an API key is configured it is sent as a Bearer token:
//!
//! ```text
//! Authorization: Bearer {api_key}
//! ```

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::traits::{ArtifactResolver, CompiledArtifact};
use async_trait::async_trait;
use offer_core::{Coordinate, VersionId, VersionSelector};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

/// HTTP client for a remote artifact registry
pub struct HttpArtifactRegistry {
    client: Client,
    config: RegistryConfig,
}

/// Descriptor the registry returns for a resolved version
#[derive(Debug, Clone, Deserialize)]
struct ArtifactDescriptor {
    version: VersionId,
    url: String,
}

impl HttpArtifactRegistry {
    /// Create a new registry client
    ///
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be built.
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RegistryError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    fn descriptor_url(&self, coordinate: &Coordinate, selector: &VersionSelector) -> String {
        let base = format!(
            "{}/artifacts/{}/{}",
            self.config.base_url, coordinate.group_id, coordinate.artifact_id
        );
        match selector {
            VersionSelector::Latest => format!("{}/latest", base),
            VersionSelector::Exact(version) => format!("{}/versions/{}", base, version),
        }
    }

    async fn fetch_descriptor(
        &self,
        url: &str,
        coordinate: &Coordinate,
    ) -> RegistryResult<Option<ArtifactDescriptor>> {
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| RegistryError::ApiError(format!("Failed to fetch {}: {}", url, e)))?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::NOT_FOUND => Err(RegistryError::NotFound {
                coordinate: coordinate.clone(),
            }),
            status if status.is_success() => {
                let descriptor = response.json::<ArtifactDescriptor>().await.map_err(|e| {
                    RegistryError::ParseError(format!("Invalid artifact descriptor: {}", e))
                })?;
                Ok(Some(descriptor))
            }
            status => Err(RegistryError::ApiError(format!(
                "Registry returned status {} for {}",
                status, url
            ))),
        }
    }

    async fn fetch_content(&self, url: &str) -> RegistryResult<String> {
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| RegistryError::ApiError(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(RegistryError::ApiError(format!(
                "Registry returned status {} for {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| RegistryError::ApiError(format!("Failed to read artifact body: {}", e)))
    }

    async fn resolve(
        &self,
        descriptor: ArtifactDescriptor,
    ) -> RegistryResult<CompiledArtifact> {
        let content = self.fetch_content(&descriptor.url).await?;
        tracing::debug!(
            version = %descriptor.version,
            bytes = content.len(),
            "Fetched artifact content"
        );
        Ok(CompiledArtifact::new(descriptor.version, content))
    }
}

#[async_trait]
impl ArtifactResolver for HttpArtifactRegistry {
    async fn fetch_latest(
        &self,
        coordinate: &Coordinate,
        selector: &VersionSelector,
    ) -> RegistryResult<CompiledArtifact> {
        let url = self.descriptor_url(coordinate, selector);
        let descriptor = self
            .fetch_descriptor(&url, coordinate)
            .await?
            .ok_or_else(|| RegistryError::NotFound {
                coordinate: coordinate.clone(),
            })?;

        self.resolve(descriptor).await
    }

    async fn poll_newer(
        &self,
        coordinate: &Coordinate,
        current: &VersionId,
    ) -> RegistryResult<Option<CompiledArtifact>> {
        let url = format!(
            "{}?after={}",
            self.descriptor_url(coordinate, &VersionSelector::Latest),
            current
        );

        match self.fetch_descriptor(&url, coordinate).await? {
            Some(descriptor) => {
                // Defensive: some registries answer 200 with the same
                // version instead of 204.
                if descriptor.version == *current {
                    return Ok(None);
                }
                Ok(Some(self.resolve(descriptor).await?))
            }
            None => Ok(None),
        }
    }
}
