//! Artifact identity types
//!
//! A compiled rule package is addressed by a [`Coordinate`]
//! (group + artifact) and a [`VersionId`]. Versions are opaque
//! strings; which version is "newer" is decided by the registry,
//! never by client-side comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate of a rule package in the artifact registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Group (namespace) of the artifact
    pub group_id: String,

    /// Artifact name within the group
    pub artifact_id: String,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// Opaque version identifier assigned by the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which version of an artifact to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// Always resolve the newest available version
    Latest,

    /// Pin an exact version
    Exact(VersionId),
}

impl VersionSelector {
    /// Parse a selector from configuration.
    ///
    /// `"LATEST"` (any case) selects the newest version, anything else
    /// is treated as an exact version string.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("latest") {
            VersionSelector::Latest
        } else {
            VersionSelector::Exact(VersionId::new(value))
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str("LATEST"),
            VersionSelector::Exact(version) => f.write_str(version.as_str()),
        }
    }
}

/// Fully qualified release: coordinate plus resolved version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseId {
    pub coordinate: Coordinate,
    pub version: VersionId,
}

impl ReleaseId {
    pub fn new(coordinate: Coordinate, version: VersionId) -> Self {
        Self {
            coordinate,
            version,
        }
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinate, self.version)
    }
}
