//! The runtime container
//!
//! Holds exactly one active rule package reference at any instant.
//! Readers take a snapshot through an atomic load; the swap stores a
//! single pointer. Readers always observe either the pre-swap or the
//! post-swap package in full, never a torn state, and sessions that
//! captured the old package keep running against it to completion.

use crate::error::{Result, RuntimeError};
use crate::session::EvaluationSession;
use arc_swap::ArcSwapOption;
use offer_core::{Coordinate, CompiledRuleset, ReleaseId, RulePackage, VersionId, VersionSelector};
use offer_registry::{ArtifactResolver, CompiledArtifact};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Default interval between registry polls, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Container behavior settings
#[derive(Debug, Clone)]
pub struct ContainerSettings {
    /// Entry point (rule group) sessions evaluate against
    pub entry_point: String,

    /// Which version to resolve at startup
    pub selector: VersionSelector,

    /// Whether the version poller should run at all
    pub auto_reload: bool,

    /// Interval between registry polls (default: 10 seconds)
    pub poll_interval: Duration,
}

impl ContainerSettings {
    pub fn new(entry_point: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
            selector: VersionSelector::Latest,
            auto_reload: true,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    pub fn with_selector(mut self, selector: VersionSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_auto_reload(mut self, enabled: bool) -> Self {
        self.auto_reload = enabled;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// The active package plus the version it was resolved at
pub(crate) struct ActivePackage {
    pub(crate) package: Arc<dyn RulePackage>,
    pub(crate) version: VersionId,
}

/// Read-only snapshot of the container for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct ContainerStatus {
    pub coordinate: Coordinate,
    pub version: Option<VersionId>,
    pub entry_point: String,
    pub auto_reload_enabled: bool,
    pub poll_interval_secs: u64,
    pub rule_groups: Vec<String>,
}

/// Owns the active rule package and serves evaluation sessions
pub struct RuntimeContainer {
    coordinate: Coordinate,
    settings: ContainerSettings,
    active: ArcSwapOption<ActivePackage>,
}

impl RuntimeContainer {
    /// Create an empty container; nothing can be evaluated until
    /// [`load_initial`](Self::load_initial) (or a swap) succeeds.
    pub fn new(coordinate: Coordinate, settings: ContainerSettings) -> Self {
        Self {
            coordinate,
            settings,
            active: ArcSwapOption::const_empty(),
        }
    }

    /// Resolve and activate the startup package.
    ///
    /// Any fetch/parse/verify failure is returned as
    /// [`RuntimeError::LoadFailed`]; the caller treats this as fatal,
    /// the process must not start serving without a loaded package.
    pub async fn load_initial(&self, resolver: &dyn ArtifactResolver) -> Result<ReleaseId> {
        tracing::info!(
            coordinate = %self.coordinate,
            selector = %self.settings.selector,
            "Loading rule package"
        );

        let artifact = resolver
            .fetch_latest(&self.coordinate, &self.settings.selector)
            .await?;
        let package = compile_artifact(&artifact)?;
        let release = ReleaseId::new(self.coordinate.clone(), artifact.version.clone());

        self.swap(package, artifact.version);
        tracing::info!(release = %release, "Rule package loaded");

        Ok(release)
    }

    /// Create a session bound to the package active at this moment.
    ///
    /// The session never re-reads the container; a concurrent swap
    /// does not affect it.
    pub fn new_session(&self) -> Result<EvaluationSession> {
        let active = self.active.load_full().ok_or(RuntimeError::NotReady)?;
        Ok(EvaluationSession::new(
            active,
            self.settings.entry_point.clone(),
        ))
    }

    /// Atomically replace the active package.
    ///
    /// Safe to call concurrently with any number of in-progress
    /// `new_session`/evaluation calls.
    pub fn swap(&self, package: Arc<dyn RulePackage>, version: VersionId) {
        self.active
            .store(Some(Arc::new(ActivePackage { package, version })));
    }

    /// Version of the currently-active package, if any
    pub fn active_version(&self) -> Option<VersionId> {
        self.active.load().as_ref().map(|a| a.version.clone())
    }

    /// Whether a package has been successfully loaded
    pub fn is_ready(&self) -> bool {
        self.active.load().is_some()
    }

    /// Read-only snapshot for status reporting; never fails
    pub fn describe(&self) -> ContainerStatus {
        let active = self.active.load_full();
        ContainerStatus {
            coordinate: self.coordinate.clone(),
            version: active.as_ref().map(|a| a.version.clone()),
            entry_point: self.settings.entry_point.clone(),
            auto_reload_enabled: self.settings.auto_reload,
            poll_interval_secs: self.settings.poll_interval.as_secs(),
            rule_groups: active
                .as_ref()
                .map(|a| a.package.entry_points())
                .unwrap_or_default(),
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }
}

/// Compile a fetched artifact into an executable rule package
pub fn compile_artifact(artifact: &CompiledArtifact) -> Result<Arc<dyn RulePackage>> {
    let ruleset = CompiledRuleset::from_yaml(&artifact.content)?;
    Ok(Arc::new(ruleset))
}
