//! Background version poller
//!
//! An explicit tokio task that asks the artifact registry for a
//! version newer than the container's current one on a fixed
//! interval (default 10 seconds, see
//! [`DEFAULT_POLL_INTERVAL_SECS`](crate::DEFAULT_POLL_INTERVAL_SECS))
//! and promotes it through an atomic swap.
//!
//! Failures are never fatal: a failed check or a broken artifact is
//! logged and the loop retries on the next tick. The new package is
//! compiled fully before the container is touched, so a bad artifact
//! cannot disturb the active one. Shutdown is observed within
//! roughly one tick via a watch channel.

use crate::container::{compile_artifact, RuntimeContainer};
use offer_registry::ArtifactResolver;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Polls the registry and hot-swaps newer rule packages
pub struct VersionPoller {
    container: Arc<RuntimeContainer>,
    resolver: Arc<dyn ArtifactResolver>,
}

/// Handle for stopping a spawned poller.
///
/// Dropping the handle without calling
/// [`shutdown`](PollerHandle::shutdown) also stops the loop; the
/// explicit call additionally waits for the task to finish.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Signal the loop to stop and wait for it to finish.
    ///
    /// Returns within roughly one polling tick; in-flight evaluations
    /// are unaffected.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

impl VersionPoller {
    pub fn new(container: Arc<RuntimeContainer>, resolver: Arc<dyn ArtifactResolver>) -> Self {
        Self {
            container,
            resolver,
        }
    }

    /// Spawn the polling loop as a background task
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let interval = self.container.settings().poll_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // the first tick completes immediately; consume it so the
            // first check happens one interval after startup
            ticker.tick().await;

            tracing::info!(
                coordinate = %self.container.coordinate(),
                interval_secs = interval.as_secs(),
                "Version poller started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.check_once().await;
                    }
                    changed = shutdown_rx.changed() => {
                        // a dropped sender means the handle is gone;
                        // stop rather than loop on the closed channel
                        if changed.is_err() || *shutdown_rx.borrow() {
                            tracing::info!("Version poller stopped");
                            break;
                        }
                    }
                }
            }
        });

        PollerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Run one poll cycle: check, load fully, then swap.
    ///
    /// Exposed so tests can drive the poller deterministically.
    pub async fn check_once(&self) {
        // Nothing to compare against until the initial load succeeded
        let Some(current) = self.container.active_version() else {
            return;
        };

        let newer = match self
            .resolver
            .poll_newer(self.container.coordinate(), &current)
            .await
        {
            Ok(newer) => newer,
            Err(e) => {
                tracing::warn!(error = %e, "Registry poll failed, will retry on next tick");
                return;
            }
        };

        let Some(artifact) = newer else {
            tracing::debug!(version = %current, "No newer rule package version");
            return;
        };

        // Compile before touching the container; a broken artifact
        // leaves the active package untouched.
        match compile_artifact(&artifact) {
            Ok(package) => {
                tracing::info!(
                    old_version = %current,
                    new_version = %artifact.version,
                    "Hot-swapping rule package"
                );
                self.container.swap(package, artifact.version);
            }
            Err(e) => {
                tracing::warn!(
                    version = %artifact.version,
                    error = %e,
                    "Newer rule package failed to load, keeping current version"
                );
            }
        }
    }
}
