//! Stateless evaluation sessions
//!
//! A session is a cheap handle binding one package snapshot to the
//! configured entry point. It carries no per-request state, so one
//! session may be reused concurrently, or a fresh one created per
//! request; either way no evaluation can observe another's outputs.

use crate::container::ActivePackage;
use crate::error::Result;
use offer_core::{Offer, VersionId};
use std::sync::Arc;

/// A stateless evaluation handle bound to one package snapshot
#[derive(Clone)]
pub struct EvaluationSession {
    active: Arc<ActivePackage>,
    entry_point: String,
}

impl std::fmt::Debug for EvaluationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationSession")
            .field("version", &self.active.version)
            .field("entry_point", &self.entry_point)
            .finish_non_exhaustive()
    }
}

impl EvaluationSession {
    pub(crate) fn new(active: Arc<ActivePackage>, entry_point: String) -> Self {
        Self {
            active,
            entry_point,
        }
    }

    /// Run one offer through the bound rule package, mutating its
    /// output fields in place. Delegate failures surface as
    /// [`RuntimeError::EvaluationFailed`](crate::RuntimeError::EvaluationFailed);
    /// there is no retry.
    pub fn evaluate(&self, offer: &mut Offer) -> Result<()> {
        self.active
            .package
            .evaluate(&self.entry_point, offer)
            .map_err(Into::into)
    }

    /// Version of the package this session is bound to
    pub fn version(&self) -> &VersionId {
        &self.active.version
    }
}
