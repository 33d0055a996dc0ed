//! Versioned runtime container with background hot-swap
//!
//! Owns the currently-active rule package and keeps it fresh without
//! restarting the process:
//!
//! - [`RuntimeContainer`] holds one atomically-replaceable handle to
//!   the active package and hands out evaluation sessions
//! - [`EvaluationSession`] is a stateless handle bound to a single
//!   package snapshot, safe for unbounded concurrent use
//! - [`VersionPoller`] is an explicit background task that promotes
//!   newer versions found in the artifact registry
//!
//! Evaluation reads are lock-free; the swap is the only serialization
//! point. Sessions created before a swap run to completion against
//! the package they captured.

pub mod container;
pub mod error;
pub mod poller;
pub mod session;

pub use container::{
    compile_artifact, ContainerSettings, ContainerStatus, RuntimeContainer,
    DEFAULT_POLL_INTERVAL_SECS,
};
pub use error::{Result, RuntimeError};
pub use poller::{PollerHandle, VersionPoller};
pub use session::EvaluationSession;
