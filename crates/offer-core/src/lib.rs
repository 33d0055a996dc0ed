//! Core types for the offer decision runtime.
//!
//! This crate defines the domain model shared by every other crate:
//!
//! - [`Offer`] - the mutable decision record evaluated by rules
//! - [`Coordinate`], [`VersionId`], [`ReleaseId`] - artifact identity
//! - [`RulePackage`] - the opaque capability implemented by any rule
//!   engine (a compiled ruleset, a stub for tests, ...)
//! - [`CompiledRuleset`] - the shipped declarative rule interpreter

pub mod error;
pub mod offer;
pub mod package;
pub mod release;
pub mod ruleset;

pub use error::{EvaluationError, PackageError};
pub use offer::Offer;
pub use package::RulePackage;
pub use release::{Coordinate, ReleaseId, VersionId, VersionSelector};
pub use ruleset::CompiledRuleset;
