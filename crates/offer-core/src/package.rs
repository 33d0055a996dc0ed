//! The rule package capability
//!
//! A [`RulePackage`] is an opaque, immutable bundle of compiled rules.
//! The runtime container only ever sees this trait, so the engine
//! behind it can vary: the shipped [`CompiledRuleset`](crate::ruleset::CompiledRuleset)
//! interpreter, or a stub in tests. Packages are shared via `Arc` and
//! disposed when the last container/session reference drops.

use crate::error::EvaluationError;
use crate::offer::Offer;

/// An immutable, versioned bundle of condition/action rules
pub trait RulePackage: std::fmt::Debug + Send + Sync {
    /// Run the rules of the named entry point against one offer,
    /// mutating its output fields in place.
    ///
    /// Must be deterministic for a given package and input, and must
    /// not mutate any state outside the passed record.
    fn evaluate(&self, entry_point: &str, offer: &mut Offer) -> Result<(), EvaluationError>;

    /// Named rule groupings available in this package
    fn entry_points(&self) -> Vec<String>;
}
