//! Core error types

use thiserror::Error;

/// Errors raised while a rule package evaluates an offer
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// The requested entry point does not exist in the package
    #[error("Unknown entry point: {0}")]
    UnknownEntryPoint(String),

    /// A rule failed while executing
    #[error("Rule execution failed: {0}")]
    RuleFailure(String),
}

/// Errors raised while parsing or verifying a compiled rule package
#[derive(Error, Debug)]
pub enum PackageError {
    /// YAML parsing error
    #[error("Failed to parse rule package: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The package parsed but violates a structural constraint
    #[error("Invalid rule package: {0}")]
    Invalid(String),
}
