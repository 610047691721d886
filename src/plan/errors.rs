//! Plan model errors

use thiserror::Error;

/// Result type for plan parsing
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised while building a plan tree from explain output
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Payload shape did not contain a plan object
    #[error("malformed explain payload: {0}")]
    Malformed(String),
}
