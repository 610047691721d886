//! Engine errors

use thiserror::Error;

use super::source::QueryError;

/// Why an analysis run produced no result.
///
/// Failures while gathering alternatives are never fatal; they are
/// counted and skipped. Only the chosen plan is non-negotiable.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// The chosen plan could not be obtained, so there is nothing to
    /// compare anything against.
    #[error("could not obtain the chosen plan: {0}")]
    Qep(#[from] QueryError),
    /// EXPLAIN succeeded but returned an empty plan tree.
    #[error("explain returned no plan for the statement")]
    EmptyPlan,
}
