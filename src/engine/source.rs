//! Plan acquisition
//!
//! The engine talks to the database through [`PlanSource`]: one session,
//! driven synchronously. Implementations wrap whatever Postgres client
//! the caller already holds; the engine only needs EXPLAIN output and
//! session-local switch control.

use thiserror::Error;

use crate::plan::{PlanError, PlanNode};
use crate::switches::SwitchVector;

/// Errors a plan source can report.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The statement could not be explained (rejected, timed out).
    #[error("explain failed: {0}")]
    Explain(String),
    /// A SET statement was rejected by the session.
    #[error("switch configuration failed: {0}")]
    Configure(String),
    /// The session is gone.
    #[error("connection lost: {0}")]
    Connection(String),
    /// EXPLAIN returned a payload that does not parse as a plan tree.
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// One database session the engine drives.
///
/// Switch changes must be session-local (plain `SET`); the engine
/// restores the all-enabled state when a run finishes.
pub trait PlanSource {
    /// Runs a statement for its side effects only.
    fn execute(&mut self, statement: &str) -> Result<(), QueryError>;

    /// Runs `EXPLAIN (FORMAT JSON)` on the statement and parses the
    /// resulting plan tree.
    fn explain(&mut self, statement: &str) -> Result<PlanNode, QueryError>;

    /// Applies one SET statement per planner switch in the vector.
    fn apply_switches(&mut self, vector: SwitchVector) -> Result<(), QueryError> {
        for statement in vector.statements() {
            self.execute(&statement)?;
        }
        Ok(())
    }
}
