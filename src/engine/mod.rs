//! Engine
//!
//! The synchronous driver that turns one SQL statement into a full
//! analysis: chosen plan, alternatives from the switch sweep, and the
//! index the annotation layer reads. The database side is abstracted
//! behind [`PlanSource`] so tests (and callers with their own client)
//! can script it.

mod analyzer;
mod errors;
mod source;

pub use analyzer::{Analysis, Explainer, SweepOptions, SweepReport};
pub use errors::ExplainError;
pub use source::{PlanSource, QueryError};
