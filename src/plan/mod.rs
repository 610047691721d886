//! Plan tree model
//!
//! The shared representation every other subsystem reads.
//!
//! - One shape: a `PlanNode` is the operator type, an attribute map, and
//!   ordered children, exactly mirroring `EXPLAIN (FORMAT JSON)` output
//! - Absence is meaningful: a missing attribute means the operator did not
//!   report it (no filter applied, no cost estimated)
//! - Immutable after construction: one plan is read many times during an
//!   analysis and never written
//! - Deterministic: BTreeMap attribute order, canonical fingerprints

mod errors;
mod kind;
mod metrics;
mod node;
mod summary;

pub use errors::{PlanError, PlanResult};
pub use kind::OperatorKind;
pub use metrics::TreeMetrics;
pub use node::{keys, PlanNode};
pub use summary::PlanSummary;
