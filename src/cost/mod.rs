//! Cost comparison subsystem for qeplain
//!
//! Answers "how much more would the alternative have cost?" for one chosen
//! operator at a time, against the candidates the plan index gathered for
//! the same relation or join predicate.
//!
//! # Invariants
//!
//! - Every competing type appears exactly once, at its minimum observed
//!   cost, in first-discovery order
//! - The chosen operator's own cost is authoritative over any same-type
//!   candidate estimate
//! - A zero chosen cost never divides: the ratio is the `None` sentinel,
//!   reported as undefined, not a crash or an infinity

mod comparison;

pub use comparison::{Alternative, CostComparison};
