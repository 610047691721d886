//! Plan Index subsystem for qeplain
//!
//! The index is derived, in-memory-only state rebuilt for every analysis
//! run from the chosen plan and all distinct alternatives.
//!
//! # Design Principles
//!
//! - Derived state: the index mirrors the explained plans, never the
//!   source of truth
//! - Single writer, then many readers: the build phase fully completes
//!   before annotation reads begin
//! - Deterministic: set members keep first-discovery order; dedup is by
//!   canonical fingerprint, O(1) amortized per insert
//!
//! # Invariants
//!
//! - A structurally identical node inserted twice leaves set sizes
//!   unchanged
//! - Join entries carry the join's incremental cost, children stripped
//! - Rebuilt from empty every run; nothing leaks across analyses

mod plan_index;

pub use plan_index::{IndexedSet, PlanIndex};
