//! Planner switch enumeration for qeplain
//!
//! Alternative plans are forced by disabling combinations of the eleven
//! boolean `enable_*` planner switches before re-explaining the same
//! statement. This subsystem owns the switch list, the 11-bit assignment
//! vector, and the exhaustive 2048-vector enumeration.
//!
//! # Invariants
//!
//! - Enumeration is deterministic: natural binary counting order
//! - Bit 10 (MSB) maps to the first switch, bit 0 to the last
//! - Bit semantics: 1 = OFF, so vector 0 is the all-ON default
//! - Applying and failing a vector is the collaborator's concern; the
//!   enumeration itself cannot fail

mod vector;

pub use vector::{SwitchVector, SWITCH_COUNT, SWITCH_NAMES, VECTOR_COUNT};
