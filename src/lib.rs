//! qeplain - explains PostgreSQL planner choices
//!
//! Takes one SQL statement, obtains the planner's chosen plan, forces
//! the 2048 alternative plans reachable by disabling planner switches,
//! and explains each operator of the chosen plan against the priced
//! alternatives.

pub mod annotate;
pub mod cost;
pub mod engine;
pub mod index;
pub mod plan;
pub mod switches;
