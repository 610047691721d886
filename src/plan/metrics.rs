//! Plan tree metrics
//!
//! Depth and breadth figures used to size the downstream plan diagram.
//! No cost semantics.

use serde::Serialize;

use super::node::PlanNode;

/// Shape of a plan tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeMetrics {
    /// Longest root-to-leaf path; a lone leaf measures 1, the empty plan 0
    pub depth: usize,
    /// Maximum node count on any single breadth-first level
    pub width: usize,
}

impl TreeMetrics {
    /// Measures a plan tree
    pub fn measure(root: &PlanNode) -> Self {
        if root.is_empty() {
            return Self { depth: 0, width: 0 };
        }

        let mut depth = 0;
        let mut width = 0;
        let mut level: Vec<&PlanNode> = vec![root];
        while !level.is_empty() {
            depth += 1;
            width = width.max(level.len());
            level = level.iter().flat_map(|n| n.children().iter()).collect();
        }

        Self { depth, width }
    }
}
