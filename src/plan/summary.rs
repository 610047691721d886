//! Plan summary figures
//!
//! The headline numbers a frontend shows next to the annotations: the
//! root's total cost and estimated rows, plus how often each operator type
//! appears in the chosen plan.

use std::collections::BTreeMap;

use serde::Serialize;

use super::node::PlanNode;

/// Aggregate figures for one plan tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanSummary {
    /// Total cost reported at the root, if any
    pub total_cost: Option<f64>,
    /// Estimated rows reported at the root, if any
    pub total_rows: Option<u64>,
    /// Operator type occurrence counts, deterministic iteration order
    operators: BTreeMap<String, usize>,
}

impl PlanSummary {
    /// Summarizes a plan tree. Empty placeholder nodes are not counted.
    pub fn summarize(root: &PlanNode) -> Self {
        let mut summary = Self {
            total_cost: root.total_cost(),
            total_rows: root.plan_rows(),
            operators: BTreeMap::new(),
        };
        summary.count(root);
        summary
    }

    fn count(&mut self, node: &PlanNode) {
        if node.is_empty() {
            return;
        }
        *self
            .operators
            .entry(node.node_type().to_string())
            .or_insert(0) += 1;
        for child in node.children() {
            self.count(child);
        }
    }

    /// Occurrences of one operator type
    pub fn count_of(&self, node_type: &str) -> usize {
        self.operators.get(node_type).copied().unwrap_or(0)
    }

    /// Number of sequential scans in the plan
    pub fn seq_scans(&self) -> usize {
        self.count_of("Seq Scan")
    }

    /// Number of index scans in the plan (plain and index-only)
    pub fn index_scans(&self) -> usize {
        self.count_of("Index Scan") + self.count_of("Index Only Scan")
    }

    /// All operator counts, sorted by operator type
    pub fn operators(&self) -> impl Iterator<Item = (&str, usize)> {
        self.operators.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Total number of operators in the plan
    pub fn operator_total(&self) -> usize {
        self.operators.values().sum()
    }
}
