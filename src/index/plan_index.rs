//! Plan index
//!
//! Groups the operator records of one analysis run (the chosen plan plus
//! every distinct alternative) into two lookup structures:
//!
//! - scans, keyed by relation name: any node carrying "Relation Name"
//! - joins, keyed by predicate text: merge/hash joins, stored with their
//!   children removed and "Total Cost" replaced by the join's incremental
//!   cost (total minus the children's totals)
//!
//! Join costs are adjusted because the reported total accumulates over the
//! whole subtree; comparing join strategies fairly requires the marginal
//! cost the join operator itself adds. Scans are leaves and need no
//! adjustment.
//!
//! Membership is set-like: structurally identical nodes (full attribute
//! equality, children excluded for join entries) are inserted once, with
//! first-discovery order preserved for the comparator.

use std::collections::{HashMap, HashSet};

use crate::plan::{keys, PlanNode};

/// Insertion-ordered set of structurally distinct plan nodes
#[derive(Debug, Clone, Default)]
pub struct IndexedSet {
    nodes: Vec<PlanNode>,
    seen: HashSet<String>,
}

impl IndexedSet {
    /// Inserts unless an attribute-equal node is already present.
    /// Returns true when the node was new.
    fn insert(&mut self, node: PlanNode) -> bool {
        if self.seen.insert(node.fingerprint()) {
            self.nodes.push(node);
            true
        } else {
            false
        }
    }

    /// Member nodes in first-discovery order
    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    /// Number of distinct members
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node has been indexed here
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Scan and join lookup structures for one analysis run
#[derive(Debug, Clone, Default)]
pub struct PlanIndex {
    /// Relation name → distinct scan nodes touching it
    scans: HashMap<String, IndexedSet>,
    /// Join predicate text → distinct join entries (incremental cost)
    joins: HashMap<String, IndexedSet>,
}

impl PlanIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every node of a plan tree, pre-order, all children visited.
    /// A node can be indexed and still have indexed descendants. Empty
    /// placeholder nodes are a no-op and are not recursed into.
    pub fn index_plan(&mut self, root: &PlanNode) {
        if root.is_empty() {
            return;
        }
        self.index_node(root);
        for child in root.children() {
            self.index_plan(child);
        }
    }

    fn index_node(&mut self, node: &PlanNode) {
        if let Some(relation) = node.relation_name() {
            self.scans
                .entry(relation.to_string())
                .or_default()
                .insert(node.clone());
        }

        if node.kind().is_join() {
            if let Some(predicate) = node.join_predicate() {
                // A join with no reported total cannot be adjusted; leave
                // it out rather than index a misleading cumulative cost.
                if let Some(own_cost) = node.incremental_cost() {
                    let entry = node
                        .without_children()
                        .with_attr(keys::TOTAL_COST, own_cost);
                    self.joins
                        .entry(predicate.to_string())
                        .or_default()
                        .insert(entry);
                }
            }
        }
    }

    /// Scan candidates indexed for a relation
    pub fn scans_on(&self, relation: &str) -> Option<&IndexedSet> {
        self.scans.get(relation)
    }

    /// Join candidates indexed for a predicate
    pub fn joins_on(&self, predicate: &str) -> Option<&IndexedSet> {
        self.joins.get(predicate)
    }

    /// Number of relations with at least one indexed scan
    pub fn scan_relation_count(&self) -> usize {
        self.scans.len()
    }

    /// Number of predicates with at least one indexed join
    pub fn join_predicate_count(&self) -> usize {
        self.joins.len()
    }

    /// True when nothing has been indexed
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty() && self.joins.is_empty()
    }

    /// Resets both lookup structures. Every analysis run starts from an
    /// empty index; nothing leaks between runs.
    pub fn clear(&mut self) {
        self.scans.clear();
        self.joins.clear();
    }
}
