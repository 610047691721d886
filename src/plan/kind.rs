//! Operator kind classification
//!
//! The dispatchable operator set is closed: every kind the annotation rules
//! know about is a variant here, and anything else classifies as `Other`,
//! which takes the generic fallback rule. Keeping the set closed makes
//! "every operator kind handled" a compiler-checked property of the
//! dispatch match.

/// Closed set of recognized plan operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Aggregate,
    BitmapHeapScan,
    Gather,
    GatherMerge,
    Hash,
    HashAggregate,
    HashJoin,
    IndexOnlyScan,
    IndexScan,
    Limit,
    MergeJoin,
    NestedLoop,
    SeqScan,
    Sort,
    TidScan,
    /// Anything the dispatch table does not recognize
    Other,
}

impl OperatorKind {
    /// Classifies an EXPLAIN node type string. Matching is exact; an
    /// unrecognized type is `Other`, never an error.
    pub fn classify(node_type: &str) -> Self {
        match node_type {
            "Aggregate" => OperatorKind::Aggregate,
            "Bitmap Heap Scan" => OperatorKind::BitmapHeapScan,
            "Gather" => OperatorKind::Gather,
            "Gather Merge" => OperatorKind::GatherMerge,
            "Hash" => OperatorKind::Hash,
            "Hash Agg" => OperatorKind::HashAggregate,
            "Hash Join" => OperatorKind::HashJoin,
            "Index Only Scan" => OperatorKind::IndexOnlyScan,
            "Index Scan" => OperatorKind::IndexScan,
            "Limit" => OperatorKind::Limit,
            "Merge Join" => OperatorKind::MergeJoin,
            "Nested Loop" => OperatorKind::NestedLoop,
            "Seq Scan" => OperatorKind::SeqScan,
            "Sort" => OperatorKind::Sort,
            "Tid Scan" => OperatorKind::TidScan,
            _ => OperatorKind::Other,
        }
    }

    /// True for operators that read a physical relation
    pub fn is_scan(&self) -> bool {
        matches!(
            self,
            OperatorKind::SeqScan
                | OperatorKind::IndexScan
                | OperatorKind::IndexOnlyScan
                | OperatorKind::BitmapHeapScan
                | OperatorKind::TidScan
        )
    }

    /// True for operators that combine two input plans
    pub fn is_join(&self) -> bool {
        matches!(
            self,
            OperatorKind::HashJoin | OperatorKind::MergeJoin | OperatorKind::NestedLoop
        )
    }
}
