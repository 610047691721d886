//! Annotation rules
//!
//! One pure text-generation rule per recognized operator kind, plus the
//! generic fallback for everything else. Rules read the node (and, for
//! scans and joins, the candidate set the plan index gathered) and never
//! mutate anything.
//!
//! The costing sentences keep the original interface's phrasing: the
//! chosen strategy's cost first, then one "costs N times more" sentence
//! per competing strategy.

use crate::cost::CostComparison;
use crate::plan::{OperatorKind, PlanNode};

use super::text::StyledText;

/// Strips the `::text` cast noise Postgres appends to string predicates
pub(super) fn scrub(condition: &str) -> String {
    condition.replace("::text", "")
}

/// Scan costing: the chosen scan's header and ratio sentences against the
/// indexed competitors, then the kind-specific description.
pub(super) fn compare_scan(node: &PlanNode, candidates: &[PlanNode]) -> StyledText {
    let mut text = StyledText::new();
    if let (Some(relation), Some(cost)) = (node.relation_name(), node.total_cost()) {
        text.plain(format!(
            "{} done on {} with a cost of {}. ",
            node.node_type(),
            relation,
            cost
        ));
        let comparison = CostComparison::build(node.node_type(), cost, candidates);
        comparison_sentences(&comparison, &mut text);
    }
    text.append(describe(node));
    text
}

/// Join costing against the indexed competitors for the same predicate.
/// Both sides of the ratio are incremental costs: the cumulative figure
/// would charge the join for its children's work.
pub(super) fn compare_join(
    node: &PlanNode,
    predicate: &str,
    candidates: &[PlanNode],
) -> StyledText {
    let mut text = StyledText::new();
    if let Some(own_cost) = node.incremental_cost() {
        text.plain(format!(
            "{} done on {} adds a cost of {} on top of its inputs. ",
            node.node_type(),
            scrub(predicate),
            own_cost
        ));
        let comparison = CostComparison::build(node.node_type(), own_cost, candidates);
        comparison_sentences(&comparison, &mut text);
    }
    text.append(describe(node));
    text
}

fn comparison_sentences(comparison: &CostComparison, text: &mut StyledText) {
    for alt in &comparison.alternatives {
        match alt.ratio {
            Some(ratio) => {
                text.plain(format!(
                    "{} is chosen as choosing {} costs {:.3} times more with a cost of {}. ",
                    comparison.chosen_type, alt.node_type, ratio, alt.cost
                ));
            }
            None => {
                text.plain(format!(
                    "{} is chosen; {} was costed at {} \
                     (cost ratio undefined: the chosen plan reports a zero cost). ",
                    comparison.chosen_type, alt.node_type, alt.cost
                ));
            }
        }
    }
}

/// Kind-specific operator description. Total over the closed kind set.
pub(super) fn describe(node: &PlanNode) -> StyledText {
    match node.kind() {
        OperatorKind::Aggregate => aggregate(node),
        OperatorKind::BitmapHeapScan => bitmap_heap_scan(node),
        OperatorKind::Gather => gather(node),
        OperatorKind::GatherMerge => gather_merge(node),
        OperatorKind::Hash => hash(node),
        OperatorKind::HashAggregate => hash_aggregate(node),
        OperatorKind::HashJoin => hash_join(node),
        OperatorKind::IndexOnlyScan => index_only_scan(node),
        OperatorKind::IndexScan => index_scan(node),
        OperatorKind::Limit => limit(node),
        OperatorKind::MergeJoin => merge_join(node),
        OperatorKind::NestedLoop => nested_loop(node),
        OperatorKind::SeqScan => seq_scan(node),
        OperatorKind::Sort => sort(node),
        OperatorKind::TidScan => tid_scan(node),
        OperatorKind::Other => fallback(node),
    }
}

fn seq_scan(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ")
        .em(node.node_type())
        .plain(" operation performs a sequential scan on the relation");
    if let Some(relation) = node.relation_name() {
        text.plain(" ").good(relation);
    }
    if let Some(alias) = node.alias() {
        if node.relation_name() != Some(alias) {
            text.plain(", aliased as ").bad(alias);
        }
    }
    if let Some(filter) = node.filter() {
        text.plain(", keeping only the rows matching ")
            .strong(scrub(filter));
    }
    text.plain(".");
    text
}

fn index_scan(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("With the ")
        .em(node.node_type())
        .plain(" operation, rows are read over the matching range of the index");
    if let Some(name) = node.index_name() {
        text.plain(" ").strong(name);
    }
    text.plain(".");
    if let Some(cond) = node.index_cond() {
        text.plain(" Condition found: ").good(scrub(cond)).plain(".");
    }
    if let Some(filter) = node.filter() {
        text.plain(" The result is further refined by the filter ")
            .strong(scrub(filter))
            .plain(".");
    }
    text
}

fn index_only_scan(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("With the ")
        .em(node.node_type())
        .plain(" operation, rows are answered directly from the index");
    if let Some(name) = node.index_name() {
        text.plain(" ").strong(name);
    }
    text.plain(", without visiting the table.");
    if let Some(cond) = node.index_cond() {
        text.plain(" Condition found: ").good(scrub(cond)).plain(".");
    }
    if let Some(filter) = node.filter() {
        text.plain(" The result is then filtered by ")
            .strong(scrub(filter))
            .plain(".");
    }
    text
}

fn bitmap_heap_scan(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ").em(node.node_type()).plain(
        " operation fetches, in physical order, the pages an earlier bitmap pass marked as relevant",
    );
    if let Some(filter) = node.filter() {
        text.plain(", rechecking the rows against ")
            .strong(scrub(filter));
    }
    text.plain(".");
    text
}

fn tid_scan(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ")
        .em(node.node_type())
        .plain(" operation fetches rows directly by their physical tuple ids.");
    text
}

fn hash_join(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ")
        .em(node.node_type())
        .plain(" operation joins the results of the previous operations");
    if let Some(join_type) = node.join_type() {
        text.plain(" using a join of type ").strong(join_type);
    }
    if let Some(cond) = node.hash_cond() {
        text.plain(" on the condition ").good(scrub(cond));
    }
    text.plain(".");
    text
}

fn merge_join(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ")
        .em(node.node_type())
        .plain(" operation joins the two sorted inputs");
    if let Some(join_type) = node.join_type() {
        text.plain(" using a join of type ").strong(join_type);
    }
    if let Some(cond) = node.merge_cond() {
        text.plain(" with the condition ").good(scrub(cond));
    }
    text.plain(".");
    if node.join_type() == Some("Semi") {
        text.plain(" Only rows from the left input appear in the result.");
    }
    text
}

fn nested_loop(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ").em(node.node_type()).plain(
        " operation performs a join or search: for every row the first child produces, \
         the matching rows are looked up in the second child",
    );
    if let Some(join_type) = node.join_type() {
        text.plain(" (join of type ").strong(join_type).plain(")");
    }
    text.plain(".");
    text
}

fn hash(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ").em(node.node_type()).plain(
        " operation builds an in-memory hash table of its input rows \
         for the parent operation to probe.",
    );
    text
}

fn hash_aggregate(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("With the ").em(node.node_type()).plain(
        " function, the DBMS hashes the query rows into memory for use by its parent operation",
    );
    if let Some(group_key) = node.group_key() {
        text.plain(", grouping on ").strong(scrub(&group_key));
    }
    text.plain(".");
    text
}

fn aggregate(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ")
        .em(node.node_type())
        .plain(" operation condenses its input rows into aggregate values");
    if let Some(group_key) = node.group_key() {
        text.plain(", grouped by ").strong(scrub(&group_key));
    }
    if let Some(rows) = node.plan_rows() {
        text.plain(format!(", returning an estimated {} rows", rows));
    }
    text.plain(".");
    text
}

fn sort(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    let key = match node.sort_key() {
        Some(key) => scrub(&key),
        None => {
            text.plain("The ")
                .em(node.node_type())
                .plain(" operation sorts its input rows.");
            return text;
        }
    };

    text.plain("The ")
        .em(node.node_type())
        .plain(" operation sorts the rows ");
    if key.contains("DESC") {
        text.plain("on ")
            .good(strip_marker(&key, "DESC"))
            .plain(" in descending order.");
    } else if key.contains("ASC") {
        text.plain("on ")
            .bad(strip_marker(&key, "ASC"))
            .plain(" in ascending order.");
    } else {
        text.plain("based on ").strong(&key);
        if let Some(cost) = node.total_cost() {
            text.plain(format!(" with a cost of {}", cost));
        }
        text.plain(".");
    }
    text
}

fn limit(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ").em(node.node_type());
    match node.plan_rows() {
        Some(rows) => {
            text.plain(format!(
                " operation returns only the first {} rows of its input.",
                rows
            ));
        }
        None => {
            text.plain(" operation returns a limited prefix of its input rows.");
        }
    }
    text
}

fn gather(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ")
        .em(node.node_type())
        .plain(" operation collects the rows produced by its ");
    if let Some(workers) = node.workers_planned() {
        text.plain(format!("{} ", workers));
    }
    text.plain("parallel workers, in arrival order.");
    text
}

fn gather_merge(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ")
        .em(node.node_type())
        .plain(" operation merges the sorted streams of its ");
    if let Some(workers) = node.workers_planned() {
        text.plain(format!("{} ", workers));
    }
    text.plain("parallel workers, preserving the sort order.");
    text
}

/// Generic description for operator types outside the dispatch table
pub(super) fn fallback(node: &PlanNode) -> StyledText {
    let mut text = StyledText::new();
    text.plain("The ")
        .em(node.node_type())
        .plain(" operation is executed.");
    if let Some(cond) = node.index_cond() {
        text.plain(" Condition found: ").good(scrub(cond)).plain(".");
    }
    if let Some(filter) = node.filter() {
        text.plain(" There is further refinement on the records with the filter ")
            .strong(scrub(filter))
            .plain(".");
    }
    text
}

fn strip_marker(key: &str, marker: &str) -> String {
    key.replace(marker, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::keys;

    #[test]
    fn test_seq_scan_mentions_relation_alias_and_filter() {
        let node = PlanNode::new("Seq Scan")
            .with_attr(keys::RELATION_NAME, "orders")
            .with_attr(keys::ALIAS, "o")
            .with_attr(keys::FILTER, "(status = 'open'::text)");

        let rendered = describe(&node).to_string();
        assert!(rendered.contains("sequential scan on the relation orders"));
        assert!(rendered.contains("aliased as o"));
        assert!(rendered.contains("(status = 'open')"));
        assert!(!rendered.contains("::text"));
    }

    #[test]
    fn test_seq_scan_alias_suppressed_when_equal() {
        let node = PlanNode::new("Seq Scan")
            .with_attr(keys::RELATION_NAME, "orders")
            .with_attr(keys::ALIAS, "orders");

        assert!(!describe(&node).to_string().contains("aliased"));
    }

    #[test]
    fn test_sort_descending_phrasing() {
        let node = PlanNode::new("Sort").with_attr(keys::SORT_KEY, "orders.total DESC");
        let rendered = describe(&node).to_string();
        assert!(rendered.contains("in descending order"));
        assert!(rendered.contains("orders.total"));
        assert!(!rendered.contains("DESC"));
    }

    #[test]
    fn test_sort_ascending_phrasing() {
        let node = PlanNode::new("Sort").with_attr(keys::SORT_KEY, "orders.total ASC");
        let rendered = describe(&node).to_string();
        assert!(rendered.contains("in ascending order"));
        assert!(!rendered.contains("ASC"));
    }

    #[test]
    fn test_sort_without_marker_states_key_and_cost() {
        let node = PlanNode::new("Sort")
            .with_attr(keys::SORT_KEY, "orders.total")
            .with_attr(keys::TOTAL_COST, 55.5);
        let rendered = describe(&node).to_string();
        assert!(rendered.contains("based on orders.total"));
        assert!(rendered.contains("with a cost of 55.5"));
    }

    #[test]
    fn test_hash_join_states_kind_and_condition() {
        let node = PlanNode::new("Hash Join")
            .with_attr(keys::JOIN_TYPE, "Inner")
            .with_attr(keys::HASH_COND, "(a.id = b.id)");
        let rendered = describe(&node).to_string();
        assert!(rendered.contains("join of type Inner"));
        assert!(rendered.contains("(a.id = b.id)"));
    }

    #[test]
    fn test_merge_join_semi_remark() {
        let node = PlanNode::new("Merge Join")
            .with_attr(keys::JOIN_TYPE, "Semi")
            .with_attr(keys::MERGE_COND, "(a.id = b.id)");
        let rendered = describe(&node).to_string();
        assert!(rendered.contains("join of type Semi"));
        assert!(rendered.contains("left input"));
    }

    #[test]
    fn test_limit_references_row_count() {
        let node = PlanNode::new("Limit").with_attr(keys::PLAN_ROWS, 10);
        assert!(describe(&node).to_string().contains("first 10 rows"));
    }

    #[test]
    fn test_gather_references_workers() {
        let node = PlanNode::new("Gather").with_attr(keys::WORKERS_PLANNED, 4);
        assert!(describe(&node).to_string().contains("4 parallel workers"));
    }

    #[test]
    fn test_fallback_for_unrecognized_type() {
        let node = PlanNode::new("Materialize");
        let rendered = describe(&node).to_string();
        assert_eq!(rendered, "The Materialize operation is executed.");
    }

    #[test]
    fn test_fallback_quotes_condition_and_filter() {
        let node = PlanNode::new("Custom Scan")
            .with_attr(keys::INDEX_COND, "(id = 7)")
            .with_attr(keys::FILTER, "(flag)::text = 'y'::text");
        let rendered = describe(&node).to_string();
        assert!(rendered.contains("Condition found: (id = 7)"));
        assert!(rendered.contains("(flag) = 'y'"));
    }

    #[test]
    fn test_compare_scan_emits_ratio_sentence() {
        let chosen = PlanNode::new("Seq Scan")
            .with_attr(keys::RELATION_NAME, "orders")
            .with_attr(keys::TOTAL_COST, 120.0);
        let competitor = PlanNode::new("Index Scan")
            .with_attr(keys::RELATION_NAME, "orders")
            .with_attr(keys::TOTAL_COST, 480.0);

        let rendered = compare_scan(&chosen, &[competitor]).to_string();
        assert!(rendered.contains("Seq Scan done on orders with a cost of 120."));
        assert!(rendered.contains("costs 4.000 times more"));
        assert!(rendered.contains("cost of 480"));
    }

    #[test]
    fn test_compare_scan_without_candidates_is_description_plus_header() {
        let chosen = PlanNode::new("Seq Scan")
            .with_attr(keys::RELATION_NAME, "orders")
            .with_attr(keys::TOTAL_COST, 120.0);

        let rendered = compare_scan(&chosen, &[]).to_string();
        assert!(rendered.contains("done on orders"));
        assert!(!rendered.contains("times more"));
    }

    #[test]
    fn test_compare_join_uses_incremental_cost() {
        let chosen = PlanNode::new("Hash Join")
            .with_attr(keys::HASH_COND, "(a.id = b.id)")
            .with_attr(keys::TOTAL_COST, 30.0)
            .with_child(PlanNode::new("Seq Scan").with_attr(keys::TOTAL_COST, 10.0))
            .with_child(PlanNode::new("Hash").with_attr(keys::TOTAL_COST, 15.0));
        let competitor = PlanNode::new("Merge Join").with_attr(keys::TOTAL_COST, 20.0);

        let rendered = compare_join(&chosen, "(a.id = b.id)", &[competitor]).to_string();
        assert!(rendered.contains("adds a cost of 5"));
        // 20 / 5 = 4.000 against the incremental cost, not 20 / 30
        assert!(rendered.contains("costs 4.000 times more"));
    }

    #[test]
    fn test_zero_cost_ratio_sentence_is_explicit() {
        let chosen = PlanNode::new("Seq Scan")
            .with_attr(keys::RELATION_NAME, "empty_rel")
            .with_attr(keys::TOTAL_COST, 0.0);
        let competitor = PlanNode::new("Index Scan")
            .with_attr(keys::RELATION_NAME, "empty_rel")
            .with_attr(keys::TOTAL_COST, 480.0);

        let rendered = compare_scan(&chosen, &[competitor]).to_string();
        assert!(rendered.contains("cost ratio undefined"));
        assert!(!rendered.contains("inf"));
    }
}
