//! Dispatch
//!
//! Walks an indexed plan tree in pre-order and produces one [`Annotation`]
//! per operator. Scans with indexed competitors and joins with indexed
//! competitors go through the costed comparison rules; every other node
//! gets its kind-specific description, with the generic fallback covering
//! operator types outside the dispatch table.

use serde::Serialize;

use crate::index::PlanIndex;
use crate::plan::{OperatorKind, PlanNode};

use super::rules;
use super::text::StyledText;

/// A labeled, styled explanation of one plan operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// What the explanation is about: the scanned relation, the join
    /// predicate, the sort key, or the operator's own name.
    pub label: String,
    /// The explanation itself.
    pub text: StyledText,
}

impl Annotation {
    /// Renders the explanation as inline HTML.
    pub fn html(&self) -> String {
        self.text.html()
    }
}

/// Annotates every operator of a plan tree, parents before children.
/// Empty placeholder nodes produce nothing.
pub fn annotate_plan(plan: &PlanNode, index: &PlanIndex) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    collect(plan, index, &mut annotations);
    annotations
}

fn collect(node: &PlanNode, index: &PlanIndex, out: &mut Vec<Annotation>) {
    if node.is_empty() {
        return;
    }
    out.push(annotate_node(node, index));
    for child in node.children() {
        collect(child, index, out);
    }
}

/// Builds the annotation for a single operator.
pub fn annotate_node(node: &PlanNode, index: &PlanIndex) -> Annotation {
    let text = explain(node, index);
    Annotation {
        label: label_of(node),
        text,
    }
}

fn explain(node: &PlanNode, index: &PlanIndex) -> StyledText {
    if let Some(relation) = node.relation_name() {
        let candidates = index
            .scans_on(relation)
            .map(|set| set.nodes())
            .unwrap_or(&[]);
        return rules::compare_scan(node, candidates);
    }

    if node.kind().is_join() {
        if let Some(predicate) = node.join_predicate() {
            let candidates = index
                .joins_on(predicate)
                .map(|set| set.nodes())
                .unwrap_or(&[]);
            return rules::compare_join(node, predicate, candidates);
        }
    }

    if node.kind() == OperatorKind::Other {
        log::debug!("no dedicated rule for node type {:?}", node.node_type());
    }
    rules::describe(node)
}

fn label_of(node: &PlanNode) -> String {
    if let Some(relation) = node.relation_name() {
        return relation.to_string();
    }
    if let Some(predicate) = node.join_predicate() {
        return rules::scrub(predicate);
    }
    if let Some(key) = node.sort_key() {
        return rules::scrub(&key);
    }
    node.node_type().to_string()
}
