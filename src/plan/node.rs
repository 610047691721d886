//! Plan node model
//!
//! A `PlanNode` is one operator instance from a Postgres execution plan,
//! deserialized straight from `EXPLAIN (FORMAT JSON)` output: "Node Type"
//! names the operator, "Plans" holds the ordered children, and every other
//! key lands in the attribute map unchanged.
//!
//! Nodes are immutable once built. The attribute map is a `BTreeMap` so
//! that serialized forms (and therefore fingerprints) are deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{PlanError, PlanResult};
use super::kind::OperatorKind;

/// Attribute keys as they appear in `EXPLAIN (FORMAT JSON)` output.
pub mod keys {
    pub const TOTAL_COST: &str = "Total Cost";
    pub const RELATION_NAME: &str = "Relation Name";
    pub const ALIAS: &str = "Alias";
    pub const FILTER: &str = "Filter";
    pub const INDEX_COND: &str = "Index Cond";
    pub const INDEX_NAME: &str = "Index Name";
    pub const SORT_KEY: &str = "Sort Key";
    pub const HASH_COND: &str = "Hash Cond";
    pub const MERGE_COND: &str = "Merge Cond";
    pub const JOIN_TYPE: &str = "Join Type";
    pub const PLAN_ROWS: &str = "Plan Rows";
    pub const GROUP_KEY: &str = "Group Key";
    pub const WORKERS_PLANNED: &str = "Workers Planned";
}

/// One operator in an execution plan tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanNode {
    /// Operator kind string (e.g. "Seq Scan", "Hash Join")
    #[serde(rename = "Node Type", default, skip_serializing_if = "String::is_empty")]
    node_type: String,
    /// Ordered child plans: zero (leaf), one (unary), or two (binary join)
    #[serde(rename = "Plans", default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<PlanNode>,
    /// Operator-specific fields under their EXPLAIN key names
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

impl PlanNode {
    /// Creates a node with the given operator type and no attributes
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            children: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Creates the empty placeholder node (absent plan)
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Adds an attribute (builder style)
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Adds a child plan (builder style)
    pub fn with_child(mut self, child: PlanNode) -> Self {
        self.children.push(child);
        self
    }

    /// Parses a plan tree from raw `EXPLAIN (FORMAT JSON)` output.
    ///
    /// Accepts the top-level one-element array, the `{"Plan": ...}` wrapper,
    /// or a bare plan object. `null` and `{}` yield the empty node; any
    /// other non-object payload is malformed.
    pub fn from_explain(value: &Value) -> PlanResult<Self> {
        let plan = match value {
            Value::Null => return Ok(Self::empty()),
            Value::Array(items) => match items.first() {
                Some(first) => first.get("Plan").unwrap_or(first),
                None => return Ok(Self::empty()),
            },
            Value::Object(_) => value.get("Plan").unwrap_or(value),
            other => {
                return Err(PlanError::Malformed(format!(
                    "expected a plan object, got {}",
                    json_type_name(other)
                )))
            }
        };
        if !plan.is_object() {
            return Err(PlanError::Malformed(format!(
                "expected a plan object, got {}",
                json_type_name(plan)
            )));
        }
        serde_json::from_value(plan.clone()).map_err(|e| PlanError::Malformed(e.to_string()))
    }

    /// Returns the operator type string
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Classifies the operator type against the closed kind set
    pub fn kind(&self) -> OperatorKind {
        OperatorKind::classify(&self.node_type)
    }

    /// Returns the ordered child plans
    pub fn children(&self) -> &[PlanNode] {
        &self.children
    }

    /// Returns the full attribute map
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// True for the absent/placeholder plan: no type and no attributes.
    /// Empty nodes are never indexed, annotated, or recursed into.
    pub fn is_empty(&self) -> bool {
        self.node_type.is_empty() && self.attributes.is_empty()
    }

    /// Looks up a raw attribute value
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Looks up a string attribute
    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Looks up a numeric attribute
    pub fn num_attr(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }

    /// Cumulative cost of this node's whole subtree, where reported
    pub fn total_cost(&self) -> Option<f64> {
        self.num_attr(keys::TOTAL_COST)
    }

    /// This node's own cost contribution: total cost minus the summed
    /// total cost of its children. Meaningful for join operators, whose
    /// reported cost accumulates over both input subtrees.
    pub fn incremental_cost(&self) -> Option<f64> {
        let total = self.total_cost()?;
        let inputs: f64 = self.children.iter().filter_map(PlanNode::total_cost).sum();
        Some(total - inputs)
    }

    /// Relation scanned, for scan-type operators
    pub fn relation_name(&self) -> Option<&str> {
        self.str_attr(keys::RELATION_NAME)
    }

    /// Relation alias from the statement, if any
    pub fn alias(&self) -> Option<&str> {
        self.str_attr(keys::ALIAS)
    }

    /// Post-scan filter predicate, if one was applied
    pub fn filter(&self) -> Option<&str> {
        self.str_attr(keys::FILTER)
    }

    /// Index access condition, for index scans
    pub fn index_cond(&self) -> Option<&str> {
        self.str_attr(keys::INDEX_COND)
    }

    /// Name of the index used, for index scans
    pub fn index_name(&self) -> Option<&str> {
        self.str_attr(keys::INDEX_NAME)
    }

    /// Join kind ("Inner", "Semi", ...)
    pub fn join_type(&self) -> Option<&str> {
        self.str_attr(keys::JOIN_TYPE)
    }

    /// Hash join predicate text
    pub fn hash_cond(&self) -> Option<&str> {
        self.str_attr(keys::HASH_COND)
    }

    /// Merge join predicate text
    pub fn merge_cond(&self) -> Option<&str> {
        self.str_attr(keys::MERGE_COND)
    }

    /// Merge or hash join predicate, whichever this node carries
    pub fn join_predicate(&self) -> Option<&str> {
        self.merge_cond().or_else(|| self.hash_cond())
    }

    /// Declared sort key. EXPLAIN reports an array of key expressions;
    /// the array form is joined with ", " into one declared-key string.
    pub fn sort_key(&self) -> Option<String> {
        self.attr(keys::SORT_KEY).and_then(coerce_key_list)
    }

    /// Grouping keys, joined the same way as the sort key
    pub fn group_key(&self) -> Option<String> {
        self.attr(keys::GROUP_KEY).and_then(coerce_key_list)
    }

    /// Estimated row count for this operator
    pub fn plan_rows(&self) -> Option<u64> {
        self.attr(keys::PLAN_ROWS).and_then(Value::as_u64)
    }

    /// Parallel workers the planner intends to launch
    pub fn workers_planned(&self) -> Option<u64> {
        self.attr(keys::WORKERS_PLANNED).and_then(Value::as_u64)
    }

    /// Copy of this node without its children
    pub fn without_children(&self) -> PlanNode {
        PlanNode {
            node_type: self.node_type.clone(),
            children: Vec::new(),
            attributes: self.attributes.clone(),
        }
    }

    /// Canonical dedup key over (type, attributes), children excluded.
    /// Two nodes fingerprint equal exactly when every attribute matches.
    pub fn fingerprint(&self) -> String {
        canonical_json(&(&self.node_type, &self.attributes))
    }

    /// Canonical dedup key over the whole tree, children included
    pub fn tree_fingerprint(&self) -> String {
        canonical_json(self)
    }
}

/// Serializes to canonical JSON text. BTreeMap attribute order makes the
/// output deterministic; the Debug fallback is equally deterministic and
/// only reachable if a non-finite number was hand-inserted.
fn canonical_json<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// Coerces EXPLAIN's string-or-array key declarations to one string
fn coerce_key_list(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_explain_array_wrapper() {
        let raw = json!([{
            "Plan": {
                "Node Type": "Seq Scan",
                "Relation Name": "orders",
                "Total Cost": 120.0,
                "Plan Rows": 1000
            }
        }]);

        let node = PlanNode::from_explain(&raw).unwrap();
        assert_eq!(node.node_type(), "Seq Scan");
        assert_eq!(node.relation_name(), Some("orders"));
        assert_eq!(node.total_cost(), Some(120.0));
        assert_eq!(node.plan_rows(), Some(1000));
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_parse_explain_nested_children() {
        let raw = json!({
            "Plan": {
                "Node Type": "Hash Join",
                "Hash Cond": "(a.id = b.id)",
                "Total Cost": 30.0,
                "Plans": [
                    { "Node Type": "Seq Scan", "Relation Name": "a", "Total Cost": 10.0 },
                    { "Node Type": "Hash", "Total Cost": 15.0 }
                ]
            }
        });

        let node = PlanNode::from_explain(&raw).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].relation_name(), Some("a"));
        assert_eq!(node.children()[1].node_type(), "Hash");
        // "Plans" must not leak into the attribute map
        assert!(node.attr("Plans").is_none());
    }

    #[test]
    fn test_parse_null_and_empty_yield_placeholder() {
        assert!(PlanNode::from_explain(&Value::Null).unwrap().is_empty());
        assert!(PlanNode::from_explain(&json!({})).unwrap().is_empty());
        assert!(PlanNode::from_explain(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = PlanNode::from_explain(&json!("EXPLAIN")).unwrap_err();
        assert!(matches!(err, PlanError::Malformed(_)));
        assert!(PlanNode::from_explain(&json!(42)).is_err());
    }

    #[test]
    fn test_incremental_cost_subtracts_children() {
        let join = PlanNode::new("Hash Join")
            .with_attr(keys::TOTAL_COST, 30.0)
            .with_child(PlanNode::new("Seq Scan").with_attr(keys::TOTAL_COST, 10.0))
            .with_child(PlanNode::new("Hash").with_attr(keys::TOTAL_COST, 15.0));

        assert_eq!(join.incremental_cost(), Some(5.0));
    }

    #[test]
    fn test_incremental_cost_without_total_is_none() {
        let join = PlanNode::new("Hash Join")
            .with_child(PlanNode::new("Seq Scan").with_attr(keys::TOTAL_COST, 10.0));
        assert_eq!(join.incremental_cost(), None);
    }

    #[test]
    fn test_sort_key_coerces_array_form() {
        let by_array = PlanNode::new("Sort").with_attr(keys::SORT_KEY, json!(["a.x DESC", "a.y"]));
        assert_eq!(by_array.sort_key().as_deref(), Some("a.x DESC, a.y"));

        let by_string = PlanNode::new("Sort").with_attr(keys::SORT_KEY, "a.x DESC");
        assert_eq!(by_string.sort_key().as_deref(), Some("a.x DESC"));
    }

    #[test]
    fn test_fingerprint_ignores_children() {
        let bare = PlanNode::new("Seq Scan").with_attr(keys::RELATION_NAME, "orders");
        let with_child = bare.clone().with_child(PlanNode::new("Materialize"));

        assert_eq!(bare.fingerprint(), with_child.fingerprint());
        assert_ne!(bare.tree_fingerprint(), with_child.tree_fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_any_attribute() {
        let a = PlanNode::new("Seq Scan")
            .with_attr(keys::RELATION_NAME, "orders")
            .with_attr(keys::TOTAL_COST, 120.0);
        let b = PlanNode::new("Seq Scan")
            .with_attr(keys::RELATION_NAME, "orders")
            .with_attr(keys::TOTAL_COST, 120.5);

        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_attribute_order_independent() {
        let a = PlanNode::new("Seq Scan")
            .with_attr(keys::RELATION_NAME, "orders")
            .with_attr(keys::TOTAL_COST, 120.0);
        let b = PlanNode::new("Seq Scan")
            .with_attr(keys::TOTAL_COST, 120.0)
            .with_attr(keys::RELATION_NAME, "orders");

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_serialize_round_trips_explain_shape() {
        let raw = json!({
            "Node Type": "Seq Scan",
            "Relation Name": "orders",
            "Total Cost": 120.0
        });
        let node = PlanNode::from_explain(&raw).unwrap();
        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back, raw);
    }
}
