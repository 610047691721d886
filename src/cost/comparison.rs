//! Relative cost comparison
//!
//! Reduces the candidate set indexed for one relation or join predicate to
//! a per-strategy cost table: the minimum cost observed for each competing
//! operator type, and the ratio of each against the chosen operator's own
//! cost. The chosen node's entry always overrides a same-type candidate:
//! the live plan's cost is authoritative over alternative estimates.

use serde::Serialize;

use crate::plan::PlanNode;

/// One competing strategy costed against the chosen one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    /// Competing operator type
    pub node_type: String,
    /// Minimum cost observed for that type across all indexed plans
    pub cost: f64,
    /// `cost / chosen_cost`; `None` is the defined sentinel for a
    /// zero-cost chosen plan, where the ratio is undefined
    pub ratio: Option<f64>,
}

/// Cost table for one chosen node against its indexed competitors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostComparison {
    /// The chosen operator type
    pub chosen_type: String,
    /// The chosen operator's cost (incremental for joins)
    pub chosen_cost: f64,
    /// Every competing type exactly once, in first-discovery order
    pub alternatives: Vec<Alternative>,
}

impl CostComparison {
    /// Builds the comparison table from the chosen (type, cost) entry and
    /// the candidates indexed for the same relation or predicate.
    /// Candidates that report no cost are ignored; cheaper same-type
    /// candidates lower the table entry, never raise it.
    pub fn build(chosen_type: &str, chosen_cost: f64, candidates: &[PlanNode]) -> Self {
        let mut table: Vec<(String, f64)> = Vec::new();

        for candidate in candidates {
            let cost = match candidate.total_cost() {
                Some(c) => c,
                None => continue,
            };
            match table
                .iter_mut()
                .find(|(ty, _)| ty.as_str() == candidate.node_type())
            {
                Some((_, best)) => {
                    if cost < *best {
                        *best = cost;
                    }
                }
                None => table.push((candidate.node_type().to_string(), cost)),
            }
        }

        // The chosen entry overrides any candidate of the same type, and is
        // inserted even when no candidate carried it, so the denominator
        // entry always exists.
        match table.iter_mut().find(|(ty, _)| ty.as_str() == chosen_type) {
            Some((_, best)) => *best = chosen_cost,
            None => table.push((chosen_type.to_string(), chosen_cost)),
        }

        let alternatives = table
            .into_iter()
            .filter(|(ty, _)| ty.as_str() != chosen_type)
            .map(|(node_type, cost)| Alternative {
                node_type,
                cost,
                ratio: ratio_of(cost, chosen_cost),
            })
            .collect();

        Self {
            chosen_type: chosen_type.to_string(),
            chosen_cost,
            alternatives,
        }
    }

    /// True when at least one competing strategy was indexed
    pub fn has_alternatives(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

/// Guarded ratio: undefined against a zero (or degenerate) chosen cost
fn ratio_of(cost: f64, chosen_cost: f64) -> Option<f64> {
    if chosen_cost == 0.0 {
        return None;
    }
    let ratio = cost / chosen_cost;
    if ratio.is_finite() {
        Some(ratio)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::keys;

    fn candidate(node_type: &str, cost: f64) -> PlanNode {
        PlanNode::new(node_type).with_attr(keys::TOTAL_COST, cost)
    }

    #[test]
    fn test_ratio_against_single_competitor() {
        let candidates = vec![candidate("Index Scan", 480.0)];
        let cmp = CostComparison::build("Seq Scan", 120.0, &candidates);

        assert_eq!(cmp.alternatives.len(), 1);
        let alt = &cmp.alternatives[0];
        assert_eq!(alt.node_type, "Index Scan");
        assert_eq!(alt.cost, 480.0);
        assert_eq!(format!("{:.3}", alt.ratio.unwrap()), "4.000");
    }

    #[test]
    fn test_minimum_per_competing_type() {
        let candidates = vec![
            candidate("Index Scan", 480.0),
            candidate("Index Scan", 300.0),
            candidate("Index Scan", 350.0),
        ];
        let cmp = CostComparison::build("Seq Scan", 120.0, &candidates);

        assert_eq!(cmp.alternatives.len(), 1);
        assert_eq!(cmp.alternatives[0].cost, 300.0);
        assert_eq!(cmp.alternatives[0].ratio, Some(2.5));
    }

    #[test]
    fn test_every_competing_type_exactly_once_in_discovery_order() {
        let candidates = vec![
            candidate("Index Scan", 480.0),
            candidate("Bitmap Heap Scan", 200.0),
            candidate("Index Scan", 400.0),
            candidate("Tid Scan", 900.0),
        ];
        let cmp = CostComparison::build("Seq Scan", 120.0, &candidates);

        let types: Vec<&str> = cmp
            .alternatives
            .iter()
            .map(|a| a.node_type.as_str())
            .collect();
        assert_eq!(types, vec!["Index Scan", "Bitmap Heap Scan", "Tid Scan"]);
    }

    #[test]
    fn test_chosen_entry_overrides_same_type_candidate() {
        // An AQP estimated Seq Scan cheaper than the live plan did; the
        // live cost still wins and Seq Scan never competes with itself.
        let candidates = vec![candidate("Seq Scan", 90.0), candidate("Index Scan", 480.0)];
        let cmp = CostComparison::build("Seq Scan", 120.0, &candidates);

        assert_eq!(cmp.chosen_cost, 120.0);
        assert_eq!(cmp.alternatives.len(), 1);
        assert_eq!(cmp.alternatives[0].node_type, "Index Scan");
        assert_eq!(cmp.alternatives[0].ratio, Some(4.0));
    }

    #[test]
    fn test_chosen_type_absent_from_candidates() {
        let candidates = vec![candidate("Index Scan", 480.0)];
        let cmp = CostComparison::build("Bitmap Heap Scan", 240.0, &candidates);

        assert_eq!(cmp.alternatives.len(), 1);
        assert_eq!(cmp.alternatives[0].ratio, Some(2.0));
    }

    #[test]
    fn test_zero_chosen_cost_yields_undefined_ratio() {
        let candidates = vec![candidate("Index Scan", 480.0)];
        let cmp = CostComparison::build("Seq Scan", 0.0, &candidates);

        assert_eq!(cmp.alternatives.len(), 1);
        assert_eq!(cmp.alternatives[0].cost, 480.0);
        assert_eq!(cmp.alternatives[0].ratio, None);
    }

    #[test]
    fn test_costless_candidates_ignored() {
        let candidates = vec![
            PlanNode::new("Index Scan"),
            candidate("Bitmap Heap Scan", 200.0),
        ];
        let cmp = CostComparison::build("Seq Scan", 100.0, &candidates);

        assert_eq!(cmp.alternatives.len(), 1);
        assert_eq!(cmp.alternatives[0].node_type, "Bitmap Heap Scan");
    }

    #[test]
    fn test_no_candidates_no_alternatives() {
        let cmp = CostComparison::build("Seq Scan", 100.0, &[]);
        assert!(!cmp.has_alternatives());
    }
}
