//! Analysis driver
//!
//! Runs the whole pipeline against one session: the chosen plan first,
//! then a sweep over every switch vector for alternatives, indexing and
//! deduplicating as it goes, then a best-effort restore of the session
//! switches. Everything is synchronous; one statement in flight at a
//! time on one connection.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::annotate::{annotate_plan, Annotation};
use crate::index::PlanIndex;
use crate::plan::{PlanNode, PlanSummary, TreeMetrics};
use crate::switches::SwitchVector;

use super::errors::ExplainError;
use super::source::{PlanSource, QueryError};

/// Sweep tuning
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Stop collecting alternatives once this much wall time has passed.
    /// The chosen plan and everything collected so far are kept.
    pub deadline: Option<Duration>,
}

/// What a sweep did, for observability and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    /// Switch vectors attempted
    pub vectors: u32,
    /// Plans obtained from the source
    pub collected: u32,
    /// Structurally new plans kept
    pub distinct: u32,
    /// Plans dropped as duplicates of the chosen plan or an earlier one
    pub duplicates: u32,
    /// Vectors dropped because the source reported an error or an empty
    /// plan
    pub skipped: u32,
    /// True when the deadline cut the sweep short
    pub deadline_expired: bool,
}

/// Outcome of a full analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The chosen plan
    pub qep: PlanNode,
    /// Scan and join candidates collected across the sweep
    pub index: PlanIndex,
    /// Sweep statistics
    pub report: SweepReport,
}

impl Analysis {
    /// Annotations for the chosen plan, parents before children
    pub fn annotations(&self) -> Vec<Annotation> {
        annotate_plan(&self.qep, &self.index)
    }

    /// Shape of the chosen plan
    pub fn metrics(&self) -> TreeMetrics {
        TreeMetrics::measure(&self.qep)
    }

    /// Aggregates over the chosen plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::summarize(&self.qep)
    }
}

/// Drives a full analysis against one plan source.
pub struct Explainer<'a, S: PlanSource> {
    source: &'a mut S,
    options: SweepOptions,
}

impl<'a, S: PlanSource> Explainer<'a, S> {
    /// Creates an explainer with default options
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            options: SweepOptions::default(),
        }
    }

    /// Creates an explainer with explicit sweep options
    pub fn with_options(source: &'a mut S, options: SweepOptions) -> Self {
        Self { source, options }
    }

    /// Analyzes one statement end to end.
    ///
    /// The chosen plan is obtained with every switch enabled; if that
    /// fails there is nothing to compare against and the run fails.
    /// Every per-vector failure afterwards is counted and skipped.
    pub fn analyze(&mut self, statement: &str) -> Result<Analysis, ExplainError> {
        // 1. Chosen plan under the all-enabled configuration
        self.source.apply_switches(SwitchVector::ALL_ON)?;
        let qep = self.source.explain(statement)?;
        if qep.is_empty() {
            return Err(ExplainError::EmptyPlan);
        }

        // 2. The chosen plan participates in the comparison tables, and
        // its shape seeds the duplicate filter so the all-on vector does
        // not re-enter as an alternative
        let mut index = PlanIndex::new();
        index.index_plan(&qep);
        let mut seen = HashSet::new();
        seen.insert(qep.tree_fingerprint());

        // 3. Sweep every switch vector for alternatives
        let report = self.sweep(statement, &mut index, &mut seen);

        // 4. Leave the session the way we found it; the analysis stands
        // even when the restore fails
        if let Err(err) = self.source.apply_switches(SwitchVector::ALL_ON) {
            log::error!("could not restore planner switches: {}", err);
        }

        log::info!(
            "analysis complete: {} vectors attempted, {} distinct alternatives, {} skipped",
            report.vectors,
            report.distinct,
            report.skipped
        );

        Ok(Analysis { qep, index, report })
    }

    fn sweep(
        &mut self,
        statement: &str,
        index: &mut PlanIndex,
        seen: &mut HashSet<String>,
    ) -> SweepReport {
        let mut report = SweepReport::default();
        let started = Instant::now();

        for vector in SwitchVector::enumerate() {
            if let Some(deadline) = self.options.deadline {
                if started.elapsed() >= deadline {
                    report.deadline_expired = true;
                    log::warn!("sweep deadline reached after {} vectors", report.vectors);
                    break;
                }
            }
            report.vectors += 1;

            let plan = match self.acquire(statement, vector) {
                Ok(plan) => plan,
                Err(err) => {
                    report.skipped += 1;
                    log::debug!("vector {} skipped: {}", vector, err);
                    continue;
                }
            };
            if plan.is_empty() {
                report.skipped += 1;
                log::debug!("vector {} returned an empty plan", vector);
                continue;
            }
            report.collected += 1;

            if seen.insert(plan.tree_fingerprint()) {
                report.distinct += 1;
                index.index_plan(&plan);
            } else {
                report.duplicates += 1;
            }
        }
        report
    }

    fn acquire(
        &mut self,
        statement: &str,
        vector: SwitchVector,
    ) -> Result<PlanNode, QueryError> {
        self.source.apply_switches(vector)?;
        self.source.explain(statement)
    }
}
