//! Placement plan (solution) model.
//!
//! The output produced by both algorithm paths: per-period instance
//! placements and the list of routed demand flows. Maps are `BTreeMap`s
//! so identical inputs serialize to identical envelopes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One routed flow: `load` units of `task` demand originating at `source`
/// served by instances at `dest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowAssignment {
    /// Period index.
    pub period: usize,
    /// Task type name.
    pub task: String,
    /// Site where the demand originates.
    #[serde(rename = "src")]
    pub source: String,
    /// Site serving the demand.
    #[serde(rename = "dst")]
    pub dest: String,
    /// Routed load (demand units).
    pub load: f64,
    /// Instance count attributed to this route (exact path only).
    #[serde(rename = "m", default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
}

impl FlowAssignment {
    /// Creates a flow assignment.
    pub fn new(
        period: usize,
        task: impl Into<String>,
        source: impl Into<String>,
        dest: impl Into<String>,
        load: f64,
    ) -> Self {
        Self {
            period,
            task: task.into(),
            source: source.into(),
            dest: dest.into(),
            load,
            instances: None,
        }
    }

    /// Attaches a route-attributed instance count.
    pub fn with_instances(mut self, instances: u32) -> Self {
        self.instances = Some(instances);
        self
    }

    /// Whether the flow stays at its origin site.
    pub fn is_local(&self) -> bool {
        self.source == self.dest
    }
}

/// Per-period placement table: site → task → instance count.
pub type PlacementTable = BTreeMap<String, BTreeMap<String, u32>>;

/// Per-period placements and demand routing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementPlan {
    /// period → site → task → instance count.
    pub placements: BTreeMap<usize, PlacementTable>,
    /// period → routed flows.
    pub assignments: BTreeMap<usize, Vec<FlowAssignment>>,
}

impl PlacementPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the instance count for (period, site, task).
    pub fn set_placement(
        &mut self,
        period: usize,
        site: impl Into<String>,
        task: impl Into<String>,
        count: u32,
    ) {
        self.placements
            .entry(period)
            .or_default()
            .entry(site.into())
            .or_default()
            .insert(task.into(), count);
    }

    /// Instance count for (period, site, task); 0 if absent.
    pub fn placement(&self, period: usize, site: &str, task: &str) -> u32 {
        self.placements
            .get(&period)
            .and_then(|t| t.get(site))
            .and_then(|t| t.get(task))
            .copied()
            .unwrap_or(0)
    }

    /// Records a routed flow.
    pub fn add_assignment(&mut self, assignment: FlowAssignment) {
        self.assignments
            .entry(assignment.period)
            .or_default()
            .push(assignment);
    }

    /// Flows recorded for a period.
    pub fn assignments_for(&self, period: usize) -> &[FlowAssignment] {
        self.assignments
            .get(&period)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total load routed into `dest` for `task` in `period`.
    pub fn routed_into(&self, period: usize, dest: &str, task: &str) -> f64 {
        self.assignments_for(period)
            .iter()
            .filter(|f| f.dest == dest && f.task == task)
            .map(|f| f.load)
            .sum()
    }

    /// Total load routed away from `source` for `task` in `period`,
    /// including the local share.
    pub fn routed_from(&self, period: usize, source: &str, task: &str) -> f64 {
        self.assignments_for(period)
            .iter()
            .filter(|f| f.source == source && f.task == task)
            .map(|f| f.load)
            .sum()
    }

    /// Total number of recorded flows across all periods.
    pub fn assignment_count(&self) -> usize {
        self.assignments.values().map(Vec::len).sum()
    }
}
