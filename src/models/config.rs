//! Raw optimization input.
//!
//! The shape handed over by the external config layer: optional site and
//! task catalogs, an inter-site delay matrix, period-by-period demand,
//! and a duration. Any absent required part causes the canonical built-in
//! example to be substituted wholesale (see `NetworkModel::from_config`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Site, TaskType};

/// Inter-site delay: source → destination → delay (ms).
///
/// Need not be symmetric. Self-delay defaults to 0 when absent.
pub type DelayMap = HashMap<String, HashMap<String, f64>>;

/// Demand: period index (stringified) → site → task → load.
///
/// A missing (site, task) entry within a present period means zero
/// demand; a missing period is a configuration error.
pub type DemandMap = HashMap<String, HashMap<String, HashMap<String, f64>>>;

/// Raw placement problem input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Site catalog.
    #[serde(default)]
    pub sites: Option<Vec<Site>>,
    /// Task type catalog.
    #[serde(default)]
    pub tasks: Option<Vec<TaskType>>,
    /// Inter-site network delay matrix.
    #[serde(default)]
    pub delay: Option<DelayMap>,
    /// Period-by-period demand.
    #[serde(default)]
    pub demand: Option<DemandMap>,
    /// Number of fixed-length periods to optimize.
    #[serde(default)]
    pub duration_periods: Option<usize>,
}

impl PlacementConfig {
    /// Creates an empty config (resolves to the canonical example).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the site catalog.
    pub fn with_sites(mut self, sites: Vec<Site>) -> Self {
        self.sites = Some(sites);
        self
    }

    /// Sets the task type catalog.
    pub fn with_tasks(mut self, tasks: Vec<TaskType>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Sets the delay matrix.
    pub fn with_delay(mut self, delay: DelayMap) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets one delay entry (ms).
    pub fn with_delay_entry(
        mut self,
        source: impl Into<String>,
        dest: impl Into<String>,
        delay_ms: f64,
    ) -> Self {
        self.delay
            .get_or_insert_with(HashMap::new)
            .entry(source.into())
            .or_default()
            .insert(dest.into(), delay_ms);
        self
    }

    /// Sets the demand map.
    pub fn with_demand(mut self, demand: DemandMap) -> Self {
        self.demand = Some(demand);
        self
    }

    /// Sets one demand entry.
    pub fn with_demand_entry(
        mut self,
        period: usize,
        site: impl Into<String>,
        task: impl Into<String>,
        load: f64,
    ) -> Self {
        self.demand
            .get_or_insert_with(HashMap::new)
            .entry(period.to_string())
            .or_default()
            .entry(site.into())
            .or_default()
            .insert(task.into(), load);
        self
    }

    /// Sets the optimization duration in periods.
    pub fn with_duration(mut self, periods: usize) -> Self {
        self.duration_periods = Some(periods);
        self
    }

    /// Whether all required parts are present.
    pub fn is_complete(&self) -> bool {
        self.sites.is_some() && self.tasks.is_some() && self.delay.is_some() && self.demand.is_some()
    }
}
