//! Task type model.
//!
//! A task type is a class of workload (e.g. an inference service) with a
//! latency budget, a per-instance resource footprint and throughput, and
//! a carbon weight applied to every capacity unit it consumes.

use serde::{Deserialize, Serialize};

/// A task type in the workload catalog.
///
/// One deployed *instance* of a task type consumes `compute_footprint`
/// capacity units at its site and serves up to `throughput_per_instance`
/// demand units per period. Accepts the terse config keys (`Ta`, `tap`,
/// `Ca`, `Ua`, `Pa`) on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskType {
    /// Unique task type name.
    pub name: String,
    /// Maximum acceptable end-to-end service time (ms).
    #[serde(alias = "Ta")]
    pub latency_budget_ms: f64,
    /// Fixed processing overhead per request (ms).
    #[serde(default, alias = "tap")]
    pub overhead_ms: f64,
    /// Compute capacity units consumed per instance.
    #[serde(alias = "Ca")]
    pub compute_footprint: f64,
    /// Demand units one instance serves per period. Must be positive.
    #[serde(alias = "Ua")]
    pub throughput_per_instance: f64,
    /// Carbon weight multiplier applied to consumed capacity.
    #[serde(alias = "Pa")]
    pub carbon_weight: f64,
}

impl TaskType {
    /// Creates a task type with the given per-instance throughput.
    ///
    /// Defaults: unlimited latency budget, zero overhead, footprint 1.0,
    /// carbon weight 1.0.
    pub fn new(name: impl Into<String>, throughput_per_instance: f64) -> Self {
        Self {
            name: name.into(),
            latency_budget_ms: f64::INFINITY,
            overhead_ms: 0.0,
            compute_footprint: 1.0,
            throughput_per_instance,
            carbon_weight: 1.0,
        }
    }

    /// Sets the latency budget and fixed overhead (ms).
    pub fn with_latency(mut self, budget_ms: f64, overhead_ms: f64) -> Self {
        self.latency_budget_ms = budget_ms;
        self.overhead_ms = overhead_ms;
        self
    }

    /// Sets the per-instance compute footprint.
    pub fn with_footprint(mut self, compute_footprint: f64) -> Self {
        self.compute_footprint = compute_footprint;
        self
    }

    /// Sets the carbon weight multiplier.
    pub fn with_carbon_weight(mut self, carbon_weight: f64) -> Self {
        self.carbon_weight = carbon_weight;
        self
    }

    /// Latency slack remaining after network delay and fixed overhead (ms).
    ///
    /// Non-positive slack means the route cannot serve this task type.
    pub fn latency_slack_ms(&self, delay_ms: f64) -> f64 {
        self.latency_budget_ms - delay_ms - self.overhead_ms
    }
}
