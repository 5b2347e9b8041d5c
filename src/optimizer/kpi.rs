//! Plan quality diagnostics (KPIs).
//!
//! Computes post-hoc indicators from a placement plan and its model.
//! The exact path minimizes carbon cost by construction and the greedy
//! path does not, so these metrics are the uniform way to compare the
//! two.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Carbon cost | Σ placements · footprint · carbon weight · site intensity |
//! | Offered load | Σ configured demand |
//! | Served load | Σ routed flow loads |
//! | Unserved load | max(0, offered − served) |
//! | Capacity violations | (period, site) pairs where placements exceed hardware |

use serde::{Deserialize, Serialize};

use crate::models::PlacementPlan;
use crate::network::NetworkModel;
use crate::LOAD_EPSILON;

/// Placement plan performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanKpi {
    /// Carbon-weighted compute of all placed instances.
    pub carbon_cost: f64,
    /// Total configured demand across all periods.
    pub offered_load: f64,
    /// Total routed load across all periods.
    pub served_load: f64,
    /// Demand left unserved (greedy capacity-aware mode can under-serve).
    pub unserved_load: f64,
    /// Total placed instances across all periods.
    pub total_instances: u64,
    /// (period, site) pairs whose placements exceed hardware capacity.
    pub capacity_violations: Vec<(usize, String)>,
}

impl PlanKpi {
    /// Computes KPIs for a plan against its model.
    pub fn calculate(model: &NetworkModel, plan: &PlacementPlan) -> Self {
        let mut carbon_cost = 0.0;
        let mut offered_load = 0.0;
        let mut total_instances: u64 = 0;
        let mut capacity_violations = Vec::new();

        for h in 0..model.periods() {
            for v in 0..model.site_count() {
                let site = model.site(v);
                let mut used_capacity = 0.0;
                for a in 0..model.task_count() {
                    let task = model.task(a);
                    let count = plan.placement(h, &site.name, &task.name);
                    carbon_cost += f64::from(count)
                        * task.compute_footprint
                        * task.carbon_weight
                        * site.carbon_intensity;
                    used_capacity += f64::from(count) * task.compute_footprint;
                    total_instances += u64::from(count);
                    offered_load += model.demand(h, v, a);
                }
                if used_capacity > site.hardware_capacity + LOAD_EPSILON {
                    capacity_violations.push((h, site.name.clone()));
                }
            }
        }

        let served_load: f64 = plan
            .assignments
            .values()
            .flatten()
            .map(|flow| flow.load)
            .sum();

        Self {
            carbon_cost,
            offered_load,
            served_load,
            unserved_load: (offered_load - served_load).max(0.0),
            total_instances,
            capacity_violations,
        }
    }

    /// Whether every unit of offered demand was routed somewhere.
    pub fn fully_served(&self) -> bool {
        self.unserved_load <= LOAD_EPSILON
    }
}
