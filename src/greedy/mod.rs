//! Deterministic greedy placement and routing.
//!
//! # Algorithm (per period, periods are independent)
//!
//! 1. **Placement pass**: at every site, place
//!    `ceil(local demand / throughput)` instances of each task type.
//!    This pass is demand-driven and by default does not check hardware
//!    capacity — a documented simplification, opt out with
//!    [`GreedyAllocator::with_capacity_awareness`].
//! 2. **Assignment pass**: per source and task, in catalog enumeration
//!    order, serve demand locally first; spill any remainder to other
//!    sites ranked by ascending carbon intensity (greenest first, stable
//!    on ties), up to each destination's unclaimed placed throughput.
//!
//! Latency budgets are *not* enforced on this path; only the exact MILP
//! path derates routes by latency slack.
//!
//! # Complexity
//! O(T · V² · A) for T periods, V sites, A task types.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 16 (Greedy Algorithms)

use crate::models::{FlowAssignment, PlacementPlan};
use crate::network::NetworkModel;
use crate::LOAD_EPSILON;

/// Deterministic per-period heuristic allocator.
///
/// Produces the same output for the same input regardless of call order
/// or environment; it never fails, and when reachable capacity cannot
/// absorb all demand (capacity-aware mode) it under-serves gracefully.
#[derive(Debug, Clone, Default)]
pub struct GreedyAllocator {
    capacity_aware: bool,
}

impl GreedyAllocator {
    /// Creates an allocator with the default capacity-unaware placement pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opts into clamping the placement pass at each site's remaining
    /// hardware capacity. This can leave demand unserved when the
    /// network cannot absorb it.
    pub fn with_capacity_awareness(mut self, capacity_aware: bool) -> Self {
        self.capacity_aware = capacity_aware;
        self
    }

    /// Computes placements and demand routing for all periods.
    pub fn allocate(&self, model: &NetworkModel) -> PlacementPlan {
        let mut plan = PlacementPlan::new();
        for period in 0..model.periods() {
            self.place_period(model, period, &mut plan);
            self.assign_period(model, period, &mut plan);
        }
        plan
    }

    /// Placement pass: demand-driven instance counts per (site, task).
    fn place_period(&self, model: &NetworkModel, period: usize, plan: &mut PlacementPlan) {
        for v in 0..model.site_count() {
            let mut remaining_capacity = model.site(v).hardware_capacity;
            for a in 0..model.task_count() {
                let task = model.task(a);
                let demand = model.demand(period, v, a);
                let mut instances = if demand <= LOAD_EPSILON {
                    0
                } else {
                    (demand / task.throughput_per_instance).ceil() as u32
                };
                if self.capacity_aware && task.compute_footprint > 0.0 {
                    let fit = (remaining_capacity / task.compute_footprint).floor().max(0.0);
                    instances = instances.min(fit as u32);
                    remaining_capacity -= f64::from(instances) * task.compute_footprint;
                }
                plan.set_placement(period, &model.site(v).name, &task.name, instances);
            }
        }
    }

    /// Assignment pass: local first, then greenest destinations.
    fn assign_period(&self, model: &NetworkModel, period: usize, plan: &mut PlacementPlan) {
        for s in 0..model.site_count() {
            for a in 0..model.task_count() {
                let task = model.task(a);
                let source = &model.site(s).name;
                let mut remaining = model.demand(period, s, a);
                if remaining <= LOAD_EPSILON {
                    continue;
                }

                let local_capacity = f64::from(plan.placement(period, source, &task.name))
                    * task.throughput_per_instance;
                let take = remaining.min(local_capacity);
                if take > LOAD_EPSILON {
                    plan.add_assignment(FlowAssignment::new(
                        period,
                        &task.name,
                        source.clone(),
                        source.clone(),
                        take,
                    ));
                    remaining -= take;
                }
                if remaining <= LOAD_EPSILON {
                    continue;
                }

                // Stable sort: equal intensities keep catalog order.
                let mut candidates: Vec<usize> =
                    (0..model.site_count()).filter(|&d| d != s).collect();
                candidates.sort_by(|&x, &y| {
                    model
                        .site(x)
                        .carbon_intensity
                        .total_cmp(&model.site(y).carbon_intensity)
                });

                for d in candidates {
                    let dest = &model.site(d).name;
                    let used = plan.routed_into(period, dest, &task.name);
                    let capacity_left = (f64::from(plan.placement(period, dest, &task.name))
                        * task.throughput_per_instance
                        - used)
                        .max(0.0);
                    let take = remaining.min(capacity_left);
                    if take > LOAD_EPSILON {
                        plan.add_assignment(FlowAssignment::new(
                            period,
                            &task.name,
                            source.clone(),
                            dest.clone(),
                            take,
                        ));
                        remaining -= take;
                    }
                    if remaining <= LOAD_EPSILON {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlacementConfig, Site, TaskType};

    fn model_from(config: PlacementConfig) -> NetworkModel {
        NetworkModel::from_config(&config).unwrap()
    }

    fn single_site_config() -> PlacementConfig {
        PlacementConfig::new()
            .with_sites(vec![Site::new("A", 0.1, 900.0)])
            .with_tasks(vec![TaskType::new("t", 500.0).with_latency(500.0, 40.0)])
            .with_delay(Default::default())
            .with_demand_entry(0, "A", "t", 100.0)
            .with_duration(1)
    }

    #[test]
    fn test_single_site_served_locally() {
        // demand 100, throughput 500 → 1 instance, all demand local.
        let model = model_from(single_site_config());
        let plan = GreedyAllocator::new().allocate(&model);

        assert_eq!(plan.placement(0, "A", "t"), 1);
        let flows = plan.assignments_for(0);
        assert_eq!(flows.len(), 1);
        assert!(flows[0].is_local());
        assert!((flows[0].load - 100.0).abs() < 1e-10);
        assert!(flows[0].instances.is_none());
    }

    #[test]
    fn test_zero_demand_zero_placement() {
        let config = single_site_config().with_demand_entry(0, "A", "t", 0.0);
        let model = model_from(config);
        let plan = GreedyAllocator::new().allocate(&model);

        assert_eq!(plan.placement(0, "A", "t"), 0);
        assert!(plan.assignments_for(0).is_empty());
    }

    #[test]
    fn test_locality_bias_ignores_greener_site() {
        // B covers its own demand locally even though A is far greener.
        let config = PlacementConfig::new()
            .with_sites(vec![
                Site::new("A", 0.01, 10_000.0),
                Site::new("B", 0.5, 10_000.0),
            ])
            .with_tasks(vec![TaskType::new("t", 100.0)])
            .with_delay_entry("A", "B", 10.0)
            .with_delay_entry("B", "A", 10.0)
            .with_demand_entry(0, "B", "t", 1000.0)
            .with_duration(1);
        let model = model_from(config);
        let plan = GreedyAllocator::new().allocate(&model);

        assert_eq!(plan.placement(0, "B", "t"), 10);
        assert_eq!(plan.placement(0, "A", "t"), 0);
        assert!(plan.assignments_for(0).iter().all(|f| f.is_local()));
        assert!((plan.routed_from(0, "B", "t") - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_capacity_unaware_placement_can_exceed_hardware() {
        // 10 instances × footprint 10 = 100 > capacity 5. The default
        // placement pass does not look at hardware capacity.
        let config = PlacementConfig::new()
            .with_sites(vec![Site::new("A", 0.1, 5.0)])
            .with_tasks(vec![TaskType::new("t", 100.0).with_footprint(10.0)])
            .with_delay(Default::default())
            .with_demand_entry(0, "A", "t", 1000.0)
            .with_duration(1);
        let model = model_from(config);
        let plan = GreedyAllocator::new().allocate(&model);

        assert_eq!(plan.placement(0, "A", "t"), 10);
        let used = 10.0 * 10.0;
        assert!(used > model.site(0).hardware_capacity);
        // Demand is still fully covered.
        assert!((plan.routed_from(0, "A", "t") - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_capacity_aware_spills_to_other_sites() {
        // S has no capacity; G has one placed instance with 50 units of
        // headroom after its own demand. G is enumerated first so its
        // local demand claims the instance before S spills over.
        let config = PlacementConfig::new()
            .with_sites(vec![Site::new("G", 0.1, 100.0), Site::new("S", 0.5, 0.0)])
            .with_tasks(vec![TaskType::new("t", 100.0)])
            .with_delay_entry("S", "G", 10.0)
            .with_delay_entry("G", "S", 10.0)
            .with_demand_entry(0, "S", "t", 60.0)
            .with_demand_entry(0, "G", "t", 50.0)
            .with_duration(1);
        let model = model_from(config);
        let plan = GreedyAllocator::new()
            .with_capacity_awareness(true)
            .allocate(&model);

        assert_eq!(plan.placement(0, "S", "t"), 0);
        assert_eq!(plan.placement(0, "G", "t"), 1);

        let spilled: Vec<_> = plan
            .assignments_for(0)
            .iter()
            .filter(|f| f.source == "S")
            .collect();
        assert_eq!(spilled.len(), 1);
        assert_eq!(spilled[0].dest, "G");
        assert!((spilled[0].load - 50.0).abs() < 1e-10);
        // 10 units cannot be served anywhere: graceful under-service.
        assert!((plan.routed_from(0, "S", "t") - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_capacity_aware_spill_prefers_greenest() {
        // Both G1 and G2 have headroom 50 after serving their own demand;
        // G1 is greener and fills first. S is enumerated last.
        let config = PlacementConfig::new()
            .with_sites(vec![
                Site::new("G2", 0.2, 100.0),
                Site::new("G1", 0.1, 100.0),
                Site::new("S", 0.5, 0.0),
            ])
            .with_tasks(vec![TaskType::new("t", 100.0)])
            .with_delay_entry("S", "G1", 10.0)
            .with_delay_entry("S", "G2", 10.0)
            .with_delay_entry("G1", "S", 10.0)
            .with_delay_entry("G1", "G2", 10.0)
            .with_delay_entry("G2", "S", 10.0)
            .with_delay_entry("G2", "G1", 10.0)
            .with_demand_entry(0, "S", "t", 80.0)
            .with_demand_entry(0, "G1", "t", 50.0)
            .with_demand_entry(0, "G2", "t", 50.0)
            .with_duration(1);
        let model = model_from(config);
        let plan = GreedyAllocator::new()
            .with_capacity_awareness(true)
            .allocate(&model);

        let spilled: Vec<_> = plan
            .assignments_for(0)
            .iter()
            .filter(|f| f.source == "S")
            .collect();
        assert_eq!(spilled.len(), 2);
        assert_eq!(spilled[0].dest, "G1");
        assert!((spilled[0].load - 50.0).abs() < 1e-10);
        assert_eq!(spilled[1].dest, "G2");
        assert!((spilled[1].load - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_periods_independent() {
        let config = single_site_config()
            .with_demand_entry(0, "A", "t", 100.0)
            .with_demand_entry(1, "A", "t", 1200.0)
            .with_duration(2);
        let model = model_from(config);
        let plan = GreedyAllocator::new().allocate(&model);

        assert_eq!(plan.placement(0, "A", "t"), 1);
        assert_eq!(plan.placement(1, "A", "t"), 3);
        assert!((plan.routed_from(1, "A", "t") - 1200.0).abs() < 1e-10);
    }

    #[test]
    fn test_deterministic_repeat() {
        let model = model_from(PlacementConfig::new().with_duration(2));
        let allocator = GreedyAllocator::new();
        assert_eq!(allocator.allocate(&model), allocator.allocate(&model));
    }

    #[test]
    fn test_coverage_on_canonical_example() {
        let model = model_from(PlacementConfig::new().with_duration(3));
        let plan = GreedyAllocator::new().allocate(&model);

        for h in 0..model.periods() {
            for v in 0..model.site_count() {
                for a in 0..model.task_count() {
                    let demand = model.demand(h, v, a);
                    let served = plan.routed_from(h, &model.site(v).name, &model.task(a).name);
                    assert!(
                        (served - demand).abs() < 1e-9,
                        "uncovered demand at period {h}, site {v}, task {a}"
                    );
                }
            }
        }
    }
}
