//! Time-expanded MILP formulation of carbon-aware placement.
//!
//! Builds one mixed-integer program over all periods; because no
//! constraint couples periods, the program is a concatenation of
//! structurally identical per-period subproblems.
//!
//! # Decision variables (per period `h`)
//!
//! - `n(a,v,h)` — integer ≥ 0, instances of task `a` placed at site `v`
//! - `b(a,s,d,h)` — real ≥ 0, load of task `a` routed from `s` to `d`
//! - `m(a,s,d,h)` — integer ≥ 0, instance count attributed to that route
//!   (decouples routing capacity from placement for latency derating)
//!
//! # Objective
//!
//! Minimize Σ `n·Ca·Pa·Iv` (carbon-weighted compute).
//!
//! # Constraints (per period)
//!
//! - hardware capacity per site: Σ_a `n·Ca` ≤ `Hv`
//! - demand coverage per (source, task): Σ_d `b` = demand (hard equality;
//!   a network-wide shortfall makes the program infeasible by design)
//! - latency-derated route throughput: with slack = `Ta − delay − tap`,
//!   a route with slack ≤ 0 (or derated throughput `Ua − 1/slack` < 0)
//!   carries no flow; otherwise `b ≤ (Ua − 1/slack)·m`
//! - instance sanity per route: `Ua·m ≥ b`
//! - instance accounting per (dest, task): Σ_s `Ua·m` = `Ua·n`
//!
//! # Reference
//! Wolsey (1998), "Integer Programming"

mod problem;

pub use problem::{Comparison, LinearConstraint, MilpProblem, VarKind};

use crate::models::{FlowAssignment, PlacementPlan};
use crate::network::NetworkModel;
use crate::LOAD_EPSILON;

// Guards 1/slack for vanishingly small positive slack.
const MIN_SLACK_MS: f64 = 1e-6;

/// Builds the time-expanded placement MILP and decodes its solutions.
pub struct PlacementMilp<'a> {
    model: &'a NetworkModel,
}

impl<'a> PlacementMilp<'a> {
    /// Creates a formulator over a validated model.
    pub fn new(model: &'a NetworkModel) -> Self {
        Self { model }
    }

    /// Index of the placement variable `n(a,v,h)`.
    pub fn n_var(&self, a: usize, v: usize, h: usize) -> usize {
        let (vc, tc) = (self.model.site_count(), self.model.task_count());
        (h * vc + v) * tc + a
    }

    /// Index of the routed-load variable `b(a,s,d,h)`.
    pub fn b_var(&self, a: usize, s: usize, d: usize, h: usize) -> usize {
        let (vc, tc) = (self.model.site_count(), self.model.task_count());
        let n_block = self.model.periods() * vc * tc;
        n_block + ((h * vc + s) * vc + d) * tc + a
    }

    /// Index of the route instance-count variable `m(a,s,d,h)`.
    pub fn m_var(&self, a: usize, s: usize, d: usize, h: usize) -> usize {
        let (vc, tc) = (self.model.site_count(), self.model.task_count());
        let b_block = self.model.periods() * vc * vc * tc;
        self.b_var(a, s, d, h) + b_block
    }

    /// Builds the full multi-period problem.
    pub fn build(&self) -> MilpProblem {
        let model = self.model;
        let (periods, vc, tc) = (model.periods(), model.site_count(), model.task_count());
        let mut problem = MilpProblem::new();

        // Variables, in the index order the accessors assume.
        for h in 0..periods {
            for v in 0..vc {
                for a in 0..tc {
                    problem.add_integer(format!(
                        "n_{}_{}_{}",
                        model.task(a).name,
                        model.site(v).name,
                        h
                    ));
                }
            }
        }
        for h in 0..periods {
            for s in 0..vc {
                for d in 0..vc {
                    for a in 0..tc {
                        problem.add_continuous(format!(
                            "b_{}_{}_{}_{}",
                            model.task(a).name,
                            model.site(s).name,
                            model.site(d).name,
                            h
                        ));
                    }
                }
            }
        }
        for h in 0..periods {
            for s in 0..vc {
                for d in 0..vc {
                    for a in 0..tc {
                        problem.add_integer(format!(
                            "m_{}_{}_{}_{}",
                            model.task(a).name,
                            model.site(s).name,
                            model.site(d).name,
                            h
                        ));
                    }
                }
            }
        }

        // Objective: carbon-weighted compute of placed instances.
        for h in 0..periods {
            for v in 0..vc {
                for a in 0..tc {
                    let task = model.task(a);
                    let coefficient =
                        task.compute_footprint * task.carbon_weight * model.site(v).carbon_intensity;
                    problem.add_objective_term(self.n_var(a, v, h), coefficient);
                }
            }
        }

        for h in 0..periods {
            // Hardware capacity per site.
            for v in 0..vc {
                let terms = (0..tc)
                    .map(|a| (self.n_var(a, v, h), model.task(a).compute_footprint))
                    .collect();
                problem.add_constraint(LinearConstraint::less_eq(
                    terms,
                    model.site(v).hardware_capacity,
                ));
            }

            // Demand coverage per (source, task): hard equality.
            for s in 0..vc {
                for a in 0..tc {
                    let terms = (0..vc).map(|d| (self.b_var(a, s, d, h), 1.0)).collect();
                    problem.add_constraint(LinearConstraint::eq(terms, model.demand(h, s, a)));
                }
            }

            // Route throughput (latency-derated) and instance sanity.
            for s in 0..vc {
                for d in 0..vc {
                    for a in 0..tc {
                        let task = model.task(a);
                        let b = self.b_var(a, s, d, h);
                        let m = self.m_var(a, s, d, h);

                        let slack = task.latency_slack_ms(model.delay_ms(s, d));
                        if slack <= 0.0 {
                            problem.add_constraint(LinearConstraint::less_eq(vec![(b, 1.0)], 0.0));
                        } else {
                            let derated = task.throughput_per_instance
                                - 1.0 / slack.max(MIN_SLACK_MS);
                            if derated < 0.0 {
                                problem.add_constraint(LinearConstraint::less_eq(
                                    vec![(b, 1.0)],
                                    0.0,
                                ));
                            } else {
                                problem.add_constraint(LinearConstraint::less_eq(
                                    vec![(b, 1.0), (m, -derated)],
                                    0.0,
                                ));
                            }
                        }

                        problem.add_constraint(LinearConstraint::greater_eq(
                            vec![(m, task.throughput_per_instance), (b, -1.0)],
                            0.0,
                        ));
                    }
                }
            }

            // Instance accounting per (dest, task): placed instances are
            // fully claimed by the routes terminating there.
            for d in 0..vc {
                for a in 0..tc {
                    let ua = model.task(a).throughput_per_instance;
                    let mut terms: Vec<(usize, f64)> =
                        (0..vc).map(|s| (self.m_var(a, s, d, h), ua)).collect();
                    terms.push((self.n_var(a, d, h), -ua));
                    problem.add_constraint(LinearConstraint::eq(terms, 0.0));
                }
            }
        }

        problem
    }

    /// Decodes solver variable values into a placement plan.
    ///
    /// Placement counts are rounded to the nearest integer to absorb
    /// solver numerical noise; flows below the load epsilon are dropped.
    pub fn decode(&self, values: &[f64]) -> PlacementPlan {
        let model = self.model;
        let mut plan = PlacementPlan::new();

        for h in 0..model.periods() {
            for v in 0..model.site_count() {
                for a in 0..model.task_count() {
                    let count = values[self.n_var(a, v, h)].round().max(0.0) as u32;
                    plan.set_placement(h, &model.site(v).name, &model.task(a).name, count);
                }
            }
            for s in 0..model.site_count() {
                for d in 0..model.site_count() {
                    for a in 0..model.task_count() {
                        let load = values[self.b_var(a, s, d, h)];
                        if load > LOAD_EPSILON {
                            let route_instances =
                                values[self.m_var(a, s, d, h)].round().max(0.0) as u32;
                            plan.add_assignment(
                                FlowAssignment::new(
                                    h,
                                    &model.task(a).name,
                                    &model.site(s).name,
                                    &model.site(d).name,
                                    load,
                                )
                                .with_instances(route_instances),
                            );
                        }
                    }
                }
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlacementConfig, Site, TaskType};

    fn two_site_model() -> NetworkModel {
        let config = PlacementConfig::new()
            .with_sites(vec![
                Site::new("A", 0.01, 1000.0),
                Site::new("B", 0.5, 2000.0),
            ])
            .with_tasks(vec![TaskType::new("t", 100.0)
                .with_latency(500.0, 40.0)
                .with_footprint(2.0)
                .with_carbon_weight(0.8)])
            .with_delay_entry("A", "B", 10.0)
            .with_delay_entry("B", "A", 10.0)
            .with_demand_entry(0, "A", "t", 50.0)
            .with_demand_entry(0, "B", "t", 70.0)
            .with_duration(1);
        NetworkModel::from_config(&config).unwrap()
    }

    #[test]
    fn test_variable_layout() {
        let model = two_site_model();
        let milp = PlacementMilp::new(&model);
        let problem = milp.build();

        // n: 1·2·1, b and m: 1·2·2·1 each.
        assert_eq!(problem.var_count(), 2 + 4 + 4);
        assert_eq!(problem.var_kinds()[milp.n_var(0, 0, 0)], VarKind::Integer);
        assert_eq!(
            problem.var_kinds()[milp.b_var(0, 0, 1, 0)],
            VarKind::Continuous
        );
        assert_eq!(problem.var_kinds()[milp.m_var(0, 1, 0, 0)], VarKind::Integer);
        assert_eq!(problem.var_name(milp.n_var(0, 1, 0)), "n_t_B_0");
        assert_eq!(problem.var_name(milp.b_var(0, 0, 1, 0)), "b_t_A_B_0");
    }

    #[test]
    fn test_constraint_count() {
        let model = two_site_model();
        let problem = PlacementMilp::new(&model).build();

        // capacity 2 + coverage 2 + (route bound + sanity) 2·4 + accounting 2
        assert_eq!(problem.constraints().len(), 2 + 2 + 8 + 2);
    }

    #[test]
    fn test_objective_coefficients() {
        let model = two_site_model();
        let milp = PlacementMilp::new(&model);
        let problem = milp.build();

        // Ca·Pa·Iv for site A: 2.0 · 0.8 · 0.01
        let n_a = milp.n_var(0, 0, 0);
        let coefficient = problem
            .objective()
            .iter()
            .find(|(var, _)| *var == n_a)
            .map(|(_, c)| *c)
            .unwrap();
        assert!((coefficient - 0.016).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_constraint_shape() {
        let model = two_site_model();
        let milp = PlacementMilp::new(&model);
        let problem = milp.build();

        let capacity = &problem.constraints()[0]; // Site A, period 0
        assert_eq!(capacity.comparison, Comparison::LessEq);
        assert_eq!(capacity.terms, vec![(milp.n_var(0, 0, 0), 2.0)]);
        assert!((capacity.rhs - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_coverage_is_hard_equality() {
        let model = two_site_model();
        let milp = PlacementMilp::new(&model);
        let problem = milp.build();

        let coverage: Vec<_> = problem
            .constraints()
            .iter()
            .filter(|c| {
                c.comparison == Comparison::Eq
                    && c.terms
                        .iter()
                        .all(|(var, coef)| *var >= milp.b_var(0, 0, 0, 0) && *coef == 1.0)
            })
            .collect();
        assert_eq!(coverage.len(), 2);
        assert!((coverage[0].rhs - 50.0).abs() < 1e-10);
        assert!((coverage[1].rhs - 70.0).abs() < 1e-10);
    }

    #[test]
    fn test_feasible_route_is_derated() {
        let model = two_site_model();
        let milp = PlacementMilp::new(&model);
        let problem = milp.build();

        // A→B: slack = 500 − 10 − 40 = 450, derated = 100 − 1/450.
        let b = milp.b_var(0, 0, 1, 0);
        let m = milp.m_var(0, 0, 1, 0);
        let derated = 100.0 - 1.0 / 450.0;
        let bound = problem
            .constraints()
            .iter()
            .find(|c| c.comparison == Comparison::LessEq && c.terms.first() == Some(&(b, 1.0)))
            .unwrap();
        assert_eq!(bound.terms.len(), 2);
        assert_eq!(bound.terms[1].0, m);
        assert!((bound.terms[1].1 + derated).abs() < 1e-10);
        assert!((bound.rhs - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_latency_infeasible_route_forced_to_zero() {
        // delay 1000, overhead 40, budget 500 → slack < 0 on every
        // cross-site route in every period.
        let config = PlacementConfig::new()
            .with_sites(vec![Site::new("A", 0.1, 100.0), Site::new("B", 0.2, 100.0)])
            .with_tasks(vec![TaskType::new("t", 100.0).with_latency(500.0, 40.0)])
            .with_delay_entry("A", "B", 1000.0)
            .with_delay_entry("B", "A", 1000.0)
            .with_demand_entry(0, "A", "t", 10.0)
            .with_demand_entry(1, "A", "t", 10.0)
            .with_duration(2);
        let model = NetworkModel::from_config(&config).unwrap();
        let milp = PlacementMilp::new(&model);
        let problem = milp.build();

        for h in 0..2 {
            for (s, d) in [(0, 1), (1, 0)] {
                let b = milp.b_var(0, s, d, h);
                let forced = problem.constraints().iter().any(|c| {
                    c.comparison == Comparison::LessEq
                        && c.terms == vec![(b, 1.0)]
                        && c.rhs == 0.0
                });
                assert!(forced, "route {s}→{d} in period {h} not forced to zero");
            }
        }
    }

    #[test]
    fn test_instance_accounting_constraint() {
        let model = two_site_model();
        let milp = PlacementMilp::new(&model);
        let problem = milp.build();

        // For dest A: 100·m(A→A) + 100·m(B→A) − 100·n(A) = 0
        let expected = vec![
            (milp.m_var(0, 0, 0, 0), 100.0),
            (milp.m_var(0, 1, 0, 0), 100.0),
            (milp.n_var(0, 0, 0), -100.0),
        ];
        assert!(problem
            .constraints()
            .iter()
            .any(|c| c.comparison == Comparison::Eq && c.terms == expected && c.rhs == 0.0));
    }

    #[test]
    fn test_decode_rounds_and_filters() {
        let model = two_site_model();
        let milp = PlacementMilp::new(&model);
        let problem = milp.build();

        let mut values = vec![0.0; problem.var_count()];
        values[milp.n_var(0, 0, 0)] = 0.9999999; // Rounds to 1
        values[milp.b_var(0, 0, 0, 0)] = 50.0;
        values[milp.m_var(0, 0, 0, 0)] = 1.0000001;
        values[milp.b_var(0, 1, 0, 0)] = 1e-12; // Below epsilon: dropped

        let plan = milp.decode(&values);
        assert_eq!(plan.placement(0, "A", "t"), 1);
        assert_eq!(plan.placement(0, "B", "t"), 0);

        let flows = plan.assignments_for(0);
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].source, "A");
        assert_eq!(flows[0].dest, "A");
        assert_eq!(flows[0].instances, Some(1));
    }
}
