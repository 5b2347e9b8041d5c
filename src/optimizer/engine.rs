//! Placement optimizer: exact path with deterministic greedy fallback.
//!
//! # Control flow
//!
//! 1. Build the `NetworkModel`. Configuration errors propagate
//!    immediately and are never retried.
//! 2. With a solver present, formulate and solve the time-expanded MILP
//!    under a wall-clock limit. `Optimal`/`Feasible` outcomes are decoded
//!    and tagged `method="MILP"`.
//! 3. Any other outcome (infeasible, timeout, error) triggers the greedy
//!    allocator, tagged `method="greedy-fallback"` with the original
//!    failure retained in `error`/`detail`.
//! 4. With no solver capability at all, the greedy path runs directly,
//!    tagged `method="greedy"`.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::greedy::GreedyAllocator;
use crate::milp::PlacementMilp;
use crate::models::{PlacementConfig, PlacementPlan};
use crate::network::NetworkModel;
use crate::solver::{self, solve_with_timeout, MilpSolver};
use crate::validation::ConfigError;

/// Default wall-clock limit for one solver invocation.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Envelope status. Configuration errors are returned as `Err`, so a
/// produced envelope is always `ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// The optimization produced a plan.
    #[serde(rename = "ok")]
    Ok,
}

/// Which algorithm actually produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveMethod {
    /// Exact time-expanded MILP.
    #[serde(rename = "MILP")]
    Milp,
    /// Greedy path, chosen because no solver capability exists.
    #[serde(rename = "greedy")]
    Greedy,
    /// Greedy path, entered after an exact-path failure.
    #[serde(rename = "greedy-fallback")]
    GreedyFallback,
}

/// Uniform result envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// Envelope status.
    pub status: ResponseStatus,
    /// Algorithm that produced `result`.
    pub method: SolveMethod,
    /// The placement plan.
    pub result: PlacementPlan,
    /// Short description of the exact-path failure, on fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Backend diagnostic detail, on fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Carbon-aware placement optimizer.
///
/// Each [`optimize`](Self::optimize) call is a pure function of its
/// input: the model is built once, both algorithm paths read it
/// immutably, and no state survives across calls.
#[derive(Clone)]
pub struct PlacementOptimizer {
    solver: Option<Arc<dyn MilpSolver>>,
    time_limit: Duration,
    capacity_aware_greedy: bool,
}

impl PlacementOptimizer {
    /// Creates an optimizer with the bundled solver capability, if any.
    pub fn new() -> Self {
        Self {
            solver: solver::default_solver(),
            time_limit: DEFAULT_TIME_LIMIT,
            capacity_aware_greedy: false,
        }
    }

    /// Replaces the solver capability.
    pub fn with_solver(mut self, solver: Arc<dyn MilpSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Removes the solver capability; every call takes the greedy path.
    pub fn without_solver(mut self) -> Self {
        self.solver = None;
        self
    }

    /// Sets the wall-clock limit for one solver invocation.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Makes the greedy placement pass respect hardware capacity.
    pub fn with_capacity_aware_greedy(mut self, capacity_aware: bool) -> Self {
        self.capacity_aware_greedy = capacity_aware;
        self
    }

    /// Runs one optimization.
    ///
    /// Configuration errors propagate as `Err` and never trigger the
    /// fallback; every other failure mode yields an `ok` envelope whose
    /// `method` states which algorithm produced the plan.
    pub fn optimize(&self, config: &PlacementConfig) -> Result<OptimizeResponse, Vec<ConfigError>> {
        let model = NetworkModel::from_config(config)?;

        let Some(milp_solver) = &self.solver else {
            return Ok(Self::envelope(
                SolveMethod::Greedy,
                self.run_greedy(&model),
                None,
                None,
            ));
        };

        let formulation = PlacementMilp::new(&model);
        let problem = formulation.build();
        let outcome = solve_with_timeout(Arc::clone(milp_solver), &problem, self.time_limit);

        if outcome.is_usable() {
            Ok(Self::envelope(
                SolveMethod::Milp,
                formulation.decode(&outcome.values),
                None,
                None,
            ))
        } else {
            Ok(Self::envelope(
                SolveMethod::GreedyFallback,
                self.run_greedy(&model),
                Some(format!("solver status: {}", outcome.status)),
                outcome.detail,
            ))
        }
    }

    fn run_greedy(&self, model: &NetworkModel) -> PlacementPlan {
        GreedyAllocator::new()
            .with_capacity_awareness(self.capacity_aware_greedy)
            .allocate(model)
    }

    fn envelope(
        method: SolveMethod,
        result: PlacementPlan,
        error: Option<String>,
        detail: Option<String>,
    ) -> OptimizeResponse {
        OptimizeResponse {
            status: ResponseStatus::Ok,
            method,
            result,
            error,
            detail,
        }
    }
}

impl Default for PlacementOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlacementOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementOptimizer")
            .field("solver", &self.solver.as_ref().map(|s| s.name()))
            .field("time_limit", &self.time_limit)
            .field("capacity_aware_greedy", &self.capacity_aware_greedy)
            .finish()
    }
}
