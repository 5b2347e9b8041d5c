//! Carbon-aware workload placement for the U-Engine ecosystem.
//!
//! Decides how many instances of each task type run at each site in each
//! time period, and how each unit of demand is routed to a serving site,
//! minimizing total carbon-weighted compute under hardware capacity and
//! latency feasibility. Periods are independent: the formulation is
//! time-expanded, with no migration cost or carry-over state.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Site`, `TaskType`, `PlacementConfig`,
//!   `PlacementPlan`, `FlowAssignment`
//! - **`validation`**: Input integrity checks (duplicate names, unknown
//!   site/task references, missing periods, value ranges)
//! - **`network`**: `NetworkModel` — validated, name-indexed problem
//!   instance built once per optimization call
//! - **`greedy`**: Deterministic per-period heuristic placement + routing
//! - **`milp`**: Time-expanded MILP formulation and solution decoding
//! - **`solver`**: Pluggable solver capability with enumerated outcomes
//! - **`optimizer`**: Orchestration (exact path, greedy fallback) and KPIs
//!
//! # Architecture
//!
//! Both algorithm paths consume the same `NetworkModel` and produce the
//! same `PlacementPlan`; the orchestrator tags every result with the
//! method that actually produced it. A missing solver is ordinary runtime
//! configuration, not an error.
//!
//! # References
//!
//! - Radovanović et al. (2023), "Carbon-Aware Computing for Datacenters"
//! - Wolsey (1998), "Integer Programming"

pub mod greedy;
pub mod milp;
pub mod models;
pub mod network;
pub mod optimizer;
pub mod solver;
pub mod validation;

/// Loads below this magnitude are treated as zero throughout the engine.
pub const LOAD_EPSILON: f64 = 1e-9;
