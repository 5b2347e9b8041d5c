//! Optimization orchestration.
//!
//! Drives the exact MILP path, branches on the enumerated solve outcome,
//! and falls back to the deterministic greedy allocator on any solve
//! failure. Also provides post-hoc plan diagnostics (`PlanKpi`).

mod engine;
mod kpi;

pub use engine::{OptimizeResponse, PlacementOptimizer, ResponseStatus, SolveMethod};
pub use kpi::PlanKpi;
