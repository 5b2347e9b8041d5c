//! Pluggable MILP solver capability.
//!
//! The formulation layer produces a [`MilpProblem`](crate::milp::MilpProblem);
//! anything implementing [`MilpSolver`] can solve it. Solver absence and
//! solver failure are ordinary enumerated outcomes, never panics: the
//! orchestrator branches on [`SolveStatus`] to decide between the exact
//! result and the greedy fallback.
//!
//! [`solve_with_timeout`] bounds the invocation by wall-clock time on a
//! worker thread, so even a backend with no native time-limit support
//! cannot block the caller indefinitely.

#[cfg(feature = "milp")]
mod backend;

#[cfg(feature = "milp")]
pub use backend::GoodLpSolver;

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::milp::MilpProblem;

/// Outcome classification of a solve attempt.
///
/// Only `Optimal` and `Feasible` carry usable variable values; every
/// other status is a solve failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal solution.
    Optimal,
    /// Feasible but not proven optimal.
    Feasible,
    /// No solution satisfies the constraints.
    Infeasible,
    /// No solver capability is present.
    SolverMissing,
    /// The wall-clock time limit elapsed before the solver answered.
    Timeout,
    /// The solver failed (numerical error, crash, unbounded model, ...).
    Error,
}

impl SolveStatus {
    /// Whether this status carries a usable solution.
    pub fn is_usable(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Feasible => "Feasible",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::SolverMissing => "SolverMissing",
            SolveStatus::Timeout => "Timeout",
            SolveStatus::Error => "Error",
        };
        f.write_str(label)
    }
}

/// Result of a solve attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// Outcome classification.
    pub status: SolveStatus,
    /// Variable values in problem index order (empty unless usable).
    pub values: Vec<f64>,
    /// Backend diagnostic text, retained for fallback reporting.
    pub detail: Option<String>,
}

impl SolveOutcome {
    /// A usable outcome with variable values.
    pub fn solved(status: SolveStatus, values: Vec<f64>) -> Self {
        Self {
            status,
            values,
            detail: None,
        }
    }

    /// A failed outcome with diagnostic detail.
    pub fn failed(status: SolveStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            values: Vec::new(),
            detail: Some(detail.into()),
        }
    }

    /// Whether this outcome carries a usable solution.
    pub fn is_usable(&self) -> bool {
        self.status.is_usable()
    }
}

/// An integer-programming solver capability.
pub trait MilpSolver: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Solves a minimization problem. Must not panic on infeasible or
    /// degenerate input; report through the outcome status instead.
    fn solve(&self, problem: &MilpProblem) -> SolveOutcome;
}

/// Runs the solver on a worker thread, bounded by wall-clock time.
///
/// If the limit elapses the caller gets `SolveStatus::Timeout` and the
/// worker is left to finish in the background; its result is discarded.
pub fn solve_with_timeout(
    solver: Arc<dyn MilpSolver>,
    problem: &MilpProblem,
    time_limit: Duration,
) -> SolveOutcome {
    let (tx, rx) = mpsc::channel();
    let worker_problem = problem.clone();
    thread::spawn(move || {
        let _ = tx.send(solver.solve(&worker_problem));
    });

    match rx.recv_timeout(time_limit) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => SolveOutcome::failed(
            SolveStatus::Timeout,
            format!("solver exceeded the {}s time limit", time_limit.as_secs_f64()),
        ),
        Err(RecvTimeoutError::Disconnected) => SolveOutcome::failed(
            SolveStatus::Error,
            "solver terminated without producing a result",
        ),
    }
}

/// The bundled solver, when the crate was built with one.
pub fn default_solver() -> Option<Arc<dyn MilpSolver>> {
    #[cfg(feature = "milp")]
    {
        Some(Arc::new(GoodLpSolver::new()))
    }
    #[cfg(not(feature = "milp"))]
    {
        None
    }
}
