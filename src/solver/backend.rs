//! `good_lp` solver adapter.
//!
//! Maps the solver-agnostic [`MilpProblem`] onto `good_lp` with the
//! pure-Rust `microlp` backend (branch-and-bound integer support, no
//! system solver installation required).

use good_lp::{constraint, default_solver, variable, variables, Expression, ResolutionError,
    Solution, SolverModel, Variable};

use super::{MilpSolver, SolveOutcome, SolveStatus};
use crate::milp::{Comparison, MilpProblem, VarKind};

/// Solver capability backed by `good_lp`/`microlp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    /// Creates the adapter.
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for GoodLpSolver {
    fn name(&self) -> &'static str {
        "good_lp/microlp"
    }

    fn solve(&self, problem: &MilpProblem) -> SolveOutcome {
        let mut vars = variables!();
        let handles: Vec<Variable> = problem
            .var_kinds()
            .iter()
            .map(|kind| {
                let definition = variable().min(0.0);
                let definition = match kind {
                    VarKind::Integer => definition.integer(),
                    VarKind::Continuous => definition,
                };
                vars.add(definition)
            })
            .collect();

        let objective: Expression = problem
            .objective()
            .iter()
            .map(|&(var, coefficient)| handles[var] * coefficient)
            .sum();
        let mut model = vars.minimise(objective).using(default_solver);

        for linear in problem.constraints() {
            let lhs: Expression = linear
                .terms
                .iter()
                .map(|&(var, coefficient)| handles[var] * coefficient)
                .sum();
            let rhs = linear.rhs;
            model = match linear.comparison {
                Comparison::LessEq => model.with(constraint!(lhs <= rhs)),
                Comparison::Eq => model.with(constraint!(lhs == rhs)),
                Comparison::GreaterEq => model.with(constraint!(lhs >= rhs)),
            };
        }

        match model.solve() {
            Ok(solution) => {
                let values = handles.iter().map(|v| solution.value(*v)).collect();
                // The backend proves optimality when it terminates normally.
                SolveOutcome::solved(SolveStatus::Optimal, values)
            }
            Err(ResolutionError::Infeasible) => {
                SolveOutcome::failed(SolveStatus::Infeasible, "problem is infeasible")
            }
            Err(error) => SolveOutcome::failed(SolveStatus::Error, error.to_string()),
        }
    }
}
