//! Solver-agnostic MILP representation.
//!
//! A minimal mixed-integer linear program: variables (all bounded below
//! by zero), a linear objective to minimize, and linear constraints.
//! Any [`MilpSolver`](crate::solver::MilpSolver) implementation can
//! consume this without knowing how it was formulated.

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Non-negative integer.
    Integer,
    /// Non-negative real.
    Continuous,
}

/// Constraint sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Σ terms ≤ rhs
    LessEq,
    /// Σ terms = rhs
    Eq,
    /// Σ terms ≥ rhs
    GreaterEq,
}

/// A linear constraint `Σ coefficient·variable (sense) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// (variable index, coefficient) pairs.
    pub terms: Vec<(usize, f64)>,
    /// Constraint sense.
    pub comparison: Comparison,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Σ terms ≤ rhs
    pub fn less_eq(terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            comparison: Comparison::LessEq,
            rhs,
        }
    }

    /// Σ terms = rhs
    pub fn eq(terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            comparison: Comparison::Eq,
            rhs,
        }
    }

    /// Σ terms ≥ rhs
    pub fn greater_eq(terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            comparison: Comparison::GreaterEq,
            rhs,
        }
    }
}

/// A minimization MILP over non-negative variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilpProblem {
    kinds: Vec<VarKind>,
    names: Vec<String>,
    objective: Vec<(usize, f64)>,
    constraints: Vec<LinearConstraint>,
}

impl MilpProblem {
    /// Creates an empty problem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a non-negative integer variable; returns its index.
    pub fn add_integer(&mut self, name: impl Into<String>) -> usize {
        self.add_var(VarKind::Integer, name)
    }

    /// Adds a non-negative continuous variable; returns its index.
    pub fn add_continuous(&mut self, name: impl Into<String>) -> usize {
        self.add_var(VarKind::Continuous, name)
    }

    fn add_var(&mut self, kind: VarKind, name: impl Into<String>) -> usize {
        self.kinds.push(kind);
        self.names.push(name.into());
        self.kinds.len() - 1
    }

    /// Adds a term to the minimization objective.
    pub fn add_objective_term(&mut self, var: usize, coefficient: f64) {
        self.objective.push((var, coefficient));
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Number of variables.
    pub fn var_count(&self) -> usize {
        self.kinds.len()
    }

    /// Variable domains in index order.
    pub fn var_kinds(&self) -> &[VarKind] {
        &self.kinds
    }

    /// Variable name by index.
    pub fn var_name(&self, var: usize) -> &str {
        &self.names[var]
    }

    /// Objective terms.
    pub fn objective(&self) -> &[(usize, f64)] {
        &self.objective
    }

    /// All constraints.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_indices_sequential() {
        let mut p = MilpProblem::new();
        let x = p.add_integer("x");
        let y = p.add_continuous("y");

        assert_eq!((x, y), (0, 1));
        assert_eq!(p.var_count(), 2);
        assert_eq!(p.var_kinds(), &[VarKind::Integer, VarKind::Continuous]);
        assert_eq!(p.var_name(1), "y");
    }

    #[test]
    fn test_constraint_builders() {
        let c = LinearConstraint::eq(vec![(0, 1.0), (1, -2.0)], 3.0);
        assert_eq!(c.comparison, Comparison::Eq);
        assert_eq!(c.terms.len(), 2);
        assert!((c.rhs - 3.0).abs() < 1e-10);

        assert_eq!(
            LinearConstraint::less_eq(vec![], 0.0).comparison,
            Comparison::LessEq
        );
        assert_eq!(
            LinearConstraint::greater_eq(vec![], 0.0).comparison,
            Comparison::GreaterEq
        );
    }

    #[test]
    fn test_problem_accumulates() {
        let mut p = MilpProblem::new();
        let x = p.add_integer("x");
        p.add_objective_term(x, 2.5);
        p.add_constraint(LinearConstraint::less_eq(vec![(x, 1.0)], 10.0));

        assert_eq!(p.objective(), &[(0, 2.5)]);
        assert_eq!(p.constraints().len(), 1);
    }
}
