//! LP solver interface used by the loader and the oracle.
//!
//! Purpose
//! - Describe the small slice of a simplex solver the oracle needs: build a
//!   model column by column, rewrite one column, solve from a fresh basis,
//!   and read status, objective value and row duals.
//! - Keep the backend swappable. `dense::DenseSimplex` is the bundled one.
//!
//! Conventions
//! - Rows and columns are 0-based solver positions.
//! - Every row `i` has an activity `r_i = Σ_j a_ij x_j`; row bounds constrain
//!   `r_i`, column bounds constrain `x_j`.
//! - New rows are free, new columns are fixed at zero.
//! - `row_dual(i)` is the sensitivity of the optimal objective value with
//!   respect to the activity of row `i` (sign follows the objective direction).

pub mod dense;
#[cfg(test)]
pub(crate) mod mock;
pub mod params;

use std::fmt;

pub use params::{profile, SimplexParams};

/// Bounds of a row activity or of a column value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    Free,
    Lower(f64),
    Upper(f64),
    Double(f64, f64),
    Fixed(f64),
}

impl Bound {
    /// `(lower, upper)` with infinities for missing sides.
    pub fn limits(self) -> (f64, f64) {
        match self {
            Bound::Free => (f64::NEG_INFINITY, f64::INFINITY),
            Bound::Lower(l) => (l, f64::INFINITY),
            Bound::Upper(u) => (f64::NEG_INFINITY, u),
            Bound::Double(l, u) => (l, u),
            Bound::Fixed(v) => (v, v),
        }
    }
}

/// Optimization direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjDir {
    Minimize,
    Maximize,
}

/// Status of the basic solution after a solver call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Undefined,
    Feasible,
    Infeasible,
    NoFeasible,
    Optimal,
    Unbounded,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Status::Undefined => "the problem is undefined",
            Status::Feasible => "solution is feasible",
            Status::Infeasible => "solution is infeasible",
            Status::NoFeasible => "the problem has no feasible solution",
            Status::Optimal => "solution is optimal",
            Status::Unbounded => "the problem is unbounded",
        };
        f.write_str(msg)
    }
}

/// Which resource limit stopped the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limit {
    Iterations,
    Time,
}

/// Abnormal termination of a solver call. Status values are separate (`Status`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// No valid starting basis; build one first.
    InvalidBasis,
    /// The basis matrix became singular.
    Singular,
    /// The basis matrix is too ill-conditioned to continue.
    IllConditioned,
    /// Inconsistent bounds (lower above upper).
    InvalidBounds,
    /// Numerical breakdown of the solver.
    Failure,
    Limit(Limit),
}

impl SolveError {
    /// Errors a basis rebuild usually cures.
    pub fn is_basis_problem(self) -> bool {
        matches!(self, SolveError::InvalidBasis | SolveError::Singular)
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SolveError::InvalidBasis => "invalid basis",
            SolveError::Singular => "singular matrix",
            SolveError::IllConditioned => "ill-conditioned matrix",
            SolveError::InvalidBounds => "invalid bounds",
            SolveError::Failure => "solver failed",
            SolveError::Limit(Limit::Iterations) => "iteration limit exceeded",
            SolveError::Limit(Limit::Time) => "time limit exceeded",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for SolveError {}

/// Simplex solver seam.
///
/// Model edits invalidate the current basis; callers build a fresh one with
/// `advanced_basis` before calling `simplex`.
pub trait LpSolver {
    /// Append `n` free rows; returns the position of the first new row.
    fn add_rows(&mut self, n: usize) -> usize;
    /// Append `n` columns fixed at zero; returns the position of the first new column.
    fn add_cols(&mut self, n: usize) -> usize;
    fn num_rows(&self) -> usize;
    fn num_cols(&self) -> usize;

    fn set_row_bounds(&mut self, row: usize, bound: Bound);
    fn set_col_bounds(&mut self, col: usize, bound: Bound);
    /// Replace column `col` by the given `(row, value)` entries; rows not listed become zero.
    fn set_mat_col(&mut self, col: usize, entries: &[(usize, f64)]);
    fn set_obj_coef(&mut self, col: usize, coef: f64);
    fn set_obj_dir(&mut self, dir: ObjDir);

    /// Recompute scale factors for the current matrix.
    fn scale(&mut self);
    /// Build a fresh starting basis.
    fn advanced_basis(&mut self);
    /// Run the simplex method from the current basis.
    fn simplex(&mut self, params: &SimplexParams) -> Result<(), SolveError>;

    fn status(&self) -> Status;
    fn obj_val(&self) -> f64;
    fn row_dual(&self, row: usize) -> f64;
    fn col_value(&self, col: usize) -> f64;
    /// Simplex iterations over the lifetime of this solver.
    fn iteration_count(&self) -> u64;
    /// Backend name and version, for statistics output.
    fn version(&self) -> &'static str;
}
