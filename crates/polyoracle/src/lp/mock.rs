//! Scripted `LpSolver` for exercising the solve wrapper and the oracle's
//! error paths without a real simplex run.

use std::collections::VecDeque;

use super::{Bound, LpSolver, ObjDir, SimplexParams, SolveError, Status};

/// Replays a fixed list of `simplex` outcomes; status/objective/duals are set by the test.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSolver {
    script: VecDeque<Result<(), SolveError>>,
    rows: usize,
    cols: usize,
    pub status: Status,
    pub obj_val: f64,
    pub duals: Vec<f64>,
    pub dir: Option<ObjDir>,
    pub bases_built: u32,
    pub scalings: u32,
    pub calls: u64,
}

impl ScriptedSolver {
    pub fn new(script: Vec<Result<(), SolveError>>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, outcome: Result<(), SolveError>) {
        self.script.push_back(outcome);
    }
}

impl LpSolver for ScriptedSolver {
    fn add_rows(&mut self, n: usize) -> usize {
        self.rows += n;
        self.duals.resize(self.rows, 0.0);
        self.rows - n
    }

    fn add_cols(&mut self, n: usize) -> usize {
        self.cols += n;
        self.cols - n
    }

    fn num_rows(&self) -> usize {
        self.rows
    }

    fn num_cols(&self) -> usize {
        self.cols
    }

    fn set_row_bounds(&mut self, _row: usize, _bound: Bound) {}

    fn set_col_bounds(&mut self, _col: usize, _bound: Bound) {}

    fn set_mat_col(&mut self, _col: usize, _entries: &[(usize, f64)]) {}

    fn set_obj_coef(&mut self, _col: usize, _coef: f64) {}

    fn set_obj_dir(&mut self, dir: ObjDir) {
        self.dir = Some(dir);
    }

    fn scale(&mut self) {
        self.scalings += 1;
    }

    fn advanced_basis(&mut self) {
        self.bases_built += 1;
    }

    fn simplex(&mut self, _params: &SimplexParams) -> Result<(), SolveError> {
        self.calls += 1;
        self.script.pop_front().unwrap_or(Err(SolveError::Failure))
    }

    fn status(&self) -> Status {
        self.status
    }

    fn obj_val(&self) -> f64 {
        self.obj_val
    }

    fn row_dual(&self, row: usize) -> f64 {
        self.duals[row]
    }

    fn col_value(&self, _col: usize) -> f64 {
        0.0
    }

    fn iteration_count(&self) -> u64 {
        self.calls
    }

    fn version(&self) -> &'static str {
        "scripted"
    }
}
