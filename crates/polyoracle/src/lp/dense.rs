//! Dense bounded-variable primal simplex (the bundled `LpSolver` backend).
//!
//! Model
//! - Structural columns `x_j` and one auxiliary variable `r_i` per row, tied by
//!   `A x − r = 0`. Bounds live on the variables, so a row bound is a bound on
//!   `r_i` and a fixed row is a fixed `r_i`.
//! - Each solve starts from the crash basis built by `advanced_basis`: every
//!   structural/auxiliary variable nonbasic at its natural bound and one
//!   artificial per row in the basis.
//! - Phase 1 minimizes the sum of artificials, phase 2 the (signed) objective
//!   with the artificials fixed at zero.
//!
//! Numerics
//! - The basis inverse is recomputed from scratch every iteration (nalgebra LU),
//!   and basic values are recomputed from the nonbasic ones, so nothing drifts.
//!   Sizes handled by the oracle are moderate; clarity wins over speed here.
//! - After a long run of degenerate pivots the pricing switches to Bland's rule.
//! - Optional row equilibration by powers of two (`scale`).
//!
//! `Method::Dual` is accepted and solved with the primal algorithm: the crash
//! basis is not dual feasible for the oracle's models, and a dual-with-primal-
//! fallback setting ends up on the primal path in that case anyway.

use std::time::Instant;

use nalgebra::{DMatrix, DVector};

use super::{Bound, Limit, LpSolver, ObjDir, SimplexParams, SolveError, Status};
use crate::cfg::{MessageLevel, Method, Pricing, RatioTest};

/// Primal feasibility tolerance (phase 1 residual, bound violations).
const FEAS_TOL: f64 = 1e-7;
/// Reduced-cost tolerance for optimality.
const OPT_TOL: f64 = 1e-9;
/// Smallest pivot magnitude considered by the ratio test.
const PIVOT_TOL: f64 = 1e-9;
/// Bound relaxation used by the first pass of the Harris ratio test.
const HARRIS_TOL: f64 = 1e-9;
/// Degenerate pivots in a row before switching to Bland's rule.
const BLAND_AFTER: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VarState {
    Basic,
    AtLower,
    AtUpper,
    Free,
    Fixed,
}

impl VarState {
    fn natural(lb: f64, ub: f64) -> Self {
        match (lb.is_finite(), ub.is_finite()) {
            (true, true) if lb == ub => VarState::Fixed,
            (true, _) => VarState::AtLower,
            (false, true) => VarState::AtUpper,
            (false, false) => VarState::Free,
        }
    }
}

/// Crash basis: variable states over `x`, `r` and the artificials, plus the basic head.
#[derive(Clone, Debug)]
struct Basis {
    head: Vec<usize>,
    state: Vec<VarState>,
}

/// How a phase ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PhaseEnd {
    Optimal,
    Unbounded,
}

/// One solve's working copy: scaled columns `[S·A | −S | diag(σ)]` and bounds.
struct Work {
    m: usize,
    n: usize,
    w: DMatrix<f64>,
    lb: Vec<f64>,
    ub: Vec<f64>,
    basis: Basis,
}

impl Work {
    fn nvars(&self) -> usize {
        self.n + 2 * self.m
    }

    fn artificial(&self, i: usize) -> usize {
        self.n + self.m + i
    }

    fn nonbasic_value(&self, k: usize) -> f64 {
        match self.basis.state[k] {
            VarState::AtLower | VarState::Fixed => self.lb[k],
            VarState::AtUpper => self.ub[k],
            VarState::Free | VarState::Basic => 0.0,
        }
    }

    /// `B x_B = −N x_N`.
    fn basic_values(&self, binv: &DMatrix<f64>) -> DVector<f64> {
        let mut rhs = DVector::zeros(self.m);
        for k in 0..self.nvars() {
            if self.basis.state[k] == VarState::Basic {
                continue;
            }
            let v = self.nonbasic_value(k);
            if v != 0.0 {
                rhs -= self.w.column(k) * v;
            }
        }
        binv * rhs
    }

    fn basis_inverse(&self) -> Result<DMatrix<f64>, SolveError> {
        let b = DMatrix::from_fn(self.m, self.m, |i, r| self.w[(i, self.basis.head[r])]);
        let binv = b.try_inverse().ok_or(SolveError::Singular)?;
        if binv.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::Singular);
        }
        Ok(binv)
    }

    /// Full variable vector (basic and nonbasic).
    fn values(&self, xb: &DVector<f64>) -> Vec<f64> {
        let mut x: Vec<f64> = (0..self.nvars()).map(|k| self.nonbasic_value(k)).collect();
        for (r, &k) in self.basis.head.iter().enumerate() {
            x[k] = xb[r];
        }
        x
    }
}

/// Per-call iteration and time budget.
struct Budget {
    start: Instant,
    iterations: u64,
    params: SimplexParams,
}

impl Budget {
    fn check(&self) -> Result<(), SolveError> {
        if let Some(limit) = self.params.iteration_limit {
            if self.iterations >= limit {
                return Err(SolveError::Limit(Limit::Iterations));
            }
        }
        if let Some(limit) = self.params.time_limit() {
            if self.start.elapsed() >= limit {
                return Err(SolveError::Limit(Limit::Time));
            }
        }
        Ok(())
    }
}

/// Dense simplex solver holding the whole model in memory.
#[derive(Clone, Debug)]
pub struct DenseSimplex {
    a: DMatrix<f64>,
    row_bounds: Vec<Bound>,
    col_bounds: Vec<Bound>,
    obj: Vec<f64>,
    dir: ObjDir,
    row_scale: Vec<f64>,
    basis: Option<Basis>,
    status: Status,
    obj_val: f64,
    x: Vec<f64>,
    row_dual: Vec<f64>,
    iterations: u64,
}

impl Default for DenseSimplex {
    fn default() -> Self {
        Self::new()
    }
}

impl DenseSimplex {
    pub fn new() -> Self {
        Self {
            a: DMatrix::zeros(0, 0),
            row_bounds: Vec::new(),
            col_bounds: Vec::new(),
            obj: Vec::new(),
            dir: ObjDir::Minimize,
            row_scale: Vec::new(),
            basis: None,
            status: Status::Undefined,
            obj_val: 0.0,
            x: Vec::new(),
            row_dual: Vec::new(),
            iterations: 0,
        }
    }

    fn invalidate(&mut self) {
        self.basis = None;
        self.status = Status::Undefined;
    }

    fn build_work(&self, basis: Basis) -> Work {
        let m = self.a.nrows();
        let n = self.a.ncols();
        let mut w = DMatrix::zeros(m, n + 2 * m);
        for i in 0..m {
            let s = self.row_scale[i];
            for j in 0..n {
                w[(i, j)] = s * self.a[(i, j)];
            }
            w[(i, n + i)] = -s;
        }
        let mut lb = Vec::with_capacity(n + 2 * m);
        let mut ub = Vec::with_capacity(n + 2 * m);
        for b in self.col_bounds.iter().chain(self.row_bounds.iter()) {
            let (l, u) = b.limits();
            lb.push(l);
            ub.push(u);
        }
        lb.extend(std::iter::repeat(0.0).take(m));
        ub.extend(std::iter::repeat(f64::INFINITY).take(m));
        Work {
            m,
            n,
            w,
            lb,
            ub,
            basis,
        }
    }

    /// Orient each artificial so it starts non-negative: `σ_i a_i = −(A x − r)_i`.
    fn place_artificials(work: &mut Work) {
        for i in 0..work.m {
            let a = work.artificial(i);
            work.w[(i, a)] = 0.0;
        }
        let mut residual = DVector::<f64>::zeros(work.m);
        for k in 0..work.n + work.m {
            let v = work.nonbasic_value(k);
            if v != 0.0 {
                residual -= work.w.column(k) * v;
            }
        }
        for i in 0..work.m {
            let a = work.artificial(i);
            work.w[(i, a)] = if residual[i] >= 0.0 { 1.0 } else { -1.0 };
        }
    }

    /// Run primal simplex iterations for `cost` until optimal or unbounded.
    fn run_phase(
        &mut self,
        work: &mut Work,
        cost: &[f64],
        budget: &mut Budget,
        phase: u8,
    ) -> Result<PhaseEnd, SolveError> {
        let verbose = budget.params.message_level == MessageLevel::All;
        let mut degenerate = 0usize;
        loop {
            budget.check()?;
            let binv = work.basis_inverse()?;
            let xb = work.basic_values(&binv);
            if xb.iter().any(|v| !v.is_finite()) {
                return Err(SolveError::Failure);
            }
            let cb = DVector::from_fn(work.m, |r, _| cost[work.basis.head[r]]);
            let y = binv.transpose() * cb;
            let bland = degenerate > BLAND_AFTER;

            // Pricing.
            let mut entering: Option<(usize, f64, f64)> = None;
            for k in 0..work.nvars() {
                let st = work.basis.state[k];
                if matches!(st, VarState::Basic | VarState::Fixed) {
                    continue;
                }
                let d = cost[k] - y.dot(&work.w.column(k));
                let dir = match st {
                    VarState::AtLower if d < -OPT_TOL => 1.0,
                    VarState::AtUpper if d > OPT_TOL => -1.0,
                    VarState::Free if d.abs() > OPT_TOL => -d.signum(),
                    _ => continue,
                };
                if bland {
                    entering = Some((k, dir, 0.0));
                    break;
                }
                let score = match budget.params.pricing {
                    Pricing::Standard => d.abs(),
                    Pricing::SteepestEdge => {
                        let alpha = &binv * work.w.column(k);
                        d * d / (1.0 + alpha.norm_squared())
                    }
                };
                if entering.map_or(true, |(_, _, best)| score > best) {
                    entering = Some((k, dir, score));
                }
            }
            let Some((q, dir, _)) = entering else {
                return Ok(PhaseEnd::Optimal);
            };

            // Ratio test along x_B(t) = x_B − dir·t·α.
            let alpha = &binv * work.w.column(q);
            let flip = work.ub[q] - work.lb[q];
            let leaving = ratio_test(work, &xb, &alpha, dir, budget.params.ratio_test, bland);
            let step = match leaving {
                Some((_, t, _)) if t < flip => t,
                _ if flip.is_finite() => flip,
                _ => {
                    if verbose {
                        tracing::debug!(phase, column = q, "unbounded ray");
                    }
                    return Ok(PhaseEnd::Unbounded);
                }
            };
            match leaving {
                Some((r, t, to_lower)) if t < flip => {
                    let k = work.basis.head[r];
                    work.basis.state[k] = if work.lb[k] == work.ub[k] {
                        VarState::Fixed
                    } else if to_lower {
                        VarState::AtLower
                    } else {
                        VarState::AtUpper
                    };
                    work.basis.head[r] = q;
                    work.basis.state[q] = VarState::Basic;
                }
                _ => {
                    work.basis.state[q] = match work.basis.state[q] {
                        VarState::AtLower => VarState::AtUpper,
                        _ => VarState::AtLower,
                    };
                }
            }
            if step <= PIVOT_TOL {
                degenerate += 1;
            } else {
                degenerate = 0;
            }
            budget.iterations += 1;
            self.iterations += 1;
            if verbose {
                tracing::debug!(phase, it = self.iterations, entering = q, step, "pivot");
            }
        }
    }

    fn report_error(&self, params: &SimplexParams, err: SolveError) {
        if params.message_level != MessageLevel::Off {
            tracing::warn!(error = %err, "simplex stopped");
        }
    }

    fn finish(&mut self, work: &Work, cost: &[f64], sign: f64) -> Result<(), SolveError> {
        let binv = work.basis_inverse()?;
        let xb = work.basic_values(&binv);
        let x = work.values(&xb);
        self.x = x[..work.n].to_vec();
        self.obj_val = self
            .obj
            .iter()
            .zip(self.x.iter())
            .map(|(c, v)| c * v)
            .sum();
        let cb = DVector::from_fn(work.m, |r, _| cost[work.basis.head[r]]);
        let y = binv.transpose() * cb;
        // Reduced cost of r_i is 0 − y·(−s_i e_i).
        self.row_dual = (0..work.m)
            .map(|i| sign * y[i] * self.row_scale[i])
            .collect();
        Ok(())
    }
}

/// Choose the leaving row: `(row, step, hits_lower)`.
fn ratio_test(
    work: &Work,
    xb: &DVector<f64>,
    alpha: &DVector<f64>,
    dir: f64,
    rule: RatioTest,
    bland: bool,
) -> Option<(usize, f64, bool)> {
    // Ratio to each blocking bound, with an optional relaxation of the bound.
    let ratio = |r: usize, relax: f64| -> Option<(f64, bool)> {
        let delta = -dir * alpha[r];
        let k = work.basis.head[r];
        if delta < -PIVOT_TOL && work.lb[k].is_finite() {
            Some((((xb[r] - work.lb[k] + relax) / -delta).max(0.0), true))
        } else if delta > PIVOT_TOL && work.ub[k].is_finite() {
            Some((((work.ub[k] - xb[r] + relax) / delta).max(0.0), false))
        } else {
            None
        }
    };
    let mut best: Option<(usize, f64, bool)> = None;
    match rule {
        RatioTest::Harris if !bland => {
            let bound = (0..work.m)
                .filter_map(|r| ratio(r, HARRIS_TOL).map(|(t, _)| t))
                .fold(f64::INFINITY, f64::min);
            if !bound.is_finite() {
                return None;
            }
            let mut best_pivot = 0.0;
            for r in 0..work.m {
                if let Some((t, lower)) = ratio(r, 0.0) {
                    if t <= bound && alpha[r].abs() > best_pivot {
                        best_pivot = alpha[r].abs();
                        best = Some((r, t, lower));
                    }
                }
            }
        }
        _ => {
            for r in 0..work.m {
                let Some((t, lower)) = ratio(r, 0.0) else {
                    continue;
                };
                let better = match best {
                    None => true,
                    Some((br, bt, _)) => {
                        if t < bt - 1e-12 {
                            true
                        } else if t <= bt + 1e-12 {
                            if bland {
                                work.basis.head[r] < work.basis.head[br]
                            } else {
                                alpha[r].abs() > alpha[br].abs()
                            }
                        } else {
                            false
                        }
                    }
                };
                if better {
                    best = Some((r, t, lower));
                }
            }
        }
    }
    best
}

impl LpSolver for DenseSimplex {
    fn add_rows(&mut self, n: usize) -> usize {
        let first = self.a.nrows();
        let a = std::mem::replace(&mut self.a, DMatrix::zeros(0, 0));
        self.a = a.resize(first + n, self.col_bounds.len(), 0.0);
        self.row_bounds.extend(std::iter::repeat(Bound::Free).take(n));
        self.row_scale.extend(std::iter::repeat(1.0).take(n));
        self.invalidate();
        first
    }

    fn add_cols(&mut self, n: usize) -> usize {
        let first = self.a.ncols();
        let a = std::mem::replace(&mut self.a, DMatrix::zeros(0, 0));
        self.a = a.resize(self.row_bounds.len(), first + n, 0.0);
        self.col_bounds.extend(std::iter::repeat(Bound::Fixed(0.0)).take(n));
        self.obj.extend(std::iter::repeat(0.0).take(n));
        self.invalidate();
        first
    }

    fn num_rows(&self) -> usize {
        self.a.nrows()
    }

    fn num_cols(&self) -> usize {
        self.a.ncols()
    }

    fn set_row_bounds(&mut self, row: usize, bound: Bound) {
        self.row_bounds[row] = bound;
        self.invalidate();
    }

    fn set_col_bounds(&mut self, col: usize, bound: Bound) {
        self.col_bounds[col] = bound;
        self.invalidate();
    }

    fn set_mat_col(&mut self, col: usize, entries: &[(usize, f64)]) {
        self.a.column_mut(col).fill(0.0);
        for &(row, v) in entries {
            self.a[(row, col)] = v;
        }
        self.invalidate();
    }

    fn set_obj_coef(&mut self, col: usize, coef: f64) {
        self.obj[col] = coef;
        self.invalidate();
    }

    fn set_obj_dir(&mut self, dir: ObjDir) {
        self.dir = dir;
        self.invalidate();
    }

    fn scale(&mut self) {
        for i in 0..self.a.nrows() {
            let amax = self.a.row(i).amax();
            self.row_scale[i] = if amax > 0.0 && amax.is_finite() {
                (1.0 / amax).log2().round().exp2()
            } else {
                1.0
            };
        }
    }

    fn advanced_basis(&mut self) {
        let m = self.a.nrows();
        let mut state = Vec::with_capacity(self.a.ncols() + 2 * m);
        for b in self.col_bounds.iter().chain(self.row_bounds.iter()) {
            let (l, u) = b.limits();
            state.push(VarState::natural(l, u));
        }
        let first_artificial = state.len();
        state.extend(std::iter::repeat(VarState::Basic).take(m));
        self.basis = Some(Basis {
            head: (first_artificial..first_artificial + m).collect(),
            state,
        });
    }

    fn simplex(&mut self, params: &SimplexParams) -> Result<(), SolveError> {
        let Some(basis) = self.basis.take() else {
            self.report_error(params, SolveError::InvalidBasis);
            return Err(SolveError::InvalidBasis);
        };
        self.status = Status::Undefined;
        let bad_bounds = self
            .col_bounds
            .iter()
            .chain(self.row_bounds.iter())
            .any(|b| {
                let (l, u) = b.limits();
                l > u || l.is_nan() || u.is_nan()
            });
        if bad_bounds {
            self.report_error(params, SolveError::InvalidBounds);
            return Err(SolveError::InvalidBounds);
        }
        if params.method == Method::Dual && params.message_level >= MessageLevel::Normal {
            tracing::debug!("dual simplex unavailable, using primal");
        }
        let mut budget = Budget {
            start: Instant::now(),
            iterations: 0,
            params: *params,
        };
        let mut work = self.build_work(basis);
        Self::place_artificials(&mut work);

        // Phase 1: drive the artificials to zero.
        let nvars = work.nvars();
        let mut cost1 = vec![0.0; nvars];
        for i in 0..work.m {
            cost1[work.artificial(i)] = 1.0;
        }
        self.status = Status::Infeasible;
        if let Err(err) = self.run_phase(&mut work, &cost1, &mut budget, 1) {
            self.report_error(params, err);
            return Err(err);
        }
        let binv = work.basis_inverse()?;
        let xb = work.basic_values(&binv);
        let x = work.values(&xb);
        let infeasibility = (0..work.m).map(|i| x[work.artificial(i)]).fold(0.0, f64::max);
        if params.message_level >= MessageLevel::Normal {
            tracing::debug!(infeasibility, it = self.iterations, "phase 1 done");
        }
        if infeasibility > FEAS_TOL {
            self.status = Status::NoFeasible;
            return Ok(());
        }
        for i in 0..work.m {
            let a = work.artificial(i);
            work.ub[a] = 0.0;
            if work.basis.state[a] != VarState::Basic {
                work.basis.state[a] = VarState::Fixed;
            }
        }

        // Phase 2: the objective itself, as a minimization.
        let sign = match self.dir {
            ObjDir::Minimize => 1.0,
            ObjDir::Maximize => -1.0,
        };
        let mut cost2 = vec![0.0; nvars];
        for (j, c) in self.obj.iter().enumerate() {
            cost2[j] = sign * c;
        }
        self.status = Status::Feasible;
        let end = match self.run_phase(&mut work, &cost2, &mut budget, 2) {
            Ok(end) => end,
            Err(err) => {
                self.report_error(params, err);
                return Err(err);
            }
        };
        self.finish(&work, &cost2, sign)?;
        self.status = match end {
            PhaseEnd::Optimal => Status::Optimal,
            PhaseEnd::Unbounded => Status::Unbounded,
        };
        if params.message_level >= MessageLevel::Normal {
            tracing::debug!(status = %self.status, obj = self.obj_val, it = self.iterations, "phase 2 done");
        }
        Ok(())
    }

    fn status(&self) -> Status {
        self.status
    }

    fn obj_val(&self) -> f64 {
        self.obj_val
    }

    fn row_dual(&self, row: usize) -> f64 {
        self.row_dual.get(row).copied().unwrap_or(0.0)
    }

    fn col_value(&self, col: usize) -> f64 {
        self.x.get(col).copied().unwrap_or(0.0)
    }

    fn iteration_count(&self) -> u64 {
        self.iterations
    }

    fn version(&self) -> &'static str {
        concat!("dense-simplex ", env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::OracleConfig;
    use crate::lp::profile;

    fn solve(lp: &mut DenseSimplex, params: &SimplexParams) -> Result<(), SolveError> {
        lp.advanced_basis();
        lp.simplex(params)
    }

    /// max 3x + 2y  s.t.  x + y <= 4,  x + 3y <= 7,  0 <= x <= 3,  y >= 0.
    fn small_max() -> DenseSimplex {
        let mut lp = DenseSimplex::new();
        lp.add_rows(2);
        lp.add_cols(2);
        lp.set_row_bounds(0, Bound::Upper(4.0));
        lp.set_row_bounds(1, Bound::Upper(7.0));
        lp.set_col_bounds(0, Bound::Double(0.0, 3.0));
        lp.set_col_bounds(1, Bound::Lower(0.0));
        lp.set_mat_col(0, &[(0, 1.0), (1, 1.0)]);
        lp.set_mat_col(1, &[(0, 1.0), (1, 3.0)]);
        lp.set_obj_coef(0, 3.0);
        lp.set_obj_coef(1, 2.0);
        lp.set_obj_dir(ObjDir::Maximize);
        lp
    }

    #[test]
    fn maximizes_with_column_bounds() {
        let mut lp = small_max();
        solve(&mut lp, &SimplexParams::default()).unwrap();
        assert_eq!(lp.status(), Status::Optimal);
        assert!((lp.obj_val() - 11.0).abs() < 1e-9);
        assert!((lp.col_value(0) - 3.0).abs() < 1e-9);
        assert!((lp.col_value(1) - 1.0).abs() < 1e-9);
        // Relaxing x + y <= 4 by one unit buys one more y, worth 2.
        assert!((lp.row_dual(0) - 2.0).abs() < 1e-9);
        assert!(lp.row_dual(1).abs() < 1e-9);
    }

    #[test]
    fn pricing_and_ratio_rules_agree() {
        for (pricing, ratio) in [
            (Pricing::SteepestEdge, RatioTest::Standard),
            (Pricing::Standard, RatioTest::Harris),
            (Pricing::SteepestEdge, RatioTest::Harris),
        ] {
            let cfg = OracleConfig {
                pricing,
                ratio_test: ratio,
                method: Method::Dual,
                ..OracleConfig::default()
            };
            let mut lp = small_max();
            solve(&mut lp, &profile(&cfg)).unwrap();
            assert_eq!(lp.status(), Status::Optimal);
            assert!((lp.obj_val() - 11.0).abs() < 1e-9, "{pricing:?}/{ratio:?}");
        }
    }

    #[test]
    fn scaling_keeps_solution_and_duals() {
        let mut lp = DenseSimplex::new();
        lp.add_rows(1);
        lp.add_cols(2);
        // min x + y  s.t.  1000 x + 1000 y >= 1000
        lp.set_row_bounds(0, Bound::Lower(1000.0));
        lp.set_col_bounds(0, Bound::Lower(0.0));
        lp.set_col_bounds(1, Bound::Lower(0.0));
        lp.set_mat_col(0, &[(0, 1000.0)]);
        lp.set_mat_col(1, &[(0, 1000.0)]);
        lp.set_obj_coef(0, 1.0);
        lp.set_obj_coef(1, 1.0);
        lp.scale();
        solve(&mut lp, &SimplexParams::default()).unwrap();
        assert_eq!(lp.status(), Status::Optimal);
        assert!((lp.obj_val() - 1.0).abs() < 1e-9);
        assert!((lp.row_dual(0) - 1e-3).abs() < 1e-12);
    }

    #[test]
    fn free_column_reaches_row_bound() {
        let mut lp = DenseSimplex::new();
        lp.add_rows(1);
        lp.add_cols(1);
        lp.set_col_bounds(0, Bound::Free);
        lp.set_row_bounds(0, Bound::Lower(-2.0));
        lp.set_mat_col(0, &[(0, 1.0)]);
        lp.set_obj_coef(0, 1.0);
        solve(&mut lp, &SimplexParams::default()).unwrap();
        assert_eq!(lp.status(), Status::Optimal);
        assert!((lp.col_value(0) + 2.0).abs() < 1e-9);
        assert!((lp.row_dual(0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn detects_infeasible_and_unbounded() {
        let mut lp = DenseSimplex::new();
        lp.add_rows(1);
        lp.add_cols(1);
        lp.set_col_bounds(0, Bound::Fixed(1.0));
        lp.set_row_bounds(0, Bound::Lower(2.0));
        lp.set_mat_col(0, &[(0, 1.0)]);
        solve(&mut lp, &SimplexParams::default()).unwrap();
        assert_eq!(lp.status(), Status::NoFeasible);

        let mut lp = DenseSimplex::new();
        lp.add_rows(1);
        lp.add_cols(2);
        lp.set_col_bounds(0, Bound::Lower(0.0));
        lp.set_col_bounds(1, Bound::Free);
        lp.set_row_bounds(0, Bound::Upper(1.0));
        lp.set_mat_col(0, &[(0, 1.0)]);
        lp.set_mat_col(1, &[(0, -1.0)]);
        lp.set_obj_coef(0, 1.0);
        lp.set_obj_dir(ObjDir::Maximize);
        solve(&mut lp, &SimplexParams::default()).unwrap();
        assert_eq!(lp.status(), Status::Unbounded);
    }

    #[test]
    fn edits_invalidate_the_basis() {
        let mut lp = small_max();
        assert_eq!(
            lp.simplex(&SimplexParams::default()),
            Err(SolveError::InvalidBasis)
        );
        lp.advanced_basis();
        lp.set_obj_coef(0, 1.0);
        assert_eq!(
            lp.simplex(&SimplexParams::default()),
            Err(SolveError::InvalidBasis)
        );
    }

    #[test]
    fn inconsistent_bounds_are_rejected() {
        let mut lp = small_max();
        lp.set_col_bounds(1, Bound::Double(2.0, 1.0));
        assert_eq!(
            solve(&mut lp, &SimplexParams::default()),
            Err(SolveError::InvalidBounds)
        );
    }

    #[test]
    fn iteration_limit_stops_the_solve() {
        let mut lp = small_max();
        let params = SimplexParams {
            iteration_limit: Some(1),
            ..SimplexParams::default()
        };
        assert_eq!(
            solve(&mut lp, &params),
            Err(SolveError::Limit(Limit::Iterations))
        );
        assert!(lp.iteration_count() >= 1);
    }

    #[test]
    fn iteration_count_accumulates() {
        let mut lp = small_max();
        solve(&mut lp, &SimplexParams::default()).unwrap();
        let first = lp.iteration_count();
        assert!(first > 0);
        solve(&mut lp, &SimplexParams::default()).unwrap();
        assert_eq!(lp.iteration_count(), 2 * first);
    }
}
