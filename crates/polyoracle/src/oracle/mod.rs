//! Facet separation oracle over a VLP polytope.
//!
//! Purpose
//! - Given a point (or a direction at infinity) in objective space, decide
//!   whether it is outside the polytope and, if so, return a supporting
//!   hyperplane that separates it from the polytope.
//!
//! How it works
//! - The model built by `vlp::load` maximizes `λ` subject to the ordinary
//!   rows and `P x + λ w = e`, with `e` the interior point. A query rewrites
//!   the lambda column `w` so that `e − λ w` walks from `e` towards the
//!   queried point (`w = e − v`) or along the queried direction (`w = −d`).
//! - The optimal `λ` is where that walk leaves the polytope; the duals `y`
//!   of the objective rows are a supergradient of `λ` in `e`, so
//!   `y·z − y·(e − λ w) ≥ 0` holds on the whole polytope. Since `y·w = 1`
//!   at the optimum the queried point lands on the negative side.
//!
//! Protocol
//! - `initialize` once (feasibility of `P x = e`), then any number of `ask`
//!   calls. Fatal conditions are logged as `fatal: …` and move the oracle to
//!   `OracleState::Failed`; every later call returns `OracleError::NotReady`.
//!
//! Facets are returned in homogeneous form `facet[0..objs]` plus constant
//! `facet[objs]`, L1-normalized over the coefficients, with
//! `vertex·facet ≤ 0` and `facet[objs] + e·facet[0..objs] > 0`.

pub mod session;

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use nalgebra::DVector;

use crate::cfg::OracleConfig;
use crate::lp::dense::DenseSimplex;
use crate::lp::{Limit, LpSolver, ObjDir, SolveError, Status};
use crate::round::round_to;
use crate::vlp::{self, LoadError, Loaded, Polytope};
use session::{LpSession, OracleStats};

/// Lifecycle of an oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleState {
    /// Model built, consistency not checked yet.
    Loaded,
    /// Accepting queries.
    Ready,
    /// The polytope is empty; terminal.
    Empty,
    /// A fatal error was reported; terminal.
    Failed,
}

impl fmt::Display for OracleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OracleState::Loaded => "loaded",
            OracleState::Ready => "ready",
            OracleState::Empty => "empty",
            OracleState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of `Oracle::initialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consistency {
    Ready,
    Empty,
    /// The solver hit a limit; the oracle stays `Loaded` and may be retried.
    LimitReached(Limit),
}

/// Why no separating facet was produced.
///
/// Callers treat both the same way (nothing to separate); the tag only
/// records the geometric reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unbounded {
    /// Direction query: the ray from the interior point never leaves the polytope.
    RayNeverExits,
    /// Point query: the point is inside the polytope or on its boundary.
    PointInside,
}

/// Non-fatal outcome of `Oracle::ask`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    /// `OracleData::facet` holds a separating facet.
    Facet,
    Unbounded(Unbounded),
    /// The solver hit a limit; nothing was computed, the oracle stays ready.
    LimitReached(Limit),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OracleError {
    /// Operation not allowed in the current state.
    NotReady(OracleState),
    /// Query vector has the wrong length.
    Dimension { expected: usize, got: usize },
    /// Query vector contains NaN or an infinity.
    NonFinite,
    /// The solver failed even after basis rebuilds.
    Solver(SolveError),
    /// Unexpected solution status.
    Status(Status),
    /// A point query produced an unbounded LP.
    UnboundedPoint,
    /// Optimal `λ` is (numerically) zero: the interior point is not interior.
    InteriorOnBoundary { lambda: f64 },
    /// Point query with `λ` clearly above one.
    LambdaAboveOne { lambda: f64 },
    /// Duals of the objective rows vanish.
    ZeroFacet { norm: f64 },
    /// The queried point is on the positive side of the facet.
    VertexNotSeparated { value: f64 },
    /// The interior point is not strictly on the positive side of the facet.
    InteriorNotInside { value: f64 },
}

impl OracleError {
    /// Whether this error ends the oracle's life.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            OracleError::NotReady(_) | OracleError::Dimension { .. } | OracleError::NonFinite
        )
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::NotReady(state) => write!(f, "oracle is {state}, not ready"),
            OracleError::Dimension { expected, got } => {
                write!(f, "query has {got} coordinates, expected {expected}")
            }
            OracleError::NonFinite => write!(f, "query has non-finite coordinates"),
            OracleError::Solver(err) => write!(f, "lp solver: {err}"),
            OracleError::Status(status) => write!(f, "lp solver: {status}"),
            OracleError::UnboundedPoint => write!(f, "lp is unbounded for a point query"),
            OracleError::InteriorOnBoundary { lambda } => {
                write!(f, "initial point is on the boundary (lambda = {lambda:e})")
            }
            OracleError::LambdaAboveOne { lambda } => {
                write!(f, "numerical error: lambda = {lambda} exceeds one")
            }
            OracleError::ZeroFacet { norm } => {
                write!(f, "numerical error: facet is degenerate (norm {norm:e})")
            }
            OracleError::VertexNotSeparated { value } => {
                write!(f, "numerical error: vertex is on the wrong side ({value:e})")
            }
            OracleError::InteriorNotInside { value } => {
                write!(f, "numerical error: interior point is not inside ({value:e})")
            }
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OracleError::Solver(err) => Some(err),
            _ => None,
        }
    }
}

/// Question and answer buffer, owned by the caller and reused across queries.
///
/// `vertex` has `objs + 1` homogeneous coordinates: last coordinate `1` for a
/// point, `0` for a direction. `facet` receives `objs` coefficients followed
/// by the constant.
#[derive(Clone, Debug, PartialEq)]
pub struct OracleData {
    pub vertex: DVector<f64>,
    pub facet: DVector<f64>,
}

impl OracleData {
    pub fn new(objs: usize) -> Self {
        Self {
            vertex: DVector::zeros(objs + 1),
            facet: DVector::zeros(objs + 1),
        }
    }

    /// Buffer for the affine point `coords`.
    pub fn point(coords: &[f64]) -> Self {
        let mut data = Self::new(coords.len());
        data.set_point(coords);
        data
    }

    /// Buffer for the direction `coords`.
    pub fn direction(coords: &[f64]) -> Self {
        let mut data = Self::new(coords.len());
        data.set_direction(coords);
        data
    }

    pub fn set_point(&mut self, coords: &[f64]) {
        self.set_vertex(coords, 1.0);
    }

    pub fn set_direction(&mut self, coords: &[f64]) {
        self.set_vertex(coords, 0.0);
    }

    fn set_vertex(&mut self, coords: &[f64], last: f64) {
        let n = coords.len();
        self.vertex = DVector::from_iterator(n + 1, coords.iter().copied().chain([last]));
        if self.facet.len() != n + 1 {
            self.facet = DVector::zeros(n + 1);
        }
    }

    pub fn is_direction(&self) -> bool {
        !self.vertex.is_empty() && self.vertex[self.vertex.len() - 1] == 0.0
    }

    pub fn coefficients(&self) -> &[f64] {
        let n = self.facet.len().saturating_sub(1);
        &self.facet.as_slice()[..n]
    }

    pub fn constant(&self) -> f64 {
        self.facet.as_slice().last().copied().unwrap_or(0.0)
    }
}

/// Separation oracle owning its polytope model and LP session.
#[derive(Debug)]
pub struct Oracle<S = DenseSimplex> {
    polytope: Polytope,
    session: LpSession<S>,
    cfg: OracleConfig,
    state: OracleState,
}

impl Oracle<DenseSimplex> {
    /// Load a VLP file into the bundled solver.
    pub fn open(path: &Path, cfg: OracleConfig) -> Result<Self, LoadError> {
        let loaded = vlp::load_file(path, &cfg, DenseSimplex::new())?;
        Ok(Self::new(loaded, cfg))
    }

    /// Load VLP text from `reader`; `source` names it in error messages.
    pub fn from_reader<R: BufRead>(
        reader: R,
        source: &str,
        cfg: OracleConfig,
    ) -> Result<Self, LoadError> {
        let loaded = vlp::load(reader, source, &cfg, DenseSimplex::new())?;
        Ok(Self::new(loaded, cfg))
    }
}

impl<S: LpSolver> Oracle<S> {
    pub fn new(loaded: Loaded<S>, cfg: OracleConfig) -> Self {
        let Loaded { polytope, solver } = loaded;
        Self {
            polytope,
            session: LpSession::new(solver, &cfg),
            cfg,
            state: OracleState::Loaded,
        }
    }

    pub fn state(&self) -> OracleState {
        self.state
    }

    pub fn polytope(&self) -> &Polytope {
        &self.polytope
    }

    pub fn config(&self) -> &OracleConfig {
        &self.cfg
    }

    pub fn stats(&self) -> OracleStats {
        self.session.stats()
    }

    pub fn solver_version(&self) -> &'static str {
        self.session.solver().version()
    }

    /// Fresh query buffer of the right size.
    pub fn data(&self) -> OracleData {
        OracleData::new(self.polytope.objs)
    }

    fn fatal(&mut self, err: OracleError) -> OracleError {
        tracing::error!("fatal: {err}");
        self.state = OracleState::Failed;
        err
    }

    /// Check that the objective rows can be met at the interior point.
    pub fn initialize(&mut self) -> Result<Consistency, OracleError> {
        if self.state != OracleState::Loaded {
            return Err(OracleError::NotReady(self.state));
        }
        // The lambda column is still zero, so this only tests P x = e.
        self.session.solver_mut().set_obj_dir(ObjDir::Minimize);
        match self.session.solve() {
            Ok(()) => {}
            Err(SolveError::Limit(limit)) => {
                tracing::warn!(?limit, "consistency check stopped at a limit");
                return Ok(Consistency::LimitReached(limit));
            }
            Err(err) => return Err(self.fatal(OracleError::Solver(err))),
        }
        match self.session.solver().status() {
            Status::Optimal => {
                self.session.solver_mut().set_obj_dir(ObjDir::Maximize);
                self.state = OracleState::Ready;
                tracing::debug!("oracle ready");
                Ok(Consistency::Ready)
            }
            Status::NoFeasible => {
                self.state = OracleState::Empty;
                tracing::info!("polytope is empty");
                Ok(Consistency::Empty)
            }
            status => Err(self.fatal(OracleError::Status(status))),
        }
    }

    /// Separate `data.vertex` from the polytope; on `Answer::Facet` the
    /// facet is written to `data.facet`.
    pub fn ask(&mut self, data: &mut OracleData) -> Result<Answer, OracleError> {
        if self.state != OracleState::Ready {
            return Err(OracleError::NotReady(self.state));
        }
        let objs = self.polytope.objs;
        if data.vertex.len() != objs + 1 {
            return Err(OracleError::Dimension {
                expected: objs + 1,
                got: data.vertex.len(),
            });
        }
        if data.vertex.iter().any(|v| !v.is_finite()) {
            return Err(OracleError::NonFinite);
        }
        if data.facet.len() != objs + 1 {
            data.facet = DVector::zeros(objs + 1);
        }

        let direction = data.vertex[objs] == 0.0;
        let coords: DVector<f64> = data.vertex.rows(0, objs).into_owned();
        let w = if direction {
            -coords
        } else {
            &self.polytope.interior - coords
        };
        let column: Vec<(usize, f64)> = self
            .polytope
            .obj_rows
            .iter()
            .zip(w.iter())
            .filter(|(_, v)| **v != 0.0)
            .map(|(&row, &v)| (row, v))
            .collect();
        let lambda_col = self.polytope.lambda_col;
        self.session.solver_mut().set_mat_col(lambda_col, &column);

        match self.session.solve() {
            Ok(()) => {}
            Err(SolveError::Limit(limit)) => {
                tracing::warn!(?limit, "query stopped at a limit");
                return Ok(Answer::LimitReached(limit));
            }
            Err(err) => return Err(self.fatal(OracleError::Solver(err))),
        }
        match self.session.solver().status() {
            Status::Optimal => {}
            Status::Unbounded if direction => {
                return Ok(Answer::Unbounded(Unbounded::RayNeverExits));
            }
            Status::Unbounded => return Err(self.fatal(OracleError::UnboundedPoint)),
            status => return Err(self.fatal(OracleError::Status(status))),
        }

        let eps = self.cfg.eps;
        let lambda = self.session.solver().obj_val();
        if lambda < 10.0 * eps {
            return Err(self.fatal(OracleError::InteriorOnBoundary { lambda }));
        }
        if !direction && lambda > 1.0 - eps {
            if lambda > 1.0 + eps {
                return Err(self.fatal(OracleError::LambdaAboveOne { lambda }));
            }
            return Ok(Answer::Unbounded(Unbounded::PointInside));
        }

        let solver = self.session.solver();
        let mut facet =
            DVector::from_iterator(objs, self.polytope.obj_rows.iter().map(|&r| solver.row_dual(r)));
        let norm = facet.lp_norm(1);
        if norm.is_nan() || norm < eps {
            return Err(self.fatal(OracleError::ZeroFacet { norm }));
        }
        facet /= norm;
        if self.cfg.round_facets {
            facet.apply(|v| *v = round_to(*v));
        }
        // The boundary point e − λ w sits on the facet.
        let boundary = &self.polytope.interior - &w * lambda;
        let mut constant = -facet.dot(&boundary);
        if self.cfg.round_facets {
            constant = round_to(constant);
        }
        data.facet.rows_mut(0, objs).copy_from(&facet);
        data.facet[objs] = constant;

        let at_vertex = data.vertex.dot(&data.facet);
        if at_vertex > 0.0 {
            return Err(self.fatal(OracleError::VertexNotSeparated { value: at_vertex }));
        }
        let at_interior = constant + facet.dot(&self.polytope.interior);
        if at_interior.is_nan() || at_interior < eps {
            return Err(self.fatal(OracleError::InteriorNotInside { value: at_interior }));
        }
        tracing::trace!(lambda, at_vertex, at_interior, "facet found");
        Ok(Answer::Facet)
    }
}
