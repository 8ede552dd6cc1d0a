//! From a parsed VLP file to a populated LP model.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::{DMatrix, DVector};

use super::error::LoadError;
use super::parse::{parse, Direction, VlpProblem};
use crate::cfg::OracleConfig;
use crate::lp::{Bound, LpSolver, ObjDir};
use crate::shuffle::IndexMap;

/// Largest accepted model, counted in `f64` entries of the simplex work
/// matrix: `m × (n + 2m)` with `m = rows + objs` and `n = cols + 1`.
pub const MAX_MODEL_ENTRIES: usize = 1 << 28;

/// Reject dimensions whose dense model exceeds `MAX_MODEL_ENTRIES`.
pub(crate) fn check_size(rows: usize, cols: usize, objs: usize) -> Result<(), LoadError> {
    let too_large = || LoadError::TooLarge { rows, cols, objs };
    let m = rows.checked_add(objs).ok_or_else(too_large)?;
    let n = cols.checked_add(1).ok_or_else(too_large)?;
    let entries = m
        .checked_mul(2)
        .and_then(|w| w.checked_add(n))
        .and_then(|w| w.checked_mul(m))
        .ok_or_else(too_large)?;
    if entries > MAX_MODEL_ENTRIES {
        return Err(too_large());
    }
    Ok(())
}

/// Polytope metadata kept next to the solver model.
#[derive(Clone, Debug)]
pub struct Polytope {
    pub direction: Direction,
    pub rows: usize,
    pub cols: usize,
    pub objs: usize,
    /// Strictly interior point in objective space.
    pub interior: DVector<f64>,
    /// Comments from the file header.
    pub comments: Vec<String>,
    /// Solver positions of the objective rows, in objective order.
    pub(crate) obj_rows: Vec<usize>,
    /// Solver position of the lambda column.
    pub(crate) lambda_col: usize,
}

/// A polytope together with the solver model built for it.
#[derive(Debug)]
pub struct Loaded<S> {
    pub polytope: Polytope,
    pub solver: S,
}

/// Read a VLP file from disk and build the model.
pub fn load_file<S: LpSolver>(
    path: &Path,
    cfg: &OracleConfig,
    solver: S,
) -> Result<Loaded<S>, LoadError> {
    let source = path.display().to_string();
    let file = File::open(path)
        .map_err(|err| LoadError::Io { source: source.clone(), err }.reported())?;
    load(BufReader::new(file), &source, cfg, solver)
}

/// Parse `reader` and build the model into `solver`.
pub fn load<R: BufRead, S: LpSolver>(
    reader: R,
    source: &str,
    cfg: &OracleConfig,
    solver: S,
) -> Result<Loaded<S>, LoadError> {
    let vlp = parse(reader, source)?;
    build(vlp, cfg, solver)
}

/// Check the interior point and populate `solver` with the oracle model.
pub fn build<S: LpSolver>(
    vlp: VlpProblem,
    cfg: &OracleConfig,
    solver: S,
) -> Result<Loaded<S>, LoadError> {
    build_inner(vlp, cfg, solver).map_err(LoadError::reported)
}

fn build_inner<S: LpSolver>(
    vlp: VlpProblem,
    cfg: &OracleConfig,
    mut solver: S,
) -> Result<Loaded<S>, LoadError> {
    let (rows, cols, objs) = (vlp.rows, vlp.cols, vlp.objs);
    check_size(rows, cols, objs)?;
    let (nrows, ncols) = (rows + objs, cols + 1);

    if !(cfg.eps.is_finite() && cfg.eps > 0.0) {
        return Err(LoadError::Tolerance { eps: cfg.eps });
    }
    for (i, &v) in vlp.interior.iter().enumerate() {
        if !v.is_finite() || v <= cfg.eps {
            return Err(LoadError::InteriorPoint {
                index: i + 1,
                value: v,
            });
        }
    }

    let map = if cfg.shuffle {
        IndexMap::shuffled(nrows, ncols, cfg.seed)
    } else {
        IndexMap::identity(nrows, ncols)
    };
    let obj_rows: Vec<usize> = (1..=objs).map(|k| map.row(rows + k)).collect();
    let lambda_col = map.col(cols + 1);

    let first_col = solver.add_cols(ncols);
    let first_row = solver.add_rows(nrows);
    debug_assert_eq!((first_col, first_row), (0, 0), "solver must start empty");
    solver.set_col_bounds(lambda_col, Bound::Lower(0.0));

    for &(j, b) in &vlp.col_bounds {
        solver.set_col_bounds(map.col(j), b);
    }
    for &(i, b) in &vlp.row_bounds {
        solver.set_row_bounds(map.row(i), b);
    }

    // Dense staging buffer in solver positions; later entries overwrite earlier ones.
    let mut m = DMatrix::<f64>::zeros(nrows, ncols);
    for &(i, j, v) in &vlp.entries {
        m[(map.row(i), map.col(j))] = v;
    }
    for &(k, j, v) in &vlp.obj_entries {
        m[(obj_rows[k - 1], map.col(j))] = v;
    }
    for j in (0..ncols).filter(|&j| j != lambda_col) {
        let entries: Vec<(usize, f64)> = m
            .column(j)
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v))
            .collect();
        solver.set_mat_col(j, &entries);
    }
    drop(m);

    for (k, &row) in obj_rows.iter().enumerate() {
        solver.set_row_bounds(row, Bound::Fixed(vlp.interior[k]));
    }
    solver.set_obj_coef(lambda_col, 1.0);
    solver.set_obj_dir(ObjDir::Maximize);

    tracing::debug!(rows, cols, objs, shuffled = cfg.shuffle, "vlp model built");
    Ok(Loaded {
        polytope: Polytope {
            direction: vlp.direction,
            rows,
            cols,
            objs,
            interior: DVector::from_vec(vlp.interior),
            comments: vlp.comments,
            obj_rows,
            lambda_col,
        },
        solver,
    })
}
