//! Solve wrapper: one logical solve with timing, call counting and retries.
//!
//! Advanced starting bases on ill-conditioned models occasionally come out
//! corrupt or singular, and the solver occasionally breaks down numerically;
//! both usually go away after rebuilding the basis. The wrapper walks an
//! ordered list of recovery actions, each tried at most once, so a logical
//! solve costs at most `1 + RECOVERY.len()` solver calls.

use std::time::{Duration, Instant};

use crate::cfg::OracleConfig;
use crate::lp::{profile, LpSolver, SimplexParams, SolveError};

/// One recovery step: which errors trigger it and whether to rescale first.
struct Recovery {
    name: &'static str,
    applies: fn(SolveError) -> bool,
    rescale: bool,
}

fn is_failure(err: SolveError) -> bool {
    err == SolveError::Failure
}

const RECOVERY: [Recovery; 2] = [
    Recovery {
        name: "rebuild basis",
        applies: SolveError::is_basis_problem,
        rescale: true,
    },
    Recovery {
        name: "second chance",
        applies: is_failure,
        rescale: false,
    },
];

/// Cumulative solver statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OracleStats {
    /// Solver invocations, retries included.
    pub calls: u64,
    /// Simplex iterations reported by the solver.
    pub iterations: u64,
    /// Wall-clock time inside the solver, in hundredths of a second.
    pub centiseconds: u64,
}

/// Solver handle plus its parameter profile and counters.
#[derive(Debug)]
pub struct LpSession<S> {
    solver: S,
    params: SimplexParams,
    rescale: bool,
    calls: u64,
    elapsed: Duration,
}

impl<S: LpSolver> LpSession<S> {
    pub fn new(solver: S, cfg: &OracleConfig) -> Self {
        Self {
            solver,
            params: profile(cfg),
            rescale: cfg.scale,
            calls: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    pub fn params(&self) -> &SimplexParams {
        &self.params
    }

    fn invoke(&mut self) -> Result<(), SolveError> {
        self.calls += 1;
        self.solver.simplex(&self.params)
    }

    /// Solve from a fresh basis, retrying per `RECOVERY`.
    pub fn solve(&mut self) -> Result<(), SolveError> {
        let start = Instant::now();
        if self.rescale {
            self.solver.scale();
        }
        self.solver.advanced_basis();
        let mut result = self.invoke();
        for (attempt, recovery) in RECOVERY.iter().enumerate() {
            let err = match result {
                Err(err) if (recovery.applies)(err) => err,
                _ => continue,
            };
            tracing::debug!(
                attempt = attempt + 2,
                error = %err,
                action = recovery.name,
                "retrying simplex"
            );
            if recovery.rescale && self.rescale {
                self.solver.scale();
            }
            self.solver.advanced_basis();
            result = self.invoke();
        }
        self.elapsed += start.elapsed();
        result
    }

    pub fn stats(&self) -> OracleStats {
        let ms = u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX);
        OracleStats {
            calls: self.calls,
            iterations: self.solver.iteration_count(),
            centiseconds: ms.saturating_add(5) / 10,
        }
    }
}
