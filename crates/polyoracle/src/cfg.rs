//! Oracle configuration (tolerances and LP solver knobs).
//!
//! Policy
//! - One plain struct with `Default`; callers override fields directly or
//!   deserialize a partial JSON object (missing keys keep their defaults).
//! - The solver-facing part is translated once by `lp::params::profile`;
//!   nothing below reads this struct during a solve.

use serde::{Deserialize, Serialize};

/// Default polytope tolerance (`eps`) used by the loader and the oracle checks.
pub(crate) const POLYTOPE_EPS: f64 = 1e-9;
/// Default per-solve iteration limit.
pub(crate) const ITERATION_LIMIT: u64 = 100_000;
/// Default per-solve time limit in seconds.
pub(crate) const TIME_LIMIT_SECS: u64 = 10;

/// How chatty the LP solver is.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    #[default]
    Off,
    Errors,
    Normal,
    All,
}

/// Simplex method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Primal,
    Dual,
}

/// Pricing rule for choosing the entering variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pricing {
    #[default]
    Standard,
    SteepestEdge,
}

/// Ratio test for choosing the leaving variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioTest {
    #[default]
    Standard,
    Harris,
}

/// Everything the loader, the solve wrapper and the oracle read from configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub message_level: MessageLevel,
    /// Randomly relabel rows and columns before handing them to the solver.
    pub shuffle: bool,
    /// Seed for the shuffle; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Rescale the model before every solve.
    pub scale: bool,
    pub method: Method,
    pub pricing: Pricing,
    pub ratio_test: RatioTest,
    /// 0 means no limit; other values are raised to at least 1000.
    pub iteration_limit: u64,
    /// Seconds; 0 means no limit, other values are raised to at least 5.
    pub time_limit: u64,
    /// Polytope tolerance: interior point coordinates, lambda, facet checks.
    pub eps: f64,
    /// Round facet coefficients to nearby simple rationals.
    pub round_facets: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            message_level: MessageLevel::Off,
            shuffle: true,
            seed: None,
            scale: true,
            method: Method::Primal,
            pricing: Pricing::Standard,
            ratio_test: RatioTest::Standard,
            iteration_limit: ITERATION_LIMIT,
            time_limit: TIME_LIMIT_SECS,
            eps: POLYTOPE_EPS,
            round_facets: false,
        }
    }
}

impl OracleConfig {
    /// Unshuffled configuration; handy for tests and reproducible runs.
    pub fn deterministic() -> Self {
        Self {
            shuffle: false,
            ..Self::default()
        }
    }
}
