//! Configuration → simplex parameters.

use std::time::Duration;

use crate::cfg::{MessageLevel, Method, OracleConfig, Pricing, RatioTest};

/// Lowest accepted non-zero iteration limit.
const MIN_ITERATION_LIMIT: u64 = 1000;
/// Lowest accepted non-zero time limit, in seconds.
const MIN_TIME_LIMIT_SECS: u64 = 5;

/// Tuning for one `LpSolver::simplex` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimplexParams {
    pub message_level: MessageLevel,
    pub method: Method,
    pub pricing: Pricing,
    pub ratio_test: RatioTest,
    /// `None` means unbounded.
    pub iteration_limit: Option<u64>,
    /// Milliseconds; `None` means unbounded.
    pub time_limit_ms: Option<u64>,
}

impl Default for SimplexParams {
    fn default() -> Self {
        profile(&OracleConfig::default())
    }
}

impl SimplexParams {
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

/// Translate the configuration into solver parameters.
pub fn profile(cfg: &OracleConfig) -> SimplexParams {
    let iteration_limit = match cfg.iteration_limit {
        0 => None,
        n => Some(n.max(MIN_ITERATION_LIMIT)),
    };
    let time_limit_ms = match cfg.time_limit {
        0 => None,
        s => Some(s.max(MIN_TIME_LIMIT_SECS).saturating_mul(1000)),
    };
    SimplexParams {
        message_level: cfg.message_level,
        method: cfg.method,
        pricing: cfg.pricing,
        ratio_test: cfg.ratio_test,
        iteration_limit,
        time_limit_ms,
    }
}
