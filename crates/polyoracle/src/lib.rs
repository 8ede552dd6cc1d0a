//! Facet separation oracle for polytopes given as VLP problems.
//!
//! A polytope is the image `{P x : A x within row bounds, x within column
//! bounds}` of a linear system, together with a point known to lie strictly
//! inside it. The oracle answers, for a point or a direction in objective
//! space, whether it lies outside and, if so, which facet separates it.
//!
//! Modules
//! - `vlp`: text format, parsing, LP model build.
//! - `shuffle`: optional random relabeling of rows and columns.
//! - `lp`: solver seam (`LpSolver`), parameter profile, bundled dense simplex.
//! - `oracle`: solve wrapper with retries, the oracle protocol, statistics.
//! - `round`: snapping to simple rationals.
//! - `cfg`: configuration and default tolerances.
//!
//! API Policy
//! - Prefer `api` re-exports in callers; module paths may move.

pub mod api;
pub mod cfg;
pub mod lp;
pub mod oracle;
pub mod round;
pub mod shuffle;
pub mod vlp;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::OracleConfig;
pub use oracle::{Answer, Oracle, OracleData, OracleError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::OracleConfig;
    pub use crate::oracle::session::OracleStats;
    pub use crate::oracle::{Answer, Consistency, Oracle, OracleData, OracleError, Unbounded};
    pub use crate::vlp::LoadError;
}
