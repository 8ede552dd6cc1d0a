//! Curated surface for callers (UNSTABLE).
//!
//! Prefer these re-exports over deep module paths.

// Configuration
pub use crate::cfg::{MessageLevel, Method, OracleConfig, Pricing, RatioTest};
// Polytope input
pub use crate::vlp::{
    build, load, load_file, normalize_line, parse, Direction, FormatError, LoadError, Loaded,
    Polytope, VlpProblem,
};
// LP seam
pub use crate::lp::dense::DenseSimplex;
pub use crate::lp::{profile, Bound, Limit, LpSolver, ObjDir, SimplexParams, SolveError, Status};
// Oracle
pub use crate::oracle::session::{LpSession, OracleStats};
pub use crate::oracle::{
    Answer, Consistency, Oracle, OracleData, OracleError, OracleState, Unbounded,
};
// Utilities
pub use crate::round::round_to;
pub use crate::shuffle::{permute, IndexMap};
