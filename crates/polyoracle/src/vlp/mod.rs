//! VLP polytope descriptions: text format, parsing, and the LP model build.
//!
//! Purpose
//! - Read a polytope given as a linear system with distinguished objective
//!   rows (`p`, `i`, `j`, `a`, `o`, `x` statements) and turn it into the LP
//!   the oracle solves: maximize `λ` subject to the ordinary rows and
//!   `P x + λ w = interior`, with `w` rewritten per query.
//!
//! Layout of the solver model
//! ```text
//!    x (cols)        lambda        bounds
//!   AAAAAAAAAAA         0          row bounds from `i`
//!   PPPPPPPPPPP         w          fixed at the interior point
//!   -----------------------------
//!   00000000000         1          maximize
//! ```
//!
//! Conventions
//! - Declared indices are 1-based; solver positions are 0-based and, when
//!   shuffling is on, randomly permuted (`shuffle::IndexMap`).
//! - Parsing is all-or-nothing: any malformed line aborts the load.

mod error;
mod load;
mod parse;

pub use error::{FormatError, LoadError};
pub use load::{build, load, load_file, Loaded, Polytope, MAX_MODEL_ENTRIES};
pub use parse::{normalize_line, parse, Direction, VlpProblem, MAX_LINE_LEN};
