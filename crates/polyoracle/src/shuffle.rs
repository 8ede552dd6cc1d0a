//! Random relabeling of rows and columns.
//!
//! The LP is mathematically unchanged; only the internal positions move.
//! Solvers can be sensitive to input order, and a random relabeling keeps
//! systematic bias from a particular file layout out of the answers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random permutation of `1..=n` (Fisher–Yates).
///
/// Position `i` for `i` in `1..n` swaps with a uniform position in `[i, n]`.
pub fn permute<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (1..=n).collect();
    for i in 0..n.saturating_sub(1) {
        let j = rng.gen_range(i..n);
        perm.swap(i, j);
    }
    perm
}

/// Declared 1-based row/column index → 0-based solver position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexMap {
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl IndexMap {
    /// Identity labeling for `nrows` rows and `ncols` columns.
    pub fn identity(nrows: usize, ncols: usize) -> Self {
        Self {
            rows: (0..nrows).collect(),
            cols: (0..ncols).collect(),
        }
    }

    /// Shuffled labeling; `seed = None` seeds from the OS.
    pub fn shuffled(nrows: usize, ncols: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let rows = permute(nrows, &mut rng).into_iter().map(|k| k - 1).collect();
        let cols = permute(ncols, &mut rng).into_iter().map(|k| k - 1).collect();
        Self { rows, cols }
    }

    /// Solver position of the declared 1-based row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> usize {
        self.rows[i - 1]
    }

    /// Solver position of the declared 1-based column `j`.
    #[inline]
    pub fn col(&self, j: usize) -> usize {
        self.cols[j - 1]
    }
}
