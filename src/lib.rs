//! Kuhn-Munkres assignment over sparse costs.
//!
//! Absent (row, column) pairs are infeasible rather than zero. Every row gets a
//! synthetic, very expensive filler column so a complete matching always
//! exists; rows that end up on their filler are left out of the result.

mod allocation;
mod config;
mod entry;
mod error;
mod matrix;
mod munkres;
mod remap;

use nalgebra::{Dim, Matrix, RawStorage, Scalar};
use num_traits::ToPrimitive;

pub use allocation::{Allocation, Allocations, MatchedTuple, OutputFields};
pub use config::{DuplicatePolicy, SolverConfig, DEFAULT_EPSILON};
pub use entry::{Coordinate, Entry};
pub use error::{Error, Invariant, Result};
pub use matrix::SparseMatrix;
pub use munkres::{Munkres, Step};
pub use remap::Remapper;

/// Solves the assignment problem for `(row, column, cost)` triples.
///
/// Identifiers need not be contiguous. The result holds at most one
/// allocation per row and per column, ordered by first appearance of the row.
pub fn solve(entries: &[(usize, usize, f64)], config: &SolverConfig) -> Result<Allocations> {
    let mut allocations = Allocations::new();
    solve_into(entries, config, &mut allocations)?;
    Ok(allocations)
}

/// [`solve`] with the default configuration.
pub fn munkres(entries: &[(usize, usize, f64)]) -> Result<Allocations> {
    solve(entries, &SolverConfig::default())
}

/// Like [`solve`], but writes into a caller-owned buffer. The buffer is
/// cleared first and left empty on error.
pub fn solve_into(
    entries: &[(usize, usize, f64)],
    config: &SolverConfig,
    allocations: &mut Allocations,
) -> Result<()> {
    allocations.clear();
    config.validate()?;

    let (remapper, dense) = Remapper::remap(entries, config.duplicates)?;
    let matching = Munkres::new(dense, config)?.run()?;
    remapper.expand(&matching, allocations);
    Ok(())
}

/// Dense entry point. Every finite cell of `costs` is a candidate; infinite or
/// NaN cells are treated as missing.
pub fn hungarian<T, R, C, S>(
    costs: &Matrix<T, R, C, S>,
    allocations: &mut Allocations,
) -> Result<()>
where
    T: Scalar + ToPrimitive,
    R: Dim,
    C: Dim,
    S: RawStorage<T, R, C>,
{
    let (h, w) = costs.shape();
    let mut entries = Vec::with_capacity(h * w);
    for row in 0..h {
        for col in 0..w {
            if let Some(cost) = costs.get((row, col)).and_then(|c| c.to_f64()) {
                if cost.is_finite() {
                    entries.push((row, col, cost));
                }
            }
        }
    }

    solve_into(&entries, &SolverConfig::default(), allocations)
}
