//! Sparse cost matrix with lazily applied dual potentials.
//!
//! Stored costs are never rewritten. The value the algorithm works with is
//! always `cost + row_potential[row] + column_potential[column]`, so reducing
//! or adjusting a whole row or column is a single addition.

use log::warn;

use crate::{
    config::SolverConfig,
    entry::Entry,
    error::{Error, Invariant, Result},
};

#[derive(Debug, Clone)]
pub struct SparseMatrix {
    entries: Vec<Entry>,
    row_count: usize,
    real_column_count: usize,
    column_count: usize,
    row_potential: Vec<f64>,
    column_potential: Vec<f64>,
    covered_rows: Vec<bool>,
    covered_columns: Vec<bool>,
    epsilon: f64,
}

impl SparseMatrix {
    /// Builds the extended matrix: entries stably sorted by row, followed by
    /// one filler per row in column `real_column_count + row`.
    pub fn new(mut entries: Vec<Entry>, config: &SolverConfig) -> Result<Self> {
        config.validate()?;

        let row_count = entries
            .iter()
            .map(Entry::row)
            .max()
            .ok_or(Error::EmptyInput)?
            + 1;
        let real_column_count = entries.iter().map(Entry::column).max().unwrap_or(0) + 1;
        let column_count = real_column_count + row_count;

        if let Some((position, entry)) = entries
            .iter()
            .enumerate()
            .find(|(_, e)| !e.cost.is_finite())
        {
            return Err(Error::NonFiniteCost {
                index: entry.original_index.unwrap_or(position),
                cost: entry.cost,
            });
        }

        let filler_cost = config.filler_cost_for(entries.iter().map(|e| e.cost));
        if !filler_cost.is_finite() {
            return Err(Error::InvalidConfig(
                "total input cost overflows the filler cost".to_string(),
            ));
        }
        for entry in entries.iter().filter(|e| e.cost >= filler_cost) {
            warn!(
                "cost {} at ({}, {}) is not below the filler cost {}",
                entry.cost,
                entry.row(),
                entry.column(),
                filler_cost
            );
        }

        entries.sort_by_key(Entry::row);
        entries.reserve(row_count);
        entries.extend(
            (0..row_count).map(|row| Entry::new(row, real_column_count + row, filler_cost)),
        );

        Ok(Self {
            entries,
            row_count,
            real_column_count,
            column_count,
            row_potential: vec![0.; row_count],
            column_potential: vec![0.; column_count],
            covered_rows: vec![false; row_count],
            covered_columns: vec![false; column_count],
            epsilon: config.epsilon,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn real_column_count(&self) -> usize {
        self.real_column_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Number of stored entries, fillers included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry as it was supplied, before any potential is applied.
    pub fn stored(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn is_filler(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|e| e.column() >= self.real_column_count)
    }

    /// The entry at `index` with its row and column potentials applied.
    pub fn current_value(&self, index: usize) -> Option<Entry> {
        self.entries.get(index).map(|e| self.apply_potentials(e))
    }

    #[inline]
    fn apply_potentials(&self, entry: &Entry) -> Entry {
        Entry {
            cost: entry.cost
                + self.row_potential[entry.row()]
                + self.column_potential[entry.column()],
            ..*entry
        }
    }

    #[inline]
    fn is_zero(&self, value: f64) -> bool {
        value <= self.epsilon && value >= -self.epsilon
    }

    /// Current values of every entry in storage order.
    pub fn values(&self) -> impl Iterator<Item = Entry> + '_ {
        self.entries.iter().map(|e| self.apply_potentials(e))
    }

    /// Current values of the entries in row `row`, its filler last.
    pub fn row(&self, row: usize) -> Vec<Entry> {
        let real = &self.entries[..self.entries.len() - self.row_count];
        let start = real.partition_point(|e| e.row() < row);
        let end = start + real[start..].partition_point(|e| e.row() == row);
        real[start..end]
            .iter()
            .chain(self.entries.get(real.len() + row))
            .map(|e| self.apply_potentials(e))
            .collect()
    }

    pub fn add_to_row(&mut self, row: usize, delta: f64) {
        self.row_potential[row] += delta;
    }

    pub fn add_to_column(&mut self, column: usize, delta: f64) {
        self.column_potential[column] += delta;
    }

    /// Indices of all zero-valued entries, covered or not.
    pub fn zeros(&self) -> Vec<usize> {
        self.values()
            .enumerate()
            .filter(|(_, e)| self.is_zero(e.cost))
            .map(|(i, _)| i)
            .collect()
    }

    /// First zero-valued entry, in storage order, whose row and column are
    /// both uncovered.
    pub fn find_uncovered_zero(&self) -> Option<usize> {
        self.values().position(|e| {
            self.is_zero(e.cost)
                && !self.covered_rows[e.row()]
                && !self.covered_columns[e.column()]
        })
    }

    /// Smallest current value among entries with uncovered row and column.
    ///
    /// The fillers keep this strictly positive and finite whenever it is
    /// called from step 6; anything else is an invariant violation.
    pub fn min_uncovered_cost(&self) -> Result<f64> {
        let min = self
            .values()
            .filter(|e| !self.covered_rows[e.row()] && !self.covered_columns[e.column()])
            .map(|e| e.cost)
            .fold(f64::INFINITY, f64::min);

        if min > self.epsilon && min.is_finite() {
            Ok(min)
        } else {
            Err(Error::InvariantViolated(
                Invariant::NoPositiveUncoveredCost { min },
            ))
        }
    }

    pub fn is_row_covered(&self, row: usize) -> bool {
        self.covered_rows[row]
    }

    pub fn cover_row(&mut self, row: usize) {
        self.covered_rows[row] = true;
    }

    pub fn uncover_rows(&mut self) {
        self.covered_rows.fill(false);
    }

    pub fn is_column_covered(&self, column: usize) -> bool {
        self.covered_columns[column]
    }

    pub fn cover_column(&mut self, column: usize) {
        self.covered_columns[column] = true;
    }

    pub fn uncover_column(&mut self, column: usize) {
        self.covered_columns[column] = false;
    }

    pub fn covered_column_count(&self) -> usize {
        self.covered_columns.iter().filter(|&&c| c).count()
    }
}
