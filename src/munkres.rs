//! The six-step Munkres state machine over a [`SparseMatrix`].

use std::collections::BTreeSet;

use log::{debug, trace};

use crate::{
    config::SolverConfig,
    entry::Entry,
    error::{Error, Invariant, Result},
    matrix::SparseMatrix,
};

/// A state of the algorithm. [`Munkres::step`] executes one and returns the
/// next, or `None` once the cover is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Subtract each row's minimum from the row.
    ReduceRows,
    /// Star zeros that share no row or column with another star.
    StarZeros,
    /// Cover starred columns; finish if every row is matched.
    CoverColumns,
    /// Prime uncovered zeros until one opens an augmenting path.
    Prime,
    /// Flip the alternating path rooted at the primed zero `seed`.
    Augment { seed: usize },
    /// Shift potentials by the smallest uncovered value.
    Adjust,
}

#[derive(Debug, Clone)]
pub struct Munkres {
    matrix: SparseMatrix,
    // ordered so that iteration always yields the smallest storage index first
    starred: BTreeSet<usize>,
    primed: BTreeSet<usize>,
    iterations: usize,
}

impl Munkres {
    pub fn new(entries: Vec<Entry>, config: &SolverConfig) -> Result<Self> {
        Ok(Self::from_matrix(SparseMatrix::new(entries, config)?))
    }

    pub fn from_matrix(matrix: SparseMatrix) -> Self {
        Self {
            matrix,
            starred: BTreeSet::new(),
            primed: BTreeSet::new(),
            iterations: 0,
        }
    }

    pub fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    pub fn starred(&self) -> &BTreeSet<usize> {
        &self.starred
    }

    pub fn primed(&self) -> &BTreeSet<usize> {
        &self.primed
    }

    /// Number of steps executed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Runs the algorithm to completion and returns the optimal matching
    /// restricted to real columns, in storage order.
    pub fn run(&mut self) -> Result<Vec<Entry>> {
        debug!(
            "solving {} rows x {} columns over {} entries",
            self.matrix.row_count(),
            self.matrix.real_column_count(),
            self.matrix.len()
        );

        let mut next = Some(Step::ReduceRows);
        while let Some(step) = next {
            next = self.step(step)?;
        }

        let matching = self.matching();
        debug!(
            "finished after {} steps: {} rows matched, {} left on filler columns",
            self.iterations,
            matching.len(),
            self.starred.len() - matching.len()
        );
        Ok(matching)
    }

    /// Executes a single step and returns the state to continue with.
    pub fn step(&mut self, step: Step) -> Result<Option<Step>> {
        self.iterations += 1;
        let next = match step {
            Step::ReduceRows => self.reduce_rows(),
            Step::StarZeros => self.star_zeros()?,
            Step::CoverColumns => self.cover_columns(),
            Step::Prime => self.prime_zeros(),
            Step::Augment { seed } => self.augment(seed)?,
            Step::Adjust => self.adjust()?,
        };
        trace!("{step:?} -> {next:?}");
        Ok(next)
    }

    /// Starred entries outside the filler columns.
    pub fn matching(&self) -> Vec<Entry> {
        self.starred
            .iter()
            .filter(|&&index| !self.matrix.is_filler(index))
            .filter_map(|&index| self.matrix.stored(index).copied())
            .collect()
    }

    fn reduce_rows(&mut self) -> Option<Step> {
        let mut row_min = vec![f64::INFINITY; self.matrix.row_count()];
        for e in self.matrix.values() {
            if e.cost < row_min[e.row()] {
                row_min[e.row()] = e.cost;
            }
        }

        // every row holds at least its filler, so each minimum is finite
        for (row, min) in row_min.into_iter().enumerate() {
            self.matrix.add_to_row(row, -min);
        }
        Some(Step::StarZeros)
    }

    fn star_zeros(&mut self) -> Result<Option<Step>> {
        let mut starred_rows = vec![false; self.matrix.row_count()];
        let mut starred_columns = vec![false; self.matrix.column_count()];
        for &index in &self.starred {
            if let Some(e) = self.matrix.stored(index) {
                starred_rows[e.row()] = true;
                starred_columns[e.column()] = true;
            }
        }

        for index in self.matrix.zeros() {
            let Some(zero) = self.matrix.stored(index) else {
                continue;
            };
            let (row, column) = (zero.row(), zero.column());
            if !starred_rows[row] && !starred_columns[column] {
                starred_rows[row] = true;
                starred_columns[column] = true;
                self.starred.insert(index);
            }
        }

        self.check_matching_size()?;
        Ok(Some(Step::CoverColumns))
    }

    fn cover_columns(&mut self) -> Option<Step> {
        for &index in &self.starred {
            if let Some(column) = self.matrix.stored(index).map(Entry::column) {
                self.matrix.cover_column(column);
            }
        }

        if self.matrix.covered_column_count() == self.matrix.row_count() {
            None
        } else {
            Some(Step::Prime)
        }
    }

    fn prime_zeros(&mut self) -> Option<Step> {
        while let Some(index) = self.matrix.find_uncovered_zero() {
            self.primed.insert(index);
            let Some(row) = self.matrix.stored(index).map(Entry::row) else {
                break;
            };

            match self.star_in_row(row) {
                Some(star_column) => {
                    self.matrix.cover_row(row);
                    self.matrix.uncover_column(star_column);
                }
                None => return Some(Step::Augment { seed: index }),
            }
        }
        Some(Step::Adjust)
    }

    fn augment(&mut self, seed: usize) -> Result<Option<Step>> {
        if !self.primed.contains(&seed) {
            return Err(Error::InvariantViolated(Invariant::SeedNotPrimed {
                index: seed,
            }));
        }

        let mut path_primes = vec![seed];
        let mut path_stars = Vec::new();

        let mut prime = seed;
        loop {
            let Some(column) = self.matrix.stored(prime).map(Entry::column) else {
                break;
            };
            let Some(star) = self.star_in_column(column) else {
                break;
            };
            path_stars.push(star);

            let Some(row) = self.matrix.stored(star).map(Entry::row) else {
                break;
            };
            prime = self
                .prime_in_row(row)
                .ok_or(Error::InvariantViolated(Invariant::MissingPrimeInRow { row }))?;
            path_primes.push(prime);
        }

        for star in &path_stars {
            self.starred.remove(star);
        }
        self.starred.extend(path_primes);
        self.check_matching_size()?;

        self.primed.clear();
        self.matrix.uncover_rows();
        Ok(Some(Step::CoverColumns))
    }

    fn adjust(&mut self) -> Result<Option<Step>> {
        let delta = self.matrix.min_uncovered_cost()?;
        for row in 0..self.matrix.row_count() {
            if self.matrix.is_row_covered(row) {
                self.matrix.add_to_row(row, delta);
            }
        }
        for column in 0..self.matrix.column_count() {
            if !self.matrix.is_column_covered(column) {
                self.matrix.add_to_column(column, -delta);
            }
        }
        Ok(Some(Step::Prime))
    }

    /// Column of the starred zero in `row`, if any.
    fn star_in_row(&self, row: usize) -> Option<usize> {
        self.starred
            .iter()
            .filter_map(|&i| self.matrix.stored(i))
            .find(|e| e.row() == row)
            .map(Entry::column)
    }

    fn star_in_column(&self, column: usize) -> Option<usize> {
        self.starred
            .iter()
            .copied()
            .find(|&i| self.matrix.stored(i).is_some_and(|e| e.column() == column))
    }

    fn prime_in_row(&self, row: usize) -> Option<usize> {
        self.primed
            .iter()
            .copied()
            .find(|&i| self.matrix.stored(i).is_some_and(|e| e.row() == row))
    }

    fn check_matching_size(&self) -> Result<()> {
        let rows = self.matrix.row_count();
        if self.starred.len() > rows {
            return Err(Error::InvariantViolated(Invariant::MatchingExceedsRows {
                starred: self.starred.len(),
                rows,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn solver(entries: &[(usize, usize, f64)]) -> Munkres {
        let entries = entries
            .iter()
            .enumerate()
            .map(|(i, &(r, c, cost))| Entry::new(r, c, cost).with_original_index(i))
            .collect();
        Munkres::new(entries, &SolverConfig::default()).expect("valid input")
    }

    fn total(matching: &[Entry]) -> f64 {
        matching.iter().map(|e| e.cost).sum()
    }

    fn dense(costs: &[&[f64]]) -> Vec<(usize, usize, f64)> {
        costs
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &v)| (r, c, v)))
            .collect()
    }

    #[test]
    fn single_entry() {
        let matching = solver(&[(0, 0, 5.)]).run().expect("solved");
        assert_eq!(matching, vec![Entry::new(0, 0, 5.).with_original_index(0)]);
    }

    #[test]
    fn basic_four() {
        #[rustfmt::skip]
        let entries = dense(&[
            &[82., 83., 69., 92.],
            &[77., 37., 49., 92.],
            &[11., 69.,  5., 86.],
            &[ 8.,  9., 98., 23.],
        ]);
        let matching = solver(&entries).run().expect("solved");
        assert_eq!(matching.len(), 4);
        assert_eq!(total(&matching), 140.);
    }

    #[test]
    fn first_steps() {
        let mut m = solver(&[(0, 0, 2.), (0, 1, 3.), (1, 0, 1.), (1, 1, 4.)]);
        assert_eq!(m.step(Step::ReduceRows), Ok(Some(Step::StarZeros)));
        assert_eq!(m.matrix().zeros(), vec![0, 2]);

        // both zeros share column 0, the lower storage index wins
        assert_eq!(m.step(Step::StarZeros), Ok(Some(Step::CoverColumns)));
        assert_eq!(m.starred().iter().copied().collect::<Vec<_>>(), vec![0]);

        assert_eq!(m.step(Step::CoverColumns), Ok(Some(Step::Prime)));
        assert!(m.matrix().is_column_covered(0));
    }

    #[test]
    fn missing_row_entries_fall_back_to_filler() {
        // row 1 only competes for column 0, which row 0 needs more
        let mut m = solver(&[(0, 0, 1.), (1, 0, 2.), (2, 1, 1.)]);
        let matching = m.run().expect("solved");
        let cells: Vec<_> = matching.iter().map(|e| (e.row(), e.column())).collect();
        assert_eq!(cells, vec![(0, 0), (2, 1)]);
        assert_eq!(m.starred().len(), 3);
    }

    #[test]
    fn empty_rows_terminate() {
        // rows 0 and 2 have no entries at all
        let matching = solver(&[(1, 3, 4.), (3, 3, 1.)]).run().expect("solved");
        let cells: Vec<_> = matching.iter().map(|e| (e.row(), e.column())).collect();
        assert_eq!(cells, vec![(3, 3)]);
    }

    #[test]
    fn starred_and_primed_stay_zero_across_adjustments() {
        #[rustfmt::skip]
        let entries = dense(&[
            &[10.,  5., 13., 15., 16.],
            &[ 3.,  9., 18., 13.,  6.],
            &[10.,  7.,  2.,  2.,  2.],
            &[ 7., 11.,  9.,  7., 12.],
            &[ 7.,  9., 10.,  4., 12.],
        ]);
        let mut m = solver(&entries);
        let mut adjustments = 0;
        let mut next = Some(Step::ReduceRows);
        while let Some(step) = next {
            next = m.step(step).expect("step");
            if step == Step::Adjust {
                adjustments += 1;
                for &index in m.starred().iter().chain(m.primed()) {
                    let value = m.matrix().current_value(index).expect("in range").cost;
                    assert!(value.abs() <= 1e-6, "entry {index} drifted to {value}");
                }
            }
        }
        assert!(adjustments > 0);
        assert_eq!(total(&m.matching()), 23.);
    }

    #[test]
    fn filler_stars_stay_zero_across_adjustments() {
        // rows 0-2 compete for column 0, two of them end on their fillers
        let mut m = solver(&[
            (0, 0, 2.157351339866067),
            (1, 0, 3.6809491264823677),
            (2, 0, 1.9474945122677056),
            (3, 1, 3.681431477060144),
            (3, 2, 3.5859788534311745),
        ]);
        let mut adjustments = 0;
        let mut filler_checked = false;
        let mut next = Some(Step::ReduceRows);
        while let Some(step) = next {
            next = m.step(step).expect("step");
            if step == Step::Adjust {
                adjustments += 1;
                for &index in m.starred().iter().chain(m.primed()) {
                    filler_checked |= m.matrix().is_filler(index);
                    let value = m.matrix().current_value(index).expect("in range").cost;
                    assert!(value.abs() <= 1e-6, "entry {index} drifted to {value}");
                }
            }
        }
        assert!(adjustments > 0);
        assert!(filler_checked);

        let cells: Vec<_> = m.matching().iter().map(|e| (e.row(), e.column())).collect();
        assert_eq!(cells, vec![(2, 0), (3, 2)]);
    }

    #[test]
    fn augment_requires_primed_seed() {
        let mut m = solver(&[(0, 0, 1.), (1, 0, 2.)]);
        m.step(Step::ReduceRows).expect("reduced");
        for seed in [0, 99] {
            assert_eq!(
                m.step(Step::Augment { seed }),
                Err(Error::InvariantViolated(Invariant::SeedNotPrimed {
                    index: seed
                }))
            );
        }
        assert!(m.starred().is_empty());
    }

    #[test]
    fn matching_never_exceeds_rows() {
        let mut m = solver(&[(0, 0, 1.), (0, 1, 1.), (0, 2, 1.), (1, 2, 1.)]);
        m.run().expect("solved");
        assert!(m.starred().len() <= m.matrix().row_count());
        assert_eq!(m.matching().len(), 2);
    }
}
