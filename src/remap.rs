//! Compresses arbitrary row and column identifiers into `0..n` before a solve
//! and maps the matching back afterwards. Without this a single large
//! identifier would size the potential and cover arrays.

use std::collections::{hash_map, HashMap};

use crate::{
    allocation::{Allocation, Allocations},
    config::DuplicatePolicy,
    entry::Entry,
    error::{Error, Result},
};

/// First-seen order bijection between sparse identifiers and `0..n`.
#[derive(Debug, Clone, Default)]
struct DenseIds {
    ids: Vec<usize>,
    lookup: HashMap<usize, usize>,
}

impl DenseIds {
    fn dense(&mut self, id: usize) -> usize {
        match self.lookup.entry(id) {
            hash_map::Entry::Occupied(slot) => *slot.get(),
            hash_map::Entry::Vacant(slot) => {
                self.ids.push(id);
                *slot.insert(self.ids.len() - 1)
            }
        }
    }

    fn original(&self, dense: usize) -> Option<usize> {
        self.ids.get(dense).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Remapper {
    rows: DenseIds,
    columns: DenseIds,
}

impl Remapper {
    /// Remaps `(row, column, cost)` triples, tagging each with its input
    /// position. Duplicate cells are resolved according to `duplicates`.
    pub fn remap(
        triples: &[(usize, usize, f64)],
        duplicates: DuplicatePolicy,
    ) -> Result<(Self, Vec<Entry>)> {
        let mut remapper = Self::default();
        let mut entries: Vec<Entry> = Vec::with_capacity(triples.len());
        let mut cells: HashMap<(usize, usize), usize> = HashMap::with_capacity(triples.len());

        for (index, &(row, column, cost)) in triples.iter().enumerate() {
            if !cost.is_finite() {
                return Err(Error::NonFiniteCost { index, cost });
            }

            let entry = Entry::new(remapper.rows.dense(row), remapper.columns.dense(column), cost)
                .with_original_index(index);

            match cells.entry((entry.row(), entry.column())) {
                hash_map::Entry::Vacant(slot) => {
                    slot.insert(entries.len());
                    entries.push(entry);
                }
                hash_map::Entry::Occupied(slot) => {
                    let kept = &mut entries[*slot.get()];
                    match duplicates {
                        DuplicatePolicy::Reject => {
                            return Err(Error::DuplicateEntry {
                                row,
                                column,
                                first: kept.original_index.unwrap_or_default(),
                                second: index,
                            });
                        }
                        DuplicatePolicy::KeepMin => {
                            if cost < kept.cost {
                                *kept = entry;
                            }
                        }
                    }
                }
            }
        }

        Ok((remapper, entries))
    }

    pub fn row_count(&self) -> usize {
        self.rows.ids.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.ids.len()
    }

    /// Translates a solver matching back to the caller's identifiers,
    /// appending to `allocations`.
    pub fn expand(&self, matching: &[Entry], allocations: &mut Allocations) {
        allocations.extend(matching.iter().filter_map(|e| {
            Some(Allocation {
                original_index: e.original_index?,
                row: self.rows.original(e.row())?,
                column: self.columns.original(e.column())?,
                cost: e.cost,
            })
        }));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_seen_order() {
        let (remapper, entries) = Remapper::remap(
            &[(100, 200, 3.), (100, 201, 1.), (101, 200, 2.)],
            DuplicatePolicy::KeepMin,
        )
        .expect("valid");
        let cells: Vec<_> = entries.iter().map(|e| (e.row(), e.column())).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(remapper.row_count(), 2);
        assert_eq!(remapper.column_count(), 2);

        let mut allocations = Allocations::new();
        remapper.expand(&entries[1..], &mut allocations);
        assert_eq!(
            allocations.as_slice(),
            &[
                Allocation {
                    original_index: 1,
                    row: 100,
                    column: 201,
                    cost: 1.
                },
                Allocation {
                    original_index: 2,
                    row: 101,
                    column: 200,
                    cost: 2.
                },
            ]
        );
    }

    #[test]
    fn huge_ids_stay_dense() {
        let (remapper, entries) =
            Remapper::remap(&[(usize::MAX, 1 << 40, 1.)], DuplicatePolicy::KeepMin)
                .expect("valid");
        assert_eq!(entries[0].position.row, 0);
        assert_eq!(entries[0].position.column, 0);
        assert_eq!(remapper.rows.original(0), Some(usize::MAX));
    }

    #[test]
    fn duplicates_keep_cheaper() {
        let (_, entries) = Remapper::remap(
            &[(5, 5, 4.), (6, 5, 1.), (5, 5, 2.), (5, 5, 2.)],
            DuplicatePolicy::KeepMin,
        )
        .expect("valid");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].cost, 2.);
        assert_eq!(entries[0].original_index, Some(2));
        assert_eq!(entries[1].original_index, Some(1));
    }

    #[test]
    fn duplicates_rejected() {
        let err = Remapper::remap(&[(5, 5, 4.), (5, 5, 2.)], DuplicatePolicy::Reject)
            .err()
            .expect("duplicate");
        assert_eq!(
            err,
            Error::DuplicateEntry {
                row: 5,
                column: 5,
                first: 0,
                second: 1
            }
        );
    }

    #[test]
    fn non_finite_cost() {
        let err = Remapper::remap(&[(0, 0, 1.), (0, 1, f64::INFINITY)], DuplicatePolicy::KeepMin)
            .err()
            .expect("rejected");
        assert!(matches!(err, Error::NonFiniteCost { index: 1, .. }));
    }
}
