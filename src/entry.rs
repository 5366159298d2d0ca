/// Dense (row, column) cell address inside a [`SparseMatrix`](crate::SparseMatrix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

/// One finite cost. A cell without an entry is infeasible, not zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub position: Coordinate,
    pub cost: f64,
    /// Position of the entry in the caller's input, if it came from one.
    pub original_index: Option<usize>,
}

impl Entry {
    pub fn new(row: usize, column: usize, cost: f64) -> Self {
        Self {
            position: Coordinate { row, column },
            cost,
            original_index: None,
        }
    }

    pub fn with_original_index(mut self, index: usize) -> Self {
        self.original_index = Some(index);
        self
    }

    pub fn row(&self) -> usize {
        self.position.row
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}
