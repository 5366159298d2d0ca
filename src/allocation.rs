/// One matched row, expressed in the caller's identifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub original_index: usize,
    pub row: usize,
    pub column: usize,
    pub cost: f64,
}

impl Allocation {
    pub fn assignment(&self) -> (usize, usize) {
        (self.row, self.column)
    }

    pub fn tuple(&self, fields: OutputFields) -> MatchedTuple {
        let Allocation {
            original_index,
            row,
            column,
            cost,
        } = *self;
        match (fields.original_index, fields.cost) {
            (false, false) => MatchedTuple::Pair(row, column),
            (false, true) => MatchedTuple::WithCost(row, column, cost),
            (true, false) => MatchedTuple::WithIndex(original_index, row, column),
            (true, true) => MatchedTuple::Full(original_index, row, column, cost),
        }
    }
}

/// Which optional fields to carry in each [`MatchedTuple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputFields {
    pub cost: bool,
    pub original_index: bool,
}

impl OutputFields {
    pub fn with_cost(mut self) -> Self {
        self.cost = true;
        self
    }

    pub fn with_original_index(mut self) -> Self {
        self.original_index = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchedTuple {
    /// `(row, column)`
    Pair(usize, usize),
    /// `(row, column, cost)`
    WithCost(usize, usize, f64),
    /// `(original_index, row, column)`
    WithIndex(usize, usize, usize),
    /// `(original_index, row, column, cost)`
    Full(usize, usize, usize, f64),
}

/// Result of a solve, reusable as an output buffer across calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocations(Vec<Allocation>);

impl Allocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn push(&mut self, allocation: Allocation) {
        self.0.push(allocation);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Allocation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Allocation] {
        &self.0
    }

    /// `(row, column)` of every allocation.
    pub fn assignment(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(Allocation::assignment)
    }

    pub fn total_cost(&self) -> f64 {
        self.0.iter().map(|a| a.cost).sum()
    }

    pub fn tuples(&self, fields: OutputFields) -> Vec<MatchedTuple> {
        self.0.iter().map(|a| a.tuple(fields)).collect()
    }
}

impl IntoIterator for Allocations {
    type Item = Allocation;
    type IntoIter = std::vec::IntoIter<Allocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Allocations {
    type Item = &'a Allocation;
    type IntoIter = std::slice::Iter<'a, Allocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Allocation> for Allocations {
    fn from_iter<I: IntoIterator<Item = Allocation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Allocation> for Allocations {
    fn extend<I: IntoIterator<Item = Allocation>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}
