use thiserror::Error;

/// Internal invariants of the solver. A violation means the matrix state is
/// corrupt and no trustworthy matching can be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Invariant {
    /// Step 6 found no uncovered entry with a strictly positive finite value.
    NoPositiveUncoveredCost { min: f64 },
    /// More starred zeros than rows.
    MatchingExceedsRows { starred: usize, rows: usize },
    /// Augmenting path reached a starred zero whose row holds no prime.
    MissingPrimeInRow { row: usize },
    /// Augmenting path requested from an entry that is not primed.
    SeedNotPrimed { index: usize },
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invariant::NoPositiveUncoveredCost { min } => write!(
                f,
                "minimum uncovered cost must be positive and finite, found {min}"
            ),
            Invariant::MatchingExceedsRows { starred, rows } => {
                write!(f, "{starred} starred zeros exceed the {rows} matrix rows")
            }
            Invariant::MissingPrimeInRow { row } => {
                write!(f, "no primed zero in row {row} of the augmenting path")
            }
            Invariant::SeedNotPrimed { index } => {
                write!(f, "augmenting path seed {index} is not a primed zero")
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("no entries supplied, matrix dimensions are undefined")]
    EmptyInput,

    #[error("entry {index} has non-finite cost {cost}")]
    NonFiniteCost { index: usize, cost: f64 },

    #[error("entries {first} and {second} both address row {row}, column {column}")]
    DuplicateEntry {
        row: usize,
        column: usize,
        first: usize,
        second: usize,
    },

    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    #[error("solver invariant violated: {0}")]
    InvariantViolated(Invariant),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invariant_names_the_violation() {
        let err = Error::InvariantViolated(Invariant::MissingPrimeInRow { row: 3 });
        assert_eq!(
            err.to_string(),
            "solver invariant violated: no primed zero in row 3 of the augmenting path"
        );
    }
}
