use crate::error::{Error, Result};

/// Values whose magnitude does not exceed this are treated as zero.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// What to do when two input entries address the same (row, column) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the cheaper entry; on equal cost the earlier one wins.
    #[default]
    KeepMin,
    /// Fail with [`Error::DuplicateEntry`].
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub epsilon: f64,
    /// Cost of the synthetic entry that gives every row a feasible column.
    /// `None` derives it from the input, see [`SolverConfig::filler_cost_for`].
    pub filler_cost: Option<f64>,
    pub duplicates: DuplicatePolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            filler_cost: None,
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl SolverConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_filler_cost(mut self, filler_cost: f64) -> Self {
        self.filler_cost = Some(filler_cost);
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be positive and finite, got {}",
                self.epsilon
            )));
        }
        if let Some(filler_cost) = self.filler_cost {
            if !(filler_cost.is_finite() && filler_cost > self.epsilon) {
                return Err(Error::InvalidConfig(format!(
                    "filler cost must be finite and above epsilon, got {filler_cost}"
                )));
            }
        }
        Ok(())
    }

    /// The configured filler cost, or one more than the total absolute cost of
    /// `costs`. The derived value exceeds the cost difference between any two
    /// real matchings while staying on the scale of the input.
    pub fn filler_cost_for(&self, costs: impl IntoIterator<Item = f64>) -> f64 {
        self.filler_cost
            .unwrap_or_else(|| costs.into_iter().map(f64::abs).sum::<f64>() + 1.)
    }
}
