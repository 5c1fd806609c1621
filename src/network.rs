use ndarray::{Array1, Array2, Axis};

use crate::device::ExecutionContext;
use crate::error::Result;

/// A function approximator mapping observations to per-action Q-values
pub trait QNetwork: Send + Sync {
    /// Observation batch accepted by the network
    type Observation;

    /// Fixed number of discrete actions
    fn num_actions(&self) -> usize;

    /// Q-values `(batch, num_actions)` for a batch of observations
    fn q_values(&self, observation: &Self::Observation) -> Result<Array2<f32>>;

    /// Number of learned scalars
    fn parameter_count(&self) -> usize;

    /// Where the forward pass runs
    fn context(&self) -> &ExecutionContext;

    /// Index of the highest Q-value per sample, first index on ties
    fn greedy_actions(&self, observation: &Self::Observation) -> Result<Vec<usize>> {
        let q_values = self.q_values(observation)?;
        Ok(q_values.axis_iter(Axis(0)).map(|row| argmax(row.iter().copied())).collect())
    }

    /// Value of each state under the greedy policy (max Q-value)
    fn state_values(&self, observation: &Self::Observation) -> Result<Array1<f32>> {
        let q_values = self.q_values(observation)?;
        Ok(q_values.map_axis(Axis(1), |row| row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b))))
    }
}

fn argmax<I: Iterator<Item = f32>>(values: I) -> usize {
    let mut best = (0, f32::NEG_INFINITY);
    for (index, value) in values.enumerate() {
        if value > best.1 {
            best = (index, value);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax([1.0, 3.0, 3.0, 2.0].into_iter()), 1);
        assert_eq!(argmax([-5.0].into_iter()), 0);
    }
}
