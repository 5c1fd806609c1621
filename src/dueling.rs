//! Dueling value/advantage head
//!
//! Every network in this crate ends in the same head: a scalar state-value
//! `V(s)` and a per-action advantage `A(s, a)`, recombined as
//!
//! ```text
//! Q(s, a) = V(s) + A(s, a) - mean_a' A(s, a')
//! ```
//!
//! Subtracting the mean (not the max) is the normalization used everywhere.

use ndarray::{Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};
use std::fmt;

use crate::activations::Activation;
use crate::device::ExecutionContext;
use crate::error::{DuelingError, Result};
use crate::layers::{DenseLayer, LayerTrait, WeightInit};

/// Combine state values `(batch, 1)` and advantages `(batch, n)` into Q-values `(batch, n)`.
pub fn combine(value: ArrayView2<f32>, advantage: ArrayView2<f32>) -> Result<Array2<f32>> {
    if value.ncols() != 1 {
        return Err(DuelingError::width_mismatch("value", 1, value.ncols()));
    }
    if value.nrows() != advantage.nrows() {
        return Err(DuelingError::dimension_mismatch(
            format!("{} advantage rows", value.nrows()),
            format!("{} advantage rows", advantage.nrows()),
        ));
    }
    let mean = advantage.mean_axis(Axis(1)).ok_or_else(|| {
        DuelingError::dimension_mismatch("at least 1 advantage column", "0 advantage columns")
    })?;

    let centered = &advantage - &mean.insert_axis(Axis(1));
    Ok(centered + &value)
}

/// Value and advantage streams over a shared feature vector
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DuelingHead {
    pub value: DenseLayer,
    pub advantage: DenseLayer,
}

impl DuelingHead {
    pub fn new(features: usize, num_actions: usize, init: &WeightInit, rng: &mut StdRng) -> Self {
        DuelingHead {
            value: DenseLayer::initialized(features, 1, Activation::Linear, init, rng),
            advantage: DenseLayer::initialized(features, num_actions, Activation::Linear, init, rng),
        }
    }

    pub fn num_actions(&self) -> usize {
        self.advantage.output_size()
    }

    pub fn parameter_count(&self) -> usize {
        self.value.parameter_count() + self.advantage.parameter_count()
    }

    /// Raw `(V, A)` streams before recombination
    pub fn decompose(&self, features: ArrayView2<f32>, ctx: &ExecutionContext) -> Result<(Array2<f32>, Array2<f32>)> {
        let value = self.value.forward_batch(features, ctx)?;
        let advantage = self.advantage.forward_batch(features, ctx)?;
        Ok((value, advantage))
    }

    pub fn forward(&self, features: ArrayView2<f32>, ctx: &ExecutionContext) -> Result<Array2<f32>> {
        let (value, advantage) = self.decompose(features, ctx)?;
        combine(value.view(), advantage.view())
    }
}

impl fmt::Display for DuelingHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  (v): {}", self.value)?;
        write!(f, "  (adv): {}", self.advantage)
    }
}
