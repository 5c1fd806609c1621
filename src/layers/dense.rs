use ndarray::{Array1, Array2, ArrayView2};
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};
use std::fmt;

use super::initialization::{init_rng, WeightInit};
use super::traits::Layer as LayerTrait;
use crate::activations::Activation;
use crate::device::ExecutionContext;
use crate::error::{DuelingError, Result};

/// A fully connected (dense) layer: `activation(x · W + b)`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DenseLayer {
    /// `(input_size, output_size)`
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    /// Create a new dense layer with the default fan-in uniform initialization.
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        Self::initialized(input_size, output_size, activation, &WeightInit::default(), &mut init_rng(None))
    }

    pub fn initialized(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: &WeightInit,
        rng: &mut StdRng,
    ) -> Self {
        let weights = init.initialize((input_size, output_size), input_size, output_size, rng);
        let biases = init.initialize_biases(output_size, input_size, rng);
        DenseLayer {
            weights,
            biases,
            activation,
        }
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Result<Self> {
        if weights.dim() != self.weights.dim() {
            return Err(DuelingError::dimension_mismatch(
                format!("weights {:?}", self.weights.dim()),
                format!("weights {:?}", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Result<Self> {
        if biases.dim() != self.biases.dim() {
            return Err(DuelingError::width_mismatch("biases", self.biases.len(), biases.len()));
        }
        self.biases = biases;
        Ok(self)
    }
}

impl LayerTrait for DenseLayer {
    fn forward_batch(&self, inputs: ArrayView2<f32>, ctx: &ExecutionContext) -> Result<Array2<f32>> {
        if inputs.ncols() != self.input_size() {
            return Err(DuelingError::width_mismatch("dense input", self.input_size(), inputs.ncols()));
        }
        let backend = ctx.backend();
        let outputs = backend.matmul(inputs, self.weights.view())?;
        let outputs = backend.add_bias(outputs.view(), self.biases.view())?;
        self.activation.apply_on(ctx, outputs)
    }

    fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}

impl fmt::Display for DenseLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Linear(in_features={}, out_features={}, activation={:?})",
            self.input_size(),
            self.output_size(),
            self.activation
        )
    }
}
