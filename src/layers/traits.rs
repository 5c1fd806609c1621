use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::device::ExecutionContext;
use crate::error::Result;

/// Trait defining the interface for feature-vector layers
pub trait Layer: Send + Sync {
    /// Perform forward propagation for a batch of inputs `(batch, input_size)`
    fn forward_batch(&self, inputs: ArrayView2<f32>, ctx: &ExecutionContext) -> Result<Array2<f32>>;

    /// Perform forward propagation for a single input
    fn forward(&self, input: ArrayView1<f32>, ctx: &ExecutionContext) -> Result<Array1<f32>> {
        let output = self.forward_batch(input.insert_axis(Axis(0)), ctx)?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Get the input size of the layer
    fn input_size(&self) -> usize;

    /// Get the output size of the layer
    fn output_size(&self) -> usize;

    /// Number of learned scalars (weights and biases)
    fn parameter_count(&self) -> usize;
}

/// Run a batch through a sequence of layers
pub fn forward_stack<L: Layer>(
    layers: &[L],
    inputs: Array2<f32>,
    ctx: &ExecutionContext,
) -> Result<Array2<f32>> {
    layers
        .iter()
        .try_fold(inputs, |x, layer| layer.forward_batch(x.view(), ctx))
}
