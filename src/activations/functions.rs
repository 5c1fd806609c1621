use ndarray::{Array, Dimension};
use serde::{Serialize, Deserialize};

use crate::device::ExecutionContext;
use crate::error::Result;

/// An enumeration of the activation functions used by the dueling networks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Relu,
    Linear,
}

impl Activation {
    /// Apply the activation function through the context's compute backend.
    pub fn apply_on<D: Dimension>(
        &self,
        ctx: &ExecutionContext,
        input: Array<f32, D>,
    ) -> Result<Array<f32, D>> {
        match self {
            Activation::Relu => {
                let out = ctx.backend().relu(input.view().into_dyn())?;
                Ok(out.into_dimensionality::<D>()?)
            }
            Activation::Linear => Ok(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array4};

    #[test]
    fn test_relu_through_backend() {
        let out = Activation::Relu
            .apply_on(&ExecutionContext::host(), arr2(&[[-1.0, 2.0], [0.5, -0.0]]))
            .unwrap();
        assert_eq!(out, arr2(&[[0.0, 2.0], [0.5, 0.0]]));
    }

    #[test]
    fn test_linear_keeps_shape_and_values() {
        let input = Array4::from_elem((1, 2, 3, 3), -4.0);
        let out = Activation::Linear.apply_on(&ExecutionContext::host(), input.clone()).unwrap();
        assert_eq!(out, input);
    }
}
