use ndarray::{concatenate, Array2, ArrayView2, Axis, CowArray, Ix2};
use std::fmt;

use crate::activations::Activation;
use crate::config::CylinderNetConfig;
use crate::device::ExecutionContext;
use crate::dims::{CylinderDims, CYLINDER_ACTIONS};
use crate::dueling::DuelingHead;
use crate::error::Result;
use crate::layers::{forward_stack, init_rng, DenseLayer, LayerTrait};
use crate::network::QNetwork;
use crate::observation::CylinderObservation;

/// Place each observation part on the context device independently.
pub(crate) fn place_parts<'a>(
    parts: &[ArrayView2<'a, f32>],
    ctx: &ExecutionContext,
) -> Result<Vec<CowArray<'a, f32, Ix2>>> {
    parts.iter().map(|part| ctx.place(*part)).collect()
}

/// Dueling Q-network over the cylinder vector observation, 16 actions.
///
/// The concatenated observation is projected to `hidden_size`, passed
/// through `n_hidden` ReLU layers of the same width, then split into value
/// and advantage heads.
#[derive(Debug, Clone)]
pub struct CylinderNet {
    pub projection: DenseLayer,
    pub hidden: Vec<DenseLayer>,
    pub head: DuelingHead,
    dims: CylinderDims,
    ctx: ExecutionContext,
}

impl CylinderNet {
    pub fn new(hidden_size: usize, n_hidden: usize, use_acceleration: bool) -> Result<Self> {
        Self::from_config(&CylinderNetConfig::new(hidden_size, n_hidden, use_acceleration))
    }

    pub fn from_config(config: &CylinderNetConfig) -> Result<Self> {
        let ctx = ExecutionContext::new(config.use_acceleration)?;
        Self::with_context(config, ctx)
    }

    pub fn with_context(config: &CylinderNetConfig, ctx: ExecutionContext) -> Result<Self> {
        config.validate()?;
        let mut rng = init_rng(config.seed);
        let width = config.dims.feature_width();

        let projection = DenseLayer::initialized(width, config.hidden_size, Activation::Linear, &config.init, &mut rng);
        let hidden = (0..config.n_hidden)
            .map(|_| {
                DenseLayer::initialized(config.hidden_size, config.hidden_size, Activation::Relu, &config.init, &mut rng)
            })
            .collect();
        let head = DuelingHead::new(config.hidden_size, CYLINDER_ACTIONS, &config.init, &mut rng);

        tracing::debug!(
            hidden_size = config.hidden_size,
            n_hidden = config.n_hidden,
            device = %ctx.device_type(),
            "built cylinder network"
        );

        Ok(CylinderNet {
            projection,
            hidden,
            head,
            dims: config.dims,
            ctx,
        })
    }

    pub fn dims(&self) -> &CylinderDims {
        &self.dims
    }

    /// Concatenated observation `(batch, 21)` after device placement
    pub fn input_features(&self, observation: &CylinderObservation) -> Result<Array2<f32>> {
        observation.validate(&self.dims)?;
        let parts = observation.parts().map(|(_, part)| part);
        let placed = place_parts(&parts, &self.ctx)?;
        let views: Vec<_> = placed.iter().map(|part| part.view()).collect();
        Ok(concatenate(Axis(1), &views)?)
    }

    /// Output of the last hidden layer, input to both heads
    pub fn features(&self, observation: &CylinderObservation) -> Result<Array2<f32>> {
        let x = self.input_features(observation)?;
        let x = self.projection.forward_batch(x.view(), &self.ctx)?;
        forward_stack(&self.hidden, x, &self.ctx)
    }

    /// `(V, A)` before recombination
    pub fn decompose(&self, observation: &CylinderObservation) -> Result<(Array2<f32>, Array2<f32>)> {
        let features = self.features(observation)?;
        self.head.decompose(features.view(), &self.ctx)
    }

    pub fn forward(&self, observation: &CylinderObservation) -> Result<Array2<f32>> {
        let features = self.features(observation)?;
        tracing::trace!(batch = features.nrows(), "cylinder forward");
        self.head.forward(features.view(), &self.ctx)
    }
}

impl QNetwork for CylinderNet {
    type Observation = CylinderObservation;

    fn num_actions(&self) -> usize {
        self.head.num_actions()
    }

    fn q_values(&self, observation: &CylinderObservation) -> Result<Array2<f32>> {
        self.forward(observation)
    }

    fn parameter_count(&self) -> usize {
        self.projection.parameter_count()
            + self.hidden.iter().map(LayerTrait::parameter_count).sum::<usize>()
            + self.head.parameter_count()
    }

    fn context(&self) -> &ExecutionContext {
        &self.ctx
    }
}

impl fmt::Display for CylinderNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CylinderNet(")?;
        writeln!(f, "  (fc): {}", self.projection)?;
        for (i, layer) in self.hidden.iter().enumerate() {
            writeln!(f, "  (hidden.{}): {}", i, layer)?;
        }
        writeln!(f, "{}", self.head)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DuelingError;

    #[test]
    fn test_layer_shapes() {
        let net = CylinderNet::new(32, 3, false).unwrap();
        assert_eq!(net.projection.weights.dim(), (21, 32));
        assert_eq!(net.hidden.len(), 3);
        assert!(net.hidden.iter().all(|l| l.weights.dim() == (32, 32)));
        assert_eq!(net.head.advantage.weights.dim(), (32, 16));
        assert_eq!(net.num_actions(), 16);
    }

    #[test]
    fn test_output_width_independent_of_batch() {
        let net = CylinderNet::new(16, 1, false).unwrap();
        for batch in [1, 4, 9] {
            let obs = CylinderObservation::zeros(batch, net.dims());
            assert_eq!(net.forward(&obs).unwrap().dim(), (batch, 16));
        }
    }

    #[test]
    fn test_zero_hidden_size_rejected() {
        let err = CylinderNet::new(0, 1, false).unwrap_err();
        assert!(matches!(err, DuelingError::InvalidParameter { .. }));
    }

    #[test]
    fn test_concatenation_order() {
        let net = CylinderNet::new(4, 0, false).unwrap();
        let mut obs = CylinderObservation::zeros(1, net.dims());
        obs.config.fill(1.0);
        obs.tscs.fill(2.0);
        obs.rms.fill(3.0);
        obs.time.fill(4.0);
        let x = net.input_features(&obs).unwrap();
        assert_eq!(x.dim(), (1, 21));
        assert_eq!(x[[0, 0]], 1.0);
        assert_eq!(x[[0, 8]], 2.0);
        assert_eq!(x[[0, 19]], 3.0);
        assert_eq!(x[[0, 20]], 4.0);
    }

    #[test]
    fn test_parameter_count() {
        let net = CylinderNet::new(10, 2, false).unwrap();
        let expected = (21 * 10 + 10) + 2 * (10 * 10 + 10) + (10 + 1) + (10 * 16 + 16);
        assert_eq!(net.parameter_count(), expected);
    }
}
