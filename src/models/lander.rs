use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::fmt;

use crate::activations::Activation;
use crate::config::LanderConfig;
use crate::device::ExecutionContext;
use crate::dims::{LANDER_ACTIONS, LANDER_HIDDEN, LANDER_STATE_DIM};
use crate::dueling::DuelingHead;
use crate::error::{DuelingError, Result};
use crate::layers::{init_rng, DenseLayer, LayerTrait};
use crate::network::QNetwork;

/// Dueling Q-network for the lunar-lander task: 8 state features, 4 actions.
///
/// `fc1` (8 -> 100, ReLU) feeds a value head (100 -> 1) and an advantage
/// head (100 -> 4).
#[derive(Debug, Clone)]
pub struct LanderNet {
    pub fc1: DenseLayer,
    pub head: DuelingHead,
    ctx: ExecutionContext,
}

impl LanderNet {
    /// Host network with default initialization
    pub fn new() -> Self {
        Self::build(&LanderConfig::default(), ExecutionContext::host())
    }

    pub fn from_config(config: &LanderConfig) -> Result<Self> {
        let ctx = ExecutionContext::new(config.use_acceleration)?;
        Self::with_context(config, ctx)
    }

    pub fn with_context(config: &LanderConfig, ctx: ExecutionContext) -> Result<Self> {
        config.init.validate()?;
        Ok(Self::build(config, ctx))
    }

    fn build(config: &LanderConfig, ctx: ExecutionContext) -> Self {
        let mut rng = init_rng(config.seed);
        let fc1 = DenseLayer::initialized(LANDER_STATE_DIM, LANDER_HIDDEN, Activation::Relu, &config.init, &mut rng);
        let head = DuelingHead::new(LANDER_HIDDEN, LANDER_ACTIONS, &config.init, &mut rng);
        tracing::debug!(device = %ctx.device_type(), "built lander network");
        LanderNet { fc1, head, ctx }
    }

    /// Hidden features `(batch, 100)` shared by both heads
    pub fn features(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        if states.ncols() != LANDER_STATE_DIM {
            return Err(DuelingError::width_mismatch("state", LANDER_STATE_DIM, states.ncols()));
        }
        let states = self.ctx.place(states)?;
        self.fc1.forward_batch(states.view(), &self.ctx)
    }

    pub fn forward_batch(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        let features = self.features(states)?;
        tracing::trace!(batch = features.nrows(), "lander forward");
        self.head.forward(features.view(), &self.ctx)
    }

    /// Q-values for a single 8-element state
    pub fn forward(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        let q_values = self.forward_batch(state.insert_axis(Axis(0)))?;
        Ok(q_values.index_axis_move(Axis(0), 0))
    }

    /// `(V, A)` before recombination
    pub fn decompose(&self, states: ArrayView2<f32>) -> Result<(Array2<f32>, Array2<f32>)> {
        let features = self.features(states)?;
        self.head.decompose(features.view(), &self.ctx)
    }
}

impl Default for LanderNet {
    fn default() -> Self {
        Self::new()
    }
}

impl QNetwork for LanderNet {
    type Observation = Array2<f32>;

    fn num_actions(&self) -> usize {
        self.head.num_actions()
    }

    fn q_values(&self, observation: &Array2<f32>) -> Result<Array2<f32>> {
        self.forward_batch(observation.view())
    }

    fn parameter_count(&self) -> usize {
        self.fc1.parameter_count() + self.head.parameter_count()
    }

    fn context(&self) -> &ExecutionContext {
        &self.ctx
    }
}

impl fmt::Display for LanderNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LanderNet(")?;
        writeln!(f, "  (fc1): {}", self.fc1)?;
        writeln!(f, "{}", self.head)?;
        write!(f, ")")
    }
}
