use ndarray::{Array, Array1, Dimension, ShapeBuilder};
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{StandardNormal, Uniform};
use serde::{Serialize, Deserialize};

use crate::error::{DuelingError, Result};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform on `[-1/sqrt(fan_in), 1/sqrt(fan_in)]` for weights and biases
    #[default]
    FanInUniform,

    /// Xavier/Glorot uniform initialization, zero biases
    XavierUniform,

    /// He/Kaiming normal initialization (for ReLU), zero biases
    HeNormal,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    pub fn validate(&self) -> Result<()> {
        if let WeightInit::Uniform { min, max } = self {
            if !(min.is_finite() && max.is_finite()) {
                return Err(DuelingError::invalid_parameter(
                    "init".to_string(),
                    format!("uniform bounds [{}, {}) must be finite", min, max),
                ));
            }
            if !(min < max) {
                return Err(DuelingError::invalid_parameter(
                    "init".to_string(),
                    format!("uniform range [{}, {}) is empty", min, max),
                ));
            }
            if !(max - min).is_finite() {
                return Err(DuelingError::invalid_parameter(
                    "init".to_string(),
                    format!("uniform range [{}, {}) overflows f32", min, max),
                ));
            }
        }
        Ok(())
    }

    /// Initialize a weight tensor of any rank.
    ///
    /// `fan_in`/`fan_out` are passed explicitly so dense matrices and
    /// convolution kernels share the same scaling rules.
    pub fn initialize<D, Sh>(&self, shape: Sh, fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Array<f32, D>
    where
        D: Dimension,
        Sh: ShapeBuilder<Dim = D>,
    {
        let fan_in = fan_in.max(1) as f32;
        let fan_out = fan_out.max(1) as f32;

        match self {
            WeightInit::FanInUniform => {
                let bound = 1.0 / fan_in.sqrt();
                Array::random_using(shape, Uniform::new_inclusive(-bound, bound), rng)
            }

            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out)).sqrt();
                Array::random_using(shape, Uniform::new_inclusive(-limit, limit), rng)
            }

            WeightInit::HeNormal => {
                let std = (2.0 / fan_in).sqrt();
                Array::<f32, D>::random_using(shape, StandardNormal, rng).mapv_into(|v| v * std)
            }

            WeightInit::Uniform { min, max } => {
                Array::random_using(shape, Uniform::new(*min, *max), rng)
            }

            WeightInit::Zeros => Array::zeros(shape),
        }
    }

    /// Initialize biases for a layer
    pub fn initialize_biases(&self, size: usize, fan_in: usize, rng: &mut StdRng) -> Array1<f32> {
        match self {
            WeightInit::FanInUniform => {
                let bound = 1.0 / (fan_in.max(1) as f32).sqrt();
                Array1::random_using(size, Uniform::new_inclusive(-bound, bound), rng)
            }

            WeightInit::Uniform { min, max } => {
                Array1::random_using(size, Uniform::new(*min, *max), rng)
            }

            WeightInit::XavierUniform | WeightInit::HeNormal | WeightInit::Zeros => {
                Array1::zeros(size)
            }
        }
    }
}

/// Random number generator for parameter initialization.
///
/// A fixed seed gives reproducible parameters, `None` draws from OS entropy.
pub fn init_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
