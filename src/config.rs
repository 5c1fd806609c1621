//! Construction parameters for the three networks
//!
//! Every struct has defaults matching the reference hyper-parameters, so a
//! JSON file only needs the fields it overrides:
//!
//! ```json
//! { "cylinder": { "hidden_size": 64, "n_hidden": 2, "use_acceleration": false } }
//! ```

use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use crate::dims::{CylinderDims, ImageDims};
use crate::error::{DuelingError, Result};
use crate::layers::WeightInit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LanderConfig {
    pub use_acceleration: bool,
    pub init: WeightInit,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderNetConfig {
    /// Width of the projection and every hidden layer
    pub hidden_size: usize,
    /// Number of hidden layers after the projection, may be zero
    pub n_hidden: usize,
    pub use_acceleration: bool,
    pub init: WeightInit,
    pub seed: Option<u64>,
    pub dims: CylinderDims,
}

impl Default for CylinderNetConfig {
    fn default() -> Self {
        CylinderNetConfig {
            hidden_size: 128,
            n_hidden: 1,
            use_acceleration: false,
            init: WeightInit::default(),
            seed: None,
            dims: CylinderDims::default(),
        }
    }
}

impl CylinderNetConfig {
    pub fn new(hidden_size: usize, n_hidden: usize, use_acceleration: bool) -> Self {
        CylinderNetConfig {
            hidden_size,
            n_hidden,
            use_acceleration,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.hidden_size == 0 {
            return Err(DuelingError::invalid_parameter("hidden_size", "must be positive"));
        }
        self.dims.validate()?;
        self.init.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordConvConfig {
    pub use_acceleration: bool,
    pub init: WeightInit,
    pub seed: Option<u64>,
    pub dims: CylinderDims,
    pub image: ImageDims,
}

impl Default for CoordConvConfig {
    fn default() -> Self {
        CoordConvConfig {
            use_acceleration: false,
            init: WeightInit::default(),
            seed: None,
            dims: CylinderDims::default(),
            image: ImageDims::default(),
        }
    }
}

impl CoordConvConfig {
    pub fn new(use_acceleration: bool) -> Self {
        CoordConvConfig {
            use_acceleration,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.dims.validate()?;
        self.image.validate()?;
        self.init.validate()
    }
}

/// One file configuring all three networks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    pub lander: LanderConfig,
    pub cylinder: CylinderNetConfig,
    pub coord_conv: CoordConvConfig,
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Force every network onto (or off) the accelerated device
    pub fn with_acceleration(mut self, use_acceleration: bool) -> Self {
        self.lander.use_acceleration = use_acceleration;
        self.cylinder.use_acceleration = use_acceleration;
        self.coord_conv.use_acceleration = use_acceleration;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.lander.init.validate()?;
        self.cylinder.validate()?;
        self.coord_conv.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ModelConfig::from_json_str(r#"{ "cylinder": { "n_hidden": 0, "seed": 9 } }"#).unwrap();
        assert_eq!(config.cylinder.n_hidden, 0);
        assert_eq!(config.cylinder.hidden_size, 128);
        assert_eq!(config.cylinder.seed, Some(9));
        assert_eq!(config.coord_conv, CoordConvConfig::default());
    }

    #[test]
    fn test_weight_init_is_tagged() {
        let config = ModelConfig::from_json_str(
            r#"{ "lander": { "init": { "kind": "uniform", "min": -0.1, "max": 0.1 } } }"#,
        )
        .unwrap();
        assert_eq!(config.lander.init, WeightInit::Uniform { min: -0.1, max: 0.1 });
    }

    #[test]
    fn test_zero_hidden_size_rejected() {
        let err = ModelConfig::from_json_str(r#"{ "cylinder": { "hidden_size": 0 } }"#).unwrap_err();
        assert!(matches!(err, DuelingError::InvalidParameter { .. }));
    }

    #[test]
    fn test_overflowing_uniform_init_rejected_before_build() {
        let err = ModelConfig::from_json_str(
            r#"{ "cylinder": { "init": { "kind": "uniform", "min": -3.0e38, "max": 3.0e38 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DuelingError::InvalidParameter { .. }));

        let config = CylinderNetConfig {
            init: WeightInit::Uniform { min: -3.0e38, max: 3.0e38 },
            ..CylinderNetConfig::default()
        };
        assert!(crate::models::CylinderNet::from_config(&config).is_err());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = ModelConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DuelingError::Config(_)));
    }

    #[test]
    fn test_with_acceleration_sets_all() {
        let config = ModelConfig::default().with_acceleration(true);
        assert!(config.lander.use_acceleration);
        assert!(config.cylinder.use_acceleration);
        assert!(config.coord_conv.use_acceleration);
    }
}
