//! Declared input dimensions and the layer widths derived from them
//!
//! The cylinder widths describe the TSCS environment with four cylinders
//! (x and y per cylinder), eleven scattering frequencies, one RMS value and
//! one time step, rendered as a single-channel 50 x 50 field.

use serde::{Serialize, Deserialize};

use crate::error::{DuelingError, Result};

pub const LANDER_STATE_DIM: usize = 8;
pub const LANDER_HIDDEN: usize = 100;
pub const LANDER_ACTIONS: usize = 4;

pub const CYLINDER_ACTIONS: usize = 16;

/// Width of the concatenated vector observation for the default environment
pub const CYLINDER_FEATURE_WIDTH: usize = 21;

/// Width of conv features plus vector parts entering the first dense layer
pub const COORD_CONV_FUSED_WIDTH: usize = 597;

/// Image channels after coordinate augmentation
pub const COORD_CONV_IN_CHANNELS: usize = 3;
pub const CONV1_CHANNELS: usize = 8;
pub const CONV2_CHANNELS: usize = 16;
pub const CONV_KERNEL: usize = 10;
pub const CONV_STRIDE: usize = 2;
pub const FC1_WIDTH: usize = 256;
pub const FC2_WIDTH: usize = 128;

/// Widths of the four vector parts of a cylinder observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderDims {
    pub config: usize,
    pub tscs: usize,
    pub rms: usize,
    pub time: usize,
}

impl Default for CylinderDims {
    fn default() -> Self {
        CylinderDims {
            config: 8,
            tscs: 11,
            rms: 1,
            time: 1,
        }
    }
}

impl CylinderDims {
    pub fn feature_width(&self) -> usize {
        self.config + self.tscs + self.rms + self.time
    }

    pub fn validate(&self) -> Result<()> {
        for (name, width) in [("config", self.config), ("tscs", self.tscs), ("rms", self.rms), ("time", self.time)] {
            if width == 0 {
                return Err(DuelingError::invalid_parameter(name, "observation part width must be positive"));
            }
        }
        Ok(())
    }
}

/// Shape of the scattering-field image before coordinate augmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDims {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Default for ImageDims {
    fn default() -> Self {
        ImageDims {
            channels: 1,
            height: 50,
            width: 50,
        }
    }
}

impl ImageDims {
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 || self.height == 0 || self.width == 0 {
            return Err(DuelingError::invalid_parameter(
                "image".to_string(),
                format!("{}x{}x{} has an empty dimension", self.channels, self.height, self.width),
            ));
        }
        Ok(())
    }
}
