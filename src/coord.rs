//! Coordinate augmentation for convolutional inputs
//!
//! Appends channels that encode each pixel's position so convolution filters
//! can tell where in the field they are.

use ndarray::{concatenate, Array2, Array4, ArrayView4, Axis};
use serde::{Serialize, Deserialize};

use crate::device::ExecutionContext;
use crate::error::Result;

/// Capability that adds coordinate channels to an image batch
pub trait CoordAugment: Send + Sync {
    /// Return `image` with extra channels appended, same spatial size
    fn augment(&self, image: ArrayView4<f32>, ctx: &ExecutionContext) -> Result<Array4<f32>>;

    /// How many channels `augment` appends
    fn added_channels(&self) -> usize;
}

/// Row and column coordinates on `[-1, 1]`, optionally a radius channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCoords {
    pub with_radius: bool,
}

impl AddCoords {
    pub fn new() -> Self {
        AddCoords { with_radius: false }
    }

    pub fn with_radius() -> Self {
        AddCoords { with_radius: true }
    }

    /// Coordinate planes `[channels, height, width]` for one sample
    fn planes(&self, height: usize, width: usize) -> Vec<Array2<f32>> {
        let rows = Array2::from_shape_fn((height, width), |(i, _)| normalized(i, height));
        let cols = Array2::from_shape_fn((height, width), |(_, j)| normalized(j, width));
        let mut planes = Vec::with_capacity(3);
        if self.with_radius {
            let radius = Array2::from_shape_fn((height, width), |(i, j)| rows[[i, j]].hypot(cols[[i, j]]));
            planes.extend([rows, cols, radius]);
        } else {
            planes.extend([rows, cols]);
        }
        planes
    }
}

fn normalized(index: usize, len: usize) -> f32 {
    if len <= 1 {
        0.0
    } else {
        index as f32 / (len - 1) as f32 * 2.0 - 1.0
    }
}

impl CoordAugment for AddCoords {
    fn augment(&self, image: ArrayView4<f32>, ctx: &ExecutionContext) -> Result<Array4<f32>> {
        let (batch_size, _, height, width) = image.dim();
        let planes = self.planes(height, width);

        let mut coords = Array4::zeros((batch_size, planes.len(), height, width));
        for mut sample in coords.axis_iter_mut(Axis(0)) {
            for (mut channel, plane) in sample.axis_iter_mut(Axis(0)).zip(&planes) {
                channel.assign(plane);
            }
        }

        let coords = ctx.place(coords.view())?;
        Ok(concatenate(Axis(1), &[image.view(), coords.view()])?)
    }

    fn added_channels(&self) -> usize {
        if self.with_radius {
            3
        } else {
            2
        }
    }
}
