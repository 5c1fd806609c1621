//! Observation tuples supplied by the environment
//!
//! Vector parts are `(batch, width)`, the image is `(batch, channels, height, width)`.

use ndarray::{Array2, Array4, ArrayView2};

use crate::dims::{CylinderDims, ImageDims};
use crate::error::{DuelingError, Result};

/// Vector observation of the cylinder environment
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderObservation {
    /// Cylinder positions
    pub config: Array2<f32>,
    /// Target scattering cross-section
    pub tscs: Array2<f32>,
    pub rms: Array2<f32>,
    pub time: Array2<f32>,
}

impl CylinderObservation {
    pub fn new(config: Array2<f32>, tscs: Array2<f32>, rms: Array2<f32>, time: Array2<f32>) -> Self {
        CylinderObservation { config, tscs, rms, time }
    }

    pub fn zeros(batch_size: usize, dims: &CylinderDims) -> Self {
        CylinderObservation {
            config: Array2::zeros((batch_size, dims.config)),
            tscs: Array2::zeros((batch_size, dims.tscs)),
            rms: Array2::zeros((batch_size, dims.rms)),
            time: Array2::zeros((batch_size, dims.time)),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.config.nrows()
    }

    /// Parts in concatenation order
    pub fn parts(&self) -> [(&'static str, ArrayView2<'_, f32>); 4] {
        [
            ("config", self.config.view()),
            ("tscs", self.tscs.view()),
            ("rms", self.rms.view()),
            ("time", self.time.view()),
        ]
    }

    /// Check every part width and that all parts share a batch size
    pub fn validate(&self, dims: &CylinderDims) -> Result<()> {
        let expected = [dims.config, dims.tscs, dims.rms, dims.time];
        let batch_size = self.batch_size();
        for ((name, part), width) in self.parts().into_iter().zip(expected) {
            if part.ncols() != width {
                return Err(DuelingError::width_mismatch(name, width, part.ncols()));
            }
            if part.nrows() != batch_size {
                return Err(DuelingError::dimension_mismatch(
                    format!("{} batch {}", name, batch_size),
                    format!("{} batch {}", name, part.nrows()),
                ));
            }
        }
        Ok(())
    }
}

/// Vector observation plus the scattering-field image
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderImageObservation {
    pub vector: CylinderObservation,
    pub image: Array4<f32>,
}

impl CylinderImageObservation {
    pub fn new(vector: CylinderObservation, image: Array4<f32>) -> Self {
        CylinderImageObservation { vector, image }
    }

    pub fn zeros(batch_size: usize, dims: &CylinderDims, image: &ImageDims) -> Self {
        CylinderImageObservation {
            vector: CylinderObservation::zeros(batch_size, dims),
            image: Array4::zeros((batch_size, image.channels, image.height, image.width)),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.vector.batch_size()
    }

    pub fn validate(&self, dims: &CylinderDims, image: &ImageDims) -> Result<()> {
        self.vector.validate(dims)?;
        let expected = (self.batch_size(), image.channels, image.height, image.width);
        if self.image.dim() != expected {
            return Err(DuelingError::dimension_mismatch(
                format!("image {:?}", expected),
                format!("image {:?}", self.image.dim()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_match_dims() {
        let dims = CylinderDims::default();
        let obs = CylinderObservation::zeros(3, &dims);
        assert_eq!(obs.batch_size(), 3);
        assert!(obs.validate(&dims).is_ok());
        let total: usize = obs.parts().iter().map(|(_, p)| p.ncols()).sum();
        assert_eq!(total, dims.feature_width());
    }

    #[test]
    fn test_validate_names_the_bad_part() {
        let dims = CylinderDims::default();
        let mut obs = CylinderObservation::zeros(1, &dims);
        obs.tscs = Array2::zeros((1, 10));
        assert_eq!(obs.validate(&dims).unwrap_err(), DuelingError::width_mismatch("tscs", 11, 10));
    }

    #[test]
    fn test_validate_rejects_ragged_batch() {
        let dims = CylinderDims::default();
        let mut obs = CylinderObservation::zeros(2, &dims);
        obs.time = Array2::zeros((1, 1));
        assert!(obs.validate(&dims).is_err());
    }

    #[test]
    fn test_image_shape_checked() {
        let dims = CylinderDims::default();
        let image = ImageDims::default();
        let mut obs = CylinderImageObservation::zeros(2, &dims, &image);
        assert!(obs.validate(&dims, &image).is_ok());
        obs.image = Array4::zeros((2, 1, 48, 50));
        assert!(obs.validate(&dims, &image).is_err());
    }
}
