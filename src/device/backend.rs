use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, ArrayViewD};
use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::{DuelingError, Result};

/// Supported device types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Cpu,
    MockGpu,
}

impl DeviceType {
    pub fn is_accelerated(&self) -> bool {
        !matches!(self, DeviceType::Cpu)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Cpu => write!(f, "cpu"),
            DeviceType::MockGpu => write!(f, "mock-gpu"),
        }
    }
}

/// Trait for compute backends
///
/// Every numeric kernel used by the networks goes through one of these
/// operations, so the backend decides where the arithmetic runs.
pub trait ComputeBackend: Send + Sync {
    /// Copy a host tensor onto the device
    fn upload(&self, data: ArrayViewD<f32>) -> Result<ArrayD<f32>>;

    /// Matrix multiplication
    fn matmul(&self, a: ArrayView2<f32>, b: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Add a bias row to every row of `a`
    fn add_bias(&self, a: ArrayView2<f32>, bias: ArrayView1<f32>) -> Result<Array2<f32>>;

    /// Rectified-linear activation
    fn relu(&self, input: ArrayViewD<f32>) -> Result<ArrayD<f32>>;

    /// Get device type
    fn device_type(&self) -> DeviceType;
}

/// Host backend, computing directly with ndarray
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl ComputeBackend for CpuBackend {
    fn upload(&self, data: ArrayViewD<f32>) -> Result<ArrayD<f32>> {
        Ok(data.to_owned())
    }

    fn matmul(&self, a: ArrayView2<f32>, b: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (m, k) = a.dim();
        let (k2, n) = b.dim();

        if k != k2 {
            return Err(DuelingError::dimension_mismatch(
                format!("({}, {}) x ({}, n)", m, k, k),
                format!("({}, {}) x ({}, {})", m, k, k2, n),
            ));
        }

        Ok(a.dot(&b))
    }

    fn add_bias(&self, a: ArrayView2<f32>, bias: ArrayView1<f32>) -> Result<Array2<f32>> {
        if a.ncols() != bias.len() {
            return Err(DuelingError::width_mismatch("bias", a.ncols(), bias.len()));
        }

        Ok(&a + &bias)
    }

    fn relu(&self, input: ArrayViewD<f32>) -> Result<ArrayD<f32>> {
        Ok(input.mapv(|x| x.max(0.0)))
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Cpu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_matmul_rejects_inner_mismatch() {
        let a = Array2::<f32>::zeros((2, 3));
        let b = Array2::<f32>::zeros((4, 2));
        let err = CpuBackend::new().matmul(a.view(), b.view()).unwrap_err();
        assert!(matches!(err, DuelingError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_add_bias_broadcasts_rows() {
        let a = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let bias = arr1(&[10.0, 20.0]);
        let out = CpuBackend::new().add_bias(a.view(), bias.view()).unwrap();
        assert_eq!(out, arr2(&[[11.0, 22.0], [13.0, 24.0]]));
    }

    #[test]
    fn test_relu_clamps_negatives() {
        let x = arr1(&[-1.0, 0.0, 2.5]).into_dyn();
        let out = CpuBackend::new().relu(x.view()).unwrap();
        assert_eq!(out, arr1(&[0.0, 0.0, 2.5]).into_dyn());
    }
}
