use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, ArrayViewD};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ComputeBackend, CpuBackend, DeviceType};
use crate::error::Result;

/// Mock accelerator used when no real device is available.
///
/// Uploads copy the tensor and are counted, the arithmetic itself runs on the
/// host so results are bit-identical to [`CpuBackend`].
#[derive(Debug, Default)]
pub struct MockGpuBackend {
    host: CpuBackend,
    uploads: AtomicUsize,
}

impl MockGpuBackend {
    pub fn new() -> Self {
        tracing::warn!("Using mock GPU backend. Real GPU acceleration not available.");
        Self::default()
    }

    /// Number of tensors placed on this device so far
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::Relaxed)
    }

    pub fn reset_upload_count(&self) {
        self.uploads.store(0, Ordering::Relaxed);
    }
}

impl ComputeBackend for MockGpuBackend {
    fn upload(&self, data: ArrayViewD<f32>) -> Result<ArrayD<f32>> {
        self.uploads.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(shape = ?data.shape(), "upload to mock device");
        Ok(data.to_owned())
    }

    fn matmul(&self, a: ArrayView2<f32>, b: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.host.matmul(a, b)
    }

    fn add_bias(&self, a: ArrayView2<f32>, bias: ArrayView1<f32>) -> Result<Array2<f32>> {
        self.host.add_bias(a, bias)
    }

    fn relu(&self, input: ArrayViewD<f32>) -> Result<ArrayD<f32>> {
        self.host.relu(input)
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::MockGpu
    }
}
