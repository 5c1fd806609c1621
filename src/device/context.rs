use ndarray::{ArrayView, CowArray, Dimension};
use std::fmt;
use std::sync::Arc;

use super::{ComputeBackend, CpuBackend, DeviceType};
use crate::error::Result;
#[cfg(not(feature = "gpu-mock"))]
use crate::error::DuelingError;

/// Where a network's forward pass runs.
///
/// Built once, handed to a network at construction, and used uniformly to
/// place every observation part before any layer touches it.
#[derive(Clone)]
pub struct ExecutionContext {
    backend: Arc<dyn ComputeBackend>,
}

impl ExecutionContext {
    /// Host or accelerated context depending on `use_acceleration`.
    pub fn new(use_acceleration: bool) -> Result<Self> {
        if use_acceleration {
            Self::accelerated()
        } else {
            Ok(Self::host())
        }
    }

    pub fn host() -> Self {
        Self::with_backend(Arc::new(CpuBackend::new()))
    }

    #[cfg(feature = "gpu-mock")]
    pub fn accelerated() -> Result<Self> {
        tracing::info!("Using MockGpu backend.");
        Ok(Self::with_backend(Arc::new(super::MockGpuBackend::new())))
    }

    #[cfg(not(feature = "gpu-mock"))]
    pub fn accelerated() -> Result<Self> {
        tracing::warn!("Accelerated execution requested but no device backend is compiled in");
        Err(DuelingError::DeviceUnavailable(
            "no accelerated backend available, enable the `gpu-mock` feature".to_string(),
        ))
    }

    pub fn with_backend(backend: Arc<dyn ComputeBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn ComputeBackend {
        self.backend.as_ref()
    }

    pub fn device_type(&self) -> DeviceType {
        self.backend.device_type()
    }

    pub fn is_accelerated(&self) -> bool {
        self.device_type().is_accelerated()
    }

    /// Place a tensor on this context's device.
    ///
    /// Host contexts borrow the input unchanged; accelerated contexts upload a copy.
    pub fn place<'a, D: Dimension>(&self, tensor: ArrayView<'a, f32, D>) -> Result<CowArray<'a, f32, D>> {
        if !self.is_accelerated() {
            return Ok(CowArray::from(tensor));
        }
        let uploaded = self.backend.upload(tensor.into_dyn())?;
        Ok(CowArray::from(uploaded.into_dimensionality::<D>()?))
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("device", &self.device_type())
            .finish()
    }
}
