//! Device placement for forward passes
//!
//! Networks never branch on an acceleration flag themselves. They receive an
//! [`ExecutionContext`] at construction, call [`ExecutionContext::place`] on
//! every observation part, and run all kernels through its [`ComputeBackend`].
//! The only accelerated backend shipped is [`MockGpuBackend`], which is what
//! `ExecutionContext::new(true)` selects when the `gpu-mock` feature is on.

pub mod backend;
pub mod context;
pub mod mock_backend;

pub use backend::{ComputeBackend, CpuBackend, DeviceType};
pub use context::ExecutionContext;
pub use mock_backend::MockGpuBackend;
