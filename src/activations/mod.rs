//! # Activation Functions Module
//!
//! The dueling networks only need two activations:
//!
//! - **ReLU** (Rectified Linear Unit): `max(0, x)`, used on every hidden layer
//!   and after each convolution
//! - **Linear**: identity, used on the projection layer and both dueling heads
//!
//! ```rust
//! use dueling_q::activations::Activation;
//! use dueling_q::device::ExecutionContext;
//! use ndarray::array;
//!
//! let ctx = ExecutionContext::host();
//! let out = Activation::Relu.apply_on(&ctx, array![1.0, -0.5, 0.0, 2.0]).unwrap();
//! assert_eq!(out, array![1.0, 0.0, 0.0, 2.0]);
//! ```

pub mod functions;

pub use functions::Activation;
