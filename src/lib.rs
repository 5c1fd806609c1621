//! # dueling_q - Dueling Q-networks for lander and cylinder-scattering control
//!
//! Function approximators mapping an observation to one Q-value per discrete
//! action. Every network ends in the same dueling head,
//! `Q = V + A - mean(A)`, and runs its forward pass through an
//! [`device::ExecutionContext`] that decides where the arithmetic happens.
//!
//! ## Quick Start
//!
//! ```rust
//! use dueling_q::models::CylinderNet;
//! use dueling_q::network::QNetwork;
//! use dueling_q::observation::CylinderObservation;
//!
//! let net = CylinderNet::new(64, 2, false).unwrap();
//! let obs = CylinderObservation::zeros(4, net.dims());
//! let q = net.q_values(&obs).unwrap();
//! assert_eq!(q.dim(), (4, 16));
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - ReLU and linear activations
//! - [`config`] - Network configuration, loadable from JSON
//! - [`coord`] - Coordinate-channel augmentation for images
//! - [`device`] - Execution context, compute backends, device placement
//! - [`dims`] - Declared input dimensions and derived layer widths
//! - [`dueling`] - The shared value/advantage head
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense and 2-D convolutional layers, weight initialization
//! - [`models`] - `LanderNet`, `CylinderNet`, `CylinderCoordConv`
//! - [`network`] - The `QNetwork` trait
//! - [`observation`] - Observation tuples for the cylinder environment

pub mod activations;
pub mod config;
pub mod coord;
pub mod device;
pub mod dims;
pub mod dueling;
pub mod error;
pub mod layers;
pub mod models;
pub mod network;
pub mod observation;
