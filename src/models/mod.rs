//! The three dueling Q-networks

pub mod coord_conv;
pub mod cylinder;
pub mod lander;

pub use coord_conv::CylinderCoordConv;
pub use cylinder::CylinderNet;
pub use lander::LanderNet;
