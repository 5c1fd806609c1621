pub mod traits;
pub mod dense;
pub mod conv;
pub mod initialization;

pub use traits::{forward_stack, Layer as LayerTrait};
pub use dense::DenseLayer;
pub use conv::{flatten, Conv2DLayer};
pub use initialization::{init_rng, WeightInit};
