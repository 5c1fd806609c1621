use ndarray::{concatenate, Array2, ArrayView4, Axis};
use std::fmt;

use super::cylinder::place_parts;
use crate::activations::Activation;
use crate::config::CoordConvConfig;
use crate::coord::{AddCoords, CoordAugment};
use crate::device::ExecutionContext;
use crate::dims::{
    CylinderDims, ImageDims, CONV1_CHANNELS, CONV2_CHANNELS, CONV_KERNEL, CONV_STRIDE, CYLINDER_ACTIONS, FC1_WIDTH,
    FC2_WIDTH,
};
use crate::dueling::DuelingHead;
use crate::error::Result;
use crate::layers::{flatten, init_rng, Conv2DLayer, DenseLayer, LayerTrait};
use crate::network::QNetwork;
use crate::observation::CylinderImageObservation;

/// Dueling Q-network with a coordinate-augmented convolutional trunk.
///
/// The scattering field is augmented with coordinate channels and run
/// through two strided convolutions; the flattened result is fused with the
/// vector observation before two dense layers and the dueling head.
pub struct CylinderCoordConv {
    augment: Box<dyn CoordAugment>,
    pub conv1: Conv2DLayer,
    pub conv2: Conv2DLayer,
    pub fc1: DenseLayer,
    pub fc2: DenseLayer,
    pub head: DuelingHead,
    dims: CylinderDims,
    image: ImageDims,
    ctx: ExecutionContext,
}

impl CylinderCoordConv {
    pub fn new(use_acceleration: bool) -> Result<Self> {
        Self::from_config(&CoordConvConfig::new(use_acceleration))
    }

    pub fn from_config(config: &CoordConvConfig) -> Result<Self> {
        let ctx = ExecutionContext::new(config.use_acceleration)?;
        Self::with_augmenter(config, ctx, Box::new(AddCoords::new()))
    }

    /// Build with an injected coordinate augmentation capability.
    ///
    /// Conv input channels and the fused dense width are derived from the
    /// declared image size, the augmenter, and the vector part widths.
    pub fn with_augmenter(
        config: &CoordConvConfig,
        ctx: ExecutionContext,
        augment: Box<dyn CoordAugment>,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = init_rng(config.seed);
        let in_channels = config.image.channels + augment.added_channels();
        let kernel = (CONV_KERNEL, CONV_KERNEL);
        let stride = (CONV_STRIDE, CONV_STRIDE);

        let conv1 = Conv2DLayer::initialized(
            in_channels,
            CONV1_CHANNELS,
            kernel,
            stride,
            (0, 0),
            Activation::Relu,
            &config.init,
            &mut rng,
        )?;
        let conv2 = Conv2DLayer::initialized(
            CONV1_CHANNELS,
            CONV2_CHANNELS,
            kernel,
            stride,
            (0, 0),
            Activation::Relu,
            &config.init,
            &mut rng,
        )?;

        let (h1, w1) = conv1.output_dims(config.image.height, config.image.width)?;
        let fused_width = conv2.flattened_size(h1, w1)? + config.dims.feature_width();

        let fc1 = DenseLayer::initialized(fused_width, FC1_WIDTH, Activation::Relu, &config.init, &mut rng);
        let fc2 = DenseLayer::initialized(FC1_WIDTH, FC2_WIDTH, Activation::Relu, &config.init, &mut rng);
        let head = DuelingHead::new(FC2_WIDTH, CYLINDER_ACTIONS, &config.init, &mut rng);

        tracing::debug!(fused_width, device = %ctx.device_type(), "built coord-conv cylinder network");

        Ok(CylinderCoordConv {
            augment,
            conv1,
            conv2,
            fc1,
            fc2,
            head,
            dims: config.dims,
            image: config.image,
            ctx,
        })
    }

    pub fn dims(&self) -> &CylinderDims {
        &self.dims
    }

    pub fn image_dims(&self) -> &ImageDims {
        &self.image
    }

    /// Width of the fused vector entering `fc1`
    pub fn fused_width(&self) -> usize {
        self.fc1.input_size()
    }

    fn trunk(&self, image: ArrayView4<f32>) -> Result<Array2<f32>> {
        let x = self.augment.augment(image, &self.ctx)?;
        let x = self.conv1.forward_batch(x.view(), &self.ctx)?;
        let x = self.conv2.forward_batch(x.view(), &self.ctx)?;
        flatten(x)
    }

    /// Flattened convolutional features `(batch, 576)` for an image batch
    pub fn conv_features(&self, image: ArrayView4<f32>) -> Result<Array2<f32>> {
        let image = self.ctx.place(image)?;
        self.trunk(image.view())
    }

    /// Conv features fused with the vector parts, `(batch, 597)`
    pub fn fused_features(&self, observation: &CylinderImageObservation) -> Result<Array2<f32>> {
        observation.validate(&self.dims, &self.image)?;
        let image = self.ctx.place(observation.image.view())?;
        let parts = observation.vector.parts().map(|(_, part)| part);
        let placed = place_parts(&parts, &self.ctx)?;

        let conv = self.trunk(image.view())?;
        let views: Vec<_> = std::iter::once(conv.view())
            .chain(placed.iter().map(|part| part.view()))
            .collect();
        Ok(concatenate(Axis(1), &views)?)
    }

    /// Input to both heads
    pub fn features(&self, observation: &CylinderImageObservation) -> Result<Array2<f32>> {
        let x = self.fused_features(observation)?;
        let x = self.fc1.forward_batch(x.view(), &self.ctx)?;
        self.fc2.forward_batch(x.view(), &self.ctx)
    }

    /// `(V, A)` before recombination
    pub fn decompose(&self, observation: &CylinderImageObservation) -> Result<(Array2<f32>, Array2<f32>)> {
        let features = self.features(observation)?;
        self.head.decompose(features.view(), &self.ctx)
    }

    pub fn forward(&self, observation: &CylinderImageObservation) -> Result<Array2<f32>> {
        let features = self.features(observation)?;
        tracing::trace!(batch = features.nrows(), "coord-conv forward");
        self.head.forward(features.view(), &self.ctx)
    }
}

impl QNetwork for CylinderCoordConv {
    type Observation = CylinderImageObservation;

    fn num_actions(&self) -> usize {
        self.head.num_actions()
    }

    fn q_values(&self, observation: &CylinderImageObservation) -> Result<Array2<f32>> {
        self.forward(observation)
    }

    fn parameter_count(&self) -> usize {
        self.conv1.parameter_count()
            + self.conv2.parameter_count()
            + self.fc1.parameter_count()
            + self.fc2.parameter_count()
            + self.head.parameter_count()
    }

    fn context(&self) -> &ExecutionContext {
        &self.ctx
    }
}

impl fmt::Debug for CylinderCoordConv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CylinderCoordConv")
            .field("conv1", &self.conv1)
            .field("conv2", &self.conv2)
            .field("fc1", &self.fc1)
            .field("fc2", &self.fc2)
            .field("head", &self.head)
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for CylinderCoordConv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CylinderCoordConv(")?;
        writeln!(f, "  (addlayers): +{} coordinate channels", self.augment.added_channels())?;
        writeln!(f, "  (conv1): {}", self.conv1)?;
        writeln!(f, "  (conv2): {}", self.conv2)?;
        writeln!(f, "  (flat): Flatten()")?;
        writeln!(f, "  (fc1): {}", self.fc1)?;
        writeln!(f, "  (fc2): {}", self.fc2)?;
        writeln!(f, "{}", self.head)?;
        write!(f, ")")
    }
}
