//! 2-D convolution over `[batch, channels, height, width]` tensors
//!
//! The forward pass unrolls input patches into a matrix (im2col) and runs a
//! single matrix product through the context's compute backend.

use ndarray::{s, Array2, Array4, ArrayView4};
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};
use std::fmt;

use super::initialization::{init_rng, WeightInit};
use crate::activations::Activation;
use crate::device::ExecutionContext;
use crate::error::{DuelingError, Result};

/// 2D Convolutional Layer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Conv2DLayer {
    /// Convolution kernels/filters [out_channels, in_channels, kernel_height, kernel_width]
    pub kernels: Array4<f32>,

    /// Bias terms for each output channel
    pub biases: ndarray::Array1<f32>,

    /// Activation function
    pub activation: Activation,

    /// Stride for convolution
    pub stride: (usize, usize),

    /// Padding for convolution
    pub padding: (usize, usize),
}

impl Conv2DLayer {
    /// Create a new 2D convolutional layer with the default initialization
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        activation: Activation,
    ) -> Result<Self> {
        Self::initialized(
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
            activation,
            &WeightInit::default(),
            &mut init_rng(None),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn initialized(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        activation: Activation,
        init: &WeightInit,
        rng: &mut StdRng,
    ) -> Result<Self> {
        if stride.0 == 0 || stride.1 == 0 {
            return Err(DuelingError::invalid_parameter("stride", "must be positive"));
        }
        if kernel_size.0 == 0 || kernel_size.1 == 0 {
            return Err(DuelingError::invalid_parameter("kernel_size", "must be positive"));
        }
        if in_channels == 0 || out_channels == 0 {
            return Err(DuelingError::invalid_parameter("channels", "must be positive"));
        }

        let fan_in = in_channels * kernel_size.0 * kernel_size.1;
        let fan_out = out_channels * kernel_size.0 * kernel_size.1;
        let kernels = init.initialize(
            (out_channels, in_channels, kernel_size.0, kernel_size.1),
            fan_in,
            fan_out,
            rng,
        );
        let biases = init.initialize_biases(out_channels, fan_in, rng);

        Ok(Conv2DLayer {
            kernels,
            biases,
            activation,
            stride,
            padding,
        })
    }

    pub fn in_channels(&self) -> usize {
        self.kernels.dim().1
    }

    pub fn out_channels(&self) -> usize {
        self.kernels.dim().0
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        let (_, _, kh, kw) = self.kernels.dim();
        (kh, kw)
    }

    pub fn parameter_count(&self) -> usize {
        self.kernels.len() + self.biases.len()
    }

    /// Spatial output size for an input of `(height, width)`
    pub fn output_dims(&self, height: usize, width: usize) -> Result<(usize, usize)> {
        let (kh, kw) = self.kernel_size();
        let padded_h = height + 2 * self.padding.0;
        let padded_w = width + 2 * self.padding.1;
        if padded_h < kh || padded_w < kw {
            return Err(DuelingError::dimension_mismatch(
                format!("spatial size of at least {}x{}", kh, kw),
                format!("{}x{} after padding", padded_h, padded_w),
            ));
        }
        Ok(((padded_h - kh) / self.stride.0 + 1, (padded_w - kw) / self.stride.1 + 1))
    }

    /// Length of one flattened output sample `[channels * height * width]`
    pub fn flattened_size(&self, height: usize, width: usize) -> Result<usize> {
        let (oh, ow) = self.output_dims(height, width)?;
        Ok(self.out_channels() * oh * ow)
    }

    /// Pad input with zeros
    fn pad_input(&self, input: ArrayView4<f32>) -> Array4<f32> {
        let (batch_size, channels, height, width) = input.dim();
        let padded_height = height + 2 * self.padding.0;
        let padded_width = width + 2 * self.padding.1;

        let mut padded = Array4::zeros((batch_size, channels, padded_height, padded_width));
        let center = s![.., .., self.padding.0..self.padding.0 + height, self.padding.1..self.padding.1 + width];
        padded.slice_mut(center).assign(&input);

        padded
    }

    /// Unroll every receptive field into one row of a `(batch * oh * ow, c * kh * kw)` matrix
    fn im2col(&self, input: ArrayView4<f32>, out_height: usize, out_width: usize) -> Array2<f32> {
        let (batch_size, channels, _, _) = input.dim();
        let (kh, kw) = self.kernel_size();
        let mut cols = Array2::zeros((batch_size * out_height * out_width, channels * kh * kw));

        for b in 0..batch_size {
            for oh in 0..out_height {
                for ow in 0..out_width {
                    let h_start = oh * self.stride.0;
                    let w_start = ow * self.stride.1;
                    let patch = input.slice(s![b, .., h_start..h_start + kh, w_start..w_start + kw]);
                    let row = (b * out_height + oh) * out_width + ow;
                    for (dst, src) in cols.row_mut(row).iter_mut().zip(patch.iter()) {
                        *dst = *src;
                    }
                }
            }
        }

        cols
    }

    /// Forward pass for batch of images [batch, channels, height, width]
    pub fn forward_batch(&self, input: ArrayView4<f32>, ctx: &ExecutionContext) -> Result<Array4<f32>> {
        let (batch_size, channels, height, width) = input.dim();
        if channels != self.in_channels() {
            return Err(DuelingError::dimension_mismatch(
                format!("{} input channels", self.in_channels()),
                format!("{} input channels", channels),
            ));
        }
        let (out_height, out_width) = self.output_dims(height, width)?;

        let cols = if self.padding.0 > 0 || self.padding.1 > 0 {
            let padded = self.pad_input(input);
            self.im2col(padded.view(), out_height, out_width)
        } else {
            self.im2col(input, out_height, out_width)
        };

        let out_channels = self.out_channels();
        let kernel_matrix = self
            .kernels
            .view()
            .into_shape((out_channels, self.kernels.len() / out_channels))?;

        let backend = ctx.backend();
        let conv = backend.matmul(cols.view(), kernel_matrix.t())?;
        let conv = backend.add_bias(conv.view(), self.biases.view())?;

        // (batch * oh * ow, oc) -> (batch, oc, oh, ow)
        let output = conv
            .into_shape((batch_size, out_height, out_width, out_channels))?
            .permuted_axes([0, 3, 1, 2])
            .as_standard_layout()
            .into_owned();

        self.activation.apply_on(ctx, output)
    }
}

/// Flatten `[batch, c, h, w]` into `[batch, c * h * w]`, channel-major per sample
pub fn flatten(input: Array4<f32>) -> Result<Array2<f32>> {
    let (batch_size, channels, height, width) = input.dim();
    let features = channels * height * width;
    let standard = input.as_standard_layout().into_owned();
    Ok(standard.into_shape((batch_size, features))?)
}

impl fmt::Display for Conv2DLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conv2d({}, {}, kernel_size={:?}, stride={:?}, padding={:?}, activation={:?})",
            self.in_channels(),
            self.out_channels(),
            self.kernel_size(),
            self.stride,
            self.padding,
            self.activation
        )
    }
}
