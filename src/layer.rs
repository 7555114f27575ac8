//! Learnable convolution layer.
//!
//! A [`ConvLayer`] owns one kernel grid and one scalar bias. Its forward pass
//! is [`corr2d`] followed by a broadcast bias add. The layer does no
//! differentiation of its own: gradients come from [`crate::backprop`] (or any
//! other source) and are applied in place through
//! [`ConvLayer::apply_gradients`] or the raw parameter accessors.

use crate::correlate::corr2d;
use crate::error::ShapeError;
use crate::grid::Grid;

/// Gradients of a loss with respect to a [`ConvLayer`]'s parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvGrads {
    /// `dL/dkernel`, shaped like the kernel.
    pub kernel: Grid,
    /// `dL/dbias`.
    pub bias: f64,
}

/// A single-channel convolution layer with a trainable kernel and bias.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvLayer {
    kernel: Grid,
    bias: f64,
}

impl ConvLayer {
    /// Wraps an existing kernel; the bias starts at zero.
    #[must_use]
    pub const fn new(kernel: Grid) -> Self {
        Self { kernel, bias: 0.0 }
    }

    /// Creates a layer with an `h×w` kernel whose cells are drawn from `init`
    /// in row-major order.
    ///
    /// # Errors
    /// Returns [`ShapeError::EmptyKernel`] for an empty kernel shape.
    ///
    /// # Example
    /// ```rust
    /// use briny_conv::layer::ConvLayer;
    /// let layer = ConvLayer::with_shape(1, 2, || 0.5).unwrap();
    /// assert_eq!(layer.kernel().data(), &[0.5, 0.5]);
    /// assert_eq!(layer.bias(), 0.0);
    /// ```
    pub fn with_shape(h: usize, w: usize, mut init: impl FnMut() -> f64) -> Result<Self, ShapeError> {
        if h == 0 || w == 0 {
            return Err(ShapeError::EmptyKernel((h, w)));
        }
        Ok(Self::new(Grid::from_fn(h, w, |_, _| init())))
    }

    #[inline]
    #[must_use]
    pub const fn kernel(&self) -> &Grid {
        &self.kernel
    }

    /// In-place access to the kernel cells for an external optimiser.
    #[inline]
    pub fn kernel_mut(&mut self) -> &mut Grid {
        &mut self.kernel
    }

    #[inline]
    #[must_use]
    pub const fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn bias_mut(&mut self) -> &mut f64 {
        &mut self.bias
    }

    /// Runs the layer on `input`. See [`forward`].
    ///
    /// # Errors
    /// Returns [`ShapeError::KernelTooLarge`] if the kernel does not fit `input`.
    pub fn forward(&self, input: &Grid) -> Result<Grid, ShapeError> {
        forward(self, input)
    }

    /// Gradient-descent step: `kernel -= lr * grads.kernel`, `bias -= lr * grads.bias`.
    ///
    /// The layer is left untouched if the gradient shape is wrong.
    ///
    /// # Errors
    /// Returns [`ShapeError::GradientMismatch`] if `grads.kernel` is not shaped
    /// like the kernel.
    pub fn apply_gradients(&mut self, grads: &ConvGrads, lr: f64) -> Result<(), ShapeError> {
        self.apply_kernel_gradient(&grads.kernel, lr)?;
        self.bias -= lr * grads.bias;
        Ok(())
    }

    /// Kernel-only variant of [`apply_gradients`](Self::apply_gradients); the bias is not touched.
    ///
    /// # Errors
    /// Returns [`ShapeError::GradientMismatch`] on a shape mismatch.
    pub fn apply_kernel_gradient(&mut self, grad: &Grid, lr: f64) -> Result<(), ShapeError> {
        if grad.shape() != self.kernel.shape() {
            return Err(ShapeError::GradientMismatch {
                kernel: self.kernel.shape(),
                grad: grad.shape(),
            });
        }
        for (w, g) in self.kernel.data_mut().iter_mut().zip(grad.data()) {
            *w -= lr * g;
        }
        Ok(())
    }
}

/// `corr2d(input, layer.kernel) + layer.bias`, broadcast over every output cell.
///
/// Reads the layer only; a fresh output grid is returned on every call.
///
/// # Errors
/// Returns [`ShapeError::KernelTooLarge`] if the kernel does not fit `input`.
pub fn forward(layer: &ConvLayer, input: &Grid) -> Result<Grid, ShapeError> {
    Ok(corr2d(input, &layer.kernel)?.add_scalar(layer.bias))
}
