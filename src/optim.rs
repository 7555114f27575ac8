//! Optimisers that turn [`ConvGrads`] into parameter updates.

use crate::error::ShapeError;
use crate::layer::{ConvGrads, ConvLayer};

/// A parameter update rule for a [`ConvLayer`].
pub trait Optimizer {
    /// Builds the optimiser with the given learning rate.
    fn with_lr(lr: f64) -> Self;

    /// Applies one update to `layer` in place.
    ///
    /// # Errors
    /// Returns [`ShapeError::GradientMismatch`] if `grads` do not fit the layer.
    fn step(&mut self, layer: &mut ConvLayer, grads: &ConvGrads) -> Result<(), ShapeError>;
}

/// Plain gradient descent: `param -= lr * grad`.
///
/// With `train_bias` off, only the kernel moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    lr: f64,
    train_bias: bool,
}

impl Sgd {
    /// Leaves the bias fixed.
    #[must_use]
    pub const fn kernel_only(mut self) -> Self {
        self.train_bias = false;
        self
    }
}

impl Optimizer for Sgd {
    fn with_lr(lr: f64) -> Self {
        Self {
            lr,
            train_bias: true,
        }
    }

    fn step(&mut self, layer: &mut ConvLayer, grads: &ConvGrads) -> Result<(), ShapeError> {
        if self.train_bias {
            layer.apply_gradients(grads, self.lr)
        } else {
            layer.apply_kernel_gradient(&grads.kernel, self.lr)
        }
    }
}
