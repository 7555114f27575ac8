//! Full-batch training loop for a single [`ConvLayer`].
//!
//! Each iteration runs, strictly in order: forward pass, squared-error loss,
//! backward pass, then an in-place SGD update. Nothing overlaps, so the layer
//! never needs locking.

use crate::backprop::{corr2d_backward, squared_error};
use crate::config::TrainConfig;
use crate::correlate::corr2d;
use crate::error::ShapeError;
use crate::grid::Grid;
use crate::layer::ConvLayer;
use crate::optim::{Optimizer, Sgd};
use log::{debug, info};

/// Fits `layer` so that `layer.forward(input)` approaches `target`.
///
/// # Returns
/// The loss measured at the start of every iteration, before that
/// iteration's update.
///
/// # Errors
/// Returns a [`ShapeError`] if the kernel does not fit `input` or `target`
/// is not shaped like the layer output. Either is detected before the first
/// update, leaving `layer` untouched.
///
/// # Example
/// ```rust
/// use briny_conv::{config::TrainConfig, layer::ConvLayer, train::{edge_detection_data, fit}};
///
/// let (x, y) = edge_detection_data().unwrap();
/// let mut layer = ConvLayer::with_shape(1, 2, || 0.0).unwrap();
/// let losses = fit(&mut layer, &x, &y, &TrainConfig::default()).unwrap();
/// assert!(losses.last() < losses.first());
/// ```
pub fn fit(
    layer: &mut ConvLayer,
    input: &Grid,
    target: &Grid,
    cfg: &TrainConfig,
) -> Result<Vec<f64>, ShapeError> {
    let mut opt = Sgd::with_lr(cfg.learning_rate);
    if !cfg.train_bias {
        opt = opt.kernel_only();
    }

    let mut losses = Vec::with_capacity(cfg.iterations);
    for epoch in 1..=cfg.iterations {
        let (pred, back) = corr2d_backward(input, layer)?;
        let (loss, loss_back) = squared_error(&pred, target)?;
        let grads = back(&loss_back(1.0));
        opt.step(layer, &grads)?;
        losses.push(loss);

        if cfg.log_every != 0 && epoch % cfg.log_every == 0 {
            info!("epoch {epoch}, loss {loss:.3}");
        }
        debug!("epoch {epoch}: kernel {:?}, bias {}", layer.kernel().data(), layer.bias());
    }

    Ok(losses)
}

/// The canonical edge-detection pair `(input, target)`.
///
/// `input` is a 6×8 grid of ones whose columns 2 through 5 are zero; `target`
/// is that input correlated with the horizontal edge kernel `[[1, -1]]`.
///
/// # Errors
/// Never fails in practice; the `Result` carries the correlation's signature.
pub fn edge_detection_data() -> Result<(Grid, Grid), ShapeError> {
    let input = Grid::from_fn(6, 8, |_, c| if (2..=5).contains(&c) { 0.0 } else { 1.0 });
    let target = corr2d(&input, &edge_kernel())?;
    Ok((input, target))
}

/// Horizontal edge kernel `[[1, -1]]`.
#[must_use]
pub fn edge_kernel() -> Grid {
    Grid::from_fn(1, 2, |_, c| if c == 0 { 1.0 } else { -1.0 })
}
