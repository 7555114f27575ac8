//! Gradients for the convolution layer.
//!
//! # Manual backpropagation
//!
//! There is no tape and no graph here. Each function returns its forward value
//! together with a closure that maps an upstream gradient to gradients of its
//! inputs, and the caller chains them by hand:
//!
//! 1. [`corr2d_backward`] runs the layer and captures what the backward pass needs.
//! 2. [`squared_error`] scores the prediction and yields `dL/d(prediction)`.
//! 3. Feeding that into the first closure gives [`ConvGrads`] for the update.
//!
//! ## Example
//!
//! ```rust
//! use briny_conv::{grid, layer::ConvLayer, backprop::{corr2d_backward, squared_error}};
//!
//! let x = grid!([[1, 1, 0, 0]]);
//! let y = grid!([[0, 1, 0]]);
//! let mut layer = ConvLayer::new(grid!([[0.5, -0.5]]));
//!
//! let (pred, back) = corr2d_backward(&x, &layer).unwrap();
//! let (loss, loss_back) = squared_error(&pred, &y).unwrap();
//! let grads = back(&loss_back(1.0));
//! layer.apply_gradients(&grads, 0.1).unwrap();
//! assert!(loss > 0.0);
//! ```

use crate::correlate::output_shape;
use crate::error::ShapeError;
use crate::grid::Grid;
use crate::layer::{ConvGrads, ConvLayer};
use rayon::prelude::*;

/// Summed squared error `Σ (y - t)^2`.
///
/// # Returns
/// - Scalar loss
/// - Closure mapping `dL` to `dL/d(prediction) = 2 (y - t) dL`
///
/// # Errors
/// Returns [`ShapeError::ShapeMismatch`] if `prediction` and `target` differ in shape.
pub fn squared_error(
    prediction: &Grid,
    target: &Grid,
) -> Result<(f64, impl Fn(f64) -> Grid + use<>), ShapeError> {
    let diff = prediction.sub(target)?;
    let loss = diff.data().iter().map(|d| d * d).sum();
    let back = move |grad_output: f64| diff.map(|d| 2.0 * d * grad_output);
    Ok((loss, back))
}

/// Forward pass of `layer` on `input`, with a closure for its parameter gradients.
///
/// Given `g = dL/d(output)`:
/// - `dL/dkernel[di, dj] = Σ_{i,j} g[i, j] · input[i + di, j + dj]`
/// - `dL/dbias = Σ_{i,j} g[i, j]`
///
/// # Errors
/// Returns [`ShapeError::KernelTooLarge`] if the kernel does not fit `input`.
///
/// # Panics
/// The returned closure panics if `g` is not shaped like the forward output.
pub fn corr2d_backward<'a>(
    input: &'a Grid,
    layer: &ConvLayer,
) -> Result<(Grid, impl Fn(&Grid) -> ConvGrads + use<'a>), ShapeError> {
    let out = layer.forward(input)?;
    let out_shape = output_shape(input, layer.kernel())?;
    let (h_k, w_k) = layer.kernel().shape();

    let back = move |grad_out: &Grid| {
        assert_eq!(
            grad_out.shape(),
            out_shape,
            "upstream gradient shape does not match forward output"
        );
        let (out_h, out_w) = out_shape;
        let w_in = input.cols();
        let x = input.data();
        let g = grad_out.data();

        // one kernel cell per task; each is an independent reduction over the output
        let kernel: Vec<f64> = (0..h_k * w_k)
            .into_par_iter()
            .map(|idx| {
                let (di, dj) = (idx / w_k, idx % w_k);
                let mut acc = 0.0;
                for i in 0..out_h {
                    let x_row = &x[(i + di) * w_in + dj..][..out_w];
                    let g_row = &g[i * out_w..][..out_w];
                    for (a, b) in g_row.iter().zip(x_row) {
                        acc += a * b;
                    }
                }
                acc
            })
            .collect();

        ConvGrads {
            kernel: Grid::from_fn(h_k, w_k, |r, c| kernel[r * w_k + c]),
            bias: grad_out.sum(),
        }
    };

    Ok((out, back))
}
