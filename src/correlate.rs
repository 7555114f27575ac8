//! Two-dimensional cross-correlation.
//!
//! # Sliding-window multiply and sum
//!
//! For an input of shape `H×W` and a kernel of shape `h×w`, the output has
//! shape `(H-h+1)×(W-w+1)` and
//!
//! $$ out_{i,j} = \\sum_{d_i<h} \\sum_{d_j<w} x_{i+d_i,\\,j+d_j} \\cdot k_{d_i,d_j} $$
//!
//! Output rows are filled in parallel with [`rayon`](https://docs.rs/rayon).
//! Every cell is reduced sequentially in the same order, so the result does
//! not depend on thread scheduling.

use crate::error::ShapeError;
use crate::grid::Grid;
use log::trace;
use rayon::prelude::*;

/// Output shape of correlating `input` with `kernel`.
///
/// # Errors
/// - [`ShapeError::EmptyKernel`] if the kernel has no cells
/// - [`ShapeError::KernelTooLarge`] if it exceeds the input along either axis
pub fn output_shape(input: &Grid, kernel: &Grid) -> Result<(usize, usize), ShapeError> {
    let (h_in, w_in) = input.shape();
    let (h_k, w_k) = kernel.shape();
    if h_k == 0 || w_k == 0 {
        return Err(ShapeError::EmptyKernel(kernel.shape()));
    }
    if h_k > h_in || w_k > w_in {
        return Err(ShapeError::KernelTooLarge {
            input: input.shape(),
            kernel: kernel.shape(),
        });
    }
    Ok((h_in - h_k + 1, w_in - w_k + 1))
}

/// Cross-correlates `input` with `kernel`, returning a freshly allocated grid.
///
/// # Errors
/// Returns [`ShapeError::EmptyKernel`] or [`ShapeError::KernelTooLarge`]
/// when the kernel does not fit.
///
/// # Example
/// ```rust
/// use briny_conv::{correlate::corr2d, grid};
///
/// let x = grid!([[0, 1, 2], [3, 4, 5], [6, 7, 8]]);
/// let k = grid!([[0, 1], [2, 3]]);
/// assert_eq!(corr2d(&x, &k).unwrap(), grid!([[19, 25], [37, 43]]));
/// ```
pub fn corr2d(input: &Grid, kernel: &Grid) -> Result<Grid, ShapeError> {
    let (out_h, out_w) = output_shape(input, kernel)?;
    trace!(
        "corr2d input {:?} kernel {:?} -> {:?}",
        input.shape(),
        kernel.shape(),
        (out_h, out_w)
    );

    let (h_k, w_k) = kernel.shape();
    let w_in = input.cols();
    let x = input.data();
    let k = kernel.data();

    let mut out = vec![0.0; out_h * out_w];
    out.par_chunks_mut(out_w).enumerate().for_each(|(i, row)| {
        for (j, cell) in row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for di in 0..h_k {
                let x_row = &x[(i + di) * w_in + j..][..w_k];
                let k_row = &k[di * w_k..][..w_k];
                for (a, b) in x_row.iter().zip(k_row) {
                    acc += a * b;
                }
            }
            *cell = acc;
        }
    });

    Grid::new(out_h, out_w, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid;

    #[test]
    fn identity_kernel_copies_input() {
        let x = grid!([[1, 2], [3, 4]]);
        let k = grid!([[1]]);
        assert_eq!(corr2d(&x, &k).unwrap(), x);
    }

    #[test]
    fn full_size_kernel_is_dot_product() {
        let x = grid!([[1, 2], [3, 4]]);
        let k = grid!([[1, 1], [1, 1]]);
        assert_eq!(corr2d(&x, &k).unwrap(), grid!([[10]]));
    }

    #[test]
    fn empty_kernel_is_rejected() {
        let x = Grid::zeros(3, 3);
        let k = Grid::zeros(0, 2);
        assert_eq!(corr2d(&x, &k), Err(ShapeError::EmptyKernel((0, 2))));
    }

    #[test]
    fn nan_propagates() {
        let x = grid!([[1.0, f64::NAN, 1.0]]);
        let k = grid!([[1, 1]]);
        let out = corr2d(&x, &k).unwrap();
        assert!(out[(0, 0)].is_nan());
        assert!(out[(0, 1)].is_nan());
    }
}
