//! briny_conv: 2D cross-correlation and a learnable convolution layer.
//!
//! The crate is deliberately small: one data structure ([`grid::Grid`]), one
//! numeric kernel ([`correlate::corr2d`]), and one trainable layer
//! ([`layer::ConvLayer`]) with hand-written gradients.
//!
//! # Modules
//!
//! - [`grid`] — Row-major 2D grids, the `grid!` macro and text parsing.
//! - [`correlate`] — Sliding-window cross-correlation.
//! - [`layer`] — Kernel + bias layer and its in-place parameter update.
//! - [`backprop`] — Squared-error loss and layer gradients as backward closures.
//! - [`optim`] — Update rules (`Sgd`).
//! - [`config`] — Training hyperparameters.
//! - [`train`] — Full-batch training loop and the edge-detection data set.
//! - [`error`] — `ShapeError` and `ParseGridError`.
//!
//! # Example
//!
//! ```rust
//! use briny_conv::{grid, layer::ConvLayer};
//!
//! let x = grid!([[1, 1, 0, 0, 1]]);
//! let layer = ConvLayer::new(grid!([[1, -1]]));
//! assert_eq!(layer.forward(&x).unwrap(), grid!([[0, 1, 0, -1]]));
//! ```

pub mod backprop;
pub mod config;
pub mod correlate;
pub mod error;
pub mod grid;
pub mod layer;
pub mod optim;
pub mod train;

pub use correlate::corr2d;
pub use error::{ParseGridError, ShapeError};
pub use grid::{Grid, parse_grid};
pub use layer::{ConvGrads, ConvLayer};
