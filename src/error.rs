//! Error types for grid construction and convolution.

use thiserror::Error;

/// Shape of a grid as `(rows, cols)`.
pub type Shape = (usize, usize);

/// The single failure mode of the numeric core: incompatible dimensions.
///
/// Every variant is reported synchronously at the offending call. Nothing is
/// retried; the caller has to supply conforming shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Kernel is larger than the input along at least one axis.
    #[error("kernel shape {kernel:?} does not fit input shape {input:?}")]
    KernelTooLarge { input: Shape, kernel: Shape },

    /// Kernel has zero rows or zero columns.
    #[error("kernel shape {0:?} has no cells")]
    EmptyKernel(Shape),

    /// Gradient grid handed to a parameter update does not match the kernel.
    #[error("gradient shape {grad:?} does not match kernel shape {kernel:?}")]
    GradientMismatch { kernel: Shape, grad: Shape },

    /// Two grids combined elementwise disagree in shape.
    #[error("shape mismatch in {op}: {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// Flat data length is not `rows * cols`, or rows are ragged.
    #[error("shape {shape:?} is incompatible with {len} data elements")]
    DataLength { shape: Shape, len: usize },
}

/// Failure while parsing a grid from its textual array form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseGridError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid character {0:?} at byte {1}")]
    InvalidChar(char, usize),

    #[error("malformed number {0:?}")]
    BadNumber(String),

    #[error("{0}")]
    Syntax(&'static str),

    #[error("expected a 2D array, found nesting depth {0}")]
    NotTwoDimensional(usize),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
