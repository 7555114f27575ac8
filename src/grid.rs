//! Core 2D grid storage.
//!
//! # Grids
//!
//! A [`Grid`] is a fixed-size, row-major matrix of `f64`. It is the only data
//! structure the crate works with: inputs, kernels, outputs, and gradients are
//! all grids.
//!
//! It supports:
//! - Validated construction from flat data, nested rows, or a generator
//! - Elementwise helpers used by the layer (`add_scalar`, `sub`, `map`)
//! - Transposition, used to check orientation-sensitive kernels
//! - Parsing from a JSON-style nested array via [`parse_grid`]
//! - The [`grid!`](crate::grid!) literal macro
//!
//! ## Limitations
//! - Exactly two dimensions; no channels or batches
//! - No broadcasting beyond scalar addition
//!
//! ## Example
//!
//! ```rust
//! use briny_conv::grid::Grid;
//! let g = Grid::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! assert_eq!(g.shape(), (2, 3));
//! assert_eq!(g[(1, 0)], 4.0);
//! ```

use crate::error::{ParseGridError, Shape, ShapeError};
use briny::prelude::*;
use core::fmt;
use core::ops::{Index, IndexMut};

/// A 2D grid of real numbers stored row-major.
///
/// `data.len() == rows * cols` holds for every value of this type.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Unchecked grid parts, validated before a [`Grid`] is handed out.
struct RawGrid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Validate for RawGrid {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.rows.checked_mul(self.cols) {
            Some(n) if n == self.data.len() => Ok(()),
            _ => Err(ValidationError),
        }
    }
}

impl Grid {
    /// Creates a grid from flat row-major data.
    ///
    /// # Errors
    /// Returns [`ShapeError::DataLength`] if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ShapeError> {
        let len = data.len();
        let trusted = TrustedData::new(RawGrid { rows, cols, data }).map_err(|_| {
            ShapeError::DataLength {
                shape: (rows, cols),
                len,
            }
        })?;
        let RawGrid { rows, cols, data } = trusted.into_inner();
        Ok(Self { rows, cols, data })
    }

    /// A grid of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// A grid with every cell set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Builds a grid by evaluating `f(row, col)` in row-major order.
    #[must_use]
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Builds a grid from a slice of equally long rows.
    ///
    /// # Errors
    /// Returns [`ShapeError::DataLength`] if the rows are ragged.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            data.extend_from_slice(row.as_ref());
        }
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return Err(ShapeError::DataLength {
                shape: (rows.len(), cols),
                len: data.len(),
            });
        }
        Self::new(rows.len(), cols, data)
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> Shape {
        (self.rows, self.cols)
    }

    /// Flat row-major view of the cells.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat row-major view; the shape cannot change through it.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Cell at `(r, c)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> Option<f64> {
        (r < self.rows && c < self.cols).then(|| self.data[r * self.cols + c])
    }

    /// Row `r` as a slice.
    ///
    /// # Panics
    /// Panics if `r >= rows`.
    #[must_use]
    pub fn row(&self, r: usize) -> &[f64] {
        assert!(r < self.rows, "row {r} out of bounds for {} rows", self.rows);
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Iterates rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.cols.max(1))
    }

    /// Swaps rows and columns.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| self.data[c * self.cols + r])
    }

    /// Applies `f` to every cell.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Adds `b` to every cell.
    #[must_use]
    pub fn add_scalar(mut self, b: f64) -> Self {
        for x in &mut self.data {
            *x += b;
        }
        self
    }

    /// Elementwise `self - other`.
    ///
    /// # Errors
    /// Returns [`ShapeError::ShapeMismatch`] if the shapes differ.
    pub fn sub(&self, other: &Self) -> Result<Self, ShapeError> {
        self.ensure_same_shape("sub", other)?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect(),
        })
    }

    /// Sum of every cell.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub(crate) fn ensure_same_shape(&self, op: &'static str, other: &Self) -> Result<(), ShapeError> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            Err(ShapeError::ShapeMismatch {
                op,
                lhs: self.shape(),
                rhs: other.shape(),
            })
        }
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        assert!(
            r < self.rows && c < self.cols,
            "index ({r}, {c}) out of bounds for shape {:?}",
            self.shape()
        );
        &self.data[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        assert!(
            r < self.rows && c < self.cols,
            "index ({r}, {c}) out of bounds for shape {:?}",
            self.shape()
        );
        &mut self.data[r * self.cols + c]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                f.write_str(",\n ")?;
            }
            f.write_str("[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{x}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}

/// Defines a grid from nested literal rows.
///
/// Integer and float literals are both accepted and stored as `f64`.
///
/// # Panics
/// Panics if the rows have different lengths.
///
/// # Example
/// ```
/// use briny_conv::grid;
/// let g = grid!([[0, 1, 2], [3, 4, 5]]);
/// assert_eq!(g.shape(), (2, 3));
/// ```
#[macro_export]
macro_rules! grid {
    ([ $( [ $( $x:expr ),* $(,)? ] ),+ $(,)? ]) => {{
        let rows: ::std::vec::Vec<::std::vec::Vec<f64>> =
            ::std::vec![ $( ::std::vec![ $( ($x) as f64 ),* ] ),+ ];
        match $crate::grid::Grid::from_rows(&rows) {
            Ok(g) => g,
            Err(e) => panic!("ragged grid literal: {e}"),
        }
    }};
}

/// Parses a JSON-style 2D array such as `[[0, 1], [2, 3.5e0]]` into a [`Grid`].
///
/// Non-finite cells are written `NaN`, `inf` and `-inf`, as [`Grid`]'s
/// `Display` prints them, so printed grids always parse back.
///
/// # Errors
/// - [`ParseGridError::NotTwoDimensional`] for flat or deeper nesting
/// - [`ParseGridError::Shape`] for ragged rows
/// - syntax errors for stray commas, bad numbers, or trailing input
pub fn parse_grid(text: &str) -> Result<Grid, ParseGridError> {
    let mut lexer = Lexer { text, pos: 0 };

    if lexer.next_token()? != Tok::LBrack {
        return Err(ParseGridError::Syntax("grid must start with '['"));
    }

    let mut rows: Vec<Vec<f64>> = Vec::new();
    loop {
        match lexer.next_token()? {
            Tok::LBrack => rows.push(lexer.row()?),
            Tok::RBrack if rows.is_empty() => return Err(ParseGridError::NotTwoDimensional(1)),
            Tok::Num(_) => return Err(ParseGridError::NotTwoDimensional(1)),
            _ => return Err(ParseGridError::Syntax("expected '[' to open a row")),
        }
        match lexer.next_token()? {
            Tok::Comma => {}
            Tok::RBrack => break,
            _ => return Err(ParseGridError::Syntax("expected ',' or ']' after a row")),
        }
    }

    if !lexer.at_end() {
        return Err(ParseGridError::Syntax("trailing characters after grid"));
    }

    Ok(Grid::from_rows(&rows)?)
}

#[derive(Debug, PartialEq)]
enum Tok {
    LBrack,
    RBrack,
    Comma,
    Num(f64),
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl Lexer<'_> {
    fn skip_ws(&mut self) {
        let s = self.text.as_bytes();
        while self.pos < s.len() && s[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.text.len()
    }

    fn next_token(&mut self) -> Result<Tok, ParseGridError> {
        self.skip_ws();
        let s = self.text.as_bytes();
        if self.pos >= s.len() {
            return Err(ParseGridError::UnexpectedEof);
        }
        let start = self.pos;
        self.pos += 1;
        Ok(match s[start] {
            b'[' => Tok::LBrack,
            b']' => Tok::RBrack,
            b',' => Tok::Comma,
            b'-' | b'+' | b'.' | b'0'..=b'9' | b'N' | b'n' | b'I' | b'i' => {
                while self.pos < s.len()
                    && (s[self.pos].is_ascii_alphanumeric()
                        || matches!(s[self.pos], b'.' | b'+' | b'-'))
                {
                    self.pos += 1;
                }
                let lit = &self.text[start..self.pos];
                Tok::Num(
                    lit.parse::<f64>()
                        .map_err(|_| ParseGridError::BadNumber(lit.to_owned()))?,
                )
            }
            _ => {
                let c = self.text[start..].chars().next().unwrap_or('\u{fffd}');
                return Err(ParseGridError::InvalidChar(c, start));
            }
        })
    }

    /// Reads the cells of one row; the opening `[` is already consumed.
    fn row(&mut self) -> Result<Vec<f64>, ParseGridError> {
        let mut cells = Vec::new();
        let mut expect_val = true;
        loop {
            match self.next_token()? {
                Tok::Num(n) if expect_val => {
                    cells.push(n);
                    expect_val = false;
                }
                Tok::Num(_) => return Err(ParseGridError::Syntax("two values without comma")),
                Tok::Comma if !expect_val => expect_val = true,
                Tok::Comma => return Err(ParseGridError::Syntax("comma where value expected")),
                Tok::RBrack if expect_val && !cells.is_empty() => {
                    return Err(ParseGridError::Syntax("trailing comma"));
                }
                Tok::RBrack => return Ok(cells),
                Tok::LBrack => return Err(ParseGridError::NotTwoDimensional(3)),
            }
        }
    }
}
