#![forbid(unsafe_code)]

//! Immutable matrix payload shared across consumer threads.
//!
//! A [`Matrix`] is built once by the producer and then only ever read. There is
//! no mutating API after construction, so any number of worker threads can hold
//! a [`SharedMatrix`] and read it concurrently without extra locking.

use std::fmt;
use std::sync::Arc;

/// Reference-counted handle to a published matrix.
///
/// The payload lives until the last consumer drops its handle.
pub type SharedMatrix = Arc<Matrix>;

/// Row-major grid of `f64` with fixed dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    // rows * cols cells, row-major
    cells: Box<[f64]>,
}

impl Matrix {
    /// Builds a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                cells.push(f(i, j));
            }
        }
        Self {
            rows,
            cols,
            cells: cells.into_boxed_slice(),
        }
    }

    /// Deterministic generator matrix: cell `[i][j]` holds `i * cols + j`.
    ///
    /// ```
    /// use strata_matrix::Matrix;
    /// let m = Matrix::sequential(2, 3);
    /// assert_eq!(m.row(1), Some(&[3.0, 4.0, 5.0][..]));
    /// ```
    pub fn sequential(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |i, j| (i * cols + j) as f64)
    }

    /// Freezes the matrix behind an `Arc` so it can be fanned out.
    pub fn into_shared(self) -> SharedMatrix {
        Arc::new(self)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the matrix holds no cells (either dimension is zero).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Value at `[0][0]`, if any.
    #[inline]
    pub fn top_left(&self) -> Option<f64> {
        self.get(0, 0)
    }

    pub fn sum(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// All cells in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
