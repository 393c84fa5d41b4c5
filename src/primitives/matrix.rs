//! Dense row-major matrix for signal data and transforms.
//!
//! ## Purpose
//!
//! This module provides [`Matrix`], the container for subject signals
//! (rows are samples, columns are voxels) and for fitted per-parcel
//! transforms (voxels by voxels).
//!
//! ## Design notes
//!
//! * **Row-major**: `data[i * cols + j]` is row `i`, column `j`.
//! * **Owned**: Matrices own their buffer; parcel extraction copies columns.
//! * **Backend-agnostic**: Products and decompositions go through
//!   [`FloatLinalg`], which delegates to nalgebra.
//!
//! ## Invariants
//!
//! * `data.len() == rows * cols` at all times.

use core::ops::{Index, IndexMut};
use num_traits::Float;

use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AlignError;

/// Dense row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Float> Matrix<T> {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a matrix from a row-major buffer.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, AlignError> {
        if data.len() != rows * cols {
            return Err(AlignError::InvalidInput(format!(
                "buffer of length {} cannot hold a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }

    /// Create a matrix whose entry `(i, j)` is `f(i, j)`.
    pub fn from_fn<F: FnMut(usize, usize) -> T>(rows: usize, cols: usize, mut f: F) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Create a matrix from a slice of equally sized rows.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, AlignError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(AlignError::InvalidInput(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of rows (samples).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (voxels).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True if the matrix has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the entries.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the matrix and return its row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrow row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Copy column `j`.
    pub fn column(&self, j: usize) -> Vec<T> {
        (0..self.rows).map(|i| self.data[i * self.cols + j]).collect()
    }

    /// True if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    // ========================================================================
    // Structural Operations
    // ========================================================================

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Copy the listed columns, in order.
    pub fn select_columns(&self, columns: &[usize]) -> Self {
        let mut data = Vec::with_capacity(self.rows * columns.len());
        for i in 0..self.rows {
            let row = self.row(i);
            data.extend(columns.iter().map(|&j| row[j]));
        }
        Self {
            rows: self.rows,
            cols: columns.len(),
            data,
        }
    }

    /// Copy the listed rows, in order. Rows may repeat.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * self.cols);
        for &i in rows {
            data.extend_from_slice(self.row(i));
        }
        Self {
            rows: rows.len(),
            cols: self.cols,
            data,
        }
    }

    /// Write the columns of `block` into the listed columns of `self`.
    pub fn scatter_columns(&mut self, columns: &[usize], block: &Matrix<T>) {
        debug_assert_eq!(block.rows, self.rows);
        debug_assert_eq!(block.cols, columns.len());
        for i in 0..self.rows {
            for (k, &j) in columns.iter().enumerate() {
                self.data[i * self.cols + j] = block.data[i * block.cols + k];
            }
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Mean of each column.
    pub fn column_means(&self) -> Vec<T> {
        let mut means = vec![T::zero(); self.cols];
        if self.rows == 0 {
            return means;
        }
        for i in 0..self.rows {
            for (m, &v) in means.iter_mut().zip(self.row(i)) {
                *m = *m + v;
            }
        }
        let n = T::from(self.rows).unwrap();
        means.iter_mut().for_each(|m| *m = *m / n);
        means
    }

    /// Subtract `offsets[j]` from every entry of column `j`.
    pub fn center_columns(&mut self, offsets: &[T]) {
        debug_assert_eq!(offsets.len(), self.cols);
        for row in self.data.chunks_mut(self.cols.max(1)) {
            for (v, &o) in row.iter_mut().zip(offsets) {
                *v = *v - o;
            }
        }
    }

    /// Add `offsets[j]` to every entry of column `j`.
    pub fn add_to_columns(&mut self, offsets: &[T]) {
        debug_assert_eq!(offsets.len(), self.cols);
        for row in self.data.chunks_mut(self.cols.max(1)) {
            for (v, &o) in row.iter_mut().zip(offsets) {
                *v = *v + o;
            }
        }
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &v| acc + v * v)
            .sqrt()
    }

    /// Copy with every entry multiplied by `factor`.
    pub fn scaled(&self, factor: T) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| v * factor).collect(),
        }
    }

    /// Element-wise in-place accumulation.
    pub fn add_assign(&mut self, other: &Matrix<T>) {
        debug_assert_eq!(self.shape(), other.shape());
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a = *a + b;
        }
    }

    /// Add `value` to each diagonal entry of a square matrix.
    pub fn add_diagonal(&mut self, value: T) {
        let n = self.rows.min(self.cols);
        for i in 0..n {
            self.data[i * self.cols + i] = self.data[i * self.cols + i] + value;
        }
    }
}

impl<T: FloatLinalg> Matrix<T> {
    /// Matrix product `self * rhs`.
    pub fn matmul(&self, rhs: &Matrix<T>) -> Matrix<T> {
        debug_assert_eq!(self.cols, rhs.rows, "inner dimensions must agree");
        Matrix {
            rows: self.rows,
            cols: rhs.cols,
            data: T::gemm(&self.data, &rhs.data, self.rows, self.cols, rhs.cols),
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[i * self.cols + j]
    }
}
