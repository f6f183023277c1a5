//! Owned dense n×n dissimilarity matrix.
//!
//! Storage is row-major: entry `(i, j)` lives at `i * n + j`. The domain
//! convention is a symmetric matrix with a zero diagonal, but nothing here
//! enforces it — the operators read and write both `(i, j)` and `(j, i)`
//! explicitly, and [`DissimilarityMatrix::mirror_upper`] is the final cleanup.

use core::fmt;
use core::ops::{Index, IndexMut};

use crate::error::{MetricError, MetricResult};

/// Square matrix of `f64` dissimilarities, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct DissimilarityMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl DissimilarityMatrix {
    /// All-zero `dim × dim` matrix.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![0.0; dim * dim],
        }
    }

    /// Wrap a row-major buffer. Fails if `data.len() != dim * dim`.
    pub fn from_row_major(dim: usize, data: Vec<f64>) -> MetricResult<Self> {
        if data.len() != dim * dim {
            return Err(MetricError::BufferLength {
                dim,
                len: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    /// Build from a list of rows. Every row must have exactly `rows.len()` entries.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> MetricResult<Self> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(MetricError::NotSquare {
                    rows: dim,
                    cols: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { dim, data })
    }

    /// Build by evaluating `f(i, j)` for every entry.
    pub fn from_fn(dim: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                data.push(f(i, j));
            }
        }
        Self { dim, data }
    }

    /// Number of rows (equal to the number of columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// `true` for the 0×0 matrix.
    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Entry `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Overwrite entry `(i, j)` only.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.dim + j] = value;
    }

    /// Write `value` into both `(i, j)` and `(j, i)`.
    #[inline]
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.dim + j] = value;
        self.data[j * self.dim + i] = value;
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.dim;
        &self.data[start..start + self.dim]
    }

    /// Iterate over the rows in order.
    pub fn rows(&self) -> core::slice::ChunksExact<'_, f64> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.dim.max(1))
    }

    /// Row-major view of all entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major view of all entries.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the matrix, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Check that `other` has the same dimension as `self`.
    ///
    /// `self` plays the initial matrix, `other` the target.
    pub fn ensure_same_dim(&self, other: &Self) -> MetricResult<()> {
        if self.dim != other.dim {
            return Err(MetricError::DimensionMismatch {
                initial: self.dim,
                target: other.dim,
            });
        }
        Ok(())
    }

    /// Exact symmetry: `(i, j) == (j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric_within(0.0)
    }

    /// Symmetry up to an absolute tolerance.
    pub fn is_symmetric_within(&self, tol: f64) -> bool {
        let n = self.dim;
        for i in 0..n {
            for j in (i + 1)..n {
                if (self.data[i * n + j] - self.data[j * n + i]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// `true` when every diagonal entry is exactly zero.
    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.dim).all(|i| self.data[i * self.dim + i] == 0.0)
    }

    /// Set every diagonal entry to 0.
    pub fn zero_diagonal(&mut self) {
        let n = self.dim;
        for i in 0..n {
            self.data[i * n + i] = 0.0;
        }
    }

    /// Copy the strict upper triangle onto the lower triangle.
    pub fn mirror_upper(&mut self) {
        let n = self.dim;
        for i in 0..n {
            for j in (i + 1)..n {
                self.data[j * n + i] = self.data[i * n + j];
            }
        }
    }

    /// Replace the matrix with `(X + Xᵀ) / 2`.
    pub fn symmetrize_mean(&mut self) {
        let n = self.dim;
        for i in 0..n {
            for j in (i + 1)..n {
                let mean = 0.5 * (self.data[i * n + j] + self.data[j * n + i]);
                self.data[i * n + j] = mean;
                self.data[j * n + i] = mean;
            }
        }
    }
}

impl Index<(usize, usize)> for DissimilarityMatrix {
    type Output = f64;
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.dim + j]
    }
}

impl IndexMut<(usize, usize)> for DissimilarityMatrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.dim + j]
    }
}

impl fmt::Display for DissimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.dim {
            for j in 0..self.dim {
                write!(f, "{:10.4} ", self.get(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
