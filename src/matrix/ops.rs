//! Matrix algebra on [`SparseMatrix`]: addition, comparison, extrema and
//! matrix-vector products
//!
//! Explicit zeros are stored values: they take part in `minmax`, and they
//! compare equal to an absent entry in `equal` because both denote zero.

use ndarray::{Array1, ArrayView1};
use num_traits::Num;

use crate::error::{Result, SparseError};
use crate::matrix::{SparseFormat, SparseMatrix};

/// Whether a product uses the matrix or its transpose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Use A
    NoTrans,
    /// Use Aᵗ
    Trans,
}

impl<T> SparseMatrix<T>
where
    T: Copy + Num,
{
    /// Overwrites `self` with `a + b`
    ///
    /// `a` and `b` must share one compressed format and all three matrices
    /// must have the same shape. `self` must already be in that format; its
    /// storage and scratch space are reused and grown as needed, since
    /// `nnz(a + b) <= nnz(a) + nnz(b)`.
    pub fn add_into(&mut self, a: &Self, b: &Self) -> Result<()> {
        if !a.format().is_compressed() {
            return Err(SparseError::FormatMismatch {
                op: "add",
                found: a.format(),
            });
        }
        if b.format() != a.format() {
            return Err(SparseError::FormatMismatch {
                op: "add",
                found: b.format(),
            });
        }

        match (self, a, b) {
            (SparseMatrix::Ccs(c), SparseMatrix::Ccs(a), SparseMatrix::Ccs(b)) => c.add_into(a, b),
            (SparseMatrix::Crs(c), SparseMatrix::Crs(a), SparseMatrix::Crs(b)) => c.add_into(a, b),
            (c, _, _) => Err(SparseError::FormatMismatch {
                op: "add",
                found: c.format(),
            }),
        }
    }

    /// Returns `self + other` in the shared compressed format
    pub fn add(&self, other: &Self) -> Result<Self> {
        let (n_rows, n_cols) = self.shape();
        let mut sum = match self.format() {
            SparseFormat::Triplet => {
                return Err(SparseError::FormatMismatch {
                    op: "add",
                    found: SparseFormat::Triplet,
                })
            }
            format => {
                SparseMatrix::with_capacity(n_rows, n_cols, self.nnz() + other.nnz(), format)?
            }
        };
        sum.add_into(self, other)?;
        Ok(sum)
    }

    /// Compares two matrices of the same format and shape value by value
    ///
    /// Every stored coordinate of either matrix is checked against the
    /// other, so an explicit zero matches an absent entry.
    pub fn equal(&self, other: &Self) -> Result<bool> {
        if self.format() != other.format() {
            return Err(SparseError::FormatMismatch {
                op: "equal",
                found: other.format(),
            });
        }
        if self.shape() != other.shape() {
            return Err(SparseError::DimensionMismatch {
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }

        let covers = |x: &Self, y: &Self| -> Result<bool> {
            for (i, j, &v) in x.iter() {
                if y.get(i, j)? != v {
                    return Ok(false);
                }
            }
            Ok(true)
        };

        Ok(covers(self, other)? && covers(other, self)?)
    }

    /// Multiplies `y` by `beta` and adds `alpha * op(A) * x`
    pub fn gemv(
        &self,
        op: Op,
        alpha: T,
        x: &ArrayView1<T>,
        beta: T,
        y: &mut Array1<T>,
    ) -> Result<()> {
        let (n_rows, n_cols) = self.shape();
        let (n_in, n_out) = match op {
            Op::NoTrans => (n_cols, n_rows),
            Op::Trans => (n_rows, n_cols),
        };
        if x.len() != n_in || y.len() != n_out {
            return Err(SparseError::DimensionMismatch {
                lhs: (n_out, n_in),
                rhs: (y.len(), x.len()),
            });
        }

        if beta.is_zero() {
            y.fill(T::zero());
        } else if !beta.is_one() {
            y.mapv_inplace(|v| v * beta);
        }

        if alpha.is_zero() {
            return Ok(());
        }

        for (i, j, &v) in self.iter() {
            match op {
                Op::NoTrans => y[i] = y[i] + alpha * v * x[j],
                Op::Trans => y[j] = y[j] + alpha * v * x[i],
            }
        }
        Ok(())
    }
}

impl<T> SparseMatrix<T>
where
    T: Copy + Num + PartialOrd,
{
    /// Smallest and largest stored value, explicit zeros included
    ///
    /// Implicit zeros are not considered. A matrix with no stored entries
    /// has no extrema and yields [`SparseError::EmptyMatrix`].
    pub fn minmax(&self) -> Result<(T, T)> {
        let mut entries = self.iter().map(|(_, _, &v)| v);
        let first = entries.next().ok_or(SparseError::EmptyMatrix("minmax"))?;

        Ok(entries.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }
}
