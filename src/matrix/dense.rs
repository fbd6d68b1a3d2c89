//! Dense matrix collaborator and dense ↔ sparse conversion

use ndarray::Array2;
use num_traits::Num;

use crate::error::{Result, SparseError};
use crate::matrix::TripletMatrix;

/// The dense matrix capability consumed by sparse conversions
pub trait DenseMatrix<T> {
    /// Returns (n_rows, n_cols)
    fn dims(&self) -> (usize, usize);

    /// Element at (i, j)
    fn get(&self, i: usize, j: usize) -> T;

    /// Overwrites the element at (i, j)
    fn set(&mut self, i: usize, j: usize, value: T);
}

impl<T: Copy> DenseMatrix<T> for Array2<T> {
    fn dims(&self) -> (usize, usize) {
        self.dim()
    }

    fn get(&self, i: usize, j: usize) -> T {
        self[[i, j]]
    }

    fn set(&mut self, i: usize, j: usize, value: T) {
        self[[i, j]] = value;
    }
}

impl<T: Copy + Num> TripletMatrix<T> {
    /// Collects every nonzero cell of a dense matrix, scanning row by row
    ///
    /// Cells exactly equal to zero are skipped.
    pub fn from_dense<D: DenseMatrix<T>>(dense: &D) -> Result<Self> {
        let (n_rows, n_cols) = dense.dims();

        let mut nnz = 0;
        for i in 0..n_rows {
            for j in 0..n_cols {
                if !dense.get(i, j).is_zero() {
                    nnz += 1;
                }
            }
        }

        let mut sparse = TripletMatrix::with_capacity(n_rows, n_cols, nnz)?;
        for i in 0..n_rows {
            for j in 0..n_cols {
                let v = dense.get(i, j);
                if !v.is_zero() {
                    sparse.set(i, j, v)?;
                }
            }
        }
        Ok(sparse)
    }
}

/// Writes `entries` into `dense`, zeroing every other cell
pub(crate) fn fill_dense<'a, T, D, I>(dims: (usize, usize), entries: I, dense: &mut D) -> Result<()>
where
    T: Copy + Num + 'a,
    D: DenseMatrix<T>,
    I: Iterator<Item = (usize, usize, &'a T)>,
{
    if dense.dims() != dims {
        return Err(SparseError::DimensionMismatch {
            lhs: dims,
            rhs: dense.dims(),
        });
    }

    for i in 0..dims.0 {
        for j in 0..dims.1 {
            dense.set(i, j, T::zero());
        }
    }
    for (i, j, &v) in entries {
        dense.set(i, j, v);
    }
    Ok(())
}

/// Adds `entries` onto `dense` in place
pub(crate) fn accumulate_dense<'a, T, D, I>(
    dims: (usize, usize),
    entries: I,
    dense: &mut D,
) -> Result<()>
where
    T: Copy + Num + 'a,
    D: DenseMatrix<T>,
    I: Iterator<Item = (usize, usize, &'a T)>,
{
    if dense.dims() != dims {
        return Err(SparseError::DimensionMismatch {
            lhs: dims,
            rhs: dense.dims(),
        });
    }

    for (i, j, &v) in entries {
        let current = dense.get(i, j);
        dense.set(i, j, current + v);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_dense_skips_zeros() {
        let dense = array![[1.0, 0.0, 2.0], [0.0, 0.0, 3.0]];
        let sparse = TripletMatrix::from_dense(&dense).unwrap();

        assert_eq!(sparse.shape(), (2, 3));
        assert_eq!(sparse.nnz(), 3);
        assert_eq!(sparse.get(0, 2).unwrap(), 2.0);
        assert_eq!(sparse.get(1, 2).unwrap(), 3.0);
        assert!(!sparse.contains(0, 1));
    }

    #[test]
    fn test_fill_dense_dimension_check() {
        let sparse = TripletMatrix::<f64>::new(2, 2).unwrap();
        let mut dense = Array2::<f64>::zeros((3, 2));
        let result = fill_dense(sparse.shape(), sparse.iter(), &mut dense);
        assert!(matches!(result, Err(SparseError::DimensionMismatch { .. })));
    }
}
