//! The tri-format sparse matrix
//!
//! [`SparseMatrix`] tags one of the three storage layouts. Format-specific
//! operations are inherent methods on the payload types, so calling them on
//! the wrong layout is a compile error; the dispatching methods here report
//! [`SparseError::FormatMismatch`] instead.

use std::fmt;

use log::debug;
use ndarray::Array2;
use num_traits::Num;

use crate::error::{Result, SparseError};
use crate::matrix::dense::{accumulate_dense, fill_dense, DenseMatrix};
use crate::matrix::{SparseFormat, SparseMatrixCSC, SparseMatrixCSR, TripletMatrix};

/// A sparse matrix in triplet, compressed-column or compressed-row form
#[derive(Clone)]
pub enum SparseMatrix<T> {
    /// Construction form; the only layout that accepts new entries
    Triplet(TripletMatrix<T>),
    /// Compressed sparse column
    Ccs(SparseMatrixCSC<T>),
    /// Compressed sparse row
    Crs(SparseMatrixCSR<T>),
}

impl<T> From<TripletMatrix<T>> for SparseMatrix<T> {
    fn from(m: TripletMatrix<T>) -> Self {
        SparseMatrix::Triplet(m)
    }
}

impl<T> From<SparseMatrixCSC<T>> for SparseMatrix<T> {
    fn from(m: SparseMatrixCSC<T>) -> Self {
        SparseMatrix::Ccs(m)
    }
}

impl<T> From<SparseMatrixCSR<T>> for SparseMatrix<T> {
    fn from(m: SparseMatrixCSR<T>) -> Self {
        SparseMatrix::Crs(m)
    }
}

impl<T> SparseMatrix<T>
where
    T: Copy + Num,
{
    /// Creates an empty triplet matrix with the default capacity estimate
    pub fn new(n_rows: usize, n_cols: usize) -> Result<Self> {
        TripletMatrix::new(n_rows, n_cols).map(SparseMatrix::Triplet)
    }

    /// Creates an empty matrix of the given format with room for `capacity` nonzeros
    pub fn with_capacity(
        n_rows: usize,
        n_cols: usize,
        capacity: usize,
        format: SparseFormat,
    ) -> Result<Self> {
        Ok(match format {
            SparseFormat::Triplet => {
                TripletMatrix::with_capacity(n_rows, n_cols, capacity)?.into()
            }
            SparseFormat::Ccs => SparseMatrixCSC::with_capacity(n_rows, n_cols, capacity)?.into(),
            SparseFormat::Crs => SparseMatrixCSR::with_capacity(n_rows, n_cols, capacity)?.into(),
        })
    }

    /// The current storage format
    pub fn format(&self) -> SparseFormat {
        match self {
            SparseMatrix::Triplet(_) => SparseFormat::Triplet,
            SparseMatrix::Ccs(_) => SparseFormat::Ccs,
            SparseMatrix::Crs(_) => SparseFormat::Crs,
        }
    }

    /// Returns (n_rows, n_cols)
    pub fn shape(&self) -> (usize, usize) {
        match self {
            SparseMatrix::Triplet(m) => m.shape(),
            SparseMatrix::Ccs(m) => m.shape(),
            SparseMatrix::Crs(m) => m.shape(),
        }
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.shape().0
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.shape().1
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        match self {
            SparseMatrix::Triplet(m) => m.nnz(),
            SparseMatrix::Ccs(m) => m.nnz(),
            SparseMatrix::Crs(m) => m.nnz(),
        }
    }

    /// Number of entries that fit before the next reallocation
    pub fn capacity(&self) -> usize {
        match self {
            SparseMatrix::Triplet(m) => m.capacity(),
            SparseMatrix::Ccs(m) => m.capacity(),
            SparseMatrix::Crs(m) => m.capacity(),
        }
    }

    /// Ensures room for at least `capacity` nonzeros
    pub fn grow(&mut self, capacity: usize) -> Result<()> {
        match self {
            SparseMatrix::Triplet(m) => m.grow(capacity),
            SparseMatrix::Ccs(m) => m.reserve(capacity),
            SparseMatrix::Crs(m) => m.reserve(capacity),
        }
    }

    /// The triplet payload, if that is the current format
    pub fn as_triplet(&self) -> Option<&TripletMatrix<T>> {
        match self {
            SparseMatrix::Triplet(m) => Some(m),
            _ => None,
        }
    }

    /// The CCS payload, if that is the current format
    pub fn as_ccs(&self) -> Option<&SparseMatrixCSC<T>> {
        match self {
            SparseMatrix::Ccs(m) => Some(m),
            _ => None,
        }
    }

    /// The CRS payload, if that is the current format
    pub fn as_crs(&self) -> Option<&SparseMatrixCSR<T>> {
        match self {
            SparseMatrix::Crs(m) => Some(m),
            _ => None,
        }
    }

    /// Iterates over stored entries as (row, col, value) in storage order
    pub fn iter(&self) -> Box<dyn Iterator<Item = (usize, usize, &T)> + '_> {
        match self {
            SparseMatrix::Triplet(m) => Box::new(m.iter()),
            SparseMatrix::Ccs(m) => Box::new(m.iter()),
            SparseMatrix::Crs(m) => Box::new(m.iter()),
        }
    }

    /// Value at (row, col); zero if no entry is stored there
    ///
    /// O(log n) in triplet form, a scan of one lane in compressed form.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        match self {
            SparseMatrix::Triplet(m) => m.get(row, col),
            SparseMatrix::Ccs(m) => m.get(row, col),
            SparseMatrix::Crs(m) => m.get(row, col),
        }
    }

    /// Mutable reference to a stored entry, or `None` if (row, col) is not stored
    ///
    /// The borrow ends before any call that could reallocate the storage.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<Option<&mut T>> {
        match self {
            SparseMatrix::Triplet(m) => m.get_mut(row, col),
            SparseMatrix::Ccs(m) => m.get_mut(row, col),
            SparseMatrix::Crs(m) => m.get_mut(row, col),
        }
    }

    /// Stores `value` at (row, col); only valid in triplet form
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        match self {
            SparseMatrix::Triplet(m) => m.set(row, col, value),
            other => Err(SparseError::FormatMismatch {
                op: "set",
                found: other.format(),
            }),
        }
    }

    /// Removes every entry while keeping the allocation and format
    pub fn set_zero(&mut self) {
        match self {
            SparseMatrix::Triplet(m) => m.set_zero(),
            SparseMatrix::Ccs(m) => m.set_zero(),
            SparseMatrix::Crs(m) => m.set_zero(),
        }
    }

    /// Multiplies every stored value by `factor`; explicit zeros stay stored
    pub fn scale(&mut self, factor: T) {
        match self {
            SparseMatrix::Triplet(m) => m.scale(factor),
            SparseMatrix::Ccs(m) => m.scale(factor),
            SparseMatrix::Crs(m) => m.scale(factor),
        }
    }

    /// Returns a new matrix holding the same entries in `format`
    ///
    /// Triplet → compressed is a stable counting sort, O(nnz + lanes).
    /// Compressed → compressed re-buckets by the other index and leaves the
    /// minor indices sorted. Compressed → triplet rebuilds the index.
    pub fn compress(&self, format: SparseFormat) -> Result<SparseMatrix<T>> {
        Ok(match (self, format) {
            (SparseMatrix::Triplet(m), SparseFormat::Triplet) => m.clone().into(),
            (SparseMatrix::Triplet(m), SparseFormat::Ccs) => m.to_ccs()?.into(),
            (SparseMatrix::Triplet(m), SparseFormat::Crs) => m.to_crs()?.into(),
            (SparseMatrix::Ccs(m), SparseFormat::Triplet) => m.to_triplet()?.into(),
            (SparseMatrix::Ccs(m), SparseFormat::Ccs) => m.clone().into(),
            (SparseMatrix::Ccs(m), SparseFormat::Crs) => m.to_csr()?.into(),
            (SparseMatrix::Crs(m), SparseFormat::Triplet) => m.to_triplet()?.into(),
            (SparseMatrix::Crs(m), SparseFormat::Ccs) => m.to_csc()?.into(),
            (SparseMatrix::Crs(m), SparseFormat::Crs) => m.clone().into(),
        })
    }

    /// Transposes by relabeling: CCS of A becomes CRS of Aᵗ and vice versa
    ///
    /// O(1) for compressed matrices; no array is touched. A triplet matrix
    /// swaps its coordinates and rebuilds its index instead, O(n log n).
    /// Applying this twice restores the original format and arrays.
    pub fn transpose_duality(&mut self) -> Result<()> {
        if let SparseMatrix::Triplet(m) = self {
            return m.transpose();
        }

        let placeholder = SparseMatrix::Triplet(TripletMatrix::empty());
        *self = match std::mem::replace(self, placeholder) {
            SparseMatrix::Ccs(m) => SparseMatrix::Crs(m.into_transpose()),
            SparseMatrix::Crs(m) => SparseMatrix::Ccs(m.into_transpose()),
            triplet => triplet,
        };
        debug!(
            "transpose by duality: now {} {}×{}",
            self.format(),
            self.n_rows(),
            self.n_cols()
        );
        Ok(())
    }

    /// Transposes while keeping the current format
    ///
    /// For compressed matrices this is a duality relabeling followed by a
    /// full conversion back, O(nnz + lanes) with fresh arrays. Callers that
    /// can work with the dual format should use
    /// [`SparseMatrix::transpose_duality`], which is O(1).
    pub fn transpose(&mut self) -> Result<()> {
        match self {
            SparseMatrix::Triplet(m) => m.transpose(),
            SparseMatrix::Ccs(m) => {
                *m = m.to_csr()?.into_transpose();
                Ok(())
            }
            SparseMatrix::Crs(m) => {
                *m = m.to_csc()?.into_transpose();
                Ok(())
            }
        }
    }

    /// Writes this matrix into a dense matrix of the same shape
    pub fn to_dense_into<D: DenseMatrix<T>>(&self, dense: &mut D) -> Result<()> {
        fill_dense(self.shape(), self.iter(), dense)
    }

    /// Expands this matrix into a new `ndarray` matrix
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::zeros(self.shape());
        for (i, j, &v) in self.iter() {
            dense[[i, j]] = v;
        }
        dense
    }

    /// Adds this matrix onto a dense matrix of the same shape
    pub fn add_to_dense<D: DenseMatrix<T>>(&self, dense: &mut D) -> Result<()> {
        accumulate_dense(self.shape(), self.iter(), dense)
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SparseMatrix::Triplet(m) => fmt::Debug::fmt(m, f),
            SparseMatrix::Ccs(m) => fmt::Debug::fmt(m, f),
            SparseMatrix::Crs(m) => fmt::Debug::fmt(m, f),
        }
    }
}
