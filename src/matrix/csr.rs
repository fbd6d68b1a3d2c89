//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;

use log::debug;
use num_traits::Num;

use crate::error::{Result, SparseError};
use crate::matrix::compressed::{self, Lanes};
use crate::matrix::workspace::Workspace;
use crate::matrix::SparseMatrixCSC;

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// These arrays are laid out exactly as external compressed-row solvers
/// expect and can be handed over directly.
#[derive(Clone)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,

    work: Workspace<T>,
}

impl<T> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Arguments
    ///
    /// * `n_rows` - Number of rows
    /// * `n_cols` - Number of columns
    /// * `row_ptr` - Row pointers
    /// * `col_idx` - Column indices
    /// * `values` - Non-zero values
    ///
    /// # Errors
    ///
    /// Returns [`SparseError::Domain`] if the input arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1 and nondecreasing from 0 to nnz
    /// - col_idx.len() must equal values.len()
    /// - every column index must be below n_cols and unique within its row
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        compressed::validate(n_rows, n_cols, &row_ptr, &col_idx, &values)?;
        Ok(Self::from_parts_unchecked(
            n_rows, n_cols, row_ptr, col_idx, values,
        ))
    }

    pub(crate) fn from_parts_unchecked(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
            work: Workspace::default(),
        }
    }

    /// Creates an empty matrix with room for `capacity` nonzeros
    pub fn with_capacity(n_rows: usize, n_cols: usize, capacity: usize) -> Result<Self> {
        let row_ptr = compressed::try_filled(n_rows + 1, 0)?;
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        compressed::try_reserve(&mut col_idx, capacity)?;
        compressed::try_reserve(&mut values, capacity)?;
        Ok(Self::from_parts_unchecked(
            n_rows, n_cols, row_ptr, col_idx, values,
        ))
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of nonzeros the matrix can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.values.capacity().min(self.col_idx.capacity())
    }

    /// Returns (n_rows, n_cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Ensures room for at least `capacity` nonzeros
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        let additional = capacity.saturating_sub(self.nnz());
        compressed::try_reserve(&mut self.col_idx, additional)?;
        compressed::try_reserve(&mut self.values, additional)
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Iterates over every stored entry as (row, col, value), row by row
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        (0..self.n_rows).flat_map(move |i| self.row_iter(i).map(move |(j, v)| (i, j, v)))
    }

    /// Value at (row, col); zero if no entry is stored there
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_bounds(row, col)?;
        Ok(self
            .lanes()
            .find(row, col)
            .map_or_else(T::zero, |k| self.values[k]))
    }

    /// Mutable reference to a stored entry, or `None` if (row, col) is not stored
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<Option<&mut T>> {
        self.check_bounds(row, col)?;
        let pos = self.lanes().find(row, col);
        match pos {
            Some(k) => Ok(Some(&mut self.values[k])),
            None => Ok(None),
        }
    }

    /// Multiplies every stored value by `factor`
    pub fn scale(&mut self, factor: T) {
        for v in &mut self.values {
            *v = *v * factor;
        }
    }

    /// Removes all entries, keeping the allocation
    pub fn set_zero(&mut self) {
        self.row_ptr.iter_mut().for_each(|p| *p = 0);
        self.col_idx.clear();
        self.values.clear();
    }

    /// Sorts the column indices inside every row
    pub fn sort_indices(&mut self) {
        compressed::sort_lanes(&self.row_ptr, &mut self.col_idx, &mut self.values);
    }

    /// Reinterprets this matrix as the CSC representation of its transpose
    ///
    /// Runs in O(1): the arrays are moved, not rewritten.
    pub fn into_transpose(self) -> SparseMatrixCSC<T> {
        SparseMatrixCSC::from_parts_unchecked(
            self.n_cols,
            self.n_rows,
            self.row_ptr,
            self.col_idx,
            self.values,
        )
    }

    /// Overwrites `self` with `a + b`, reusing this matrix's storage
    ///
    /// All three matrices must have the same shape.
    pub fn add_into(&mut self, a: &Self, b: &Self) -> Result<()> {
        for shape in [b.shape(), self.shape()] {
            if a.shape() != shape {
                return Err(SparseError::DimensionMismatch {
                    lhs: a.shape(),
                    rhs: shape,
                });
            }
        }

        compressed::add_lanes(
            a.n_cols,
            a.lanes(),
            b.lanes(),
            &mut self.row_ptr,
            &mut self.col_idx,
            &mut self.values,
            &mut self.work,
        )?;

        debug!(
            "CRS add: {}×{}, nnz {} + {} -> {}",
            a.n_rows,
            a.n_cols,
            a.nnz(),
            b.nnz(),
            self.nnz()
        );
        Ok(())
    }

    /// Returns `self + other` as a new matrix
    pub fn add(&self, other: &Self) -> Result<Self> {
        let mut sum = Self::with_capacity(self.n_rows, self.n_cols, self.nnz() + other.nnz())?;
        sum.add_into(self, other)?;
        Ok(sum)
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        let row_ptr = vec![0; n_rows + 1];
        let col_idx = Vec::new();
        let values = Vec::new();

        Self::from_parts_unchecked(n_rows, n_cols, row_ptr, col_idx, values)
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        let row_ptr = (0..=n).collect();
        let col_idx = (0..n).collect();
        let values = vec![T::one(); n];

        Self::from_parts_unchecked(n, n, row_ptr, col_idx, values)
    }

    pub(crate) fn lanes(&self) -> Lanes<'_, T> {
        Lanes::new(&self.row_ptr, &self.col_idx, &self.values)
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.n_rows || col >= self.n_cols {
            return Err(SparseError::IndexOutOfBounds {
                row,
                col,
                n_rows: self.n_rows,
                n_cols: self.n_cols,
            });
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        compressed::fmt_lanes(
            f,
            "SparseMatrixCSR",
            "row",
            (self.n_rows, self.n_cols),
            Lanes::new(&self.row_ptr, &self.col_idx, &self.values),
        )
    }
}
