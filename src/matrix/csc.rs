//! Compressed Sparse Column (CSC) matrix format implementation

use std::fmt;

use log::debug;
use num_traits::Num;

use crate::error::{Result, SparseError};
use crate::matrix::compressed::{self, Lanes};
use crate::matrix::workspace::Workspace;
use crate::matrix::SparseMatrixCSR;

/// A sparse matrix in Compressed Sparse Column (CSC) format
///
/// The CSC format stores a sparse matrix using three arrays:
/// - col_ptr: Array of size n_cols + 1 containing indices into row_idx and values arrays
/// - row_idx: Array of size nnz containing row indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Row indices inside a column are in whatever order the producing operation
/// left them; [`SparseMatrixCSC::sort_indices`] puts them in ascending order.
#[derive(Clone)]
pub struct SparseMatrixCSC<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Column pointers (size: n_cols + 1)
    /// col_ptr[j] is the index in row_idx and values where column j starts
    /// col_ptr[n_cols] is equal to nnz
    pub col_ptr: Vec<usize>,

    /// Row indices (size: nnz)
    pub row_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,

    work: Workspace<T>,
}

impl<T> SparseMatrixCSC<T>
where
    T: Copy + Num,
{
    /// Creates a new CSC matrix with the given dimensions and data
    ///
    /// # Arguments
    ///
    /// * `n_rows` - Number of rows
    /// * `n_cols` - Number of columns
    /// * `col_ptr` - Column pointers
    /// * `row_idx` - Row indices
    /// * `values` - Non-zero values
    ///
    /// # Errors
    ///
    /// Returns [`SparseError::Domain`] if the input arrays are inconsistent:
    /// - col_ptr.len() must be n_cols + 1 and nondecreasing from 0 to nnz
    /// - row_idx.len() must equal values.len()
    /// - every row index must be below n_rows and unique within its column
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        compressed::validate(n_cols, n_rows, &col_ptr, &row_idx, &values)?;
        Ok(Self::from_parts_unchecked(
            n_rows, n_cols, col_ptr, row_idx, values,
        ))
    }

    pub(crate) fn from_parts_unchecked(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        Self {
            n_rows,
            n_cols,
            col_ptr,
            row_idx,
            values,
            work: Workspace::default(),
        }
    }

    /// Creates an empty matrix with room for `capacity` nonzeros
    pub fn with_capacity(n_rows: usize, n_cols: usize, capacity: usize) -> Result<Self> {
        let col_ptr = compressed::try_filled(n_cols + 1, 0)?;
        let mut row_idx = Vec::new();
        let mut values = Vec::new();
        compressed::try_reserve(&mut row_idx, capacity)?;
        compressed::try_reserve(&mut values, capacity)?;
        Ok(Self::from_parts_unchecked(
            n_rows, n_cols, col_ptr, row_idx, values,
        ))
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of nonzeros the matrix can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.values.capacity().min(self.row_idx.capacity())
    }

    /// Returns (n_rows, n_cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Ensures room for at least `capacity` nonzeros
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        let additional = capacity.saturating_sub(self.nnz());
        compressed::try_reserve(&mut self.row_idx, additional)?;
        compressed::try_reserve(&mut self.values, additional)
    }

    /// Returns an iterator over the non-zero elements in column j
    ///
    /// Each item is a tuple (row_idx, value) representing a non-zero element
    pub fn col_iter(&self, j: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(j < self.n_cols, "Column index out of bounds");

        let start = self.col_ptr[j];
        let end = self.col_ptr[j + 1];

        self.row_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&row, val)| (row, val))
    }

    /// Iterates over every stored entry as (row, col, value), column by column
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        (0..self.n_cols).flat_map(move |j| self.col_iter(j).map(move |(i, v)| (i, j, v)))
    }

    /// Value at (row, col); zero if no entry is stored there
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_bounds(row, col)?;
        Ok(self
            .lanes()
            .find(col, row)
            .map_or_else(T::zero, |k| self.values[k]))
    }

    /// Mutable reference to a stored entry, or `None` if (row, col) is not stored
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<Option<&mut T>> {
        self.check_bounds(row, col)?;
        let pos = self.lanes().find(col, row);
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
        self.col_ptr.iter_mut().for_each(|p| *p = 0);
        self.row_idx.clear();
        self.values.clear();
    }

    /// Sorts the row indices inside every column
    pub fn sort_indices(&mut self) {
        compressed::sort_lanes(&self.col_ptr, &mut self.row_idx, &mut self.values);
    }

    /// Reinterprets this matrix as the CSR representation of its transpose
    ///
    /// The column pointers of A are exactly the row pointers of Aᵗ, so this
    /// moves the arrays without touching them and runs in O(1).
    pub fn into_transpose(self) -> SparseMatrixCSR<T> {
        SparseMatrixCSR::from_parts_unchecked(
            self.n_cols,
            self.n_rows,
            self.col_ptr,
            self.row_idx,
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
            a.n_rows,
            a.lanes(),
            b.lanes(),
            &mut self.col_ptr,
            &mut self.row_idx,
            &mut self.values,
            &mut self.work,
        )?;

        debug!(
            "CCS add: {}×{}, nnz {} + {} -> {}",
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
        let col_ptr = vec![0; n_cols + 1];
        let row_idx = Vec::new();
        let values = Vec::new();

        Self::from_parts_unchecked(n_rows, n_cols, col_ptr, row_idx, values)
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        let col_ptr = (0..=n).collect();
        let row_idx = (0..n).collect();
        let values = vec![T::one(); n];

        Self::from_parts_unchecked(n, n, col_ptr, row_idx, values)
    }

    pub(crate) fn lanes(&self) -> Lanes<'_, T> {
        Lanes::new(&self.col_ptr, &self.row_idx, &self.values)
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

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSC<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        compressed::fmt_lanes(
            f,
            "SparseMatrixCSC",
            "col",
            (self.n_rows, self.n_cols),
            Lanes::new(&self.col_ptr, &self.row_idx, &self.values),
        )
    }
}
