//! Triplet (coordinate) matrix: the construction format
//!
//! Entries are kept in three parallel arrays in insertion order. An
//! [`IndexTree`] maps every stored coordinate to its slot, which keeps
//! coordinates unique and makes lookups O(log n) regardless of the order in
//! which entries arrive.

use std::fmt;

use log::{debug, trace};
use num_traits::Num;

use crate::constants::DEBUG_MAX_ENTRIES;
use crate::error::{Result, SparseError};
use crate::matrix::compressed::try_reserve;
use crate::matrix::config::SparseConfig;
use crate::matrix::index::IndexTree;

/// A sparse matrix under construction, stored as (row, col, value) triplets
pub struct TripletMatrix<T> {
    n_rows: usize,
    n_cols: usize,
    row_idx: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
    nz_capacity: usize,
    config: SparseConfig,
    index: IndexTree,
}

// `Vec::clone` drops spare capacity, so the clone reports only what it holds
impl<T: Clone> Clone for TripletMatrix<T> {
    fn clone(&self) -> Self {
        Self {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            row_idx: self.row_idx.clone(),
            col_idx: self.col_idx.clone(),
            values: self.values.clone(),
            nz_capacity: self.values.len(),
            config: self.config.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T> TripletMatrix<T>
where
    T: Copy + Num,
{
    /// Creates an empty matrix, reserving the default fraction of `rows * cols`
    pub fn new(n_rows: usize, n_cols: usize) -> Result<Self> {
        Self::with_config(n_rows, n_cols, SparseConfig::default())
    }

    /// Creates an empty matrix whose capacity estimate and growth follow `config`
    pub fn with_config(n_rows: usize, n_cols: usize, config: SparseConfig) -> Result<Self> {
        config.validate()?;
        let capacity = config.estimate_capacity(n_rows, n_cols);
        Self::allocate(n_rows, n_cols, capacity, config)
    }

    /// Creates an empty matrix with room for `capacity` entries
    pub fn with_capacity(n_rows: usize, n_cols: usize, capacity: usize) -> Result<Self> {
        let config = SparseConfig::default();
        let capacity = capacity.max(config.min_capacity);
        Self::allocate(n_rows, n_cols, capacity, config)
    }

    /// A 0×0 matrix that owns no allocation
    pub(crate) fn empty() -> Self {
        Self {
            n_rows: 0,
            n_cols: 0,
            row_idx: Vec::new(),
            col_idx: Vec::new(),
            values: Vec::new(),
            nz_capacity: 0,
            config: SparseConfig::default(),
            index: IndexTree::new(),
        }
    }

    fn allocate(
        n_rows: usize,
        n_cols: usize,
        capacity: usize,
        config: SparseConfig,
    ) -> Result<Self> {
        let mut row_idx = Vec::new();
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        try_reserve(&mut row_idx, capacity)?;
        try_reserve(&mut col_idx, capacity)?;
        try_reserve(&mut values, capacity)?;
        let index = IndexTree::with_capacity(capacity)?;

        debug!(
            "allocated {}×{} triplet matrix, capacity {}",
            n_rows, n_cols, capacity
        );

        Ok(Self {
            n_rows,
            n_cols,
            row_idx,
            col_idx,
            values,
            nz_capacity: capacity,
            config,
            index,
        })
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns (n_rows, n_cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of stored entries, explicit zeros included
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of entries that fit before the next reallocation
    pub fn capacity(&self) -> usize {
        self.nz_capacity
    }

    /// Row index of every stored entry, in storage order
    pub fn row_indices(&self) -> &[usize] {
        &self.row_idx
    }

    /// Column index of every stored entry, in storage order
    pub fn col_indices(&self) -> &[usize] {
        &self.col_idx
    }

    /// Stored values, in storage order
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable access to the stored values; coordinates stay fixed
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// The coordinate index
    pub fn index(&self) -> &IndexTree {
        &self.index
    }

    /// Iterates over every stored entry as (row, col, value) in storage order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.row_idx
            .iter()
            .zip(&self.col_idx)
            .zip(&self.values)
            .map(|((&i, &j), v)| (i, j, v))
    }

    /// Extends storage to hold at least `new_capacity` entries
    ///
    /// Existing entries keep their slots, so the index stays valid.
    pub fn grow(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.nz_capacity {
            return Ok(());
        }

        let additional = new_capacity - self.nnz();
        try_reserve(&mut self.row_idx, additional)?;
        try_reserve(&mut self.col_idx, additional)?;
        try_reserve(&mut self.values, additional)?;
        self.index.reserve(additional)?;

        debug!(
            "triplet storage grown from {} to {} entries",
            self.nz_capacity, new_capacity
        );
        self.nz_capacity = new_capacity;
        Ok(())
    }

    /// Stores `value` at (row, col), overwriting any existing entry
    ///
    /// A value of exactly zero is stored like any other; it does not remove
    /// an existing entry.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_bounds(row, col)?;
        self.upsert(row, col, value)
    }

    /// Like [`TripletMatrix::set`], but enlarges the matrix to contain (row, col)
    pub fn set_extend(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let rows = row
            .checked_add(1)
            .ok_or_else(|| SparseError::domain("row index overflows usize"))?;
        let cols = col
            .checked_add(1)
            .ok_or_else(|| SparseError::domain("column index overflows usize"))?;

        self.upsert(row, col, value)?;
        self.n_rows = self.n_rows.max(rows);
        self.n_cols = self.n_cols.max(cols);
        Ok(())
    }

    fn upsert(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if let Some(slot) = self.index.find(row, col) {
            self.values[slot] = value;
            return Ok(());
        }

        let slot = self.nnz();
        if slot == self.nz_capacity {
            let target = self.config.next_capacity(self.nz_capacity, slot + 1);
            self.grow(target)?;
        }

        self.index.insert(row, col, slot)?;
        self.row_idx.push(row);
        self.col_idx.push(col);
        self.values.push(value);
        Ok(())
    }

    /// Value at (row, col); zero if no entry is stored there
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_bounds(row, col)?;
        Ok(self
            .index
            .find(row, col)
            .map_or_else(T::zero, |slot| self.values[slot]))
    }

    /// Returns true if an entry is stored at (row, col)
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.index.find(row, col).is_some()
    }

    /// Mutable reference to a stored entry, or `None` if (row, col) is not stored
    ///
    /// New entries cannot be created through this path.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<Option<&mut T>> {
        self.check_bounds(row, col)?;
        match self.index.find(row, col) {
            Some(slot) => Ok(Some(&mut self.values[slot])),
            None => Ok(None),
        }
    }

    /// Evicts the entry at (row, col), returning its value
    ///
    /// The last entry moves into the vacated slot, so storage order changes.
    pub fn remove(&mut self, row: usize, col: usize) -> Result<Option<T>> {
        self.check_bounds(row, col)?;
        let slot = match self.index.remove(row, col) {
            Some(slot) => slot,
            None => return Ok(None),
        };

        let last = self.nnz() - 1;
        if slot != last {
            let moved = (self.row_idx[last], self.col_idx[last]);
            self.index.set_slot(moved.0, moved.1, slot);
        }

        self.row_idx.swap_remove(slot);
        self.col_idx.swap_remove(slot);
        Ok(Some(self.values.swap_remove(slot)))
    }

    /// Evicts every explicitly stored zero; returns how many were removed
    pub fn drop_zeros(&mut self) -> Result<usize> {
        let zeros: Vec<(usize, usize)> = self
            .iter()
            .filter(|(_, _, v)| v.is_zero())
            .map(|(i, j, _)| (i, j))
            .collect();

        for &(i, j) in &zeros {
            self.remove(i, j)?;
        }
        Ok(zeros.len())
    }

    /// Logically empties the matrix without releasing capacity
    pub fn set_zero(&mut self) {
        self.row_idx.clear();
        self.col_idx.clear();
        self.values.clear();
        self.index.clear();
    }

    /// Multiplies every stored value by `factor`
    pub fn scale(&mut self, factor: T) {
        for v in &mut self.values {
            *v = *v * factor;
        }
    }

    /// Transposes in place by swapping the coordinate arrays
    ///
    /// The index keys change with the coordinates, so it is rebuilt:
    /// O(n log n).
    pub fn transpose(&mut self) -> Result<()> {
        std::mem::swap(&mut self.row_idx, &mut self.col_idx);
        std::mem::swap(&mut self.n_rows, &mut self.n_cols);
        self.rebuild_index()
    }

    fn rebuild_index(&mut self) -> Result<()> {
        self.index.clear();
        for slot in 0..self.nnz() {
            self.index
                .insert(self.row_idx[slot], self.col_idx[slot], slot)?;
        }
        trace!("rebuilt triplet index over {} entries", self.nnz());
        Ok(())
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

impl<T: fmt::Debug> fmt::Debug for TripletMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TripletMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {} (capacity {})", self.values.len(), self.nz_capacity)?;

        let shown = DEBUG_MAX_ENTRIES.min(self.values.len());
        if shown > 0 {
            write!(f, "  entries: ")?;
            for k in 0..shown {
                write!(
                    f,
                    "({}, {}, {:?}) ",
                    self.row_idx[k], self.col_idx[k], self.values[k]
                )?;
            }
            if self.values.len() > shown {
                write!(f, "... ({} more)", self.values.len() - shown)?;
            }
            writeln!(f)?;
        }

        write!(f, "}}")
    }
}
