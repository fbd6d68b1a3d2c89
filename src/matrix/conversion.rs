//! Conversion functions between matrix formats

use log::debug;
use num_traits::Num;

use crate::error::Result;
use crate::matrix::compressed::{transpose_lanes, try_filled};
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR, TripletMatrix};
use crate::utils::exclusive_scan;

/// Counting sort of triplets into compressed lanes keyed by `majors`.
///
/// Stable: within a lane, entries keep their triplet storage order.
/// Runs in O(nnz + n_major).
fn bucket_triplets<T: Copy + Num>(
    n_major: usize,
    majors: &[usize],
    minors: &[usize],
    vals: &[T],
) -> Result<(Vec<usize>, Vec<usize>, Vec<T>)> {
    // Count non-zeros per lane
    let mut cursor = try_filled(n_major, 0usize)?;
    for &major in majors {
        cursor[major] += 1;
    }

    // Compute lane pointers via prefix sum
    let ptr = exclusive_scan(&cursor);

    let nnz = vals.len();
    let mut idx = try_filled(nnz, 0usize)?;
    let mut out = try_filled(nnz, T::zero())?;

    // Scatter each triplet at its lane's running cursor
    cursor.copy_from_slice(&ptr[..n_major]);
    for k in 0..nnz {
        let major = majors[k];
        let pos = cursor[major];

        idx[pos] = minors[k];
        out[pos] = vals[k];

        cursor[major] += 1;
    }

    Ok((ptr, idx, out))
}

impl<T: Copy + Num> TripletMatrix<T> {
    /// Builds the compressed-column form of this matrix
    ///
    /// Row indices within each column keep triplet insertion order.
    pub fn to_ccs(&self) -> Result<SparseMatrixCSC<T>> {
        let (col_ptr, row_idx, values) = bucket_triplets(
            self.n_cols(),
            self.col_indices(),
            self.row_indices(),
            self.values(),
        )?;

        debug!(
            "triplet -> CCS: {}×{}, nnz {}",
            self.n_rows(),
            self.n_cols(),
            self.nnz()
        );
        Ok(SparseMatrixCSC::from_parts_unchecked(
            self.n_rows(),
            self.n_cols(),
            col_ptr,
            row_idx,
            values,
        ))
    }

    /// Builds the compressed-row form of this matrix
    ///
    /// Column indices within each row keep triplet insertion order.
    pub fn to_crs(&self) -> Result<SparseMatrixCSR<T>> {
        let (row_ptr, col_idx, values) = bucket_triplets(
            self.n_rows(),
            self.row_indices(),
            self.col_indices(),
            self.values(),
        )?;

        debug!(
            "triplet -> CRS: {}×{}, nnz {}",
            self.n_rows(),
            self.n_cols(),
            self.nnz()
        );
        Ok(SparseMatrixCSR::from_parts_unchecked(
            self.n_rows(),
            self.n_cols(),
            row_ptr,
            col_idx,
            values,
        ))
    }
}

impl<T: Copy + Num> SparseMatrixCSR<T> {
    /// Converts this CSR matrix to CSC format
    ///
    /// Row indices come out sorted within each column.
    pub fn to_csc(&self) -> Result<SparseMatrixCSC<T>> {
        let (col_ptr, row_idx, values) = transpose_lanes(self.n_cols, self.lanes())?;
        debug!("CRS -> CCS: {}×{}, nnz {}", self.n_rows, self.n_cols, self.nnz());
        Ok(SparseMatrixCSC::from_parts_unchecked(
            self.n_rows,
            self.n_cols,
            col_ptr,
            row_idx,
            values,
        ))
    }

    /// Decompresses into a triplet matrix with a fresh index
    pub fn to_triplet(&self) -> Result<TripletMatrix<T>> {
        let mut triplet = TripletMatrix::with_capacity(self.n_rows, self.n_cols, self.nnz())?;
        for (i, j, &v) in self.iter() {
            triplet.set(i, j, v)?;
        }
        Ok(triplet)
    }
}

impl<T: Copy + Num> SparseMatrixCSC<T> {
    /// Converts this CSC matrix to CSR format
    ///
    /// Column indices come out sorted within each row.
    pub fn to_csr(&self) -> Result<SparseMatrixCSR<T>> {
        let (row_ptr, col_idx, values) = transpose_lanes(self.n_rows, self.lanes())?;
        debug!("CCS -> CRS: {}×{}, nnz {}", self.n_rows, self.n_cols, self.nnz());
        Ok(SparseMatrixCSR::from_parts_unchecked(
            self.n_rows,
            self.n_cols,
            row_ptr,
            col_idx,
            values,
        ))
    }

    /// Decompresses into a triplet matrix with a fresh index
    pub fn to_triplet(&self) -> Result<TripletMatrix<T>> {
        let mut triplet = TripletMatrix::with_capacity(self.n_rows, self.n_cols, self.nnz())?;
        for (i, j, &v) in self.iter() {
            triplet.set(i, j, v)?;
        }
        Ok(triplet)
    }
}
