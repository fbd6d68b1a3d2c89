//! Utilities for handing matrices to and from external sparse libraries
//!
//! sprs requires sorted minor indices within every lane, so exports sort a
//! copy of the arrays first. Compressed arrays produced from triplets keep
//! insertion order and are usually not sorted.

use num_traits::Num;
use sprs::CsMat;

use crate::error::Result;
use crate::matrix::{SparseFormat, SparseMatrix, SparseMatrixCSC, SparseMatrixCSR};

/// Converts our CSR matrix format to sprs CsMat format
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    let mut sorted = matrix.clone();
    sorted.sort_indices();
    CsMat::new(
        (sorted.n_rows, sorted.n_cols),
        sorted.row_ptr,
        sorted.col_idx,
        sorted.values,
    )
}

/// Converts our CSC matrix format to sprs CsMat format (as CSC)
pub fn to_sprs_csc<T>(matrix: &SparseMatrixCSC<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    let mut sorted = matrix.clone();
    sorted.sort_indices();
    CsMat::new_csc(
        (sorted.n_rows, sorted.n_cols),
        sorted.col_ptr,
        sorted.row_idx,
        sorted.values,
    )
}

/// Converts any of our matrices to sprs, compressing triplets by row
pub fn to_sprs<T>(matrix: &SparseMatrix<T>) -> Result<CsMat<T>>
where
    T: Copy + Num + Default,
{
    Ok(match matrix {
        SparseMatrix::Ccs(m) => to_sprs_csc(m),
        SparseMatrix::Crs(m) => to_sprs_csr(m),
        SparseMatrix::Triplet(m) => to_sprs_csr(&m.to_crs()?),
    })
}

/// Converts sprs CsMat in CSR format to our SparseMatrixCSR format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(shape.0, shape.1, indptr, indices, data)
}

/// Converts sprs CsMat in CSC format to our SparseMatrixCSC format
pub fn from_sprs_csc<T>(matrix: CsMat<T>) -> Result<SparseMatrixCSC<T>>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSC format
    let matrix = if matrix.is_csc() {
        matrix
    } else {
        matrix.to_csc()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSC::new(shape.0, shape.1, indptr, indices, data)
}

/// Converts a sprs matrix keeping its storage orientation
pub fn from_sprs<T>(matrix: CsMat<T>) -> Result<SparseMatrix<T>>
where
    T: Copy + Num + Default,
{
    let format = if matrix.is_csr() {
        SparseFormat::Crs
    } else {
        SparseFormat::Ccs
    };

    Ok(match format {
        SparseFormat::Crs => from_sprs_csr(matrix)?.into(),
        _ => from_sprs_csc(matrix)?.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::TripletMatrix;

    #[test]
    fn test_csr_roundtrip() {
        let original = SparseMatrixCSR::new(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1.0f64, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap();

        // Convert to sprs and back
        let sprs_mat = to_sprs_csr(&original);
        let roundtrip = from_sprs_csr(sprs_mat).unwrap();

        assert_eq!(roundtrip.n_rows, original.n_rows);
        assert_eq!(roundtrip.n_cols, original.n_cols);
        assert_eq!(roundtrip.row_ptr, original.row_ptr);
        assert_eq!(roundtrip.col_idx, original.col_idx);
        assert_eq!(roundtrip.values, original.values);
    }

    #[test]
    fn test_unsorted_lanes_are_sorted_on_export() {
        // Column 0 receives rows 3, 1 in that order
        let mut triplet = TripletMatrix::new(4, 2).unwrap();
        triplet.set(3, 0, 30.0f64).unwrap();
        triplet.set(1, 0, 10.0).unwrap();
        triplet.set(0, 1, 1.0).unwrap();
        let ccs = triplet.to_ccs().unwrap();
        assert_eq!(ccs.row_idx, vec![3, 1, 0]);

        let sprs_mat = to_sprs_csc(&ccs);
        assert!(sprs_mat.is_csc());
        assert_eq!(sprs_mat.get(3, 0), Some(&30.0));
        assert_eq!(sprs_mat.get(1, 0), Some(&10.0));
        assert_eq!(sprs_mat.get(2, 0), None);
    }

    #[test]
    fn test_sprs_multiply_via_conversion() {
        // A = [1 2; 0 3]
        // B = [4 5; 6 7]
        // Expected result: C = A*B = [16 19; 18 21]
        let a = SparseMatrixCSR::new(
            2,
            2,
            vec![0, 2, 3],
            vec![0, 1, 1],
            vec![1.0f64, 2.0, 3.0],
        )
        .unwrap();
        let b = SparseMatrixCSR::new(
            2,
            2,
            vec![0, 2, 4],
            vec![0, 1, 0, 1],
            vec![4.0f64, 5.0, 6.0, 7.0],
        )
        .unwrap();

        let sprs_result = &to_sprs_csr(&a) * &to_sprs_csr(&b);
        let result = from_sprs(sprs_result.to_owned()).unwrap();

        assert_eq!(result.format(), SparseFormat::Crs);
        assert_eq!(result.nnz(), 4);
        assert!((result.get(0, 0).unwrap() - 16.0).abs() < 1.0e-10);
        assert!((result.get(0, 1).unwrap() - 19.0).abs() < 1.0e-10);
        assert!((result.get(1, 0).unwrap() - 18.0).abs() < 1.0e-10);
        assert!((result.get(1, 1).unwrap() - 21.0).abs() < 1.0e-10);
    }
}
