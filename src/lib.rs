//! # spmatrix: sparse matrix storage for numerical code
//!
//! spmatrix stores sparse matrices in three layouts and converts between
//! them.
//!
//! ## Overview
//!
//! - **Triplet** ([`TripletMatrix`]): the construction format. Entries may
//!   arrive in any order; a balanced index tree keeps coordinates unique and
//!   lookups O(log n).
//! - **Compressed sparse column** ([`SparseMatrixCSC`]) and **compressed
//!   sparse row** ([`SparseMatrixCSR`]): the computation formats, built from a
//!   triplet matrix by a stable counting sort.
//!
//! [`SparseMatrix`] tags one of the three and dispatches the operations that
//! work in every format: element access, scaling, comparison, extrema,
//! addition, transposition, dense conversion and matrix-vector products.
//!
//! ## Components
//!
//! 1. **Index tree** ([`IndexTree`]): an arena-backed AVL tree mapping
//!    (row, col) to a storage slot.
//!
//! 2. **Format conversion**: triplet → CCS/CRS in O(nnz + lanes), and
//!    CCS ↔ CRS by re-bucketing.
//!
//! 3. **Transpose duality**: the CCS arrays of A are the CRS arrays of Aᵗ,
//!    so [`SparseMatrix::transpose_duality`] transposes a compressed matrix
//!    in O(1).
//!
//! 4. **Persistence**: raw binary dumps and Matrix Market text in [`io`];
//!    hand-off to `sprs` in [`utils`].
//!
//! ## Usage
//!
//! ```
//! use spmatrix::{SparseFormat, SparseMatrix};
//!
//! let mut m = SparseMatrix::<f64>::new(3, 3)?;
//! m.set(0, 0, 1.0)?;
//! m.set(2, 1, 4.0)?;
//! m.set(0, 0, 2.0)?; // overwrites
//!
//! let ccs = m.compress(SparseFormat::Ccs)?;
//! assert_eq!(ccs.nnz(), 2);
//! assert_eq!(ccs.get(0, 0)?, 2.0);
//! assert_eq!(ccs.get(1, 1)?, 0.0);
//! # Ok::<(), spmatrix::SparseError>(())
//! ```

pub mod constants;
pub mod error;
pub mod io;
pub mod matrix;
pub mod utils;

// Re-export primary components
pub use error::{Result, SparseError};
pub use io::ValueFormat;
pub use matrix::{
    DenseMatrix, IndexTree, Op, SparseConfig, SparseFormat, SparseMatrix, SparseMatrixCSC,
    SparseMatrixCSR, TripletMatrix,
};
pub use utils::{from_sprs, from_sprs_csc, from_sprs_csr, to_sprs, to_sprs_csc, to_sprs_csr};

/// Version information for the spmatrix library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
