// Matrix data structures and operations

pub(crate) mod compressed;
pub mod config;
pub mod conversion;
pub mod csc;
pub mod csr;
pub mod dense;
pub mod format;
pub mod index;
pub mod ops;
pub mod sparse;
pub mod triplet;
mod workspace;

pub use config::SparseConfig;
pub use csc::SparseMatrixCSC;
pub use csr::SparseMatrixCSR;
pub use dense::DenseMatrix;
pub use format::SparseFormat;
pub use index::IndexTree;
pub use ops::Op;
pub use sparse::SparseMatrix;
pub use triplet::TripletMatrix;
