//! Raw binary dumps of sparse matrix storage
//!
//! A dump starts with four native-endian `usize` words: rows, cols, nnz and
//! a format tag. The values follow, then the minor indices, then the third
//! array: column indices for triplets, the major pointer array (lanes + 1
//! words) for compressed formats. Dumps are only portable between machines
//! with the same word size and byte order.

use std::io::{Read, Write};

use bytemuck::Pod;
use log::debug;
use num_traits::Num;

use crate::constants::BINARY_HEADER_WORDS;
use crate::error::{Result, SparseError};
use crate::matrix::compressed::{self, try_filled};
use crate::matrix::{IndexTree, SparseFormat, SparseMatrix};

fn write_words<W: Write>(writer: &mut W, words: &[usize]) -> Result<()> {
    writer.write_all(bytemuck::cast_slice(words))?;
    Ok(())
}

fn read_words<R: Read>(reader: &mut R, len: usize) -> Result<Vec<usize>> {
    let mut words = try_filled(len, 0usize)?;
    reader.read_exact(bytemuck::cast_slice_mut(&mut words))?;
    Ok(words)
}

fn read_values<T: Pod, R: Read>(reader: &mut R, len: usize) -> Result<Vec<T>> {
    let mut values = try_filled(len, T::zeroed())?;
    reader.read_exact(bytemuck::cast_slice_mut(&mut values))?;
    Ok(values)
}

/// Writes the storage arrays of `matrix` to `writer`
pub fn write_binary<T, W>(matrix: &SparseMatrix<T>, writer: &mut W) -> Result<()>
where
    T: Copy + Num + Pod,
    W: Write,
{
    let (n_rows, n_cols) = matrix.shape();
    let header: [usize; BINARY_HEADER_WORDS] =
        [n_rows, n_cols, matrix.nnz(), matrix.format().tag()];
    write_words(writer, &header)?;

    match matrix {
        SparseMatrix::Triplet(m) => {
            writer.write_all(bytemuck::cast_slice(m.values()))?;
            write_words(writer, m.row_indices())?;
            write_words(writer, m.col_indices())?;
        }
        SparseMatrix::Ccs(m) => {
            writer.write_all(bytemuck::cast_slice(&m.values))?;
            write_words(writer, &m.row_idx)?;
            write_words(writer, &m.col_ptr)?;
        }
        SparseMatrix::Crs(m) => {
            writer.write_all(bytemuck::cast_slice(&m.values))?;
            write_words(writer, &m.col_idx)?;
            write_words(writer, &m.row_ptr)?;
        }
    }

    debug!(
        "wrote binary {} {}×{} with {} entries",
        matrix.format(),
        n_rows,
        n_cols,
        matrix.nnz()
    );
    Ok(())
}

/// Reads a dump produced by [`write_binary`] into a preallocated matrix
///
/// `matrix` must already have the dump's format and shape, and enough
/// capacity for its entries. Its previous content is replaced.
///
/// # Errors
///
/// - [`SparseError::FormatMismatch`] if the dump holds another format
/// - [`SparseError::DimensionMismatch`] if the shapes differ
/// - [`SparseError::LengthMismatch`] if the entries exceed the capacity
/// - [`SparseError::Domain`] for an unknown format tag or inconsistent arrays
/// - [`SparseError::Io`] if the stream ends early
pub fn read_binary_into<T, R>(matrix: &mut SparseMatrix<T>, reader: &mut R) -> Result<()>
where
    T: Copy + Num + Pod,
    R: Read,
{
    let header = read_words(reader, BINARY_HEADER_WORDS)?;
    let (n_rows, n_cols, nnz, tag) = (header[0], header[1], header[2], header[3]);

    let format = SparseFormat::from_tag(tag)
        .ok_or_else(|| SparseError::domain(format!("unknown format tag {} in binary dump", tag)))?;
    if format != matrix.format() {
        return Err(SparseError::FormatMismatch {
            op: "read_binary_into",
            found: format,
        });
    }
    if (n_rows, n_cols) != matrix.shape() {
        return Err(SparseError::DimensionMismatch {
            lhs: matrix.shape(),
            rhs: (n_rows, n_cols),
        });
    }
    if nnz > matrix.capacity() {
        return Err(SparseError::LengthMismatch {
            needed: nnz,
            capacity: matrix.capacity(),
        });
    }

    debug!(
        "reading binary {} {}×{} with {} entries",
        format, n_rows, n_cols, nnz
    );

    let values: Vec<T> = read_values(reader, nnz)?;
    let minor = read_words(reader, nnz)?;

    match matrix {
        SparseMatrix::Triplet(m) => {
            let cols = read_words(reader, nnz)?;
            // Check every coordinate before touching the destination
            let mut seen = IndexTree::with_capacity(nnz)?;
            for (slot, (&i, &j)) in minor.iter().zip(&cols).enumerate() {
                if i >= n_rows || j >= n_cols {
                    return Err(SparseError::IndexOutOfBounds {
                        row: i,
                        col: j,
                        n_rows,
                        n_cols,
                    });
                }
                seen.insert(i, j, slot).map_err(|_| {
                    SparseError::domain(format!("binary dump repeats coordinate ({}, {})", i, j))
                })?;
            }
            m.set_zero();
            for ((&i, &j), &v) in minor.iter().zip(&cols).zip(&values) {
                m.set(i, j, v)?;
            }
        }
        SparseMatrix::Ccs(m) => {
            let ptr = read_words(reader, n_cols + 1)?;
            compressed::validate(n_cols, n_rows, &ptr, &minor, &values)?;
            m.col_ptr = ptr;
            m.row_idx.clear();
            m.row_idx.extend_from_slice(&minor);
            m.values.clear();
            m.values.extend_from_slice(&values);
        }
        SparseMatrix::Crs(m) => {
            let ptr = read_words(reader, n_rows + 1)?;
            compressed::validate(n_rows, n_cols, &ptr, &minor, &values)?;
            m.row_ptr = ptr;
            m.col_idx.clear();
            m.col_idx.extend_from_slice(&minor);
            m.values.clear();
            m.values.extend_from_slice(&values);
        }
    }
    Ok(())
}
