//! Matrix Market coordinate format reader/writer
//!
//! Reading accepts `real`, `integer` and `pattern` fields with `general` or
//! `symmetric` symmetry. Indices in the file are 1-based. A file without a
//! banner line is read as `real general`. Writing always emits a
//! `real general` header followed by one `row col value` line per stored
//! entry, in storage order.

use std::fmt::{Display, LowerExp};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};
use num_traits::Num;

use crate::constants::{MATRIX_MARKET_BANNER, MATRIX_MARKET_HEADER, MATRIX_MARKET_MAX_PREALLOC};
use crate::error::{Result, SparseError};
use crate::matrix::{SparseMatrix, TripletMatrix};

/// How values are rendered when writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormat {
    /// The type's `Display` output, the shortest text that reads back exactly
    #[default]
    Display,
    /// Fixed-point with the given number of decimals
    Fixed(usize),
    /// Scientific notation with the given number of decimals
    Scientific(usize),
}

impl ValueFormat {
    fn write_value<W, T>(self, writer: &mut W, value: T) -> std::io::Result<()>
    where
        W: Write,
        T: Display + LowerExp,
    {
        match self {
            ValueFormat::Display => write!(writer, "{}", value),
            ValueFormat::Fixed(p) => write!(writer, "{:.*}", p, value),
            ValueFormat::Scientific(p) => write!(writer, "{:.*e}", p, value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symmetry {
    General,
    Symmetric,
}

fn parse_banner(line: &str) -> Result<(Field, Symmetry)> {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();

    if tokens.len() != 5 {
        return Err(SparseError::domain(format!(
            "malformed Matrix Market banner: '{}'",
            line
        )));
    }
    if tokens[1] != "matrix" || tokens[2] != "coordinate" {
        return Err(SparseError::domain(format!(
            "unsupported Matrix Market layout '{} {}', only 'matrix coordinate' is read",
            tokens[1], tokens[2]
        )));
    }

    let field = match tokens[3].as_str() {
        "real" | "double" => Field::Real,
        "integer" => Field::Integer,
        "pattern" => Field::Pattern,
        other => {
            return Err(SparseError::domain(format!(
                "unsupported Matrix Market field '{}'",
                other
            )))
        }
    };
    let symmetry = match tokens[4].as_str() {
        "general" => Symmetry::General,
        "symmetric" => Symmetry::Symmetric,
        other => {
            return Err(SparseError::domain(format!(
                "unsupported Matrix Market symmetry '{}'",
                other
            )))
        }
    };
    Ok((field, symmetry))
}

fn parse_token<V: FromStr>(token: Option<&str>, what: &str, line_no: usize) -> Result<V> {
    let token =
        token.ok_or_else(|| SparseError::domain(format!("line {}: missing {}", line_no, what)))?;
    token
        .parse()
        .map_err(|_| SparseError::domain(format!("line {}: invalid {} '{}'", line_no, what, token)))
}

fn parse_index(token: Option<&str>, what: &str, line_no: usize) -> Result<usize> {
    let one_based: usize = parse_token(token, what, line_no)?;
    one_based.checked_sub(1).ok_or_else(|| {
        SparseError::domain(format!("line {}: {} must be at least 1", line_no, what))
    })
}

/// Largest entry count a file of this shape can declare
fn entry_limit(n_rows: usize, n_cols: usize, symmetry: Symmetry, line_no: usize) -> Result<usize> {
    let limit = match symmetry {
        Symmetry::General => n_rows.checked_mul(n_cols),
        Symmetry::Symmetric => {
            if n_rows != n_cols {
                return Err(SparseError::domain(format!(
                    "line {}: symmetric matrix must be square, got {}×{}",
                    line_no, n_rows, n_cols
                )));
            }
            // n * (n + 1) / 2, halving whichever factor is even
            let m = n_rows.checked_add(1);
            m.and_then(|m| {
                if n_rows % 2 == 0 {
                    (n_rows / 2).checked_mul(m)
                } else {
                    n_rows.checked_mul(m / 2)
                }
            })
        }
    };
    // A count that overflows usize cannot be exceeded by a usize nnz
    Ok(limit.unwrap_or(usize::MAX))
}

/// Reads a Matrix Market coordinate file into a triplet matrix
///
/// Symmetric files store one triangle; every off-diagonal entry is mirrored.
/// Pattern files carry no values and yield ones. A coordinate given twice
/// keeps the last value.
///
/// # Errors
///
/// [`SparseError::Domain`] for a malformed banner, size line or entry, or an
/// entry count that disagrees with the size line.
/// [`SparseError::IndexOutOfBounds`] for an entry outside the declared shape.
pub fn read_matrix_market<T, R>(reader: R) -> Result<TripletMatrix<T>>
where
    T: Copy + Num + FromStr,
    R: BufRead,
{
    let mut lines = reader.lines().enumerate();

    // Banner, comments, then the size line
    let mut header = (Field::Real, Symmetry::General);
    let mut size_line = None;
    for (n, line) in lines.by_ref() {
        let line = line?;
        let trimmed = line.trim();
        if n == 0 && trimmed.starts_with(MATRIX_MARKET_BANNER) {
            header = parse_banner(trimmed)?;
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        size_line = Some((n + 1, line));
        break;
    }

    let (line_no, size_line) =
        size_line.ok_or_else(|| SparseError::domain("Matrix Market input has no size line"))?;
    let mut parts = size_line.split_whitespace();
    let n_rows: usize = parse_token(parts.next(), "number of rows", line_no)?;
    let n_cols: usize = parse_token(parts.next(), "number of columns", line_no)?;
    let nnz: usize = parse_token(parts.next(), "number of entries", line_no)?;
    if parts.next().is_some() {
        return Err(SparseError::domain(format!(
            "line {}: size line must hold exactly three numbers",
            line_no
        )));
    }

    let (field, symmetry) = header;
    debug!(
        "reading Matrix Market {}×{} with {} entries ({:?}, {:?})",
        n_rows, n_cols, nnz, field, symmetry
    );

    let limit = entry_limit(n_rows, n_cols, symmetry, line_no)?;
    if nnz > limit {
        return Err(SparseError::domain(format!(
            "line {}: {} entries declared but a {}×{} matrix holds at most {}",
            line_no, nnz, n_rows, n_cols, limit
        )));
    }

    // The declared count is untrusted; `set` grows past the reservation
    let capacity = match symmetry {
        Symmetry::General => nnz,
        Symmetry::Symmetric => nnz.saturating_mul(2),
    };
    let mut matrix = TripletMatrix::with_capacity(
        n_rows,
        n_cols,
        capacity.min(MATRIX_MARKET_MAX_PREALLOC),
    )?;

    let mut seen = 0;
    let mut duplicates = 0;
    for (n, line) in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let line_no = n + 1;
        if seen == nnz {
            return Err(SparseError::domain(format!(
                "line {}: more entries than the {} declared",
                line_no, nnz
            )));
        }

        let mut parts = trimmed.split_whitespace();
        let row = parse_index(parts.next(), "row index", line_no)?;
        let col = parse_index(parts.next(), "column index", line_no)?;
        let value: T = match field {
            Field::Pattern => T::one(),
            Field::Real | Field::Integer => parse_token(parts.next(), "value", line_no)?,
        };

        if matrix.contains(row, col) {
            duplicates += 1;
        }
        matrix.set(row, col, value)?;
        if symmetry == Symmetry::Symmetric && row != col {
            matrix.set(col, row, value)?;
        }
        seen += 1;
    }

    if seen != nnz {
        return Err(SparseError::domain(format!(
            "expected {} entries, found {}",
            nnz, seen
        )));
    }
    if duplicates > 0 {
        warn!(
            "Matrix Market input repeated {} coordinates; the last value was kept",
            duplicates
        );
    }
    Ok(matrix)
}

/// Opens `path` and reads it with [`read_matrix_market`]
pub fn read_matrix_market_path<T, P>(path: P) -> Result<TripletMatrix<T>>
where
    T: Copy + Num + FromStr,
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    read_matrix_market(BufReader::new(file))
}

/// Writes every stored entry of `matrix` as a `real general` coordinate file
///
/// Works in any storage format. Indices are written 1-based; explicit zeros
/// are written like any other entry.
pub fn write_matrix_market<T, W>(
    matrix: &SparseMatrix<T>,
    writer: &mut W,
    format: ValueFormat,
) -> Result<()>
where
    T: Copy + Num + Display + LowerExp,
    W: Write,
{
    let (n_rows, n_cols) = matrix.shape();
    writeln!(writer, "{}", MATRIX_MARKET_HEADER)?;
    writeln!(writer, "{} {} {}", n_rows, n_cols, matrix.nnz())?;

    for (i, j, &v) in matrix.iter() {
        write!(writer, "{} {} ", i + 1, j + 1)?;
        format.write_value(writer, v)?;
        writeln!(writer)?;
    }

    debug!(
        "wrote Matrix Market {}×{} {} matrix with {} entries",
        n_rows,
        n_cols,
        matrix.format(),
        matrix.nnz()
    );
    Ok(())
}

/// Creates `path` and writes `matrix` to it with [`write_matrix_market`]
pub fn write_matrix_market_path<T, P>(
    matrix: &SparseMatrix<T>,
    path: P,
    format: ValueFormat,
) -> Result<()>
where
    T: Copy + Num + Display + LowerExp,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_matrix_market(matrix, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}
