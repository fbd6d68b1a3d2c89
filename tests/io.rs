//! File round trips for binary dumps and Matrix Market text

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use approx::assert_relative_eq;
use spmatrix::io::{
    read_binary_into, read_matrix_market_path, write_binary, write_matrix_market_path,
    ValueFormat,
};
use spmatrix::{SparseError, SparseFormat, SparseMatrix};

fn sample() -> SparseMatrix<f64> {
    let mut m = SparseMatrix::new(6, 5).unwrap();
    for &(i, j, v) in &[
        (5, 4, 1.0 / 3.0),
        (0, 0, -2.5),
        (3, 1, 1.0e-12),
        (2, 2, 0.0),
        (0, 4, 7.0),
        (4, 0, 123456.789),
    ] {
        m.set(i, j, v).unwrap();
    }
    m
}

#[test]
fn test_matrix_market_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.mtx");

    for format in [SparseFormat::Triplet, SparseFormat::Ccs, SparseFormat::Crs] {
        let m = sample().compress(format).unwrap();
        write_matrix_market_path(&m, &path, ValueFormat::Display).unwrap();

        let back = SparseMatrix::from(read_matrix_market_path::<f64, _>(&path).unwrap());
        assert_eq!(back.shape(), (6, 5));
        assert_eq!(back.nnz(), 6);
        // Display output reads back exactly
        assert!(back.equal(&m.compress(SparseFormat::Triplet).unwrap()).unwrap());
    }
}

#[test]
fn test_matrix_market_scientific_precision() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sci.mtx");

    write_matrix_market_path(&sample(), &path, ValueFormat::Scientific(6)).unwrap();
    let back = read_matrix_market_path::<f64, _>(&path).unwrap();

    assert_relative_eq!(back.get(5, 4).unwrap(), 1.0 / 3.0, max_relative = 1.0e-6);
    assert_relative_eq!(back.get(4, 0).unwrap(), 123456.789, max_relative = 1.0e-6);
    assert_relative_eq!(back.get(3, 1).unwrap(), 1.0e-12, max_relative = 1.0e-6);
}

#[test]
fn test_matrix_market_symmetric_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sym.mtx");
    {
        let mut f = BufWriter::new(File::create(&path).unwrap());
        writeln!(f, "%%MatrixMarket matrix coordinate real symmetric").unwrap();
        writeln!(f, "% lower triangle of a 3x3 Laplacian").unwrap();
        writeln!(f, "3 3 5").unwrap();
        writeln!(f, "1 1 2").unwrap();
        writeln!(f, "2 1 -1").unwrap();
        writeln!(f, "2 2 2").unwrap();
        writeln!(f, "3 2 -1").unwrap();
        writeln!(f, "3 3 2").unwrap();
    }

    let m = SparseMatrix::from(read_matrix_market_path::<f64, _>(&path).unwrap());
    assert_eq!(m.nnz(), 7);
    assert_eq!(
        m.to_dense(),
        ndarray::array![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]]
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_matrix_market_path::<f64, _>(dir.path().join("absent.mtx"));
    assert!(matches!(result, Err(SparseError::Io(_))));
}

#[test]
fn test_binary_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.bin");

    for format in [SparseFormat::Triplet, SparseFormat::Ccs, SparseFormat::Crs] {
        let m = sample().compress(format).unwrap();
        {
            let mut w = BufWriter::new(File::create(&path).unwrap());
            write_binary(&m, &mut w).unwrap();
            w.flush().unwrap();
        }

        let mut back = SparseMatrix::with_capacity(6, 5, m.nnz(), format).unwrap();
        let mut r = BufReader::new(File::open(&path).unwrap());
        read_binary_into(&mut back, &mut r).unwrap();

        assert_eq!(back.format(), format);
        assert!(back.equal(&m).unwrap());
        // Raw dumps preserve storage order exactly
        let a: Vec<_> = m.iter().map(|(i, j, &v)| (i, j, v)).collect();
        let b: Vec<_> = back.iter().map(|(i, j, &v)| (i, j, v)).collect();
        assert_eq!(a, b);
    }
}

#[test]
fn test_binary_overwrites_previous_content() {
    let m = sample().compress(SparseFormat::Crs).unwrap();
    let mut bytes = Vec::new();
    write_binary(&m, &mut bytes).unwrap();

    let mut target = SparseMatrix::new(6, 5).unwrap();
    target.set(1, 1, 99.0).unwrap();
    let mut target = target.compress(SparseFormat::Crs).unwrap();
    target.grow(16).unwrap();

    read_binary_into(&mut target, &mut bytes.as_slice()).unwrap();
    assert_eq!(target.get(1, 1).unwrap(), 0.0);
    assert!(target.equal(&m).unwrap());
}
