//! Tests for building matrices entry by entry

use approx::assert_relative_eq;
use spmatrix::{SparseConfig, SparseError, SparseFormat, SparseMatrix, TripletMatrix};

#[test]
fn test_reverse_order_insertion() {
    let n = 200;
    let mut t = TripletMatrix::new(n, n).unwrap();
    for i in (0..n).rev() {
        t.set(i, (i * 7) % n, i as f64 + 0.5).unwrap();
    }

    assert_eq!(t.nnz(), n);
    assert_eq!(t.index().len(), n);
    for i in 0..n {
        assert_relative_eq!(t.get(i, (i * 7) % n).unwrap(), i as f64 + 0.5);
    }
    // Sorted insertion must not degrade the tree into a list
    assert!(t.index().height() <= 12);
}

#[test]
fn test_growth_from_tiny_capacity() {
    let config = SparseConfig {
        fill_fraction: 0.0001,
        ..SparseConfig::default()
    };
    let mut t = TripletMatrix::with_config(10, 10, config).unwrap();
    assert_eq!(t.capacity(), 1);

    for k in 0..50 {
        t.set(k / 10, k % 10, k as f64).unwrap();
    }

    assert_eq!(t.nnz(), 50);
    assert!(t.capacity() >= 50);
    assert_eq!(t.get(4, 9).unwrap(), 49.0);
    assert_eq!(t.get(0, 0).unwrap(), 0.0);
    assert!(t.contains(0, 0));
}

#[test]
fn test_invalid_config_rejected() {
    let config = SparseConfig {
        growth_factor: 1,
        ..SparseConfig::default()
    };
    assert!(matches!(
        TripletMatrix::<f64>::with_config(4, 4, config),
        Err(SparseError::Domain(_))
    ));
    let nan_fill = SparseConfig::with_fill_fraction(f64::NAN);
    assert!(TripletMatrix::<f64>::with_config(4, 4, nan_fill).is_err());
}

#[test]
fn test_set_extend_builds_from_one_by_one() {
    let mut t = TripletMatrix::new(1, 1).unwrap();
    t.set_extend(0, 0, 1.0).unwrap();
    t.set_extend(4, 2, 2.0).unwrap();
    t.set_extend(1, 6, 3.0).unwrap();

    assert_eq!(t.shape(), (5, 7));
    assert_eq!(t.get(4, 2).unwrap(), 2.0);

    // Plain set keeps bounds checking
    assert!(matches!(
        t.set(5, 0, 1.0),
        Err(SparseError::IndexOutOfBounds { row: 5, col: 0, n_rows: 5, n_cols: 7 })
    ));

    let ccs = SparseMatrix::from(t).compress(SparseFormat::Ccs).unwrap();
    assert_eq!(ccs.shape(), (5, 7));
    assert_eq!(ccs.as_ccs().unwrap().col_ptr.len(), 8);
}

#[test]
fn test_explicit_zero_stays_stored() {
    let mut m = SparseMatrix::new(3, 3).unwrap();
    m.set(1, 1, 5.0).unwrap();
    m.set(1, 1, 0.0).unwrap();
    m.set(2, 0, 0.0).unwrap();

    assert_eq!(m.nnz(), 2);
    assert_eq!(m.minmax().unwrap(), (0.0, 0.0));

    let crs = m.compress(SparseFormat::Crs).unwrap();
    assert_eq!(crs.nnz(), 2);

    m.scale(3.0);
    assert_eq!(m.nnz(), 2);
}

#[test]
fn test_drop_zeros_and_remove() {
    let mut t = TripletMatrix::new(4, 4).unwrap();
    t.set(0, 0, 1.0).unwrap();
    t.set(1, 1, 0.0).unwrap();
    t.set(2, 2, 3.0).unwrap();
    t.set(3, 3, 0.0).unwrap();

    assert_eq!(t.drop_zeros().unwrap(), 2);
    assert_eq!(t.nnz(), 2);
    assert!(!t.contains(1, 1));

    assert_eq!(t.remove(0, 0).unwrap(), Some(1.0));
    assert_eq!(t.remove(0, 0).unwrap(), None);
    assert_eq!(t.get(2, 2).unwrap(), 3.0);
    assert_eq!(t.nnz(), 1);
}

#[test]
fn test_set_zero_then_reuse() {
    let mut t = TripletMatrix::new(3, 3).unwrap();
    t.set(0, 1, 1.0).unwrap();
    t.set(2, 2, 2.0).unwrap();
    let capacity = t.capacity();

    t.set_zero();
    assert_eq!(t.nnz(), 0);
    assert!(t.index().is_empty());
    assert_eq!(t.capacity(), capacity);
    assert_eq!(t.get(0, 1).unwrap(), 0.0);

    t.set(0, 1, 4.0).unwrap();
    assert_eq!(t.nnz(), 1);
    assert_eq!(t.get(0, 1).unwrap(), 4.0);
}

#[test]
fn test_minmax_on_empty_matrix() {
    let m = SparseMatrix::<f64>::new(3, 3).unwrap();
    assert!(matches!(m.minmax(), Err(SparseError::EmptyMatrix(_))));
}

#[test]
fn test_out_of_range_get() {
    let m = SparseMatrix::<f64>::new(2, 3).unwrap();
    assert!(matches!(m.get(2, 0), Err(SparseError::IndexOutOfBounds { .. })));
    assert!(matches!(m.get(0, 3), Err(SparseError::IndexOutOfBounds { .. })));
}
