//! Property tests for construction, conversion and transposition

use std::collections::HashMap;

use ndarray::Array2;
use proptest::prelude::*;
use spmatrix::{IndexTree, SparseFormat, SparseMatrix, TripletMatrix};

/// Up to 60 (row, col, value) entries inside a matrix of up to 12×12;
/// coordinates may repeat
fn entries() -> impl Strategy<Value = (usize, usize, Vec<(usize, usize, i32)>)> {
    (1usize..12, 1usize..12).prop_flat_map(|(rows, cols)| {
        let entry = (0..rows, 0..cols, -50i32..50);
        (Just(rows), Just(cols), prop::collection::vec(entry, 0..60))
    })
}

fn build(rows: usize, cols: usize, entries: &[(usize, usize, i32)]) -> TripletMatrix<f64> {
    let mut t = TripletMatrix::with_capacity(rows, cols, 1).unwrap();
    for &(i, j, v) in entries {
        t.set(i, j, v as f64).unwrap();
    }
    t
}

fn last_writes(entries: &[(usize, usize, i32)]) -> HashMap<(usize, usize), f64> {
    entries
        .iter()
        .map(|&(i, j, v)| ((i, j), v as f64))
        .collect()
}

proptest! {
    #[test]
    fn dense_round_trip((rows, cols, entries) in entries()) {
        let mut dense = Array2::<f64>::zeros((rows, cols));
        for &(i, j, v) in &entries {
            dense[[i, j]] = v as f64;
        }

        let sparse = SparseMatrix::from(TripletMatrix::from_dense(&dense).unwrap());
        for format in [SparseFormat::Triplet, SparseFormat::Ccs, SparseFormat::Crs] {
            let back = sparse.compress(format).unwrap().to_dense();
            prop_assert_eq!(&back, &dense);
        }
    }

    #[test]
    fn triplet_keeps_last_write((rows, cols, entries) in entries()) {
        let t = build(rows, cols, &entries);
        let expected = last_writes(&entries);

        prop_assert_eq!(t.nnz(), expected.len());
        prop_assert!(t.capacity() >= t.nnz());
        for (&(i, j), &v) in &expected {
            prop_assert_eq!(t.get(i, j).unwrap(), v);
        }
    }

    #[test]
    fn index_matches_storage((rows, cols, entries) in entries()) {
        let t = build(rows, cols, &entries);
        let index = t.index();

        prop_assert_eq!(index.len(), t.nnz());
        for (slot, (i, j, _)) in t.iter().enumerate() {
            prop_assert_eq!(index.find(i, j), Some(slot));
        }

        // In-order traversal is sorted by (row, col) and covers every slot once
        let keys: Vec<_> = index.iter().map(|(key, _)| key).collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        let mut slots: Vec<_> = index.iter().map(|(_, slot)| slot).collect();
        slots.sort_unstable();
        prop_assert_eq!(slots, (0..t.nnz()).collect::<Vec<_>>());
    }

    #[test]
    fn index_height_stays_logarithmic(
        keys in prop::collection::vec((0usize..1000, 0usize..1000), 1..300)
    ) {
        let mut tree = IndexTree::new();
        for (slot, &(i, j)) in keys.iter().enumerate() {
            if tree.find(i, j).is_none() {
                tree.insert(i, j, slot).unwrap();
            }
        }
        // AVL bound: h < 1.45 log2(n + 2)
        let bound = 1.45 * ((tree.len() + 2) as f64).log2();
        prop_assert!((tree.height() as f64) < bound + 1.0);
    }

    #[test]
    fn remove_keeps_remaining_entries((rows, cols, entries) in entries(), drop_every in 2usize..5) {
        let mut t = build(rows, cols, &entries);
        let mut expected = last_writes(&entries);

        let victims: Vec<_> = expected.keys().copied().step_by(drop_every).collect();
        for (i, j) in victims {
            let removed = t.remove(i, j).unwrap();
            prop_assert_eq!(removed, expected.remove(&(i, j)));
        }

        prop_assert_eq!(t.nnz(), expected.len());
        prop_assert_eq!(t.index().len(), expected.len());
        for (&(i, j), &v) in &expected {
            prop_assert_eq!(t.get(i, j).unwrap(), v);
        }
    }

    #[test]
    fn duality_twice_is_identity((rows, cols, entries) in entries()) {
        let t = build(rows, cols, &entries);
        for format in [SparseFormat::Ccs, SparseFormat::Crs] {
            let original = SparseMatrix::from(t.clone()).compress(format).unwrap();
            let mut m = original.clone();

            m.transpose_duality().unwrap();
            prop_assert_eq!(m.format(), format.dual());
            prop_assert_eq!(m.shape(), (cols, rows));
            prop_assert_eq!(m.to_dense(), original.to_dense().t().to_owned());

            m.transpose_duality().unwrap();
            prop_assert_eq!(m.format(), format);
            prop_assert!(m.equal(&original).unwrap());
        }
    }

    #[test]
    fn transpose_preserves_format((rows, cols, entries) in entries()) {
        let t = build(rows, cols, &entries);
        for format in [SparseFormat::Triplet, SparseFormat::Ccs, SparseFormat::Crs] {
            let original = SparseMatrix::from(t.clone()).compress(format).unwrap();
            let mut m = original.clone();
            m.transpose().unwrap();

            prop_assert_eq!(m.format(), format);
            prop_assert_eq!(m.nnz(), original.nnz());
            prop_assert_eq!(m.to_dense(), original.to_dense().t().to_owned());
        }
    }

    #[test]
    fn addition_matches_dense(
        (rows, cols, a) in entries(),
        b in prop::collection::vec((0usize..12, 0usize..12, -50i32..50), 0..40)
    ) {
        let b: Vec<_> = b.into_iter().filter(|&(i, j, _)| i < rows && j < cols).collect();
        let ta = SparseMatrix::from(build(rows, cols, &a));
        let tb = SparseMatrix::from(build(rows, cols, &b));

        for format in [SparseFormat::Ccs, SparseFormat::Crs] {
            let ca = ta.compress(format).unwrap();
            let cb = tb.compress(format).unwrap();
            let sum = ca.add(&cb).unwrap();

            prop_assert!(sum.nnz() <= ca.nnz() + cb.nnz());
            prop_assert_eq!(sum.to_dense(), ta.to_dense() + tb.to_dense());
        }
    }
}
