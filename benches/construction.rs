//! Benchmarks for triplet construction and compression

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spmatrix::{SparseFormat, SparseMatrix, TripletMatrix};

/// Deterministic scattered coordinates: roughly `per_row` entries in each row
/// of an n×n matrix, visited in a non-sorted order
fn scattered_entries(n: usize, per_row: usize) -> Vec<(usize, usize, f64)> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..n * per_row)
        .map(|_| {
            let r = next();
            ((r as usize) % n, ((r >> 32) as usize) % n, (r % 1000) as f64)
        })
        .collect()
}

fn build(n: usize, entries: &[(usize, usize, f64)]) -> TripletMatrix<f64> {
    let mut t = TripletMatrix::with_capacity(n, n, entries.len()).unwrap();
    for &(i, j, v) in entries {
        t.set(i, j, v).unwrap();
    }
    t
}

fn bench_triplet_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("triplet_insertion");
    for &n in &[1_000usize, 10_000] {
        let entries = scattered_entries(n, 8);
        group.bench_with_input(BenchmarkId::from_parameter(n), &entries, |b, entries| {
            b.iter(|| black_box(build(n, entries)))
        });
    }
    group.finish();
}

fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");
    for &n in &[1_000usize, 10_000] {
        let triplet = SparseMatrix::from(build(n, &scattered_entries(n, 8)));

        group.bench_with_input(BenchmarkId::new("to_ccs", n), &triplet, |b, m| {
            b.iter(|| black_box(m.compress(SparseFormat::Ccs).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("to_crs", n), &triplet, |b, m| {
            b.iter(|| black_box(m.compress(SparseFormat::Crs).unwrap()))
        });

        let ccs = triplet.compress(SparseFormat::Ccs).unwrap();
        group.bench_with_input(BenchmarkId::new("ccs_to_crs", n), &ccs, |b, m| {
            b.iter(|| black_box(m.compress(SparseFormat::Crs).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("transpose_duality", n), &ccs, |b, m| {
            b.iter(|| {
                let mut t = m.clone();
                t.transpose_duality().unwrap();
                black_box(t)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_triplet_insertion, bench_compression);
criterion_main!(benches);
