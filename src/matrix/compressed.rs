//! Lane-level kernels shared by the CSC and CSR formats
//!
//! A compressed matrix is a sequence of *lanes* (columns for CSC, rows for
//! CSR). Lane `k` occupies `ptr[k]..ptr[k + 1]` of the `idx` (minor index)
//! and `vals` arrays. Every kernel here is written once against that view.

use std::fmt;
use std::ops::Range;

use num_traits::Num;

use crate::constants::{DEBUG_MAX_ENTRIES, DEBUG_MAX_LANES};
use crate::error::{Result, SparseError};
use crate::matrix::workspace::Workspace;
use crate::utils::exclusive_scan;

/// Borrowed view of the three compressed arrays
#[derive(Clone, Copy)]
pub(crate) struct Lanes<'a, T> {
    pub(crate) ptr: &'a [usize],
    pub(crate) idx: &'a [usize],
    pub(crate) vals: &'a [T],
}

impl<'a, T> Lanes<'a, T> {
    pub(crate) fn new(ptr: &'a [usize], idx: &'a [usize], vals: &'a [T]) -> Self {
        Self { ptr, idx, vals }
    }

    pub(crate) fn n_lanes(&self) -> usize {
        self.ptr.len() - 1
    }

    pub(crate) fn range(&self, lane: usize) -> Range<usize> {
        self.ptr[lane]..self.ptr[lane + 1]
    }

    /// Position of `minor` inside `lane`, by linear scan
    pub(crate) fn find(&self, lane: usize, minor: usize) -> Option<usize> {
        self.range(lane).find(|&k| self.idx[k] == minor)
    }
}

/// Checks that raw arrays describe a well-formed compressed matrix
pub(crate) fn validate<T>(
    n_major: usize,
    n_minor: usize,
    ptr: &[usize],
    idx: &[usize],
    vals: &[T],
) -> Result<()> {
    if ptr.len() != n_major + 1 {
        return Err(SparseError::domain(format!(
            "pointer array has length {}, expected {}",
            ptr.len(),
            n_major + 1
        )));
    }
    if idx.len() != vals.len() {
        return Err(SparseError::domain(format!(
            "{} indices but {} values",
            idx.len(),
            vals.len()
        )));
    }
    if ptr[0] != 0 || ptr[n_major] != idx.len() {
        return Err(SparseError::domain(format!(
            "pointer array must span 0..{}, got {}..{}",
            idx.len(),
            ptr[0],
            ptr[n_major]
        )));
    }
    if let Some(k) = ptr.windows(2).position(|w| w[0] > w[1]) {
        return Err(SparseError::domain(format!(
            "pointer array decreases at lane {}",
            k
        )));
    }

    // Marker per minor index: lane + 1 of the last lane that used it
    let mut seen = vec![0usize; n_minor];
    for lane in 0..n_major {
        for &minor in &idx[ptr[lane]..ptr[lane + 1]] {
            if minor >= n_minor {
                return Err(SparseError::domain(format!(
                    "index {} out of bounds in lane {} (limit {})",
                    minor, lane, n_minor
                )));
            }
            if seen[minor] == lane + 1 {
                return Err(SparseError::domain(format!(
                    "duplicate index {} in lane {}",
                    minor, lane
                )));
            }
            seen[minor] = lane + 1;
        }
    }
    Ok(())
}

/// Reserves `additional` slots in a vector, reporting allocation failure
pub(crate) fn try_reserve<V>(v: &mut Vec<V>, additional: usize) -> Result<()> {
    let requested = v.len().saturating_add(additional);
    v.try_reserve_exact(additional)
        .map_err(SparseError::out_of_memory(requested))
}

/// Allocates a vector of `len` copies of `value`, reporting allocation failure
pub(crate) fn try_filled<V: Clone>(len: usize, value: V) -> Result<Vec<V>> {
    let mut v = Vec::new();
    try_reserve(&mut v, len)?;
    v.resize(len, value);
    Ok(v)
}

/// Re-buckets a compressed matrix by its minor index.
///
/// Reading lanes in order means the output minor indices come out sorted
/// within every output lane. Returns `(ptr, idx, vals)` with `n_minor` lanes.
pub(crate) fn transpose_lanes<T: Copy + Num>(
    n_minor: usize,
    src: Lanes<'_, T>,
) -> Result<(Vec<usize>, Vec<usize>, Vec<T>)> {
    // Count non-zeros per minor index
    let mut counts = try_filled(n_minor, 0usize)?;
    for &minor in src.idx {
        counts[minor] += 1;
    }

    // Compute pointers via prefix sum
    let ptr = exclusive_scan(&counts);

    let nnz = src.idx.len();
    let mut idx = try_filled(nnz, 0usize)?;
    let mut vals = try_filled(nnz, T::zero())?;

    // Reuse the count buffer as the per-lane insertion cursor
    counts.copy_from_slice(&ptr[..n_minor]);
    for lane in 0..src.n_lanes() {
        for k in src.range(lane) {
            let minor = src.idx[k];
            let pos = counts[minor];

            idx[pos] = lane;
            vals[pos] = src.vals[k];

            counts[minor] += 1;
        }
    }

    Ok((ptr, idx, vals))
}

/// Computes `out = a + b` lane by lane.
///
/// Within each lane, entries of `a` keep their order, followed by the entries
/// of `b` whose minor index does not occur in `a`. `work` provides the marker
/// and accumulator arrays, sized to the minor dimension.
pub(crate) fn add_lanes<T: Copy + Num>(
    n_minor: usize,
    a: Lanes<'_, T>,
    b: Lanes<'_, T>,
    out_ptr: &mut Vec<usize>,
    out_idx: &mut Vec<usize>,
    out_vals: &mut Vec<T>,
    work: &mut Workspace<T>,
) -> Result<()> {
    let n_major = a.n_lanes();
    let bound = a.idx.len() + b.idx.len();

    out_ptr.clear();
    out_idx.clear();
    out_vals.clear();
    try_reserve(out_ptr, n_major + 1)?;
    try_reserve(out_idx, bound)?;
    try_reserve(out_vals, bound)?;
    work.prepare(n_minor)?;

    out_ptr.push(0);
    for lane in 0..n_major {
        let mark = lane + 1;
        let start = out_idx.len();

        for k in a.range(lane) {
            let minor = a.idx[k];
            work.markers[minor] = mark;
            work.dense[minor] = a.vals[k];
            out_idx.push(minor);
        }

        for k in b.range(lane) {
            let minor = b.idx[k];
            if work.markers[minor] == mark {
                work.dense[minor] = work.dense[minor] + b.vals[k];
            } else {
                work.markers[minor] = mark;
                work.dense[minor] = b.vals[k];
                out_idx.push(minor);
            }
        }

        for &minor in &out_idx[start..] {
            out_vals.push(work.dense[minor]);
        }
        out_ptr.push(out_idx.len());
    }

    Ok(())
}

/// Sorts minor indices (carrying values along) inside every lane
pub(crate) fn sort_lanes<T: Copy>(ptr: &[usize], idx: &mut [usize], vals: &mut [T]) {
    let mut scratch: Vec<(usize, T)> = Vec::new();
    for lane in 0..ptr.len().saturating_sub(1) {
        let range = ptr[lane]..ptr[lane + 1];
        if idx[range.clone()].windows(2).all(|w| w[0] <= w[1]) {
            continue;
        }

        scratch.clear();
        scratch.extend(
            idx[range.clone()]
                .iter()
                .copied()
                .zip(vals[range.clone()].iter().copied()),
        );
        scratch.sort_unstable_by_key(|&(minor, _)| minor);

        for (k, (minor, val)) in range.zip(scratch.iter().copied()) {
            idx[k] = minor;
            vals[k] = val;
        }
    }
}

/// Shared `Debug` rendering: dimensions, nnz and a sample of lanes
pub(crate) fn fmt_lanes<T: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    lane_label: &str,
    dims: (usize, usize),
    lanes: Lanes<'_, T>,
) -> fmt::Result {
    writeln!(f, "{} {{", name)?;
    writeln!(f, "  dimensions: {} × {}", dims.0, dims.1)?;
    writeln!(f, "  nnz: {}", lanes.idx.len())?;

    let n_lanes = lanes.n_lanes();
    let max_lanes_to_print = DEBUG_MAX_LANES.min(n_lanes);

    if max_lanes_to_print > 0 {
        writeln!(f, "  content sample:")?;

        for lane in 0..max_lanes_to_print {
            write!(f, "    {} {}: ", lane_label, lane)?;
            let range = lanes.range(lane);

            if range.is_empty() {
                writeln!(f, "(empty)")?;
            } else {
                let max_elements = DEBUG_MAX_ENTRIES.min(range.len());

                for k in range.start..(range.start + max_elements) {
                    write!(f, "({}, {:?}) ", lanes.idx[k], lanes.vals[k])?;
                }

                if range.len() > max_elements {
                    write!(f, "... ({} more)", range.len() - max_elements)?;
                }

                writeln!(f)?;
            }
        }

        if n_lanes > max_lanes_to_print {
            writeln!(
                f,
                "    ... ({} more {}s)",
                n_lanes - max_lanes_to_print,
                lane_label
            )?;
        }
    }

    write!(f, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_structure() {
        // [1 2 0]
        // [0 3 0]
        let ptr = [0, 2, 3];
        assert!(validate(2, 3, &ptr, &[0, 1, 1], &[1, 2, 3]).is_ok());

        assert!(validate(2, 3, &[0, 2], &[0, 1], &[1, 2]).is_err());
        assert!(validate(2, 3, &ptr, &[0, 1, 1], &[1, 2]).is_err());
        assert!(validate(2, 3, &ptr, &[0, 3, 1], &[1, 2, 3]).is_err());
        assert!(validate(2, 3, &ptr, &[0, 0, 1], &[1, 2, 3]).is_err());
        assert!(validate(2, 3, &[0, 2, 1], &[0, 1, 1], &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_transpose_lanes_sorts_minor() {
        // Lanes: 0 -> {2: 1, 0: 2}, 1 -> {1: 3}
        let lanes = Lanes::new(&[0, 2, 3], &[2, 0, 1], &[1, 2, 3]);
        let (ptr, idx, vals) = transpose_lanes(3, lanes).unwrap();
        assert_eq!(ptr, vec![0, 1, 2, 3]);
        assert_eq!(idx, vec![0, 1, 0]);
        assert_eq!(vals, vec![2, 3, 1]);
    }

    #[test]
    fn test_add_lanes_merges() {
        let a = Lanes::new(&[0, 1, 2], &[0, 1], &[1, 2]);
        let b = Lanes::new(&[0, 2, 2], &[0, 1], &[3, 4]);
        let mut work = Workspace::default();
        let (mut ptr, mut idx, mut vals) = (Vec::new(), Vec::new(), Vec::new());

        add_lanes(2, a, b, &mut ptr, &mut idx, &mut vals, &mut work).unwrap();

        assert_eq!(ptr, vec![0, 2, 3]);
        assert_eq!(idx, vec![0, 1, 1]);
        assert_eq!(vals, vec![4, 4, 2]);
    }

    #[test]
    fn test_sort_lanes() {
        let ptr = [0, 3, 3, 5];
        let mut idx = [2, 0, 1, 4, 3];
        let mut vals = [20, 0, 10, 40, 30];
        sort_lanes(&ptr, &mut idx, &mut vals);
        assert_eq!(idx, [0, 1, 2, 3, 4]);
        assert_eq!(vals, [0, 10, 20, 30, 40]);
    }
}
