//! Scratch space owned by compressed matrices and reused across operations

use num_traits::Num;

use crate::error::{Result, SparseError};

/// Marker array plus a dense value buffer, both indexed by minor coordinate
#[derive(Clone)]
pub(crate) struct Workspace<T> {
    pub(crate) markers: Vec<usize>,
    pub(crate) dense: Vec<T>,
}

impl<T> Default for Workspace<T> {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            dense: Vec::new(),
        }
    }
}

impl<T: Copy + Num> Workspace<T> {
    /// Sizes the buffers for `len` slots and clears every marker
    pub(crate) fn prepare(&mut self, len: usize) -> Result<()> {
        if self.markers.len() < len {
            let additional = len - self.markers.len();
            self.markers
                .try_reserve_exact(additional)
                .map_err(SparseError::out_of_memory(len))?;
            self.dense
                .try_reserve_exact(len.saturating_sub(self.dense.len()))
                .map_err(SparseError::out_of_memory(len))?;
        }
        self.markers.clear();
        self.markers.resize(len, 0);
        self.dense.clear();
        self.dense.resize(len, T::zero());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_resets_markers() {
        let mut work = Workspace::<f64>::default();
        work.prepare(4).unwrap();
        work.markers[2] = 9;
        work.dense[2] = 1.5;

        work.prepare(3).unwrap();
        assert_eq!(work.markers.len(), 3);
        assert_eq!(work.dense.len(), 3);
        assert!(work.markers.iter().all(|&m| m == 0));
        assert!(work.dense.iter().all(|&v| v == 0.0));
    }
}
