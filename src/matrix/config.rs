//! Configuration for sparse matrix allocation and growth

use crate::constants::{DEFAULT_FILL_FRACTION, DEFAULT_GROWTH_FACTOR, MIN_NZ_CAPACITY};
use crate::error::{Result, SparseError};

/// Allocation policy for triplet matrices
#[derive(Debug, Clone)]
pub struct SparseConfig {
    /// Fraction of `rows * cols` reserved up front when no capacity is given
    pub fill_fraction: f64,

    /// Floor applied to every capacity estimate
    pub min_capacity: usize,

    /// Capacity multiplier used when insertion runs out of room
    pub growth_factor: usize,
}

impl Default for SparseConfig {
    fn default() -> Self {
        Self {
            fill_fraction: DEFAULT_FILL_FRACTION,
            min_capacity: MIN_NZ_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl SparseConfig {
    /// Create a config with a custom fill fraction
    pub fn with_fill_fraction(fill_fraction: f64) -> Self {
        Self {
            fill_fraction,
            ..Self::default()
        }
    }

    /// Reject settings that would make capacity estimates meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.fill_fraction.is_finite() || self.fill_fraction <= 0.0 {
            return Err(SparseError::domain(format!(
                "fill fraction must be positive and finite, got {}",
                self.fill_fraction
            )));
        }
        if self.growth_factor < 2 {
            return Err(SparseError::domain(format!(
                "growth factor must be at least 2, got {}",
                self.growth_factor
            )));
        }
        if self.min_capacity == 0 {
            return Err(SparseError::domain("minimum capacity must be nonzero"));
        }
        Ok(())
    }

    /// Estimate the nonzero capacity for a matrix of the given shape
    pub fn estimate_capacity(&self, n_rows: usize, n_cols: usize) -> usize {
        let cells = n_rows.saturating_mul(n_cols) as f64;
        let estimate = (cells * self.fill_fraction) as usize;
        estimate.max(self.min_capacity)
    }

    /// Capacity to grow to once `current` is exhausted
    pub fn next_capacity(&self, current: usize, required: usize) -> usize {
        current
            .saturating_mul(self.growth_factor)
            .max(required)
            .max(self.min_capacity)
    }
}
