//! Centralized constants for the spmatrix library
//!
//! All tunables used throughout the codebase live here rather than being
//! scattered across modules. Constants are organized by category.

// ============================================================================
// CAPACITY AND GROWTH
// ============================================================================

/// Fraction of `rows * cols` used to estimate the initial nonzero capacity
pub const DEFAULT_FILL_FRACTION: f64 = 0.1;

/// Smallest nonzero capacity ever allocated for a triplet matrix
pub const MIN_NZ_CAPACITY: usize = 1;

/// Multiplier applied to the capacity when a triplet matrix runs full
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

// ============================================================================
// DEBUG OUTPUT
// ============================================================================

/// Maximum number of lanes (rows or columns) printed by `Debug` impls
pub const DEBUG_MAX_LANES: usize = 5;

/// Maximum number of entries per lane printed by `Debug` impls
pub const DEBUG_MAX_ENTRIES: usize = 5;

// ============================================================================
// MATRIX MARKET
// ============================================================================

/// Banner prefix identifying a Matrix Market file
pub const MATRIX_MARKET_BANNER: &str = "%%MatrixMarket";

/// Header written for every exported matrix
pub const MATRIX_MARKET_HEADER: &str = "%%MatrixMarket matrix coordinate real general";

/// Most entries reserved up front from a file's declared count
pub const MATRIX_MARKET_MAX_PREALLOC: usize = 1 << 20;

// ============================================================================
// BINARY DUMPS
// ============================================================================

/// Number of native-endian `usize` words in a binary dump header
pub const BINARY_HEADER_WORDS: usize = 4;

/// Format tag for triplet storage in binary dumps
pub const TAG_TRIPLET: usize = 0;

/// Format tag for compressed column storage in binary dumps
pub const TAG_CCS: usize = 1;

/// Format tag for compressed row storage in binary dumps
pub const TAG_CRS: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_sanity() {
        assert!(DEFAULT_FILL_FRACTION > 0.0 && DEFAULT_FILL_FRACTION <= 1.0);
        assert!(MIN_NZ_CAPACITY >= 1);
        assert!(DEFAULT_GROWTH_FACTOR >= 2);
        assert_ne!(TAG_TRIPLET, TAG_CCS);
        assert_ne!(TAG_CCS, TAG_CRS);
        assert!(MATRIX_MARKET_HEADER.starts_with(MATRIX_MARKET_BANNER));
        assert!(MATRIX_MARKET_MAX_PREALLOC >= MIN_NZ_CAPACITY);
    }
}
