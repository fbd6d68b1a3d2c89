//! Storage format tags

use std::fmt;

use crate::constants::{TAG_CCS, TAG_CRS, TAG_TRIPLET};

/// The storage layout of a sparse matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparseFormat {
    /// Coordinate list with a balanced-tree index; the only mutable layout
    Triplet,
    /// Compressed sparse column
    Ccs,
    /// Compressed sparse row
    Crs,
}

impl SparseFormat {
    /// Check if this format is one of the compressed layouts
    pub fn is_compressed(&self) -> bool {
        !matches!(self, SparseFormat::Triplet)
    }

    /// The compressed format that stores the transpose with the same arrays
    pub fn dual(&self) -> SparseFormat {
        match self {
            SparseFormat::Triplet => SparseFormat::Triplet,
            SparseFormat::Ccs => SparseFormat::Crs,
            SparseFormat::Crs => SparseFormat::Ccs,
        }
    }

    pub(crate) fn tag(&self) -> usize {
        match self {
            SparseFormat::Triplet => TAG_TRIPLET,
            SparseFormat::Ccs => TAG_CCS,
            SparseFormat::Crs => TAG_CRS,
        }
    }

    pub(crate) fn from_tag(tag: usize) -> Option<SparseFormat> {
        match tag {
            TAG_TRIPLET => Some(SparseFormat::Triplet),
            TAG_CCS => Some(SparseFormat::Ccs),
            TAG_CRS => Some(SparseFormat::Crs),
            _ => None,
        }
    }
}

impl fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SparseFormat::Triplet => "triplet",
            SparseFormat::Ccs => "CCS",
            SparseFormat::Crs => "CRS",
        };
        f.write_str(name)
    }
}
