//! Persistence: raw binary dumps and Matrix Market text interchange

pub mod binary;
pub mod market;

pub use binary::{read_binary_into, write_binary};
pub use market::{
    read_matrix_market, read_matrix_market_path, write_matrix_market, write_matrix_market_path,
    ValueFormat,
};
