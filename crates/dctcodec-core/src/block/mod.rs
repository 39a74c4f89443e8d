//! 8x8 block stages of the codec.
//!
//! Every stage here is a pure function over an owned [`Block`]:
//! - [`dct`] - forward and inverse 2-D cosine transform
//! - [`quant`] - quantization matrix generation and scalar quantization
//! - [`zigzag`] - fixed low-to-high frequency reordering into 64 values
//!
//! # Coordinate System
//!
//! Blocks are indexed `block[row][col]`. Row 0, column 0 holds the top-left
//! sample in the spatial domain and the DC coefficient in the transform domain.

pub mod dct;
pub mod quant;
pub mod zigzag;

/// Width and height of a block in samples.
pub const BLOCK_SIZE: usize = 8;

/// Number of samples (or coefficients) in one block.
pub const BLOCK_LEN: usize = BLOCK_SIZE * BLOCK_SIZE;

/// An 8x8 grid of samples or coefficients, indexed `[row][col]`.
pub type Block<T> = [[T; BLOCK_SIZE]; BLOCK_SIZE];

pub use dct::{forward, inverse};
pub use quant::{
    clamp_factor, dequantize, quantize, QuantizationMatrix, Quantized, BASE_QUANTIZATION_TABLE,
    MAX_FACTOR, MIN_FACTOR,
};
pub use zigzag::{scan, unscan, unscan_slice, ZIGZAG_ORDER};
