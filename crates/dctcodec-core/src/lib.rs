//! dctcodec Core - lossy block-transform image codec
//!
//! This crate compresses 8-bit rasters into a compact binary container and
//! reconstructs an approximation of the original, modeled on baseline JPEG:
//! 8x8 DCT, uniform scalar quantization scaled by a single factor, zigzag
//! scan and run-length coding of the coefficient stream.
//!
//! # Module Structure
//!
//! - `block` - 8x8 transform, quantizer and zigzag reorderer
//! - `rle` - run-length coder
//! - `container` - little-endian binary container
//! - `codec` - the pipeline, statistics and file helpers
//!
//! # Features
//!
//! - `parallel` (default) - process blocks on the rayon thread pool

pub mod block;
pub mod codec;
pub mod container;
pub mod rle;

pub use block::{QuantizationMatrix, MAX_FACTOR, MIN_FACTOR};
pub use codec::{
    compress, compress_encoded, compress_file, compress_to_container, compress_with, decompress,
    decompress_container, decompress_file, decompress_to_png, CodecError, CompressOptions,
    CompressionStats, DecompressionStats, Image, DEFAULT_FACTOR,
};
pub use container::Container;
pub use rle::Run;
