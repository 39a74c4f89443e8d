//! Compression and decompression pipeline.
//!
//! This module provides:
//! - In-memory compression of an [`Image`] into container bytes
//! - Decompression of container bytes back into an [`Image`]
//! - File-path variants and PNG output for callers that work with files
//!
//! # Pipeline
//!
//! Compression splits the image into channel planes, shifts samples by -128,
//! zero pads each plane to whole 8x8 blocks, and runs every block through
//! transform, quantization, zigzag scan and run-length coding. Decompression
//! runs the same stages backwards in the same row-major block order, then
//! crops from the top-left corner to the original size.
//!
//! # Examples
//!
//! ```ignore
//! use dctcodec_core::codec::{compress, decompress, Image};
//!
//! let image = Image::from_bgr(10, 10, vec![128u8; 10 * 10 * 3]).unwrap();
//! let (bytes, stats) = compress(&image, 5).unwrap();
//! let (restored, _) = decompress(&bytes).unwrap();
//! assert_eq!(restored.width(), 10);
//! ```

mod blocks;
mod compress;
mod decompress;
mod file;
pub mod plane;
mod types;

pub use compress::{compress, compress_to_container, compress_with};
pub use decompress::{decompress, decompress_container};
pub use file::{
    compress_encoded, compress_file, decompress_file, decompress_to_png, load_image, save_image,
};
pub use types::{
    CodecError, CompressOptions, CompressionStats, DecompressionStats, Image, DEFAULT_FACTOR,
};

/// Elapsed-time measurement for the stats structs.
///
/// `std::time::Instant` is unavailable on `wasm32-unknown-unknown`, so there
/// it always reads zero.
pub(crate) struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl Stopwatch {
    pub(crate) fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
        }
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.start.elapsed().as_secs_f64() * 1000.0
        }
        #[cfg(target_arch = "wasm32")]
        {
            0.0
        }
    }
}
