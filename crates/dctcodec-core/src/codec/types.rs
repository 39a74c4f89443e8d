//! Core types for the codec pipeline.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::container::MAX_DIMENSION;

/// Compression factor used when the caller does not pick one.
pub const DEFAULT_FACTOR: i32 = 5;

/// Error types for compression and decompression.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Width or height is zero, too large for the container, or the pixel
    /// count overflows `usize`.
    #[error(
        "Invalid dimensions: {width}x{height} (each side must be between 1 and {max})",
        max = MAX_DIMENSION
    )]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Only 1- and 3-channel images are supported.
    #[error("Unsupported channel count: {0} (expected 1 or 3)")]
    UnsupportedChannels(usize),

    /// The source image or container could not be read or decoded.
    #[error("Could not read {}: {reason}", .path.display())]
    UnreadableInput { path: PathBuf, reason: String },

    /// In-memory image bytes could not be decoded.
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// Container bytes are truncated or structurally inconsistent.
    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    /// Writing an output file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The reconstructed image could not be encoded to the requested format.
    #[error("Image encoding failed: {0}")]
    ImageEncoding(String),
}

/// Options for [`compress_with`](super::compress_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    /// Quantization factor, clamped to 1..=15. Lower keeps more detail.
    pub factor: i32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            factor: DEFAULT_FACTOR,
        }
    }
}

/// Statistics reported by a compression call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
    /// Size of the raw input in bytes (width * height * channels for
    /// in-memory input, the file size for file input).
    pub original_size: usize,
    /// Size of the serialized container in bytes.
    pub compressed_size: usize,
    /// `original_size / compressed_size`, infinite if the container is empty.
    pub ratio: f64,
    /// Quantized coefficients that saturated the i16 range.
    pub clamped_coefficients: usize,
    /// Wall-clock time spent, in milliseconds.
    pub elapsed_ms: f64,
}

impl CompressionStats {
    pub(crate) fn new(
        original_size: usize,
        compressed_size: usize,
        clamped_coefficients: usize,
        elapsed_ms: f64,
    ) -> Self {
        let ratio = if compressed_size == 0 {
            f64::INFINITY
        } else {
            original_size as f64 / compressed_size as f64
        };
        Self {
            original_size,
            compressed_size,
            ratio,
            clamped_coefficients,
            elapsed_ms,
        }
    }
}

/// Statistics reported by a decompression call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecompressionStats {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    /// Size of the container that was decoded, in bytes.
    pub compressed_size: usize,
    /// Wall-clock time spent, in milliseconds.
    pub elapsed_ms: f64,
}

/// An 8-bit raster with interleaved channels in row-major order.
///
/// Channels are positional. The codec stores them in the order given, and
/// by convention 3-channel images are blue-green-red. Use
/// [`Image::from_rgb_image`] and [`Image::to_dynamic_image`] to move between
/// this order and the `image` crate's RGB buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: usize,
    pixels: Vec<u8>,
}

impl Image {
    /// Create an image, validating dimensions, channel count and buffer length.
    pub fn new(
        width: u32,
        height: u32,
        channels: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, CodecError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CodecError::InvalidDimensions { width, height });
        }
        if channels != 1 && channels != 3 {
            return Err(CodecError::UnsupportedChannels(channels));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(CodecError::InvalidDimensions { width, height })?;
        if pixels.len() != expected {
            return Err(CodecError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Create a 3-channel image from blue-green-red pixel data.
    pub fn from_bgr(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CodecError> {
        Self::new(width, height, 3, pixels)
    }

    /// Create an image from an `image::RgbImage`, reordering to BGR.
    pub fn from_rgb_image(img: image::RgbImage) -> Result<Self, CodecError> {
        let (width, height) = img.dimensions();
        let mut pixels = img.into_raw();
        for pixel in pixels.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }
        Self::new(width, height, 3, pixels)
    }

    /// Convert to an `image` crate buffer: RGB for 3 channels, luma for 1.
    pub fn to_dynamic_image(&self) -> Option<image::DynamicImage> {
        if self.channels == 1 {
            return image::GrayImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(image::DynamicImage::ImageLuma8);
        }

        let mut pixels = self.pixels.clone();
        for pixel in pixels.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }
        image::RgbImage::from_raw(self.width, self.height, pixels)
            .map(image::DynamicImage::ImageRgb8)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Sample of `channel` at column `x`, row `y`.
    #[inline]
    pub fn sample(&self, x: u32, y: u32, channel: usize) -> u8 {
        let index = ((y as usize) * (self.width as usize) + x as usize) * self.channels + channel;
        self.pixels[index]
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}
