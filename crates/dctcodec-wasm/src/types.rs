//! WASM-compatible wrapper types for codec inputs and outputs.
//!
//! This module provides JavaScript-friendly types that wrap the core codec
//! types, handling the conversion between Rust and JavaScript data representations.

use dctcodec_core::{CompressionStats, DecompressionStats, Image};
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// Pixels are interleaved, row-major, in the channel order the image was
/// compressed with (conventionally BGR for 3 channels).
#[wasm_bindgen]
pub struct JsImage {
    width: u32,
    height: u32,
    channels: usize,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsImage {
    /// Create a new JsImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `channels` - 1 (gray) or 3 (BGR)
    /// * `pixels` - Interleaved pixel data, row-major order
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: usize, pixels: Vec<u8>) -> JsImage {
        JsImage {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of interleaved channels
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsImage {
    /// Create from a core Image (internal use).
    pub(crate) fn from_image(image: Image) -> Self {
        let (width, height, channels) = (image.width(), image.height(), image.channels());
        JsImage {
            width,
            height,
            channels,
            pixels: image.into_pixels(),
        }
    }

    /// Convert to a core Image (internal use).
    pub(crate) fn to_image(&self) -> Result<Image, dctcodec_core::CodecError> {
        Image::new(self.width, self.height, self.channels, self.pixels.clone())
    }
}

/// Result of a compression call: the container bytes plus statistics.
///
/// Mirrors the status object the profile-image service returns:
/// callers base64-encode `data()` for transport.
#[wasm_bindgen]
pub struct JsCompressed {
    data: Vec<u8>,
    stats: CompressionStats,
}

#[wasm_bindgen]
impl JsCompressed {
    /// Container bytes as Uint8Array (copied).
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Raw input size in bytes.
    #[wasm_bindgen(getter)]
    pub fn original_size(&self) -> usize {
        self.stats.original_size
    }

    /// Container size in bytes.
    #[wasm_bindgen(getter)]
    pub fn compressed_size(&self) -> usize {
        self.stats.compressed_size
    }

    /// original_size / compressed_size.
    #[wasm_bindgen(getter)]
    pub fn ratio(&self) -> f64 {
        self.stats.ratio
    }

    /// Milliseconds spent compressing.
    #[wasm_bindgen(getter)]
    pub fn elapsed_ms(&self) -> f64 {
        self.stats.elapsed_ms
    }

    /// All statistics as a plain JavaScript object.
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.stats).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsCompressed {
    pub(crate) fn new(data: Vec<u8>, stats: CompressionStats) -> Self {
        Self { data, stats }
    }

    #[cfg(test)]
    pub(crate) fn compression_stats(&self) -> &CompressionStats {
        &self.stats
    }
}

/// Result of decompressing straight to PNG.
#[wasm_bindgen]
pub struct JsPng {
    data: Vec<u8>,
    stats: DecompressionStats,
}

#[wasm_bindgen]
impl JsPng {
    /// PNG bytes as Uint8Array (copied).
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.stats.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.stats.height
    }

    /// All statistics as a plain JavaScript object.
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.stats).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsPng {
    pub(crate) fn new(data: Vec<u8>, stats: DecompressionStats) -> Self {
        Self { data, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_image_creation() {
        let img = JsImage::new(10, 20, 3, vec![0u8; 10 * 20 * 3]);
        assert_eq!(img.width(), 10);
        assert_eq!(img.height(), 20);
        assert_eq!(img.channels(), 3);
        assert_eq!(img.byte_length(), 600);
    }

    #[test]
    fn test_js_image_core_conversion() {
        let img = JsImage::new(2, 2, 1, vec![1, 2, 3, 4]);
        let core = img.to_image().unwrap();
        assert_eq!(core.pixels(), &[1, 2, 3, 4]);

        let back = JsImage::from_image(core);
        assert_eq!(back.pixels(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_js_image_invalid_conversion() {
        let img = JsImage::new(4, 4, 3, vec![0u8; 10]);
        assert!(img.to_image().is_err());
    }
}
