//! Codec WASM bindings.
//!
//! This module exposes the in-memory calling convention of dctcodec-core to
//! JavaScript, which is what the profile-image service uses to avoid
//! temporary files.
//!
//! # Functions
//!
//! - [`compress_image`] - Compress raw BGR (or gray) pixels
//! - [`compress_encoded_image`] - Compress PNG/JPEG file bytes
//! - [`decompress_image`] - Decompress container bytes to raw pixels
//! - [`decompress_to_png`] - Decompress container bytes to PNG bytes
//!
//! # Example
//!
//! ```typescript
//! import { compress_encoded_image, decompress_to_png } from '@dctcodec/wasm';
//!
//! const upload = new Uint8Array(await file.arrayBuffer());
//! const compressed = compress_encoded_image(upload, 10);
//! console.log(`${compressed.original_size} -> ${compressed.compressed_size} bytes`);
//!
//! const png = decompress_to_png(compressed.data());
//! ```

use crate::types::{JsCompressed, JsImage, JsPng};
use dctcodec_core as codec_core;
use wasm_bindgen::prelude::*;

fn to_js_error(e: codec_core::CodecError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Milliseconds from a wall clock; the core cannot time itself on wasm32.
#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    0.0
}

/// Compress interleaved pixel data.
///
/// # Arguments
///
/// * `pixels` - Pixel data as a `Uint8Array` (row-major, interleaved)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 1 (gray) or 3 (BGR)
/// * `factor` - Compression factor, clamped to 1-15 (lower = higher quality)
///
/// # Errors
///
/// Returns an error if the dimensions are zero, the channel count is
/// unsupported, or the pixel data length doesn't match.
#[wasm_bindgen]
pub fn compress_image(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    factor: i32,
) -> Result<JsCompressed, JsValue> {
    let start = now_ms();
    let image = codec_core::Image::new(width, height, channels, pixels.to_vec())
        .map_err(to_js_error)?;
    let (data, mut stats) = codec_core::compress(&image, factor).map_err(to_js_error)?;
    if stats.elapsed_ms == 0.0 {
        stats.elapsed_ms = now_ms() - start;
    }
    Ok(JsCompressed::new(data, stats))
}

/// Compress a JsImage.
#[wasm_bindgen]
pub fn compress_js_image(image: &JsImage, factor: i32) -> Result<JsCompressed, JsValue> {
    let start = now_ms();
    let image = image.to_image().map_err(to_js_error)?;
    let (data, mut stats) = codec_core::compress(&image, factor).map_err(to_js_error)?;
    if stats.elapsed_ms == 0.0 {
        stats.elapsed_ms = now_ms() - start;
    }
    Ok(JsCompressed::new(data, stats))
}

/// Compress encoded image bytes (PNG or JPEG).
///
/// The raster is reordered to BGR before compression, so the container is
/// identical to one produced from the same file on disk.
#[wasm_bindgen]
pub fn compress_encoded_image(bytes: &[u8], factor: i32) -> Result<JsCompressed, JsValue> {
    let start = now_ms();
    let (data, mut stats) = codec_core::compress_encoded(bytes, factor).map_err(to_js_error)?;
    if stats.elapsed_ms == 0.0 {
        stats.elapsed_ms = now_ms() - start;
    }
    Ok(JsCompressed::new(data, stats))
}

/// Decompress container bytes into raw pixels.
///
/// # Errors
///
/// Returns an error if the container is truncated or corrupt.
#[wasm_bindgen]
pub fn decompress_image(bytes: &[u8]) -> Result<JsImage, JsValue> {
    codec_core::decompress(bytes)
        .map(|(image, _)| JsImage::from_image(image))
        .map_err(to_js_error)
}

/// Decompress container bytes into PNG file bytes.
#[wasm_bindgen]
pub fn decompress_to_png(bytes: &[u8]) -> Result<JsPng, JsValue> {
    let start = now_ms();
    let (data, mut stats) = codec_core::decompress_to_png(bytes).map_err(to_js_error)?;
    if stats.elapsed_ms == 0.0 {
        stats.elapsed_ms = now_ms() - start;
    }
    Ok(JsPng::new(data, stats))
}


/// WASM-specific tests that require JsValue.
///
/// These tests use functions that return `Result<T, JsValue>` and can only
/// run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_compress_decompress() {
        let pixels = vec![128u8; 16 * 16 * 3];
        let compressed = compress_image(&pixels, 16, 16, 3, 5).unwrap();
        assert_eq!(compressed.original_size(), 768);

        let image = decompress_image(&compressed.data()).unwrap();
        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 16);
        assert_eq!(image.pixels(), pixels);
    }

    #[wasm_bindgen_test]
    fn test_compress_invalid_pixel_data() {
        let pixels = vec![128u8; 10];
        assert!(compress_image(&pixels, 16, 16, 3, 5).is_err());
    }

    #[wasm_bindgen_test]
    fn test_compress_invalid_channels() {
        let pixels = vec![128u8; 16 * 16 * 2];
        assert!(compress_image(&pixels, 16, 16, 2, 5).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decompress_corrupt() {
        assert!(decompress_image(&[1, 2, 3]).is_err());
        assert!(decompress_to_png(&[]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_stats_object() {
        let pixels = vec![128u8; 8 * 8 * 3];
        let compressed = compress_image(&pixels, 8, 8, 3, 5).unwrap();
        assert!(compressed.stats().unwrap().is_object());
    }

    #[wasm_bindgen_test]
    fn test_compress_js_image() {
        let image = JsImage::new(8, 8, 1, vec![200u8; 64]);
        let compressed = compress_js_image(&image, 3).unwrap();
        let png = decompress_to_png(&compressed.data()).unwrap();
        assert_eq!(png.width(), 8);
    }
}
