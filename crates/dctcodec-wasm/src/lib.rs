//! dctcodec WASM - WebAssembly bindings for dctcodec
//!
//! This crate provides WASM bindings to expose the dctcodec-core
//! compression functions to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for images and results
//! - `codec` - Compression and decompression bindings
//! - `logger` - Routes core diagnostics to the JavaScript console
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image, decompress_image } from '@dctcodec/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const compressed = compress_image(pixels, width, height, 3, 5);
//! const restored = decompress_image(compressed.data());
//! console.log(`Restored ${restored.width}x${restored.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod codec;
mod logger;
mod types;

// Re-export public types
pub use codec::{
    compress_encoded_image, compress_image, compress_js_image, decompress_image, decompress_to_png,
};
pub use types::{JsCompressed, JsImage, JsPng};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::init(log::LevelFilter::Warn);
}

/// Raise or lower console logging: 0 = off, 1 = error ... 5 = trace.
#[wasm_bindgen]
pub fn set_log_level(level: u8) {
    let filter = match level {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    logger::init(filter);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Largest accepted compression factor.
#[wasm_bindgen]
pub fn max_factor() -> i32 {
    dctcodec_core::MAX_FACTOR
}

/// Smallest accepted compression factor.
#[wasm_bindgen]
pub fn min_factor() -> i32 {
    dctcodec_core::MIN_FACTOR
}
