//! Image to container.

use log::{debug, trace, warn};

use super::blocks::map_blocks;
use super::plane::Plane;
use super::types::{CodecError, CompressOptions, CompressionStats, Image};
use super::Stopwatch;
use crate::block::{clamp_factor, dct, quant, zigzag, Block, QuantizationMatrix};
use crate::container::{BlockRuns, Container};
use crate::rle;

/// Compress an image into container bytes.
///
/// `factor` is clamped to 1..=15 for quantization; lower keeps more detail.
/// The header records `factor` as passed, and decoding applies the same clamp.
///
/// # Example
///
/// ```ignore
/// use dctcodec_core::{compress, Image};
///
/// let image = Image::from_bgr(16, 16, vec![128u8; 16 * 16 * 3]).unwrap();
/// let (bytes, stats) = compress(&image, 5).unwrap();
/// println!("{} -> {} bytes", stats.original_size, bytes.len());
/// ```
pub fn compress(image: &Image, factor: i32) -> Result<(Vec<u8>, CompressionStats), CodecError> {
    let stopwatch = Stopwatch::start();

    let (container, clamped) = encode(image, factor)?;
    let bytes = container.to_bytes();

    let stats = CompressionStats::new(
        image.byte_size(),
        bytes.len(),
        clamped,
        stopwatch.elapsed_ms(),
    );
    debug!(
        "compressed {}x{}x{} at factor {}: {} -> {} bytes (ratio {:.2})",
        image.width(),
        image.height(),
        image.channels(),
        container.factor(),
        stats.original_size,
        stats.compressed_size,
        stats.ratio
    );

    Ok((bytes, stats))
}

/// [`compress`] with options.
pub fn compress_with(
    image: &Image,
    options: &CompressOptions,
) -> Result<(Vec<u8>, CompressionStats), CodecError> {
    compress(image, options.factor)
}

/// Compress an image into an in-memory [`Container`] without serializing it.
pub fn compress_to_container(image: &Image, factor: i32) -> Result<Container, CodecError> {
    encode(image, factor).map(|(container, _)| container)
}

/// Returns the container and the number of saturated coefficients.
fn encode(image: &Image, factor: i32) -> Result<(Container, usize), CodecError> {
    let clamped_factor = clamp_factor(factor);
    if clamped_factor != factor {
        warn!(
            "compression factor {} out of range, using {}",
            factor, clamped_factor
        );
    }
    let matrix = QuantizationMatrix::new(clamped_factor);

    let mut clamped = 0;
    let mut channels = Vec::with_capacity(image.channels());
    for c in 0..image.channels() {
        let plane = Plane::from_channel(image, c);
        trace!(
            "channel {}: {}x{} padded, {} blocks",
            c,
            plane.width(),
            plane.height(),
            plane.block_count()
        );

        let encoded = map_blocks(plane.block_count(), |index| {
            encode_block(&plane.block(index), &matrix)
        });

        let mut blocks: Vec<BlockRuns> = Vec::with_capacity(encoded.len());
        for (runs, saturated) in encoded {
            clamped += saturated;
            blocks.push(runs);
        }
        channels.push(blocks);
    }

    if clamped > 0 {
        warn!("{} quantized coefficients saturated the i16 range", clamped);
    }

    let container = Container::new(image.width(), image.height(), factor, channels)?;
    Ok((container, clamped))
}

/// Transform, quantize, scan and run-length code one block.
fn encode_block(samples: &Block<f32>, matrix: &QuantizationMatrix) -> (BlockRuns, usize) {
    let coeffs = dct::forward(samples);
    let quantized = quant::quantize(&coeffs, matrix);
    let seq = zigzag::scan(&quantized.coefficients);
    (rle::encode(&seq), quantized.clamped)
}
