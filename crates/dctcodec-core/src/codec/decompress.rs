//! Container to image.

use log::{debug, trace};

use super::blocks::map_blocks;
use super::plane::{merge_channels, to_pixel_block};
use super::types::{CodecError, DecompressionStats, Image};
use super::Stopwatch;
use crate::block::{dct, quant, zigzag, Block, QuantizationMatrix};
use crate::container::Container;
use crate::rle::{self, Run};

/// Decompress container bytes into an image of the original size.
///
/// # Errors
///
/// Returns `CodecError::CorruptContainer` if the bytes are truncated or
/// inconsistent.
pub fn decompress(bytes: &[u8]) -> Result<(Image, DecompressionStats), CodecError> {
    let stopwatch = Stopwatch::start();

    let container = Container::from_bytes(bytes)?;
    let image = decompress_container(&container)?;

    let stats = DecompressionStats {
        width: image.width(),
        height: image.height(),
        channels: image.channels(),
        compressed_size: bytes.len(),
        elapsed_ms: stopwatch.elapsed_ms(),
    };
    debug!(
        "decompressed {} bytes to {}x{}x{} at factor {}",
        bytes.len(),
        stats.width,
        stats.height,
        stats.channels,
        container.factor()
    );

    Ok((image, stats))
}

/// Reconstruct the image held by an in-memory container.
pub fn decompress_container(container: &Container) -> Result<Image, CodecError> {
    // Stored factors outside 1..=15 select the nearest supported matrix
    let matrix = QuantizationMatrix::new(container.factor());

    let mut channels = Vec::with_capacity(container.channel_count());
    for (c, blocks) in container.channels().iter().enumerate() {
        trace!("channel {}: decoding {} blocks", c, blocks.len());
        let decoded = map_blocks(blocks.len(), |index| decode_block(&blocks[index], &matrix));
        channels.push(decoded.into_iter().collect::<Result<Vec<_>, _>>()?);
    }

    let pixels = merge_channels(
        &channels,
        container.blocks_wide(),
        container.original_width(),
        container.original_height(),
    );
    Image::new(
        container.original_width(),
        container.original_height(),
        container.channel_count(),
        pixels,
    )
}

/// Expand, unscan, dequantize and inverse-transform one block.
fn decode_block(runs: &[Run<i16>], matrix: &QuantizationMatrix) -> Result<Block<u8>, CodecError> {
    let seq = rle::decode(runs);
    let quantized = zigzag::unscan_slice(&seq)?;
    let coeffs = quant::dequantize(&quantized, matrix);
    Ok(to_pixel_block(&dct::inverse(&coeffs)))
}
