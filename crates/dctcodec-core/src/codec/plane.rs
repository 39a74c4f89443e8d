//! Channel planes: splitting, level shift, padding, and the reverse.
//!
//! Padding is added only on the bottom and right edges, so cropping from
//! the top-left corner recovers the original region exactly.

use super::types::Image;
use crate::block::{Block, BLOCK_SIZE};
use crate::container::padded_dimension;

/// DC level shift applied before the forward transform.
pub const LEVEL_SHIFT: f32 = 128.0;

/// One channel as level-shifted samples, zero padded to whole blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl Plane {
    /// Extract `channel` from `image`, subtract 128 and pad with zeros.
    pub fn from_channel(image: &Image, channel: usize) -> Self {
        let width = padded_dimension(image.width()) as usize;
        let height = padded_dimension(image.height()) as usize;
        let mut samples = vec![0.0f32; width * height];

        let stride = image.channels();
        let src_width = image.width() as usize;
        for (y, row) in image
            .pixels()
            .chunks_exact(src_width * stride)
            .enumerate()
        {
            let dst = &mut samples[y * width..y * width + src_width];
            for (sample, pixel) in dst.iter_mut().zip(row.chunks_exact(stride)) {
                *sample = f32::from(pixel[channel]) - LEVEL_SHIFT;
            }
        }

        Self {
            width,
            height,
            samples,
        }
    }

    /// Padded width in samples (a multiple of 8).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Padded height in samples (a multiple of 8).
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn blocks_wide(&self) -> usize {
        self.width / BLOCK_SIZE
    }

    pub fn blocks_high(&self) -> usize {
        self.height / BLOCK_SIZE
    }

    pub fn block_count(&self) -> usize {
        self.blocks_wide() * self.blocks_high()
    }

    /// Copy out the block at row-major block `index`.
    pub fn block(&self, index: usize) -> Block<f32> {
        let x0 = (index % self.blocks_wide()) * BLOCK_SIZE;
        let y0 = (index / self.blocks_wide()) * BLOCK_SIZE;

        let mut block = [[0.0f32; BLOCK_SIZE]; BLOCK_SIZE];
        for (row, out) in block.iter_mut().enumerate() {
            let start = (y0 + row) * self.width + x0;
            out.copy_from_slice(&self.samples[start..start + BLOCK_SIZE]);
        }
        block
    }
}

/// Undo the level shift and clip a reconstructed block to 8 bits.
///
/// Values are clipped to 0..=255 and then truncated toward zero.
pub fn to_pixel_block(samples: &Block<f32>) -> Block<u8> {
    let mut out = [[0u8; BLOCK_SIZE]; BLOCK_SIZE];
    for (dst_row, src_row) in out.iter_mut().zip(samples.iter()) {
        for (dst, &src) in dst_row.iter_mut().zip(src_row.iter()) {
            *dst = (src + LEVEL_SHIFT).clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Interleave per-channel pixel blocks into an image cropped to `width` x `height`.
///
/// `channels[c]` holds the blocks of channel `c` in row-major order over a
/// plane `blocks_wide` blocks across.
pub fn merge_channels(
    channels: &[Vec<Block<u8>>],
    blocks_wide: usize,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = channels.len();
    let width = width as usize;
    let height = height as usize;
    let mut pixels = vec![0u8; width * height * stride];

    for (c, blocks) in channels.iter().enumerate() {
        for y in 0..height {
            let block_row = (y / BLOCK_SIZE) * blocks_wide;
            let row_in_block = y % BLOCK_SIZE;
            for x in 0..width {
                let block = &blocks[block_row + x / BLOCK_SIZE];
                pixels[(y * width + x) * stride + c] = block[row_in_block][x % BLOCK_SIZE];
            }
        }
    }

    pixels
}
