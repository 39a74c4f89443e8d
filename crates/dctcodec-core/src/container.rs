//! Binary container holding the run-length coded blocks of every channel.
//!
//! # Layout
//!
//! All integers are fixed width and **little-endian**, on every platform:
//!
//! ```text
//! [channels:i32][paddedW:i32][paddedH:i32][origW:i32][origH:i32][factor:i32]
//! for each channel:
//!     [blockCount:i32]
//!     for each block (row-major over the padded plane):
//!         [runCount:i32]
//!         runCount x ([value:i16][count:u32])
//! ```
//!
//! There is no magic number, version or checksum. Blocks are positional:
//! the n-th block of a channel is the n-th 8x8 tile in row-major order.

use bytebuffer::{ByteBuffer, Endian};

use crate::block::{BLOCK_LEN, BLOCK_SIZE};
use crate::codec::CodecError;
use crate::rle::{run_length_sum, Run};

/// Run list of a single 8x8 block.
pub type BlockRuns = Vec<Run<i16>>;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 6 * 4;

/// Bytes taken by one `(value, count)` pair.
const RUN_LEN: usize = 2 + 4;

/// Smallest possible encoding of one block: a run count and a single run.
const MIN_BLOCK_LEN: usize = 4 + RUN_LEN;

/// Largest width or height a container can describe. The padded size must
/// still fit the header's signed 32-bit fields.
pub const MAX_DIMENSION: u32 = i32::MAX as u32 - BLOCK_SIZE as u32;

/// Round `dim` up to the next multiple of the block size.
///
/// Saturates at `u32::MAX` instead of overflowing; every dimension up to
/// [`MAX_DIMENSION`] pads exactly.
#[inline]
pub fn padded_dimension(dim: u32) -> u32 {
    let block = BLOCK_SIZE as u32;
    dim.div_ceil(block).saturating_mul(block)
}

/// A complete, validated compressed image.
///
/// Construction (through [`Container::new`] or [`Container::from_bytes`])
/// checks every structural invariant, so a `Container` value always decodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    original_width: u32,
    original_height: u32,
    factor: i32,
    channels: Vec<Vec<BlockRuns>>,
}

impl Container {
    /// Assemble a container from per-channel block run lists.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::CorruptContainer` if the dimensions are zero or
    /// too large for the header, the channel count is not 1 or 3, a channel
    /// has the wrong number of blocks, or a block's runs do not cover
    /// exactly 64 values.
    pub fn new(
        original_width: u32,
        original_height: u32,
        factor: i32,
        channels: Vec<Vec<BlockRuns>>,
    ) -> Result<Self, CodecError> {
        check_dimensions(original_width, original_height)?;
        check_channel_count(channels.len())?;

        let expected = expected_blocks(original_width, original_height);
        for (c, blocks) in channels.iter().enumerate() {
            if blocks.len() as u64 != expected {
                return Err(corrupt(format!(
                    "channel {} has {} blocks, expected {}",
                    c,
                    blocks.len(),
                    expected
                )));
            }
            for (b, runs) in blocks.iter().enumerate() {
                check_runs(c, b, runs)?;
            }
        }

        Ok(Self {
            original_width,
            original_height,
            factor,
            channels,
        })
    }

    pub fn original_width(&self) -> u32 {
        self.original_width
    }

    pub fn original_height(&self) -> u32 {
        self.original_height
    }

    pub fn padded_width(&self) -> u32 {
        padded_dimension(self.original_width)
    }

    pub fn padded_height(&self) -> u32 {
        padded_dimension(self.original_height)
    }

    /// Compression factor as stored in the header.
    pub fn factor(&self) -> i32 {
        self.factor
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Per-channel block run lists, in row-major block order.
    pub fn channels(&self) -> &[Vec<BlockRuns>] {
        &self.channels
    }

    /// Number of blocks per padded row.
    pub fn blocks_wide(&self) -> usize {
        self.padded_width() as usize / BLOCK_SIZE
    }

    /// Number of block rows in the padded plane.
    pub fn blocks_high(&self) -> usize {
        self.padded_height() as usize / BLOCK_SIZE
    }

    /// Exact length of [`Container::to_bytes`] output.
    pub fn serialized_len(&self) -> usize {
        HEADER_LEN
            + self
                .channels
                .iter()
                .map(|blocks| {
                    let body: usize = blocks.iter().map(|runs| 4 + runs.len() * RUN_LEN).sum();
                    4 + body
                })
                .sum::<usize>()
    }

    /// Serialize into the little-endian container layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = ByteBuffer::new();
        buf.set_endian(Endian::LittleEndian);

        // Validated dimensions fit in i32
        buf.write_i32(self.channels.len() as i32);
        buf.write_i32(self.padded_width() as i32);
        buf.write_i32(self.padded_height() as i32);
        buf.write_i32(self.original_width as i32);
        buf.write_i32(self.original_height as i32);
        buf.write_i32(self.factor);

        for blocks in &self.channels {
            buf.write_i32(blocks.len() as i32);
            for runs in blocks {
                buf.write_i32(runs.len() as i32);
                for run in runs {
                    buf.write_i16(run.value);
                    buf.write_u32(run.count);
                }
            }
        }

        buf.into_vec()
    }

    /// Parse and validate a serialized container.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::CorruptContainer` for truncated input, trailing
    /// bytes, or any header or block field that violates the layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut buf = ByteBuffer::from_bytes(bytes);
        buf.set_endian(Endian::LittleEndian);

        let channel_count = read_i32(&mut buf, "channel count")?;
        let padded_width = read_i32(&mut buf, "padded width")?;
        let padded_height = read_i32(&mut buf, "padded height")?;
        let original_width = read_i32(&mut buf, "original width")?;
        let original_height = read_i32(&mut buf, "original height")?;
        let factor = read_i32(&mut buf, "factor")?;

        let channel_count = usize::try_from(channel_count)
            .map_err(|_| corrupt(format!("negative channel count {}", channel_count)))?;
        check_channel_count(channel_count)?;

        let original_width = positive(original_width, "original width")?;
        let original_height = positive(original_height, "original height")?;
        check_dimensions(original_width, original_height)?;

        if padded_width != padded_dimension(original_width) as i32
            || padded_height != padded_dimension(original_height) as i32
        {
            return Err(corrupt(format!(
                "padded size {}x{} does not match original size {}x{}",
                padded_width, padded_height, original_width, original_height
            )));
        }

        let expected = expected_blocks(original_width, original_height);
        let mut channels = Vec::with_capacity(channel_count);

        for c in 0..channel_count {
            let block_count = read_i32(&mut buf, "block count")?;
            if block_count < 0 || block_count as u64 != expected {
                return Err(corrupt(format!(
                    "channel {} has {} blocks, expected {}",
                    c, block_count, expected
                )));
            }
            let block_count = block_count as usize;

            // Reject before allocating if the remainder cannot possibly hold the blocks
            let remaining = buf.len() - buf.get_rpos();
            if block_count.saturating_mul(MIN_BLOCK_LEN) > remaining {
                return Err(corrupt(format!(
                    "truncated: channel {} needs at least {} more bytes, {} left",
                    c,
                    block_count * MIN_BLOCK_LEN,
                    remaining
                )));
            }

            let mut blocks = Vec::with_capacity(block_count);
            for b in 0..block_count {
                let run_count = read_i32(&mut buf, "run count")?;
                if !(1..=BLOCK_LEN as i32).contains(&run_count) {
                    return Err(corrupt(format!(
                        "channel {} block {} has {} runs, expected 1 to {}",
                        c, b, run_count, BLOCK_LEN
                    )));
                }

                let mut runs = Vec::with_capacity(run_count as usize);
                for _ in 0..run_count {
                    let value = buf
                        .read_i16()
                        .map_err(|_| corrupt("truncated while reading run value".to_string()))?;
                    let count = buf
                        .read_u32()
                        .map_err(|_| corrupt("truncated while reading run count".to_string()))?;
                    runs.push(Run::new(value, count));
                }

                check_runs(c, b, &runs)?;
                blocks.push(runs);
            }
            channels.push(blocks);
        }

        let trailing = buf.len() - buf.get_rpos();
        if trailing != 0 {
            return Err(corrupt(format!("{} trailing bytes after last block", trailing)));
        }

        Ok(Self {
            original_width,
            original_height,
            factor,
            channels,
        })
    }
}

fn corrupt(message: String) -> CodecError {
    CodecError::CorruptContainer(message)
}

fn read_i32(buf: &mut ByteBuffer, field: &str) -> Result<i32, CodecError> {
    buf.read_i32()
        .map_err(|_| corrupt(format!("truncated while reading {}", field)))
}

fn positive(value: i32, field: &str) -> Result<u32, CodecError> {
    if value <= 0 {
        return Err(corrupt(format!("{} must be positive, got {}", field, value)));
    }
    Ok(value as u32)
}

fn check_channel_count(count: usize) -> Result<(), CodecError> {
    match count {
        1 | 3 => Ok(()),
        n => Err(corrupt(format!("channel count must be 1 or 3, got {}", n))),
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), CodecError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(corrupt(format!("invalid image size {}x{}", width, height)));
    }
    Ok(())
}

fn check_runs(channel: usize, block: usize, runs: &[Run<i16>]) -> Result<(), CodecError> {
    if runs.iter().any(|run| run.count == 0) {
        return Err(corrupt(format!(
            "channel {} block {} contains an empty run",
            channel, block
        )));
    }
    let total = run_length_sum(runs);
    if total != BLOCK_LEN as u64 {
        return Err(corrupt(format!(
            "channel {} block {} runs cover {} values, expected {}",
            channel, block, total, BLOCK_LEN
        )));
    }
    Ok(())
}

fn expected_blocks(width: u32, height: u32) -> u64 {
    let block = BLOCK_SIZE as u64;
    (u64::from(padded_dimension(width)) / block) * (u64::from(padded_dimension(height)) / block)
}
