//! Zigzag reordering between an 8x8 block and a 64-value sequence.
//!
//! [`ZIGZAG_ORDER`] is part of the container format. Containers written
//! with one order cannot be read with another, so it is a hardcoded table
//! rather than something walked at runtime.

use super::{Block, BLOCK_LEN, BLOCK_SIZE};
use crate::codec::CodecError;

/// `(row, col)` of the n-th value in zigzag order, low frequencies first.
#[rustfmt::skip]
pub const ZIGZAG_ORDER: [(usize, usize); BLOCK_LEN] = [
    (0, 0), (0, 1), (1, 0), (2, 0), (1, 1), (0, 2), (0, 3), (1, 2),
    (2, 1), (3, 0), (4, 0), (3, 1), (2, 2), (1, 3), (0, 4), (0, 5),
    (1, 4), (2, 3), (3, 2), (4, 1), (5, 0), (6, 0), (5, 1), (4, 2),
    (3, 3), (2, 4), (1, 5), (0, 6), (0, 7), (1, 6), (2, 5), (3, 4),
    (4, 3), (5, 2), (6, 1), (7, 0), (7, 1), (6, 2), (5, 3), (4, 4),
    (3, 5), (2, 6), (1, 7), (2, 7), (3, 6), (4, 5), (5, 4), (6, 3),
    (7, 2), (7, 3), (6, 4), (5, 5), (4, 6), (3, 7), (4, 7), (5, 6),
    (6, 5), (7, 4), (7, 5), (6, 6), (5, 7), (6, 7), (7, 6), (7, 7),
];

/// Flatten a block into zigzag order.
pub fn scan<T: Copy + Default>(block: &Block<T>) -> [T; BLOCK_LEN] {
    let mut out = [T::default(); BLOCK_LEN];
    for (value, &(row, col)) in out.iter_mut().zip(ZIGZAG_ORDER.iter()) {
        *value = block[row][col];
    }
    out
}

/// Rebuild a block from a zigzag-ordered sequence.
pub fn unscan<T: Copy + Default>(seq: &[T; BLOCK_LEN]) -> Block<T> {
    let mut out = [[T::default(); BLOCK_SIZE]; BLOCK_SIZE];
    for (&value, &(row, col)) in seq.iter().zip(ZIGZAG_ORDER.iter()) {
        out[row][col] = value;
    }
    out
}

/// Like [`unscan`], for sequences whose length is only known at runtime.
///
/// # Errors
///
/// Returns `CodecError::CorruptContainer` unless `seq` holds exactly 64 values.
pub fn unscan_slice<T: Copy + Default>(seq: &[T]) -> Result<Block<T>, CodecError> {
    let seq: &[T; BLOCK_LEN] = seq.try_into().map_err(|_| {
        CodecError::CorruptContainer(format!(
            "zigzag sequence has {} values, expected {}",
            seq.len(),
            BLOCK_LEN
        ))
    })?;
    Ok(unscan(seq))
}
