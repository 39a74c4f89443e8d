//! Uniform scalar quantization of DCT coefficients.
//!
//! A single integer compression factor scales the base luminance table
//! linearly. Lower factors divide by smaller steps, which keeps more detail
//! and produces larger output.
//!
//! # Rounding
//!
//! Quantization rounds half away from zero (`f32::round`), so `2.5 -> 3` and
//! `-2.5 -> -3`. Compression and the tests share this one rule.

use serde::{Deserialize, Serialize};

use super::{Block, BLOCK_SIZE};

/// Smallest accepted compression factor.
pub const MIN_FACTOR: i32 = 1;

/// Largest accepted compression factor.
pub const MAX_FACTOR: i32 = 15;

/// Base quantization table (the standard 50% quality luminance table).
///
/// Every entry is at least 10, so a scaled matrix never contains zero.
pub const BASE_QUANTIZATION_TABLE: Block<u16> = [
    [16, 11, 10, 16, 24, 40, 51, 61],
    [12, 12, 14, 19, 26, 58, 60, 55],
    [14, 13, 16, 24, 40, 57, 69, 56],
    [14, 17, 22, 29, 51, 87, 80, 62],
    [18, 22, 37, 56, 68, 109, 103, 77],
    [24, 35, 55, 64, 81, 104, 113, 92],
    [49, 64, 78, 87, 103, 121, 120, 101],
    [72, 92, 95, 98, 112, 100, 103, 99],
];

/// Clamp a compression factor into `MIN_FACTOR..=MAX_FACTOR`.
///
/// Out-of-range factors are not an error. They silently select the nearest
/// supported factor.
#[inline]
pub fn clamp_factor(factor: i32) -> i32 {
    factor.clamp(MIN_FACTOR, MAX_FACTOR)
}

/// The base table scaled by a clamped compression factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizationMatrix {
    factor: i32,
    steps: Block<f32>,
}

impl QuantizationMatrix {
    /// Build the matrix for `factor`, clamping it first.
    pub fn new(factor: i32) -> Self {
        let factor = clamp_factor(factor);
        let scale = factor as f32;

        let mut steps = [[0.0f32; BLOCK_SIZE]; BLOCK_SIZE];
        for (row, base_row) in steps.iter_mut().zip(BASE_QUANTIZATION_TABLE.iter()) {
            for (step, &base) in row.iter_mut().zip(base_row.iter()) {
                *step = f32::from(base) * scale;
            }
        }

        Self { factor, steps }
    }

    /// The factor the matrix was built with, after clamping.
    pub fn factor(&self) -> i32 {
        self.factor
    }

    /// Quantizer step sizes, indexed `[row][col]`.
    pub fn steps(&self) -> &Block<f32> {
        &self.steps
    }
}

/// Result of quantizing one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantized {
    pub coefficients: Block<i16>,
    /// Number of coefficients that fell outside the i16 range and were
    /// saturated to `i16::MIN` / `i16::MAX`.
    pub clamped: usize,
}

/// Divide each coefficient by its step and round half away from zero.
pub fn quantize(coeffs: &Block<f32>, matrix: &QuantizationMatrix) -> Quantized {
    let mut coefficients = [[0i16; BLOCK_SIZE]; BLOCK_SIZE];
    let mut clamped = 0;

    for u in 0..BLOCK_SIZE {
        for v in 0..BLOCK_SIZE {
            let q = (coeffs[u][v] / matrix.steps[u][v]).round();
            coefficients[u][v] = if q > f32::from(i16::MAX) {
                clamped += 1;
                i16::MAX
            } else if q < f32::from(i16::MIN) {
                clamped += 1;
                i16::MIN
            } else {
                q as i16
            };
        }
    }

    Quantized {
        coefficients,
        clamped,
    }
}

/// Multiply each quantized coefficient back by its step.
pub fn dequantize(quantized: &Block<i16>, matrix: &QuantizationMatrix) -> Block<f32> {
    let mut out = [[0.0f32; BLOCK_SIZE]; BLOCK_SIZE];
    for u in 0..BLOCK_SIZE {
        for v in 0..BLOCK_SIZE {
            out[u][v] = f32::from(quantized[u][v]) * matrix.steps[u][v];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::dct::forward;

    #[test]
    fn test_matrix_scales_base_table() {
        let matrix = QuantizationMatrix::new(5);
        assert_eq!(matrix.factor(), 5);
        assert_eq!(matrix.steps()[0][0], 80.0);
        assert_eq!(matrix.steps()[7][7], 495.0);
    }

    #[test]
    fn test_factor_clamped_low() {
        assert_eq!(QuantizationMatrix::new(0), QuantizationMatrix::new(1));
        assert_eq!(QuantizationMatrix::new(-20), QuantizationMatrix::new(1));
    }

    #[test]
    fn test_factor_clamped_high() {
        assert_eq!(QuantizationMatrix::new(99), QuantizationMatrix::new(15));
        assert_eq!(QuantizationMatrix::new(16).factor(), 15);
    }

    #[test]
    fn test_matrix_never_zero() {
        for factor in MIN_FACTOR..=MAX_FACTOR {
            let matrix = QuantizationMatrix::new(factor);
            assert!(matrix.steps().iter().flatten().all(|&step| step >= 10.0));
        }
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let matrix = QuantizationMatrix::new(1);
        let mut coeffs = [[0.0f32; BLOCK_SIZE]; BLOCK_SIZE];
        // Step at (0, 2) is 10
        coeffs[0][2] = 25.0;
        coeffs[1][0] = -30.0; // step 12 -> -2.5
        coeffs[0][1] = 16.5; // step 11 -> 1.5

        let q = quantize(&coeffs, &matrix);
        assert_eq!(q.coefficients[0][2], 3);
        assert_eq!(q.coefficients[1][0], -3);
        assert_eq!(q.coefficients[0][1], 2);
        assert_eq!(q.clamped, 0);
    }

    #[test]
    fn test_saturates_and_reports_overflow() {
        let matrix = QuantizationMatrix::new(1);
        let mut coeffs = [[0.0f32; BLOCK_SIZE]; BLOCK_SIZE];
        coeffs[0][0] = 1.0e9;
        coeffs[7][7] = -1.0e9;

        let q = quantize(&coeffs, &matrix);
        assert_eq!(q.coefficients[0][0], i16::MAX);
        assert_eq!(q.coefficients[7][7], i16::MIN);
        assert_eq!(q.clamped, 2);
    }

    #[test]
    fn test_dequantize_multiplies_steps() {
        let matrix = QuantizationMatrix::new(2);
        let mut q = [[0i16; BLOCK_SIZE]; BLOCK_SIZE];
        q[0][0] = -13;
        q[3][4] = 2;

        let out = dequantize(&q, &matrix);
        assert_eq!(out[0][0], -13.0 * 32.0);
        assert_eq!(out[3][4], 2.0 * 102.0);
        assert_eq!(out[5][5], 0.0);
    }

    #[test]
    fn test_known_quantized_block() {
        // Worked example from the JPEG literature, quantized with the base table
        const SAMPLES: [[i16; 8]; 8] = [
            [-76, -73, -67, -62, -58, -67, -64, -55],
            [-65, -69, -73, -38, -19, -43, -59, -56],
            [-66, -69, -60, -15, 16, -24, -62, -55],
            [-65, -70, -57, -6, 26, -22, -58, -59],
            [-61, -67, -60, -24, -2, -40, -60, -58],
            [-49, -63, -68, -58, -51, -60, -70, -53],
            [-43, -57, -64, -69, -73, -67, -63, -45],
            [-41, -49, -59, -60, -63, -52, -50, -34],
        ];
        const QUANTIZED: [[i16; 8]; 8] = [
            [-26, -3, -6, 2, 2, -1, 0, 0],
            [0, -2, -4, 1, 1, 0, 0, 0],
            [-3, 1, 5, -1, -1, 0, 0, 0],
            [-3, 1, 2, -1, 0, 0, 0, 0],
            [1, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
        ];

        let mut block = [[0.0f32; BLOCK_SIZE]; BLOCK_SIZE];
        for x in 0..BLOCK_SIZE {
            for y in 0..BLOCK_SIZE {
                block[x][y] = f32::from(SAMPLES[x][y]);
            }
        }

        let q = quantize(&forward(&block), &QuantizationMatrix::new(1));
        assert_eq!(q.coefficients, QUANTIZED);
    }
}
