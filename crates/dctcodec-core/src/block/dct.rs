//! Forward and inverse 8x8 discrete cosine transform.
//!
//! The transform pair is
//!
//! ```text
//! F[u][v] = 1/4 C(u) C(v) sum_x sum_y f[x][y] cos((2x+1)u pi/16) cos((2y+1)v pi/16)
//! f[x][y] = 1/4 sum_u sum_v C(u) C(v) F[u][v] cos((2x+1)u pi/16) cos((2y+1)v pi/16)
//! ```
//!
//! with `C(0) = 1/sqrt(2)` and `C(k) = 1` otherwise. Both directions are
//! evaluated as two separable 1-D passes, accumulating in `f64` and rounding
//! to `f32` once at the end.
//!
//! Input samples are expected to be level shifted to a signed range
//! (roughly -128..=127) before calling [`forward`].

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use super::{Block, BLOCK_SIZE};

const N: usize = BLOCK_SIZE;

/// `basis[x][u] = C(u) / 2 * cos((2x + 1) u pi / 16)`.
///
/// Folding the 1/4 normalisation into the basis as 1/2 per axis makes each
/// 1-D pass orthonormal, so the inverse is the transposed sum.
fn basis() -> [[f64; N]; N] {
    let mut table = [[0.0; N]; N];
    for (x, row) in table.iter_mut().enumerate() {
        for (u, value) in row.iter_mut().enumerate() {
            let scale = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
            *value = 0.5 * scale * (((2 * x + 1) * u) as f64 * PI / 16.0).cos();
        }
    }
    table
}

/// Transform a block of level-shifted samples into DCT coefficients.
pub fn forward(block: &Block<f32>) -> Block<f32> {
    let c = basis();

    // Rows first: tmp[x][v] = sum_y f[x][y] c[y][v]
    let mut tmp = [[0.0f64; N]; N];
    for x in 0..N {
        for v in 0..N {
            let mut sum = 0.0;
            for y in 0..N {
                sum += f64::from(block[x][y]) * c[y][v];
            }
            tmp[x][v] = sum;
        }
    }

    // Then columns: F[u][v] = sum_x c[x][u] tmp[x][v]
    let mut out = [[0.0f32; N]; N];
    for u in 0..N {
        for v in 0..N {
            let mut sum = 0.0;
            for x in 0..N {
                sum += c[x][u] * tmp[x][v];
            }
            out[u][v] = sum as f32;
        }
    }
    out
}

/// Reconstruct level-shifted samples from a block of DCT coefficients.
pub fn inverse(coeffs: &Block<f32>) -> Block<f32> {
    let c = basis();

    // tmp[u][y] = sum_v F[u][v] c[y][v]
    let mut tmp = [[0.0f64; N]; N];
    for u in 0..N {
        for y in 0..N {
            let mut sum = 0.0;
            for v in 0..N {
                sum += f64::from(coeffs[u][v]) * c[y][v];
            }
            tmp[u][y] = sum;
        }
    }

    // f[x][y] = sum_u c[x][u] tmp[u][y]
    let mut out = [[0.0f32; N]; N];
    for x in 0..N {
        for y in 0..N {
            let mut sum = 0.0;
            for u in 0..N {
                sum += c[x][u] * tmp[u][y];
            }
            out[x][y] = sum as f32;
        }
    }
    out
}
