// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::f64::consts::{PI, SQRT_2};

use crate::scales::{ROT_Z10, ROT_Z12, SQRT2, TWO_COS_PI_8, aan_scale_factors};
use crate::{BLOCK_DIM, DataUnit};

/// Distance from an integer below which a transformed sample is taken to be
/// exactly that integer instead of being truncated.
///
/// The exact transform of integer input lands on integers surprisingly often
/// (every DC-only block whose coefficient is a multiple of 8 does). Floating
/// point evaluation then yields values like `9.999999999999998`, which plain
/// truncation would turn into 9. Both implementations differ from the exact
/// result by less than 1e-12 for coefficients in the baseline range.
pub const SNAP_EPSILON: f64 = 1e-6;

/// Converts a transformed sample to an integer: truncation toward zero, except
/// for values within [`SNAP_EPSILON`] of an integer.
#[inline(always)]
pub fn to_sample(value: f64) -> i32 {
    let nearest = value.round();
    if (value - nearest).abs() < SNAP_EPSILON {
        nearest as i32
    } else {
        value.trunc() as i32
    }
}

/// An 8x8 inverse DCT over a [`DataUnit`], in place.
pub trait InverseDct {
    fn idct(&self, block: &mut DataUnit);
}

/// Direct evaluation of
/// `f(x, y) = 1/4 * sum_u sum_v C(u) C(v) F(u, v) cos((2x+1)u pi/16) cos((2y+1)v pi/16)`.
#[derive(Debug, Clone)]
pub struct ReferenceIdct {
    // cosines[x][u] = cos((2x + 1) * u * pi / 16)
    cosines: [[f64; BLOCK_DIM]; BLOCK_DIM],
}

impl ReferenceIdct {
    pub fn new() -> Self {
        let mut cosines = [[0.0; BLOCK_DIM]; BLOCK_DIM];
        for (x, row) in cosines.iter_mut().enumerate() {
            for (u, c) in row.iter_mut().enumerate() {
                *c = (((2 * x + 1) * u) as f64 * PI / 16.0).cos();
            }
        }
        Self { cosines }
    }
}

impl Default for ReferenceIdct {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 { 1.0 / SQRT_2 } else { 1.0 }
}

impl InverseDct for ReferenceIdct {
    fn idct(&self, block: &mut DataUnit) {
        let input = *block;
        for y in 0..BLOCK_DIM {
            for x in 0..BLOCK_DIM {
                let mut sum = 0.0;
                for v in 0..BLOCK_DIM {
                    for u in 0..BLOCK_DIM {
                        sum += alpha(u)
                            * alpha(v)
                            * f64::from(input[v * BLOCK_DIM + u])
                            * self.cosines[x][u]
                            * self.cosines[y][v];
                    }
                }
                block[y * BLOCK_DIM + x] = to_sample(sum * 0.25);
            }
        }
    }
}

/// Separable scaled inverse DCT (Arai, Agui and Nakajima's factorization of
/// the Loeffler network).
///
/// Every coefficient is first multiplied by its 2-D AAN scale factor, which
/// lets each 1-D pass get away with five multiplications. Rows are
/// transformed first, then columns; the overall `1/8` normalisation is
/// applied at the end of the column pass.
#[derive(Debug, Clone)]
pub struct FastIdct {
    scales: [f64; BLOCK_DIM],
}

impl FastIdct {
    pub fn new() -> Self {
        Self {
            scales: aan_scale_factors(),
        }
    }
}

impl Default for FastIdct {
    fn default() -> Self {
        Self::new()
    }
}

/// One 8-point scaled inverse transform. `data` holds prescaled coefficients
/// and receives the (8x amplified) spatial samples.
#[inline(always)]
pub(crate) fn idct_1d(data: &mut [f64; BLOCK_DIM]) {
    // Even part.
    let tmp10 = data[0] + data[4];
    let tmp11 = data[0] - data[4];
    let tmp13 = data[2] + data[6];
    let tmp12 = (data[2] - data[6]) * SQRT2 - tmp13;

    let tmp0 = tmp10 + tmp13;
    let tmp3 = tmp10 - tmp13;
    let tmp1 = tmp11 + tmp12;
    let tmp2 = tmp11 - tmp12;

    // Odd part.
    let z13 = data[5] + data[3];
    let z10 = data[5] - data[3];
    let z11 = data[1] + data[7];
    let z12 = data[1] - data[7];

    let tmp7 = z11 + z13;
    let tmp11 = (z11 - z13) * SQRT2;

    let z5 = (z10 + z12) * TWO_COS_PI_8;
    let tmp10 = ROT_Z12 * z12 - z5;
    let tmp12 = -ROT_Z10 * z10 + z5;

    let tmp6 = tmp12 - tmp7;
    let tmp5 = tmp11 - tmp6;
    let tmp4 = tmp10 + tmp5;

    data[0] = tmp0 + tmp7;
    data[7] = tmp0 - tmp7;
    data[1] = tmp1 + tmp6;
    data[6] = tmp1 - tmp6;
    data[2] = tmp2 + tmp5;
    data[5] = tmp2 - tmp5;
    data[4] = tmp3 + tmp4;
    data[3] = tmp3 - tmp4;
}

impl InverseDct for FastIdct {
    fn idct(&self, block: &mut DataUnit) {
        let mut workspace = [[0.0; BLOCK_DIM]; BLOCK_DIM];

        for (v, row) in workspace.iter_mut().enumerate() {
            for (u, value) in row.iter_mut().enumerate() {
                *value = f64::from(block[v * BLOCK_DIM + u]) * self.scales[v] * self.scales[u];
            }
            idct_1d(row);
        }

        for x in 0..BLOCK_DIM {
            let mut column = [0.0; BLOCK_DIM];
            for y in 0..BLOCK_DIM {
                column[y] = workspace[y][x];
            }
            idct_1d(&mut column);
            for y in 0..BLOCK_DIM {
                block[y * BLOCK_DIM + x] = to_sample(column[y] / 8.0);
            }
        }
    }
}

/// Returns `true` when every coefficient is zero, in which case every
/// implementation produces an all-zero block.
pub fn is_zero_block(block: &DataUnit) -> bool {
    block.iter().all(|&c| c == 0)
}
