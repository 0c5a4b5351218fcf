// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::f64::consts::{PI, SQRT_2};

use crate::BLOCK_DIM;

// Rotation constants of the odd part of the 8-point AAN network.
pub(crate) const SQRT2: f64 = SQRT_2;
// 2 * cos(pi / 8)
pub(crate) const TWO_COS_PI_8: f64 = 1.847_759_065_022_573_5;
// 2 * sqrt(2) * cos(3 * pi / 8)
pub(crate) const ROT_Z12: f64 = 1.082_392_200_292_394_2;
// 2 * sqrt(2) * cos(pi / 8)
pub(crate) const ROT_Z10: f64 = 2.613_125_929_752_753;

/// Per-frequency prescale factors of the scaled AAN transform:
/// `1` for the DC term and `sqrt(2) * cos(k * pi / 16)` otherwise.
///
/// The 2-D prescale for coefficient `(u, v)` is `scales[v] * scales[u]`.
pub fn aan_scale_factors() -> [f64; BLOCK_DIM] {
    let mut scales = [1.0; BLOCK_DIM];
    for (k, scale) in scales.iter_mut().enumerate().skip(1) {
        *scale = (k as f64 * PI / 16.0).cos() * SQRT_2;
    }
    scales
}
