// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Inverse discrete cosine transforms for 8x8 JPEG data units.
//!
//! Two interchangeable implementations of [`InverseDct`] are provided:
//! [`ReferenceIdct`], a direct evaluation of the double sum from the JPEG
//! standard, and [`FastIdct`], the scaled AAN factorization of Loeffler's
//! 8-point butterfly network. Both produce identical integer output for
//! every block exercised by the test suite.

pub mod idct;
pub mod scales;

pub use idct::*;

pub const BLOCK_DIM: usize = 8;
pub const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;

/// One 8x8 data unit in row-major order.
///
/// Before the transform it holds dequantized coefficients in natural order
/// (index `v * 8 + u`, `u` the horizontal frequency); afterwards it holds
/// spatial samples centred at zero.
pub type DataUnit = [i32; BLOCK_SIZE];
