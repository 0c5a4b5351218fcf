// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod ycbcr;

pub use ycbcr::{Rgb, Ycbcr, ycbcr_to_rgb};
