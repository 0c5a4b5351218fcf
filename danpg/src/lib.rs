// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![deny(unsafe_code)]
pub mod bit_reader;
pub mod color;
pub mod decode;
pub mod entropy_coding;
pub mod error;
pub mod frame;
pub mod headers;
pub mod image;
pub mod options;
pub mod util;

pub use decode::{DecodedImage, decode, decode_with_options};

use danpg_transforms::{BLOCK_DIM, BLOCK_SIZE};
