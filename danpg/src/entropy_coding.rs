// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Huffman entropy decoding of baseline DCT coefficients.

pub mod decode;
pub mod huffman;
