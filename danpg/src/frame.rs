// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod coeff_order;
pub mod mcu;
pub mod quantizer;

pub use mcu::ScanDecoder;
