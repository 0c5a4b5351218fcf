// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Marker segments of the JPEG interchange format (ITU-T T.81, Annex B).

pub mod frame_header;
pub mod jfif;
pub mod markers;
pub mod scan_header;
pub mod segment;
pub mod tables;

pub use frame_header::{Component, FrameHeader, FrameType};
pub use jfif::{DensityUnits, Jfif};
pub use scan_header::{ScanComponent, ScanHeader};
pub use segment::SegmentReader;
pub use tables::Tables;

use crate::error::Result;

/// Reads the payload of a DRI segment: the number of MCUs between restart
/// markers, 0 disabling them.
pub fn read_restart_interval(seg: &mut SegmentReader) -> Result<u16> {
    let interval = seg.read_u16()?;
    seg.expect_end()?;
    Ok(interval)
}
