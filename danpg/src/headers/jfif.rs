// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::{error::Result, headers::segment::SegmentReader, util::tracing_wrappers::*};

const IDENTIFIER: &[u8; 5] = b"JFIF\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum DensityUnits {
    /// Only the aspect ratio is given.
    None = 0,
    DotsPerInch = 1,
    DotsPerCm = 2,
}

/// The JFIF APP0 segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jfif {
    pub version: (u8, u8),
    pub units: DensityUnits,
    pub x_density: u16,
    pub y_density: u16,
    /// Size of the embedded RGB thumbnail, which is not decoded.
    pub thumbnail_size: (u8, u8),
}

impl Jfif {
    /// Parses an APP0 payload. Returns `None` for APP0 segments that are not
    /// JFIF headers (e.g. JFXX extensions), which are skipped.
    pub fn read(seg: &mut SegmentReader) -> Result<Option<Jfif>> {
        if !seg.rest().starts_with(IDENTIFIER) {
            debug!("APP0 segment without JFIF identifier");
            return Ok(None);
        }
        seg.skip(IDENTIFIER.len())?;
        let major = seg.read_u8()?;
        let minor = seg.read_u8()?;
        let units_code = seg.read_u8()?;
        let units = DensityUnits::from_u8(units_code).unwrap_or_else(|| {
            warn!(units_code, "unknown JFIF density units");
            DensityUnits::None
        });
        let x_density = seg.read_u16()?;
        let y_density = seg.read_u16()?;
        let thumbnail_size = (seg.read_u8()?, seg.read_u8()?);
        let jfif = Jfif {
            version: (major, minor),
            units,
            x_density,
            y_density,
            thumbnail_size,
        };
        debug!(?jfif, "JFIF header");
        Ok(Some(jfif))
    }
}
