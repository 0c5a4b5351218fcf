// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::{
    BLOCK_DIM,
    error::{Error, Result},
    headers::segment::SegmentReader,
    util::tracing_wrappers::*,
};

const MAX_SAMPLING_FACTOR: u8 = 4;

/// The coding process announced by a start-of-frame marker; the
/// discriminant is the marker code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum FrameType {
    Baseline = 0xC0,
    ExtendedSequential = 0xC1,
    Progressive = 0xC2,
    Lossless = 0xC3,
    DifferentialSequential = 0xC5,
    DifferentialProgressive = 0xC6,
    DifferentialLossless = 0xC7,
    ArithmeticSequential = 0xC9,
    ArithmeticProgressive = 0xCA,
    ArithmeticLossless = 0xCB,
    ArithmeticDifferentialSequential = 0xCD,
    ArithmeticDifferentialProgressive = 0xCE,
    ArithmeticDifferentialLossless = 0xCF,
}

impl FrameType {
    /// Sequential Huffman frames with 8-bit samples decode the same way
    /// whether they are flagged baseline or extended.
    pub fn is_supported(self) -> bool {
        matches!(self, FrameType::Baseline | FrameType::ExtendedSequential)
    }
}

/// One component of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub id: u8,
    pub h_samp_factor: u8,
    pub v_samp_factor: u8,
    pub quant_idx: u8,
}

impl Component {
    /// How many output pixels, horizontally and vertically, each sample of
    /// this component covers, given the maximum factors of the frame.
    pub fn pixels_per_sample(&self, max_sampling: (u8, u8)) -> (usize, usize) {
        (
            (max_sampling.0 / self.h_samp_factor) as usize,
            (max_sampling.1 / self.v_samp_factor) as usize,
        )
    }
}

/// A SOFn segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub frame_type: FrameType,
    pub precision: u8,
    pub width: u16,
    pub height: u16,
    pub components: Vec<Component>,
}

impl FrameHeader {
    pub fn read(marker: u8, seg: &mut SegmentReader) -> Result<FrameHeader> {
        let frame_type = FrameType::from_u8(marker)
            .filter(|t| t.is_supported())
            .ok_or(Error::UnsupportedFrameType(marker))?;
        let precision = seg.read_u8()?;
        if precision != 8 {
            return Err(Error::UnsupportedSamplePrecision(precision));
        }
        let height = seg.read_u16()?;
        let width = seg.read_u16()?;
        if width == 0 || height == 0 {
            // A zero height would be defined later by a DNL segment, which is
            // not supported.
            return Err(Error::InvalidImageSize(width as usize, height as usize));
        }
        let num_components = seg.read_u8()? as usize;
        if seg.remaining() != 3 * num_components {
            return Err(Error::InvalidSegmentLength(marker, seg.remaining() + 8));
        }
        let mut components: Vec<Component> = Vec::with_capacity(num_components);
        for _ in 0..num_components {
            let id = seg.read_u8()?;
            let (h_samp_factor, v_samp_factor) = seg.read_nibbles()?;
            let quant_idx = seg.read_u8()?;
            if components.iter().any(|c| c.id == id) {
                return Err(Error::DuplicateComponent(id));
            }
            if !(1..=MAX_SAMPLING_FACTOR).contains(&h_samp_factor)
                || !(1..=MAX_SAMPLING_FACTOR).contains(&v_samp_factor)
            {
                return Err(Error::UnsupportedSampling(
                    h_samp_factor,
                    v_samp_factor,
                    MAX_SAMPLING_FACTOR,
                    MAX_SAMPLING_FACTOR,
                ));
            }
            if quant_idx > 3 {
                return Err(Error::InvalidTableIndex(quant_idx));
            }
            components.push(Component {
                id,
                h_samp_factor,
                v_samp_factor,
                quant_idx,
            });
        }
        if num_components != 1 && num_components != 3 {
            return Err(Error::UnsupportedComponentCount(num_components));
        }

        let header = FrameHeader {
            frame_type,
            precision,
            width,
            height,
            components,
        };
        let (hmax, vmax) = header.max_sampling();
        for c in &header.components {
            // Each sample must cover a whole number of pixels.
            if hmax % c.h_samp_factor != 0 || vmax % c.v_samp_factor != 0 {
                return Err(Error::UnsupportedSampling(
                    c.h_samp_factor,
                    c.v_samp_factor,
                    hmax,
                    vmax,
                ));
            }
        }
        debug!(
            ?frame_type,
            width,
            height,
            num_components,
            hmax,
            vmax,
            "frame header"
        );
        Ok(header)
    }

    pub fn max_sampling(&self) -> (u8, u8) {
        self.components
            .iter()
            .fold((1, 1), |(h, v), c| (h.max(c.h_samp_factor), v.max(c.v_samp_factor)))
    }

    /// Size in pixels of one MCU.
    pub fn mcu_size(&self) -> (usize, usize) {
        let (hmax, vmax) = self.max_sampling();
        (hmax as usize * BLOCK_DIM, vmax as usize * BLOCK_DIM)
    }

    /// Number of MCUs per row and per column; partial MCUs at the right and
    /// bottom edges count as whole ones.
    pub fn mcu_grid(&self) -> (usize, usize) {
        let (mcu_width, mcu_height) = self.mcu_size();
        (
            (self.width as usize).div_ceil(mcu_width),
            (self.height as usize).div_ceil(mcu_height),
        )
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    pub fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }
}
