// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_SIZE,
    error::{Error, Result},
    headers::{frame_header::FrameHeader, markers::SOS, segment::SegmentReader},
    util::tracing_wrappers::*,
};

const MAX_SCAN_COMPONENTS: usize = 4;

/// A component as listed in a scan header. Components are referred to by
/// their index in [`FrameHeader::components`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    pub component_idx: usize,
    pub dc_table: u8,
    pub ac_table: u8,
}

/// An SOS segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
    pub ss: u8,
    pub se: u8,
    pub ah: u8,
    pub al: u8,
}

impl ScanHeader {
    /// Reads a scan header and checks it against `frame`. Only a single
    /// interleaved sequential scan covering every frame component is
    /// accepted.
    pub fn read(seg: &mut SegmentReader, frame: &FrameHeader) -> Result<ScanHeader> {
        let num_components = seg.read_u8()? as usize;
        if num_components == 0 || num_components > MAX_SCAN_COMPONENTS {
            return Err(Error::UnsupportedComponentCount(num_components));
        }
        if seg.remaining() != 2 * num_components + 3 {
            return Err(Error::InvalidSegmentLength(SOS, seg.remaining() + 3));
        }
        let mut components: Vec<ScanComponent> = Vec::with_capacity(num_components);
        for _ in 0..num_components {
            let id = seg.read_u8()?;
            let (dc_table, ac_table) = seg.read_nibbles()?;
            let component_idx = frame
                .component_index(id)
                .ok_or(Error::UnknownScanComponent(id))?;
            if components.iter().any(|c| c.component_idx == component_idx) {
                return Err(Error::DuplicateComponent(id));
            }
            for table in [dc_table, ac_table] {
                if table > 3 {
                    return Err(Error::InvalidTableIndex(table));
                }
            }
            components.push(ScanComponent {
                component_idx,
                dc_table,
                ac_table,
            });
        }
        let ss = seg.read_u8()?;
        let se = seg.read_u8()?;
        let (ah, al) = seg.read_nibbles()?;
        if ss != 0 || se as usize != BLOCK_SIZE - 1 || ah != 0 || al != 0 {
            return Err(Error::UnsupportedScan(ss, se, ah, al));
        }
        if components.len() != frame.components.len() {
            return Err(Error::IncompleteScan);
        }
        debug!(num_components, "scan header");
        Ok(ScanHeader {
            components,
            ss,
            se,
            ah,
            al,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::headers::frame_header::{Component, FrameType};
    use test_log::test;

    fn frame(num_components: u8) -> FrameHeader {
        FrameHeader {
            frame_type: FrameType::Baseline,
            precision: 8,
            width: 16,
            height: 16,
            components: (1..=num_components)
                .map(|id| Component {
                    id,
                    h_samp_factor: 1,
                    v_samp_factor: 1,
                    quant_idx: 0,
                })
                .collect(),
        }
    }

    fn read(payload: &[u8], frame: &FrameHeader) -> Result<ScanHeader> {
        ScanHeader::read(&mut SegmentReader::new(SOS, payload), frame)
    }

    #[test]
    fn three_components() -> Result<()> {
        let scan = read(&[3, 1, 0x00, 2, 0x11, 3, 0x11, 0, 63, 0], &frame(3))?;
        assert_eq!(
            scan.components,
            vec![
                ScanComponent {
                    component_idx: 0,
                    dc_table: 0,
                    ac_table: 0
                },
                ScanComponent {
                    component_idx: 1,
                    dc_table: 1,
                    ac_table: 1
                },
                ScanComponent {
                    component_idx: 2,
                    dc_table: 1,
                    ac_table: 1
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn progressive_parameters() {
        assert!(matches!(
            read(&[1, 1, 0x00, 1, 5, 0], &frame(1)),
            Err(Error::UnsupportedScan(1, 5, 0, 0))
        ));
        assert!(matches!(
            read(&[1, 1, 0x00, 0, 63, 0x01], &frame(1)),
            Err(Error::UnsupportedScan(0, 63, 0, 1))
        ));
    }

    #[test]
    fn bad_components() {
        assert!(matches!(
            read(&[1, 7, 0x00, 0, 63, 0], &frame(1)),
            Err(Error::UnknownScanComponent(7))
        ));
        assert!(matches!(
            read(&[2, 1, 0x00, 1, 0x00, 0, 63, 0], &frame(3)),
            Err(Error::DuplicateComponent(1))
        ));
        assert!(matches!(
            read(&[1, 1, 0x40, 0, 63, 0], &frame(1)),
            Err(Error::InvalidTableIndex(4))
        ));
        assert!(matches!(
            read(&[1, 1, 0x00, 0, 63, 0], &frame(3)),
            Err(Error::IncompleteScan)
        ));
        assert!(matches!(
            read(&[0, 0, 63, 0], &frame(1)),
            Err(Error::UnsupportedComponentCount(0))
        ));
        assert!(matches!(
            read(&[1, 1, 0x00, 0, 63], &frame(1)),
            Err(Error::InvalidSegmentLength(SOS, 7))
        ));
    }
}
