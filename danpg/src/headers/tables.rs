// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_SIZE,
    entropy_coding::huffman::CanonicalHuffmanTable,
    error::{Error, Result},
    frame::quantizer::QuantTable,
    headers::segment::SegmentReader,
    util::tracing_wrappers::*,
};

pub const NUM_TABLE_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

impl TableClass {
    pub fn name(self) -> &'static str {
        match self {
            TableClass::Dc => "DC",
            TableClass::Ac => "AC",
        }
    }
}

fn slot_index(id: u8) -> Result<usize> {
    if (id as usize) < NUM_TABLE_SLOTS {
        Ok(id as usize)
    } else {
        Err(Error::InvalidTableIndex(id))
    }
}

/// Quantization and Huffman tables defined so far. A definition replaces
/// any earlier table in the same slot.
#[derive(Debug, Default)]
pub struct Tables {
    quant: [Option<QuantTable>; NUM_TABLE_SLOTS],
    dc: [Option<CanonicalHuffmanTable>; NUM_TABLE_SLOTS],
    ac: [Option<CanonicalHuffmanTable>; NUM_TABLE_SLOTS],
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every table of a DQT segment.
    pub fn read_dqt(&mut self, seg: &mut SegmentReader) -> Result<()> {
        while !seg.is_empty() {
            let (precision, id) = seg.read_nibbles()?;
            if precision != 0 {
                return Err(Error::UnsupportedQuantPrecision(precision));
            }
            let slot = slot_index(id)?;
            let bytes = seg.rest();
            let table = QuantTable::from_zigzag_bytes(bytes)?;
            seg.skip(BLOCK_SIZE)?;
            debug!(id, "quantization table");
            self.quant[slot] = Some(table);
        }
        Ok(())
    }

    /// Reads every table of a DHT segment.
    pub fn read_dht(&mut self, seg: &mut SegmentReader) -> Result<()> {
        while !seg.is_empty() {
            let (class, id) = seg.read_nibbles()?;
            let class = match class {
                0 => TableClass::Dc,
                1 => TableClass::Ac,
                _ => return Err(Error::InvalidTableClass(class)),
            };
            let slot = slot_index(id)?;
            let (table, used) = CanonicalHuffmanTable::from_dht_payload(seg.rest())?;
            seg.skip(used)?;
            debug!(class = class.name(), id, symbols = table.huffval().len(), "Huffman table");
            match class {
                TableClass::Dc => self.dc[slot] = Some(table),
                TableClass::Ac => self.ac[slot] = Some(table),
            }
        }
        Ok(())
    }

    pub fn set_quant(&mut self, id: u8, table: QuantTable) -> Result<()> {
        self.quant[slot_index(id)?] = Some(table);
        Ok(())
    }

    pub fn set_huffman(
        &mut self,
        class: TableClass,
        id: u8,
        table: CanonicalHuffmanTable,
    ) -> Result<()> {
        let slot = slot_index(id)?;
        match class {
            TableClass::Dc => self.dc[slot] = Some(table),
            TableClass::Ac => self.ac[slot] = Some(table),
        }
        Ok(())
    }

    pub fn quant(&self, id: u8) -> Result<&QuantTable> {
        self.quant[slot_index(id)?]
            .as_ref()
            .ok_or(Error::MissingQuantTable(id))
    }

    pub fn huffman(&self, class: TableClass, id: u8) -> Result<&CanonicalHuffmanTable> {
        let slot = slot_index(id)?;
        let table = match class {
            TableClass::Dc => &self.dc[slot],
            TableClass::Ac => &self.ac[slot],
        };
        table
            .as_ref()
            .ok_or(Error::MissingHuffmanTable(class.name(), id))
    }
}
