// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use danpg_transforms::DataUnit;

use crate::{
    BLOCK_SIZE,
    bit_reader::BitReader,
    entropy_coding::huffman::CanonicalHuffmanTable,
    error::{EntropyResult, Error},
    frame::coeff_order::ZIGZAG,
};

const END_OF_BLOCK: u8 = 0x00;
const ZERO_RUN_16: u8 = 0xF0;
const MAX_DC_CATEGORY: u8 = 11;
const MAX_AC_CATEGORY: u8 = 10;

/// Turns the `size` raw bits that follow a magnitude category into a signed
/// value (procedure EXTEND, F.2.2.1): values below `2^(size-1)` are negative.
#[inline]
pub fn extend(value: u32, size: u8) -> i32 {
    if size == 0 {
        return 0;
    }
    let value = value as i32;
    if value < 1 << (size - 1) {
        value + (-1 << size) + 1
    } else {
        value
    }
}

fn receive_extend(br: &mut BitReader, size: u8) -> EntropyResult<i32> {
    if size == 0 {
        return Ok(0);
    }
    Ok(extend(br.read(size as u32)?, size))
}

/// Decoding state of one component within a scan: its DC and AC tables and
/// the running DC predictor.
#[derive(Debug, Clone)]
pub struct ComponentDecoder<'a> {
    dc_table: &'a CanonicalHuffmanTable,
    ac_table: &'a CanonicalHuffmanTable,
    previous_dc: i32,
}

impl<'a> ComponentDecoder<'a> {
    pub fn new(dc_table: &'a CanonicalHuffmanTable, ac_table: &'a CanonicalHuffmanTable) -> Self {
        Self {
            dc_table,
            ac_table,
            previous_dc: 0,
        }
    }

    pub fn previous_dc(&self) -> i32 {
        self.previous_dc
    }

    /// Resets the DC predictor, at scan start and after every restart marker.
    pub fn reset(&mut self) {
        self.previous_dc = 0;
    }

    /// Decodes one block into `block`, quantized, in natural order.
    ///
    /// The DC predictor only changes once the whole DC difference has been
    /// read.
    pub fn decode_block(&mut self, br: &mut BitReader, block: &mut DataUnit) -> EntropyResult<()> {
        block.fill(0);

        let category = self.dc_table.decode(br)?;
        if category > MAX_DC_CATEGORY {
            return Err(Error::InvalidMagnitude(category).into());
        }
        let diff = receive_extend(br, category)?;
        self.previous_dc = self.previous_dc.wrapping_add(diff);
        block[0] = self.previous_dc;

        let mut k = 1;
        while k < BLOCK_SIZE {
            let rs = self.ac_table.decode(br)?;
            match rs {
                END_OF_BLOCK => break,
                ZERO_RUN_16 => k += 16,
                _ => {
                    let run = (rs >> 4) as usize;
                    let size = rs & 0x0F;
                    if size > MAX_AC_CATEGORY {
                        return Err(Error::InvalidMagnitude(size).into());
                    }
                    k += run;
                    if k >= BLOCK_SIZE {
                        return Err(Error::CoefficientOverflow(k).into());
                    }
                    block[ZIGZAG[k]] = receive_extend(br, size)?;
                    k += 1;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Interrupt;
    use danpg_test_utils::{BitWriter, tables};
    use test_log::test;

    fn table(spec: &tables::HuffmanSpec) -> CanonicalHuffmanTable {
        CanonicalHuffmanTable::new(&spec.bits, spec.values).unwrap()
    }

    // Code (value, length) of `symbol` in the given standard table.
    fn code_of(t: &CanonicalHuffmanTable, symbol: u8) -> (u32, u32) {
        let k = t.huffval().iter().position(|&s| s == symbol).unwrap();
        (t.huffcode()[k] as u32, t.huffsize()[k] as u32)
    }

    fn write_symbol(w: &mut BitWriter, t: &CanonicalHuffmanTable, symbol: u8) {
        let (code, length) = code_of(t, symbol);
        w.write(code, length);
    }

    #[test]
    fn extend_values() {
        assert_eq!(extend(0, 0), 0);
        assert_eq!(extend(0, 1), -1);
        assert_eq!(extend(1, 1), 1);
        assert_eq!(extend(0b00, 2), -3);
        assert_eq!(extend(0b01, 2), -2);
        assert_eq!(extend(0b10, 2), 2);
        assert_eq!(extend(0b11, 2), 3);
        assert_eq!(extend(0, 11), -2047);
        assert_eq!(extend(2047, 11), 2047);
        assert_eq!(extend(1024, 11), 1024);
        assert_eq!(extend(1023, 11), -1024);
    }

    #[test]
    fn dc_and_ac_in_natural_order() {
        let dc = table(&tables::LUMA_DC);
        let ac = table(&tables::LUMA_AC);
        let mut w = BitWriter::new();
        // DC diff -3: category 2, bits 00.
        write_symbol(&mut w, &dc, 2);
        w.write(0b00, 2);
        // AC 5 at zig-zag 1: run 0 size 3, bits 101.
        write_symbol(&mut w, &ac, 0x03);
        w.write(0b101, 3);
        // AC -1 at zig-zag 4: run 2 size 1, bit 0.
        write_symbol(&mut w, &ac, 0x21);
        w.write(0, 1);
        // 16 zeros, then AC 1 at zig-zag 21: run 0.
        write_symbol(&mut w, &ac, 0xF0);
        write_symbol(&mut w, &ac, 0x01);
        w.write(1, 1);
        write_symbol(&mut w, &ac, 0x00);
        let data = w.finish();

        let mut decoder = ComponentDecoder::new(&dc, &ac);
        let mut br = BitReader::new(&data);
        let mut block = [0; BLOCK_SIZE];
        decoder.decode_block(&mut br, &mut block).unwrap();

        let mut expected = [0; BLOCK_SIZE];
        expected[0] = -3;
        expected[ZIGZAG[1]] = 5;
        expected[ZIGZAG[4]] = -1;
        expected[ZIGZAG[21]] = 1;
        assert_eq!(block, expected);
        assert_eq!(decoder.previous_dc(), -3);
    }

    #[test]
    fn dc_prediction_accumulates_and_resets() {
        let dc = table(&tables::LUMA_DC);
        let ac = table(&tables::LUMA_AC);
        let diffs = [5i32, -2, 7, 0, -10];
        let mut w = BitWriter::new();
        for &diff in &diffs {
            let size = 32 - diff.unsigned_abs().leading_zeros();
            write_symbol(&mut w, &dc, size as u8);
            if size > 0 {
                let bits = if diff < 0 { diff - 1 } else { diff };
                w.write(bits as u32, size);
            }
            write_symbol(&mut w, &ac, 0x00);
        }
        let data = w.finish();

        let mut decoder = ComponentDecoder::new(&dc, &ac);
        let mut br = BitReader::new(&data);
        let mut block = [0; BLOCK_SIZE];
        let mut running = 0;
        for (i, &diff) in diffs.iter().enumerate() {
            if i == 3 {
                decoder.reset();
                running = 0;
            }
            decoder.decode_block(&mut br, &mut block).unwrap();
            running += diff;
            assert_eq!(block[0], running);
            assert_eq!(decoder.previous_dc(), running);
        }
    }

    #[test]
    fn full_block_without_eob() {
        let dc = table(&tables::LUMA_DC);
        let ac = table(&tables::LUMA_AC);
        let mut w = BitWriter::new();
        write_symbol(&mut w, &dc, 0);
        for _ in 1..BLOCK_SIZE {
            write_symbol(&mut w, &ac, 0x01);
            w.write(1, 1);
        }
        // A following block, to show nothing extra was consumed.
        write_symbol(&mut w, &dc, 1);
        w.write(1, 1);
        write_symbol(&mut w, &ac, 0x00);
        let data = w.finish();

        let mut decoder = ComponentDecoder::new(&dc, &ac);
        let mut br = BitReader::new(&data);
        let mut block = [0; BLOCK_SIZE];
        decoder.decode_block(&mut br, &mut block).unwrap();
        assert_eq!(block[0], 0);
        assert!(block[1..].iter().all(|&c| c == 1));
        decoder.decode_block(&mut br, &mut block).unwrap();
        assert_eq!(block[0], 1);
        assert!(block[1..].iter().all(|&c| c == 0));
    }

    #[test]
    fn run_past_end_of_block() {
        let dc = table(&tables::LUMA_DC);
        let ac = table(&tables::LUMA_AC);
        let mut w = BitWriter::new();
        write_symbol(&mut w, &dc, 0);
        for _ in 0..3 {
            write_symbol(&mut w, &ac, 0xF0);
        }
        // k = 49, run 15 lands on 64.
        write_symbol(&mut w, &ac, 0xF1);
        w.write(1, 1);
        let data = w.finish();

        let mut decoder = ComponentDecoder::new(&dc, &ac);
        let mut br = BitReader::new(&data);
        let mut block = [0; BLOCK_SIZE];
        assert!(matches!(
            decoder.decode_block(&mut br, &mut block),
            Err(Interrupt::Error(Error::CoefficientOverflow(64)))
        ));
    }

    #[test]
    fn dc_category_out_of_range() {
        let mut bits = [0u8; 16];
        bits[0] = 1;
        let dc = CanonicalHuffmanTable::new(&bits, &[12]).unwrap();
        let ac = table(&tables::LUMA_AC);
        let mut decoder = ComponentDecoder::new(&dc, &ac);
        let mut br = BitReader::new(&[0x00, 0x00, 0x00]);
        let mut block = [0; BLOCK_SIZE];
        assert!(matches!(
            decoder.decode_block(&mut br, &mut block),
            Err(Interrupt::Error(Error::InvalidMagnitude(12)))
        ));
    }

    #[test]
    fn restart_inside_block_keeps_prediction() {
        let dc = table(&tables::LUMA_DC);
        let ac = table(&tables::LUMA_AC);
        let mut w = BitWriter::new();
        // A complete block with DC diff 1.
        write_symbol(&mut w, &dc, 1);
        w.write(1, 1);
        write_symbol(&mut w, &ac, 0x00);
        // A block cut short after its DC category: 6 magnitude bits are
        // needed but only 4 padding bits follow.
        write_symbol(&mut w, &dc, 6);
        w.pad_to_byte();
        w.marker(0xD1);
        let data = w.finish();

        let mut decoder = ComponentDecoder::new(&dc, &ac);
        let mut br = BitReader::new(&data);
        let mut block = [0; BLOCK_SIZE];
        decoder.decode_block(&mut br, &mut block).unwrap();
        assert!(matches!(
            decoder.decode_block(&mut br, &mut block),
            Err(Interrupt::Restart(1))
        ));
        assert_eq!(decoder.previous_dc(), 1);
    }
}
