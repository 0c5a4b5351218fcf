// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    error::{EntropyResult, Error, Interrupt},
    util::tracing_wrappers::*,
};

pub const MAX_BITS_PER_CALL: u32 = 16;

// Refill stops once this many bits are buffered, so the buffer never holds
// more than 31.
const REFILL_TARGET: u32 = 24;

/// Where the buffered bits end, once refilling has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// `RSTn` was consumed; the payload is the marker number.
    Restart(u8),
    /// Any other marker. Its bytes are left in place.
    Marker(u8),
    EndOfData,
}

/// Reads MSB-first bit fields from entropy-coded JPEG data.
///
/// Stuffed `0xFF 0x00` pairs are delivered as a single `0xFF` byte. A marker
/// stops refilling: bits buffered before it stay readable, while any read
/// that would need bits past it fails with [`Interrupt::Restart`] for
/// `RST0`..`RST7`, [`Error::UnexpectedMarker`] for anything else, and
/// [`Error::BitstreamExhausted`] when the data simply ends.
#[derive(Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    offset: usize,
    bit_buf: u32,
    bits_in_buf: u32,
    boundary: Option<Boundary>,
    marker_offset: usize,
}

impl Debug for BitReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ data: [{} bytes], offset: {}, bit_buf: {:0width$b}, boundary: {:?} }}",
            self.data.len(),
            self.offset,
            self.bit_buf,
            self.boundary,
            width = self.bits_in_buf as usize
        )
    }
}

impl<'a> BitReader<'a> {
    /// Constructs a BitReader over entropy-coded data starting at `data[0]`.
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            offset: 0,
            bit_buf: 0,
            bits_in_buf: 0,
            boundary: None,
            marker_offset: 0,
        }
    }

    fn push_byte(&mut self, byte: u8) {
        self.bit_buf = (self.bit_buf << 8) | byte as u32;
        self.bits_in_buf += 8;
    }

    fn refill(&mut self) {
        while self.bits_in_buf < REFILL_TARGET && self.boundary.is_none() {
            let Some(&byte) = self.data.get(self.offset) else {
                self.boundary = Some(Boundary::EndOfData);
                self.marker_offset = self.offset;
                break;
            };
            if byte != 0xFF {
                self.push_byte(byte);
                self.offset += 1;
                continue;
            }
            match self.data.get(self.offset + 1) {
                Some(0x00) => {
                    self.push_byte(0xFF);
                    self.offset += 2;
                }
                // Fill byte preceding a marker.
                Some(0xFF) => self.offset += 1,
                Some(&code @ 0xD0..=0xD7) => {
                    trace!(offset = self.offset, "restart marker rst{}", code - 0xD0);
                    self.boundary = Some(Boundary::Restart(code - 0xD0));
                    self.marker_offset = self.offset;
                    self.offset += 2;
                }
                Some(&code) => {
                    self.boundary = Some(Boundary::Marker(code));
                    self.marker_offset = self.offset;
                }
                None => {
                    self.boundary = Some(Boundary::EndOfData);
                    self.marker_offset = self.offset;
                }
            }
        }
    }

    /// The reason no more bits can be buffered.
    pub(crate) fn boundary_interrupt(&self) -> Interrupt {
        match self.boundary {
            Some(Boundary::Restart(n)) => Interrupt::Restart(n),
            Some(Boundary::Marker(code)) => Error::UnexpectedMarker(code, self.marker_offset).into(),
            Some(Boundary::EndOfData) | None => Error::BitstreamExhausted.into(),
        }
    }

    /// Number of bits that can be read before the next boundary, capped at
    /// the size of the internal buffer.
    pub fn bits_available(&mut self) -> u32 {
        self.refill();
        self.bits_in_buf
    }

    /// Returns the next `num` bits without consuming them. Missing bits past a
    /// marker or the end of the data read as zero.
    /// ```
    /// # use danpg::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0xA5]);
    /// assert_eq!(br.peek(4), 0b1010);
    /// assert_eq!(br.peek(12), 0b1010_0101_0000);
    /// ```
    pub fn peek(&mut self, num: u32) -> u32 {
        debug_assert!(num <= MAX_BITS_PER_CALL);
        self.refill();
        let mask = (1u32 << num) - 1;
        if self.bits_in_buf >= num {
            (self.bit_buf >> (self.bits_in_buf - num)) & mask
        } else {
            (self.bit_buf << (num - self.bits_in_buf)) & mask
        }
    }

    /// Advances by `num` bits. Fails like [`BitReader::read`] when fewer are
    /// available.
    pub fn consume(&mut self, num: u32) -> EntropyResult<()> {
        self.refill();
        if self.bits_in_buf < num {
            return Err(self.boundary_interrupt());
        }
        self.bits_in_buf -= num;
        self.bit_buf &= (1u32 << self.bits_in_buf) - 1;
        Ok(())
    }

    /// Reads `num` bits, `num` in `0..=16`, most significant bit first.
    /// ```
    /// # use danpg::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0x94, 0xFF, 0x00]);
    /// assert_eq!(br.read(3)?, 0b100);
    /// assert_eq!(br.read(3)?, 0b101);
    /// assert_eq!(br.read(10)?, 0b00_1111_1111);
    /// assert!(br.read(1).is_err());
    /// # Ok::<(), danpg::error::Interrupt>(())
    /// ```
    pub fn read(&mut self, num: u32) -> EntropyResult<u32> {
        let ret = self.peek(num);
        self.consume(num)?;
        Ok(ret)
    }

    /// Drops all buffered bits and any pending marker. Reading resumes at the
    /// first byte after the last consumed restart marker.
    pub fn reset(&mut self) {
        self.bit_buf = 0;
        self.bits_in_buf = 0;
        self.boundary = None;
    }

    /// Byte offset of the first byte not yet loaded into the bit buffer. When
    /// reading stopped at a marker other than `RSTn`, this is the offset of
    /// that marker's `0xFF`.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// The marker that stopped refilling, if it is not a restart marker.
    pub fn pending_marker(&self) -> Option<u8> {
        match self.boundary {
            Some(Boundary::Marker(code)) => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    fn expect_restart(result: EntropyResult<u32>, expected: u8) {
        match result {
            Err(Interrupt::Restart(n)) => assert_eq!(n, expected),
            other => panic!("expected restart {expected}, got {other:?}"),
        }
    }

    #[test]
    fn reads_msb_first() {
        let mut br = BitReader::new(&[0b1100_1010, 0b0101_0011]);
        assert_eq!(br.read(1).unwrap(), 1);
        assert_eq!(br.read(2).unwrap(), 0b10);
        assert_eq!(br.read(7).unwrap(), 0b01010_01);
        assert_eq!(br.read(6).unwrap(), 0b01_0011);
    }

    #[test]
    fn sixteen_bit_reads() {
        let mut br = BitReader::new(&[0x12, 0x34, 0x56, 0x78, 0x9A]);
        assert_eq!(br.read(4).unwrap(), 0x1);
        assert_eq!(br.read(16).unwrap(), 0x2345);
        assert_eq!(br.read(16).unwrap(), 0x6789);
        assert_eq!(br.read(4).unwrap(), 0xA);
    }

    #[test]
    fn stuffed_byte_is_one_data_byte() {
        let mut br = BitReader::new(&[0xFF, 0x00, 0x12]);
        assert_eq!(br.read(8).unwrap(), 0xFF);
        assert_eq!(br.read(8).unwrap(), 0x12);
        assert_eq!(br.position(), 3);
    }

    #[test]
    fn peek_does_not_advance() {
        let mut br = BitReader::new(&[0xF0, 0x0F]);
        assert_eq!(br.peek(8), 0xF0);
        assert_eq!(br.peek(16), 0xF00F);
        assert_eq!(br.read(4).unwrap(), 0xF);
        assert_eq!(br.peek(8), 0x00);
    }

    #[test]
    fn peek_zero_pads_at_end() {
        let mut br = BitReader::new(&[0xAB]);
        assert_eq!(br.peek(16), 0xAB00);
        assert_eq!(br.read(8).unwrap(), 0xAB);
        assert_eq!(br.peek(16), 0);
    }

    #[test]
    fn exhausted() {
        let mut br = BitReader::new(&[0xAB]);
        assert_eq!(br.read(6).unwrap(), 0b101010);
        assert!(matches!(
            br.read(3),
            Err(Interrupt::Error(Error::BitstreamExhausted))
        ));
        // The failed read consumed nothing.
        assert_eq!(br.read(2).unwrap(), 0b11);
    }

    #[test]
    fn restart_boundary() {
        let mut br = BitReader::new(&[0xA5, 0xFF, 0xD3, 0x3C]);
        assert_eq!(br.read(4).unwrap(), 0xA);
        // Spans the marker.
        expect_restart(br.read(8), 3);
        // Bits before the marker are still readable.
        assert_eq!(br.read(4).unwrap(), 0x5);
        // Nothing after it is, until reset.
        expect_restart(br.read(1), 3);
        assert_eq!(br.peek(8), 0);
        assert_eq!(br.position(), 3);
        br.reset();
        assert_eq!(br.read(8).unwrap(), 0x3C);
    }

    #[test]
    fn restart_marker_contributes_no_bits() {
        let mut br = BitReader::new(&[0xFF, 0xD0, 0x81]);
        expect_restart(br.read(1), 0);
        br.reset();
        assert_eq!(br.read(8).unwrap(), 0x81);
    }

    #[test]
    fn unexpected_marker() {
        let mut br = BitReader::new(&[0x12, 0xFF, 0xA3, 0x00]);
        assert_eq!(br.read(8).unwrap(), 0x12);
        assert!(matches!(
            br.read(1),
            Err(Interrupt::Error(Error::UnexpectedMarker(0xA3, 1)))
        ));
        assert_eq!(br.pending_marker(), Some(0xA3));
        assert_eq!(br.position(), 1);
    }

    #[test]
    fn fill_bytes_before_marker() {
        let mut br = BitReader::new(&[0x12, 0xFF, 0xFF, 0xFF, 0xD9]);
        assert_eq!(br.read(8).unwrap(), 0x12);
        assert!(matches!(
            br.read(8),
            Err(Interrupt::Error(Error::UnexpectedMarker(0xD9, 3)))
        ));
    }

    #[test]
    fn buffer_stays_below_32_bits() {
        let data = [0x55; 64];
        let mut br = BitReader::new(&data);
        for _ in 0..100 {
            assert!(br.bits_available() < 32);
            br.read(5).unwrap();
        }
    }

    #[test]
    fn arbitrary_input_never_panics() {
        arbtest::arbtest(|u| {
            let data: Vec<u8> = u.arbitrary()?;
            let mut br = BitReader::new(&data);
            for _ in 0..64 {
                let num = u.int_in_range(0..=16)?;
                match br.read(num) {
                    Ok(v) => assert!(v < (1 << num)),
                    Err(Interrupt::Restart(n)) => {
                        assert!(n < 8);
                        br.reset();
                    }
                    Err(Interrupt::Error(_)) => break,
                }
                assert!(br.position() <= data.len());
            }
            Ok(())
        });
    }
}
