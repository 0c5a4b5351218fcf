// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// MSB-first bit writer for entropy-coded segments. Every emitted `0xFF` is
/// followed by a stuffed `0x00`.
#[derive(Debug, Default)]
pub struct BitWriter {
    output: Vec<u8>,
    buf: u32,
    bits_in_buf: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the low `count` bits of `value`, `count` in `0..=16`.
    pub fn write(&mut self, value: u32, count: u32) {
        assert!(count <= 16);
        if count == 0 {
            return;
        }
        self.buf = (self.buf << count) | (value & ((1 << count) - 1));
        self.bits_in_buf += count;
        while self.bits_in_buf >= 8 {
            self.bits_in_buf -= 8;
            let byte = (self.buf >> self.bits_in_buf) as u8;
            self.emit(byte);
        }
        self.buf &= (1 << self.bits_in_buf) - 1;
    }

    /// Pads the current byte with 1 bits.
    pub fn pad_to_byte(&mut self) {
        if self.bits_in_buf > 0 {
            let remaining = 8 - self.bits_in_buf;
            self.write((1 << remaining) - 1, remaining);
        }
    }

    /// Appends a marker; the caller must have padded to a byte boundary.
    pub fn marker(&mut self, code: u8) {
        assert_eq!(self.bits_in_buf, 0);
        self.output.push(0xFF);
        self.output.push(code);
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.pad_to_byte();
        self.output
    }

    fn emit(&mut self, byte: u8) {
        self.output.push(byte);
        if byte == 0xFF {
            self.output.push(0x00);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn msb_first() {
        let mut w = BitWriter::new();
        w.write(0b101, 3);
        w.write(0b00101, 5);
        assert_eq!(w.finish(), vec![0xA5]);
    }

    #[test]
    fn pads_with_ones() {
        let mut w = BitWriter::new();
        w.write(0, 2);
        assert_eq!(w.finish(), vec![0x3F]);
    }

    #[test]
    fn stuffs_ff() {
        let mut w = BitWriter::new();
        w.write(0xFFF, 12);
        w.write(0x0, 4);
        assert_eq!(w.finish(), vec![0xFF, 0x00, 0xF0]);
    }

    #[test]
    fn restart_marker_between_bits() {
        let mut w = BitWriter::new();
        w.write(0, 1);
        w.pad_to_byte();
        w.marker(0xD0);
        w.write(0x1, 1);
        assert_eq!(w.finish(), vec![0x7F, 0xFF, 0xD0, 0xFF, 0x00]);
    }
}
