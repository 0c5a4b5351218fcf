// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// A bounds-checked cursor over the payload of one marker segment (the bytes
/// after the length field). Every read past the end fails with
/// [`Error::SegmentTruncated`].
#[derive(Debug, Clone)]
pub struct SegmentReader<'a> {
    marker: u8,
    data: &'a [u8],
    pos: usize,
}

impl<'a> SegmentReader<'a> {
    pub fn new(marker: u8, data: &'a [u8]) -> Self {
        Self {
            marker,
            data,
            pos: 0,
        }
    }

    /// Splits the segment starting at `data[0]`, which must be the first byte
    /// of the length field, off the rest of the stream. Returns the reader and
    /// the total number of bytes the segment occupies, length field included.
    pub fn from_stream(marker: u8, data: &'a [u8]) -> Result<(Self, usize)> {
        if data.len() < 2 {
            return Err(Error::SegmentTruncated(marker));
        }
        let length = BigEndian::read_u16(data) as usize;
        if length < 2 {
            return Err(Error::InvalidSegmentLength(marker, length));
        }
        let payload = data.get(2..length).ok_or(Error::SegmentTruncated(marker))?;
        Ok((Self::new(marker, payload), length))
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(Error::SegmentTruncated(self.marker))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads a byte holding two 4-bit fields, high nibble first.
    pub fn read_nibbles(&mut self) -> Result<(u8, u8)> {
        let byte = self.read_u8()?;
        Ok((byte >> 4, byte & 0x0F))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_bytes(&mut self, num: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(num)
            .ok_or(Error::SegmentTruncated(self.marker))?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(Error::SegmentTruncated(self.marker))?;
        self.pos = end;
        Ok(bytes)
    }

    /// The unread part of the payload, without consuming it.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn skip(&mut self, num: usize) -> Result<()> {
        self.read_bytes(num).map(|_| ())
    }

    /// Fails unless every byte of the payload has been read.
    pub fn expect_end(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidSegmentLength(self.marker, self.data.len() + 2))
        }
    }
}
