// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    bit_reader::BitReader,
    error::{EntropyResult, Error, Result},
};

pub const HUFFMAN_MAX_BITS: usize = 16;
const LOOKUP_SIZE: usize = 1 << HUFFMAN_MAX_BITS;

#[derive(Clone, Copy, Default, PartialEq, Eq)]
struct LookupEntry {
    // 0 marks a prefix that matches no code.
    length: u8,
    symbol: u8,
}

/// A canonical Huffman table built from the `BITS`/`HUFFVAL` arrays of a DHT
/// segment, following Annex C of ITU-T T.81.
///
/// Decoding goes through a flat table indexed by the next 16 bits of input.
#[derive(Clone)]
pub struct CanonicalHuffmanTable {
    bits: [u8; HUFFMAN_MAX_BITS],
    huffval: Vec<u8>,
    huffsize: Vec<u8>,
    huffcode: Vec<u16>,
    lookup: Box<[LookupEntry]>,
}

impl Debug for CanonicalHuffmanTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalHuffmanTable")
            .field("bits", &self.bits)
            .field("huffval", &self.huffval)
            .finish_non_exhaustive()
    }
}

/// Expands code counts into one code length per symbol, followed by a 0.
fn generate_sizes(bits: &[u8; HUFFMAN_MAX_BITS]) -> Vec<u8> {
    let mut huffsize = Vec::with_capacity(bits.iter().map(|&b| b as usize).sum::<usize>() + 1);
    for (length, &count) in (1u8..).zip(bits.iter()) {
        huffsize.extend(std::iter::repeat_n(length, count as usize));
    }
    huffsize.push(0);
    huffsize
}

/// Assigns consecutive code values within each length, doubling the next code
/// whenever the length grows.
fn generate_codes(huffsize: &[u8]) -> Result<Vec<u16>> {
    let mut huffcode = Vec::with_capacity(huffsize.len().saturating_sub(1));
    let mut code = 0u32;
    let mut size = huffsize[0];
    let mut k = 0;
    while huffsize[k] != 0 {
        while huffsize[k] == size {
            huffcode.push(code as u16);
            code += 1;
            k += 1;
        }
        // Every code of the current length must fit in `size` bits.
        if code > 1 << size {
            return Err(Error::HuffmanTableOversubscribed(size as usize));
        }
        if huffsize[k] == 0 {
            break;
        }
        while huffsize[k] != size {
            code <<= 1;
            size += 1;
        }
    }
    Ok(huffcode)
}

impl CanonicalHuffmanTable {
    /// Builds a table from the 16 code counts and the symbol values.
    /// ```
    /// # use danpg::entropy_coding::huffman::CanonicalHuffmanTable;
    /// let table = CanonicalHuffmanTable::new(&[0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0], &[
    ///     0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11,
    /// ])?;
    /// assert_eq!(table.huffcode()[6], 0b1110);
    /// # Ok::<(), danpg::error::Error>(())
    /// ```
    pub fn new(bits: &[u8; HUFFMAN_MAX_BITS], huffval: &[u8]) -> Result<Self> {
        let huffsize = generate_sizes(bits);
        let count = huffsize.len() - 1;
        if huffval.len() < count {
            return Err(Error::HuffmanTableTooShort(count, huffval.len()));
        }
        let huffval = huffval[..count].to_vec();
        let huffcode = generate_codes(&huffsize)?;

        let mut lookup = vec![LookupEntry::default(); LOOKUP_SIZE].into_boxed_slice();
        for ((&length, &code), &symbol) in huffsize.iter().zip(huffcode.iter()).zip(huffval.iter())
        {
            let shift = HUFFMAN_MAX_BITS - length as usize;
            let first = (code as usize) << shift;
            lookup[first..first + (1 << shift)].fill(LookupEntry { length, symbol });
        }

        Ok(Self {
            bits: *bits,
            huffval,
            huffsize,
            huffcode,
            lookup,
        })
    }

    /// Builds a table from a DHT payload with the class/destination byte
    /// already removed. Returns the table and the number of bytes used.
    pub fn from_dht_payload(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < HUFFMAN_MAX_BITS {
            return Err(Error::HuffmanTableTooShort(HUFFMAN_MAX_BITS, data.len()));
        }
        let mut bits = [0u8; HUFFMAN_MAX_BITS];
        bits.copy_from_slice(&data[..HUFFMAN_MAX_BITS]);
        let table = Self::new(&bits, &data[HUFFMAN_MAX_BITS..])?;
        let used = HUFFMAN_MAX_BITS + table.huffval.len();
        Ok((table, used))
    }

    pub fn bits(&self) -> &[u8; HUFFMAN_MAX_BITS] {
        &self.bits
    }

    pub fn huffval(&self) -> &[u8] {
        &self.huffval
    }

    /// Code length per symbol, in `huffval` order, with a trailing 0.
    pub fn huffsize(&self) -> &[u8] {
        &self.huffsize
    }

    pub fn huffcode(&self) -> &[u16] {
        &self.huffcode
    }

    /// Decodes one symbol.
    ///
    /// Bits that match no code fail with [`Error::HuffmanDecodeFailure`],
    /// unless fewer than 16 bits remain before a boundary: the match may then
    /// have been caused by the zero padding of [`BitReader::peek`], and the
    /// boundary itself (typically a restart marker after 1-bit padding) is
    /// reported instead.
    #[inline]
    pub fn decode(&self, br: &mut BitReader) -> EntropyResult<u8> {
        let entry = self.lookup[br.peek(HUFFMAN_MAX_BITS as u32) as usize];
        if entry.length == 0 {
            if br.bits_available() < HUFFMAN_MAX_BITS as u32 {
                return Err(br.boundary_interrupt());
            }
            return Err(Error::HuffmanDecodeFailure.into());
        }
        br.consume(entry.length as u32)?;
        Ok(entry.symbol)
    }
}
