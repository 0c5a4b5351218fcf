// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use danpg_transforms::DataUnit;

use crate::{
    BLOCK_SIZE,
    error::{Error, Result},
    frame::coeff_order::zigzag_to_natural,
};

/// An 8-bit quantization table, stored in natural order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTable {
    values: [u16; BLOCK_SIZE],
}

impl QuantTable {
    /// Builds a table from values in natural order.
    pub fn new(values: [u16; BLOCK_SIZE]) -> Self {
        Self { values }
    }

    /// Builds a table from the 64 bytes of a DQT entry, which are in zig-zag
    /// order.
    pub fn from_zigzag_bytes(data: &[u8]) -> Result<Self> {
        let Some(bytes) = data.get(..BLOCK_SIZE) else {
            return Err(Error::QuantTableTooShort(data.len()));
        };
        let mut zigzag = [0u16; BLOCK_SIZE];
        for (q, &b) in zigzag.iter_mut().zip(bytes) {
            *q = b as u16;
        }
        Ok(Self::new(zigzag_to_natural(&zigzag)))
    }

    /// Values in natural order.
    pub fn values(&self) -> &[u16; BLOCK_SIZE] {
        &self.values
    }

    /// Multiplies each coefficient, in natural order, by its quantization step.
    pub fn dequantize(&self, block: &mut DataUnit) {
        for (c, &q) in block.iter_mut().zip(self.values.iter()) {
            *c = c.wrapping_mul(q as i32);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::coeff_order::ZIGZAG;
    use test_log::test;

    #[test]
    fn dequantize_in_natural_order() {
        let bytes: Vec<u8> = (1..=64).collect();
        let table = QuantTable::from_zigzag_bytes(&bytes).unwrap();
        // The k-th byte lands at natural index ZIGZAG[k].
        for (k, &n) in ZIGZAG.iter().enumerate() {
            assert_eq!(table.values()[n], k as u16 + 1);
        }
        let mut block = [0; BLOCK_SIZE];
        block[0] = -26;
        block[1] = 3;
        block[8] = -2;
        block[2] = 1;
        table.dequantize(&mut block);
        assert_eq!(block[0], -26);
        assert_eq!(block[1], 6);
        assert_eq!(block[8], -6);
        assert_eq!(block[2], 6);
        assert!(block[3..8].iter().all(|&c| c == 0));
    }

    #[test]
    fn short_table() {
        assert!(matches!(
            QuantTable::from_zigzag_bytes(&[1; 63]),
            Err(Error::QuantTableTooShort(63))
        ));
    }
}
