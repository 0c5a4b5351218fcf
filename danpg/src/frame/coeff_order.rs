// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;

/// Natural (row-major) index of the k-th coefficient in zig-zag order
/// (Figure A.6 of ITU-T T.81).
#[rustfmt::skip]
pub const ZIGZAG: [usize; BLOCK_SIZE] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Zig-zag position of each natural index; the inverse of [`ZIGZAG`].
pub const INVERSE_ZIGZAG: [usize; BLOCK_SIZE] = invert(&ZIGZAG);

const fn invert(order: &[usize; BLOCK_SIZE]) -> [usize; BLOCK_SIZE] {
    let mut inverse = [0; BLOCK_SIZE];
    let mut k = 0;
    while k < BLOCK_SIZE {
        inverse[order[k]] = k;
        k += 1;
    }
    inverse
}

/// Reorders 64 values from zig-zag order into natural order.
pub fn zigzag_to_natural<T: Copy + Default>(zigzag: &[T; BLOCK_SIZE]) -> [T; BLOCK_SIZE] {
    let mut natural = [T::default(); BLOCK_SIZE];
    for (k, &value) in zigzag.iter().enumerate() {
        natural[ZIGZAG[k]] = value;
    }
    natural
}

/// Reorders 64 values from natural order into zig-zag order.
pub fn natural_to_zigzag<T: Copy + Default>(natural: &[T; BLOCK_SIZE]) -> [T; BLOCK_SIZE] {
    let mut zigzag = [T::default(); BLOCK_SIZE];
    for (n, &value) in natural.iter().enumerate() {
        zigzag[INVERSE_ZIGZAG[n]] = value;
    }
    zigzag
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn indices_map_to_table() {
        // ITU-T T.81 Figure A.6, read along the scan.
        let annex_a = [
            0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41,
            34, 27, 20, 13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30,
            37, 44, 51, 58, 59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
        ];
        assert_eq!(ZIGZAG, annex_a);
        let identity: [usize; BLOCK_SIZE] = std::array::from_fn(|i| i);
        assert_eq!(natural_to_zigzag(&identity), annex_a);
        for (k, &n) in annex_a.iter().enumerate() {
            assert_eq!(INVERSE_ZIGZAG[n], k);
        }
    }

    #[test]
    fn round_trip_is_identity() {
        let values: [i32; BLOCK_SIZE] = std::array::from_fn(|i| i as i32 * 7 - 100);
        assert_eq!(natural_to_zigzag(&zigzag_to_natural(&values)), values);
        assert_eq!(zigzag_to_natural(&natural_to_zigzag(&values)), values);
        for n in 0..BLOCK_SIZE {
            assert_eq!(ZIGZAG[INVERSE_ZIGZAG[n]], n);
        }
    }

    #[test]
    fn walks_anti_diagonals() {
        // Consecutive entries are neighbours, horizontally, vertically or
        // diagonally.
        for pair in ZIGZAG.windows(2) {
            let (x0, y0) = ((pair[0] % 8) as i32, (pair[0] / 8) as i32);
            let (x1, y1) = ((pair[1] % 8) as i32, (pair[1] / 8) as i32);
            assert!((x0 - x1).abs() <= 1 && (y0 - y1).abs() <= 1);
        }
    }
}
