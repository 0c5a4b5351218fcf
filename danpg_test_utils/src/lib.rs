// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Helpers shared by the test suites of the workspace crates: approximate
//! comparison macros and [`JpegWriter`], a small baseline encoder that builds
//! decoder inputs from explicit quantized coefficients.

mod bit_writer;
mod jpeg_writer;
pub mod tables;

pub use bit_writer::BitWriter;
pub use jpeg_writer::*;

#[macro_export]
macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                let diff = if *left_val > *right_val {
                    *left_val - *right_val
                } else {
                    *right_val - *left_val
                };
                if !(diff <= $max_error) {
                    panic!(
                        "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n max_error: `{:?}`",
                        left_val, right_val, $max_error
                    );
                }
            }
        }
    };
}

/// Element-wise [`assert_almost_eq!`] over two slices of equal length.
#[macro_export]
macro_rules! assert_all_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                assert_eq!(left_val.len(), right_val.len(), "length mismatch");
                for (index, (l, r)) in left_val.iter().zip(right_val.iter()).enumerate() {
                    let diff = if *l > *r { *l - *r } else { *r - *l };
                    if !(diff <= $max_error) {
                        panic!(
                            "assertion failed at index {}: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n max_error: `{:?}`",
                            index, l, r, $max_error
                        );
                    }
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use test_log::test;

    #[test]
    fn floats_within_tolerance() {
        assert_almost_eq!(1.0000001f64, 1.0000002, 0.000001);
        assert_almost_eq!(1.0, 1.1, 0.2);
    }

    #[test]
    fn integers_within_tolerance() {
        assert_almost_eq!(100, 101, 2);
        assert_almost_eq!(255u8, 254, 1);
        assert_almost_eq!(-49i32, -50, 1);
    }

    #[test]
    fn slices_within_tolerance() {
        assert_all_almost_eq!([1, 2, 3], [2, 2, 2], 1);
        assert_all_almost_eq!(vec![0.5f64, 0.25], vec![0.5, 0.26], 0.02);
    }

    #[test]
    fn out_of_tolerance_panics() {
        use std::panic;
        let result = panic::catch_unwind(|| {
            assert_almost_eq!(1.0, 1.2, 0.1);
        });
        assert!(result.is_err());

        let result = panic::catch_unwind(|| {
            assert_almost_eq!(100, 105, 2);
        });
        assert!(result.is_err());

        let result = panic::catch_unwind(|| {
            assert_all_almost_eq!([0u8, 10], [0u8, 13], 2);
        });
        assert!(result.is_err());
    }
}
