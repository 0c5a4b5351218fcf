// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! YCbCr to RGB conversion as defined by JFIF.

const CR_TO_R: f64 = 1.402;
const CB_TO_G: f64 = 0.344136;
const CR_TO_G: f64 = 0.714136;
const CB_TO_B: f64 = 1.772;

/// A decoded sample triple, each channel centred at zero (the range of the
/// inverse DCT output).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ycbcr {
    pub y: i32,
    pub cb: i32,
    pub cr: i32,
}

/// An 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn gray(value: u8) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
        }
    }
}

/// Undoes the level shift, saturates to `0..=255` and truncates.
#[inline]
fn level_shift_and_clamp(value: f64) -> u8 {
    (value + 128.0).clamp(0.0, 255.0) as u8
}

/// Converts one triple.
/// ```
/// # use danpg::color::{Rgb, Ycbcr, ycbcr_to_rgb};
/// let rgb = ycbcr_to_rgb(Ycbcr { y: -49, cb: -14, cr: 14 });
/// assert_eq!(rgb, Rgb { r: 98, g: 73, b: 54 });
/// ```
#[inline]
pub fn ycbcr_to_rgb(c: Ycbcr) -> Rgb {
    let y = f64::from(c.y);
    let cb = f64::from(c.cb);
    let cr = f64::from(c.cr);
    Rgb {
        r: level_shift_and_clamp(y + CR_TO_R * cr),
        g: level_shift_and_clamp(y - CB_TO_G * cb - CR_TO_G * cr),
        b: level_shift_and_clamp(y + CB_TO_B * cb),
    }
}

impl Ycbcr {
    pub fn to_rgb(self) -> Rgb {
        ycbcr_to_rgb(self)
    }
}

/// Converts a run of triples; `output` must be at least as long as `input`.
pub fn ycbcr_to_rgb_row(input: &[Ycbcr], output: &mut [Rgb]) {
    for (o, &i) in output.iter_mut().zip(input) {
        *o = ycbcr_to_rgb(i);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn known_value() {
        assert_eq!(
            Ycbcr {
                y: -49,
                cb: -14,
                cr: 14
            }
            .to_rgb(),
            Rgb {
                r: 98,
                g: 73,
                b: 54
            }
        );
    }

    #[test]
    fn neutral_chroma_is_gray() {
        for y in -128..128 {
            let rgb = ycbcr_to_rgb(Ycbcr { y, cb: 0, cr: 0 });
            assert_eq!(rgb, Rgb::gray((y + 128) as u8));
        }
    }

    #[test]
    fn saturates() {
        let white = ycbcr_to_rgb(Ycbcr {
            y: 300,
            cb: 0,
            cr: 0,
        });
        assert_eq!(white, Rgb::gray(255));
        let black = ycbcr_to_rgb(Ycbcr {
            y: -300,
            cb: 0,
            cr: 0,
        });
        assert_eq!(black, Rgb::gray(0));
        let red = ycbcr_to_rgb(Ycbcr {
            y: 0,
            cb: 0,
            cr: 127,
        });
        assert_eq!(red.r, 255);
        assert_eq!(red.b, 128);
    }

    #[test]
    fn truncates_toward_zero() {
        // 128 + 1.402 = 129.402
        let rgb = ycbcr_to_rgb(Ycbcr { y: 0, cb: 0, cr: 1 });
        assert_eq!(rgb.r, 129);
        // 128 - 0.714136 = 127.285864
        assert_eq!(rgb.g, 127);
    }

    #[test]
    fn row_conversion() {
        let input = [
            Ycbcr { y: 0, cb: 0, cr: 0 },
            Ycbcr {
                y: -49,
                cb: -14,
                cr: 14,
            },
        ];
        let mut output = [Rgb::default(); 2];
        ycbcr_to_rgb_row(&input, &mut output);
        assert_eq!(output[0], Rgb::gray(128));
        assert_eq!(output[1], Rgb { r: 98, g: 73, b: 54 });
    }
}
