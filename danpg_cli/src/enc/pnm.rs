// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use danpg::{color::Rgb, image::ImageRect};

fn header(magic: &str, size: (usize, usize)) -> Vec<u8> {
    format!("{magic}\n{} {}\n255\n", size.0, size.1).into_bytes()
}

/// Binary greyscale PNM. Only the red channel is written, which is all there
/// is for a decoded grayscale image.
pub fn to_pgm(img: ImageRect<'_, Rgb>) -> Vec<u8> {
    let mut ret = header("P5", img.size());
    ret.extend(img.iter().map(|p| p.r));
    ret
}

/// Binary RGB PNM.
pub fn to_ppm(img: ImageRect<'_, Rgb>) -> Vec<u8> {
    let mut ret = header("P6", img.size());
    ret.reserve(img.size().0 * img.size().1 * 3);
    ret.extend(img.iter().flat_map(|p| [p.r, p.g, p.b]));
    ret
}

#[cfg(test)]
mod test {
    use super::*;
    use danpg::{error::Result, image::Image};
    use test_log::test;

    #[test]
    fn convert_to_pgm() -> Result<()> {
        let mut image = Image::<Rgb>::new((3, 2))?;
        image.row_mut(1)[2] = Rgb::gray(200);
        let pgm = to_pgm(image.as_rect());
        assert_eq!(pgm, b"P5\n3 2\n255\n\0\0\0\0\0\xc8");
        Ok(())
    }

    #[test]
    fn convert_to_ppm() -> Result<()> {
        let mut image = Image::<Rgb>::new((2, 1))?;
        image.row_mut(0)[0] = Rgb { r: 1, g: 2, b: 3 };
        image.row_mut(0)[1] = Rgb { r: 4, g: 5, b: 6 };
        assert_eq!(to_ppm(image.as_rect()), b"P6\n2 1\n255\n\x01\x02\x03\x04\x05\x06");
        Ok(())
    }

    #[test]
    fn rect_of_image() -> Result<()> {
        let mut image = Image::<Rgb>::new((4, 4))?;
        image.row_mut(1)[1] = Rgb::gray(7);
        let ppm = to_ppm(image.as_rect().rect((1, 1), (1, 1))?);
        assert_eq!(ppm, b"P6\n1 1\n255\n\x07\x07\x07");
        Ok(())
    }
}
