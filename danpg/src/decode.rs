// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    color::Rgb,
    error::{Error, Result},
    frame::ScanDecoder,
    headers::{
        FrameHeader, Jfif, ScanHeader, SegmentReader, Tables,
        markers::{Marker, SOI, SOS},
        read_restart_interval,
    },
    image::Image,
    options::{DecoderLimits, DecoderOptions},
    util::tracing_wrappers::*,
};

/// A fully decoded image.
#[derive(Debug)]
pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    /// Number of components in the frame: 1 for grayscale, 3 for YCbCr.
    pub components: usize,
    pub jfif: Option<Jfif>,
    pub pixels: Image<Rgb>,
}

/// Finds the next marker at or after `pos`, skipping fill bytes and any
/// stray bytes. Returns the offset of the `0xFF` right before the marker
/// code, and the code.
fn next_marker(data: &[u8], mut pos: usize) -> Option<(usize, u8)> {
    while pos + 1 < data.len() {
        if data[pos] == 0xFF {
            match data[pos + 1] {
                0x00 | 0xFF => {}
                code => return Some((pos, code)),
            }
        }
        pos += 1;
    }
    None
}

fn check_limits(frame: &FrameHeader, limits: &DecoderLimits) -> Result<()> {
    let (width, height) = frame.size();
    let pixels = width * height;
    if let Some(max_pixels) = limits.max_pixels {
        if pixels > max_pixels {
            return Err(Error::ImageSizeTooLarge(pixels, max_pixels));
        }
    }
    Ok(())
}

/// Decodes a baseline JPEG file with the default options.
pub fn decode(data: &[u8]) -> Result<DecodedImage> {
    decode_with_options(data, &DecoderOptions::default())
}

/// Decodes a baseline JPEG file: a single sequential Huffman-coded frame of
/// one or three 8-bit components, stored in a single interleaved scan.
#[instrument(skip_all, err)]
pub fn decode_with_options(data: &[u8], options: &DecoderOptions) -> Result<DecodedImage> {
    match data {
        [0xFF, SOI, ..] => {}
        [a, b, ..] => return Err(Error::InvalidSoi(*a, *b)),
        _ => return Err(Error::InvalidSoi(data.first().copied().unwrap_or(0), 0)),
    }
    let idct = options.idct.create();
    let mut tables = Tables::new();
    let mut restart_interval = 0;
    let mut jfif = None;
    let mut frame: Option<FrameHeader> = None;
    let mut pixels: Option<Image<Rgb>> = None;
    let mut found_eoi = false;
    let mut pos = 2;

    while let Some((marker_pos, code)) = next_marker(data, pos) {
        if marker_pos != pos {
            debug!(skipped = marker_pos - pos, "bytes before marker");
        }
        pos = marker_pos + 2;
        let marker = Marker::from_code(code);
        if !marker.has_payload() {
            match marker {
                Marker::Eoi => {
                    found_eoi = true;
                    break;
                }
                Marker::Soi => return Err(Error::UnexpectedMarker(code, marker_pos)),
                _ => {
                    debug!("skipping standalone marker ff{code:02x}");
                    continue;
                }
            }
        }

        let (mut seg, length) = SegmentReader::from_stream(code, &data[pos..])?;
        pos += length;
        trace!("segment ff{code:02x} at {marker_pos}, {length} bytes");
        match marker {
            Marker::App(0) if jfif.is_none() => jfif = Jfif::read(&mut seg)?,
            Marker::App(_) => debug!(code, length, "skipping APPn segment"),
            Marker::Com => debug!(length, "skipping comment"),
            Marker::Dqt => tables.read_dqt(&mut seg)?,
            Marker::Dht => tables.read_dht(&mut seg)?,
            Marker::Dri => {
                restart_interval = read_restart_interval(&mut seg)?;
                debug!(restart_interval, "restart interval");
            }
            Marker::Sof(code) => {
                if frame.is_some() {
                    // Only hierarchical files have more than one frame.
                    return Err(Error::UnsupportedFrameType(code));
                }
                let header = FrameHeader::read(code, &mut seg)?;
                check_limits(&header, &options.limits)?;
                frame = Some(header);
            }
            Marker::Sos => {
                let frame = frame.as_ref().ok_or(Error::MissingFrameHeader(SOS))?;
                if pixels.is_some() {
                    return Err(Error::MultipleScans);
                }
                let scan = ScanHeader::read(&mut seg, frame)?;
                let mut image = Image::new(frame.size())?;
                let mut decoder =
                    ScanDecoder::new(frame, &scan, &tables, restart_interval, &*idct)?;
                let used = decoder
                    .decode(&data[pos..], &mut image)
                    .map_err(|e| match e {
                        Error::UnexpectedMarker(code, offset) => {
                            Error::UnexpectedMarker(code, pos + offset)
                        }
                        e => e,
                    })?;
                pos += used;
                pixels = Some(image);
            }
            _ => debug!("skipping segment ff{code:02x}"),
        }
    }

    let (Some(frame), Some(pixels)) = (frame, pixels) else {
        return Err(Error::MissingScan);
    };
    if !found_eoi {
        warn!("missing EOI marker");
    }
    let (width, height) = frame.size();
    Ok(DecodedImage {
        width,
        height,
        components: frame.components.len(),
        jfif,
        pixels,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn finds_markers() {
        let data = [0x00, 0xFF, 0x00, 0x12, 0xFF, 0xFF, 0xFF, 0xD9, 0x00];
        assert_eq!(next_marker(&data, 0), Some((6, 0xD9)));
        assert_eq!(next_marker(&data, 7), None);
        assert_eq!(next_marker(&[0xFF], 0), None);
    }

    #[test]
    fn bad_signature() {
        assert!(matches!(decode(&[]), Err(Error::InvalidSoi(0, 0))));
        assert!(matches!(
            decode(&[0x89, 0x50, 0x4E, 0x47]),
            Err(Error::InvalidSoi(0x89, 0x50))
        ));
    }

    #[test]
    fn no_frame() {
        assert!(matches!(
            decode(&[0xFF, 0xD8, 0xFF, 0xD9]),
            Err(Error::MissingScan)
        ));
        assert!(matches!(
            decode(&[0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02]),
            Err(Error::MissingFrameHeader(SOS))
        ));
    }

    #[test]
    fn pixel_limit() {
        let sof = [
            0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x0B, 8, 0x10, 0x00, 0x10, 0x00, 1, 1, 0x11, 0,
        ];
        let options = DecoderOptions {
            limits: DecoderLimits {
                max_pixels: Some(1 << 20),
            },
            ..Default::default()
        };
        assert!(matches!(
            decode_with_options(&sof, &options),
            Err(Error::ImageSizeTooLarge(0x100_0000, 0x10_0000))
        ));
    }
}
