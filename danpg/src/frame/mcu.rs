// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use danpg_transforms::{DataUnit, InverseDct, is_zero_block};

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    bit_reader::BitReader,
    color::{Rgb, Ycbcr, ycbcr::ycbcr_to_rgb_row},
    entropy_coding::decode::ComponentDecoder,
    error::{EntropyResult, Error, Interrupt, Result},
    frame::quantizer::QuantTable,
    headers::{FrameHeader, ScanHeader, Tables, tables::TableClass},
    image::Image,
    util::tracing_wrappers::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Y,
    Cb,
    Cr,
}

impl Channel {
    // Frames have at most three components, in Y, Cb, Cr order.
    fn for_component(component_idx: usize) -> Channel {
        match component_idx {
            0 => Channel::Y,
            1 => Channel::Cb,
            _ => Channel::Cr,
        }
    }

    #[inline]
    fn set(self, pixel: &mut Ycbcr, value: i32) {
        match self {
            Channel::Y => pixel.y = value,
            Channel::Cb => pixel.cb = value,
            Channel::Cr => pixel.cr = value,
        }
    }
}

#[derive(Debug)]
struct ComponentState<'a> {
    decoder: ComponentDecoder<'a>,
    quant: &'a QuantTable,
    channel: Channel,
    /// Data units per MCU, horizontally and vertically.
    blocks: (usize, usize),
    pixels_per_sample: (usize, usize),
}

/// Writes the samples of one data unit into the MCU buffer, replicating each
/// sample over `pixels_per_sample` pixels.
fn place_block(
    mcu: &mut Image<Ycbcr>,
    block: &DataUnit,
    channel: Channel,
    origin: (usize, usize),
    pixels_per_sample: (usize, usize),
) {
    let (sx, sy) = pixels_per_sample;
    for (y, samples) in block.chunks_exact(BLOCK_DIM).enumerate() {
        for dy in 0..sy {
            let row = &mut mcu.row_mut(origin.1 + y * sy + dy)[origin.0..origin.0 + BLOCK_DIM * sx];
            for (pixels, &sample) in row.chunks_exact_mut(sx).zip(samples) {
                for pixel in pixels {
                    channel.set(pixel, sample);
                }
            }
        }
    }
}

/// Decodes the entropy-coded data of one interleaved scan into RGB pixels.
///
/// MCUs are decoded in raster order. Within an MCU of an interleaved scan,
/// each scan component contributes `h × v` data units in raster order; a
/// single-component scan has one data unit per MCU. Data units are dequantized,
/// transformed, upsampled by replication into a buffer covering the MCU,
/// and finally converted to RGB and clipped to the image.
///
/// Restart markers reset every DC predictor and realign the bit reader.
/// Decoding then continues with the first MCU of the next restart interval,
/// so a marker met in the middle of an interval leaves the MCUs it skips
/// untouched.
pub struct ScanDecoder<'a> {
    components: Vec<ComponentState<'a>>,
    idct: &'a dyn InverseDct,
    image_size: (usize, usize),
    mcu_size: (usize, usize),
    mcu_grid: (usize, usize),
    restart_interval: usize,
    mcu: Image<Ycbcr>,
}

impl<'a> ScanDecoder<'a> {
    pub fn new(
        frame: &FrameHeader,
        scan: &ScanHeader,
        tables: &'a Tables,
        restart_interval: u16,
        idct: &'a dyn InverseDct,
    ) -> Result<Self> {
        let max_sampling = frame.max_sampling();
        // A scan of a single component is not interleaved: each MCU is one
        // data unit of that component, whatever its sampling factors.
        let interleaved = scan.components.len() > 1;
        let components = scan
            .components
            .iter()
            .map(|sc| {
                let fc = &frame.components[sc.component_idx];
                Ok(ComponentState {
                    decoder: ComponentDecoder::new(
                        tables.huffman(TableClass::Dc, sc.dc_table)?,
                        tables.huffman(TableClass::Ac, sc.ac_table)?,
                    ),
                    quant: tables.quant(fc.quant_idx)?,
                    channel: Channel::for_component(sc.component_idx),
                    blocks: if interleaved {
                        (fc.h_samp_factor as usize, fc.v_samp_factor as usize)
                    } else {
                        (1, 1)
                    },
                    pixels_per_sample: fc.pixels_per_sample(max_sampling),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let (mcu_size, mcu_grid) = match components.as_slice() {
            [single] => {
                let (sx, sy) = single.pixels_per_sample;
                let mcu_size = (BLOCK_DIM * sx, BLOCK_DIM * sy);
                let (width, height) = frame.size();
                (
                    mcu_size,
                    (width.div_ceil(mcu_size.0), height.div_ceil(mcu_size.1)),
                )
            }
            _ => (frame.mcu_size(), frame.mcu_grid()),
        };
        debug!(?mcu_size, ?mcu_grid, interleaved, restart_interval, "scan geometry");
        Ok(Self {
            components,
            idct,
            image_size: frame.size(),
            mcu_size,
            mcu_grid,
            restart_interval: restart_interval as usize,
            mcu: Image::new(mcu_size)?,
        })
    }

    pub fn num_mcus(&self) -> usize {
        self.mcu_grid.0 * self.mcu_grid.1
    }

    fn decode_mcu(&mut self, br: &mut BitReader) -> EntropyResult<()> {
        let mut block = [0; BLOCK_SIZE];
        for c in self.components.iter_mut() {
            let (sx, sy) = c.pixels_per_sample;
            for by in 0..c.blocks.1 {
                for bx in 0..c.blocks.0 {
                    c.decoder.decode_block(br, &mut block)?;
                    c.quant.dequantize(&mut block);
                    if !is_zero_block(&block) {
                        self.idct.idct(&mut block);
                    }
                    let origin = (bx * BLOCK_DIM * sx, by * BLOCK_DIM * sy);
                    place_block(&mut self.mcu, &block, c.channel, origin, (sx, sy));
                }
            }
        }
        Ok(())
    }

    fn write_mcu(&self, index: usize, output: &mut Image<Rgb>) -> Result<()> {
        let x0 = (index % self.mcu_grid.0) * self.mcu_size.0;
        let y0 = (index / self.mcu_grid.0) * self.mcu_size.1;
        let size = (
            self.mcu_size.0.min(self.image_size.0 - x0),
            self.mcu_size.1.min(self.image_size.1 - y0),
        );
        let mut rect = output.as_rect_mut().into_rect((x0, y0), size)?;
        for y in 0..size.1 {
            ycbcr_to_rgb_row(&self.mcu.row(y)[..size.0], rect.row(y));
        }
        Ok(())
    }

    fn restart(&mut self, br: &mut BitReader) {
        for c in self.components.iter_mut() {
            c.decoder.reset();
        }
        br.reset();
    }

    /// Decodes every MCU of the scan from `data`, which starts right after
    /// the SOS segment, into `output`. Returns the number of bytes of `data`
    /// taken by the scan; when the scan is followed by a marker this is the
    /// offset of that marker.
    #[instrument(level = "debug", skip_all, err)]
    pub fn decode(&mut self, data: &[u8], output: &mut Image<Rgb>) -> Result<usize> {
        if output.size() != self.image_size {
            return Err(Error::InvalidImageSize(output.size().0, output.size().1));
        }
        let num_mcus = self.num_mcus();
        let mut br = BitReader::new(data);
        let mut index = 0;
        let mut expected_rst = 0u8;
        while index < num_mcus {
            match self.decode_mcu(&mut br) {
                Ok(()) => {
                    self.write_mcu(index, output)?;
                    index += 1;
                }
                Err(Interrupt::Restart(n)) => {
                    if n != expected_rst {
                        warn!(expected = expected_rst, found = n, "restart marker out of sequence");
                    }
                    expected_rst = (n + 1) % 8;
                    self.restart(&mut br);
                    if self.restart_interval > 0 {
                        let resume = index.next_multiple_of(self.restart_interval);
                        if resume != index {
                            warn!(mcu = index, resume, "restart marker inside restart interval");
                        }
                        index = resume;
                    }
                }
                Err(Interrupt::Error(e)) => return Err(e),
            }
        }
        debug!(num_mcus, "scan decoded");
        Ok(br.position())
    }
}
