// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::bit_writer::BitWriter;
use crate::tables::{
    CHROMA_AC, CHROMA_DC, HuffmanSpec, LUMA_AC, LUMA_DC, chroma_quant_table, luma_quant_table,
};

pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOF0: u8 = 0xC0;
pub const SOF1: u8 = 0xC1;
pub const SOF2: u8 = 0xC2;
pub const DHT: u8 = 0xC4;
pub const DQT: u8 = 0xDB;
pub const DRI: u8 = 0xDD;
pub const SOS: u8 = 0xDA;
pub const APP0: u8 = 0xE0;
pub const COM: u8 = 0xFE;

/// Builds a marker segment: marker, big-endian length, payload.
pub fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let length = payload.len() + 2;
    assert!(length <= u16::MAX as usize);
    let mut out = vec![0xFF, marker, (length >> 8) as u8, length as u8];
    out.extend_from_slice(payload);
    out
}

/// Component arrangement of the written frame. Chroma components use
/// quantization and Huffman table 1, luma uses table 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Gray,
    Ycbcr444,
    Ycbcr422,
    Ycbcr420,
}

#[derive(Debug, Clone, Copy)]
struct ComponentSpec {
    id: u8,
    h: usize,
    v: usize,
    table: usize,
}

impl Layout {
    fn components(self) -> Vec<ComponentSpec> {
        let luma = |h, v| ComponentSpec {
            id: 1,
            h,
            v,
            table: 0,
        };
        let chroma = |id| ComponentSpec {
            id,
            h: 1,
            v: 1,
            table: 1,
        };
        match self {
            Layout::Gray => vec![luma(1, 1)],
            Layout::Ycbcr444 => vec![luma(1, 1), chroma(2), chroma(3)],
            Layout::Ycbcr422 => vec![luma(2, 1), chroma(2), chroma(3)],
            Layout::Ycbcr420 => vec![luma(2, 2), chroma(2), chroma(3)],
        }
    }
}

fn magnitude_category(value: i32) -> u32 {
    32 - value.unsigned_abs().leading_zeros()
}

struct HuffmanEncoder {
    // (code, length) per symbol; length 0 marks an absent symbol.
    codes: [(u32, u32); 256],
}

impl HuffmanEncoder {
    fn new(spec: &HuffmanSpec) -> Self {
        let mut codes = [(0, 0); 256];
        let mut code = 0u32;
        let mut k = 0;
        for length in 1..=16 {
            for _ in 0..spec.bits[length - 1] {
                codes[spec.values[k] as usize] = (code, length as u32);
                code += 1;
                k += 1;
            }
            code <<= 1;
        }
        Self { codes }
    }

    fn write_symbol(&self, writer: &mut BitWriter, symbol: u8) {
        let (code, length) = self.codes[symbol as usize];
        assert!(length > 0, "symbol {symbol:#04x} has no code");
        writer.write(code, length);
    }

    fn write_value(&self, writer: &mut BitWriter, symbol_high: u8, value: i32) {
        let size = magnitude_category(value);
        self.write_symbol(writer, symbol_high | size as u8);
        if size > 0 {
            let bits = if value < 0 { value - 1 } else { value };
            writer.write(bits as u32, size);
        }
    }
}

/// A minimal baseline sequential encoder that turns explicit quantized
/// coefficients into a complete JPEG stream with the Annex K example tables.
///
/// Coefficients are supplied per 8x8 block by a callback receiving the
/// component index and the block coordinates within that component, and
/// returning 64 quantized values in zig-zag order.
#[derive(Debug, Clone)]
pub struct JpegWriter {
    width: u16,
    height: u16,
    layout: Layout,
    quant_tables: [[u8; 64]; 2],
    luma_sampling: Option<(usize, usize)>,
    restart_interval: u16,
    frame_marker: u8,
    jfif: bool,
    eoi: bool,
}

impl JpegWriter {
    pub fn new(width: u16, height: u16, layout: Layout) -> Self {
        Self {
            width,
            height,
            layout,
            quant_tables: [luma_quant_table(), chroma_quant_table()],
            luma_sampling: None,
            restart_interval: 0,
            frame_marker: SOF0,
            jfif: true,
            eoi: true,
        }
    }

    /// Replaces quantization table `id` (0 for luma, 1 for chroma); values in
    /// zig-zag order.
    pub fn quant_table(mut self, id: usize, table: [u8; 64]) -> Self {
        self.quant_tables[id] = table;
        self
    }

    /// Overrides the sampling factors the frame header declares for luma.
    pub fn luma_sampling(mut self, h: usize, v: usize) -> Self {
        self.luma_sampling = Some((h, v));
        self
    }

    fn components(&self) -> Vec<ComponentSpec> {
        let mut components = self.layout.components();
        if let Some((h, v)) = self.luma_sampling {
            components[0].h = h;
            components[0].v = v;
        }
        components
    }

    /// Components in the order and with the data units per MCU of the scan.
    /// A single-component scan is not interleaved: every MCU is one data
    /// unit, whatever the sampling factors.
    fn scan_components(&self) -> Vec<ComponentSpec> {
        let mut components = self.components();
        if let [c] = components.as_mut_slice() {
            c.h = 1;
            c.v = 1;
        }
        components
    }

    pub fn restart_interval(mut self, interval: u16) -> Self {
        self.restart_interval = interval;
        self
    }

    pub fn frame_marker(mut self, marker: u8) -> Self {
        self.frame_marker = marker;
        self
    }

    pub fn without_jfif(mut self) -> Self {
        self.jfif = false;
        self
    }

    pub fn without_eoi(mut self) -> Self {
        self.eoi = false;
        self
    }

    /// Number of MCUs horizontally and vertically.
    pub fn mcu_grid(&self) -> (usize, usize) {
        let components = self.scan_components();
        let hmax = components.iter().map(|c| c.h).max().unwrap_or(1);
        let vmax = components.iter().map(|c| c.v).max().unwrap_or(1);
        (
            (self.width as usize).div_ceil(8 * hmax),
            (self.height as usize).div_ceil(8 * vmax),
        )
    }

    /// All segments preceding the entropy-coded data.
    pub fn headers(&self) -> Vec<u8> {
        let components = self.components();
        let mut out = vec![0xFF, SOI];

        if self.jfif {
            out.extend(segment(
                APP0,
                &[b'J', b'F', b'I', b'F', 0, 1, 1, 0, 0, 1, 0, 1, 0, 0],
            ));
        }

        let table_count = if self.layout == Layout::Gray { 1 } else { 2 };
        for (id, table) in self.quant_tables.iter().enumerate().take(table_count) {
            let mut payload = vec![id as u8];
            payload.extend_from_slice(table);
            out.extend(segment(DQT, &payload));
        }

        let mut sof = vec![
            8,
            (self.height >> 8) as u8,
            self.height as u8,
            (self.width >> 8) as u8,
            self.width as u8,
            components.len() as u8,
        ];
        for c in &components {
            sof.extend_from_slice(&[c.id, ((c.h as u8) << 4) | c.v as u8, c.table as u8]);
        }
        out.extend(segment(self.frame_marker, &sof));

        let specs = [(0u8, LUMA_DC), (0x10, LUMA_AC), (1, CHROMA_DC), (0x11, CHROMA_AC)];
        for (class_id, spec) in specs.iter().take(2 * table_count) {
            let mut payload = vec![*class_id];
            payload.extend_from_slice(&spec.bits);
            payload.extend_from_slice(spec.values);
            out.extend(segment(DHT, &payload));
        }

        if self.restart_interval > 0 {
            out.extend(segment(
                DRI,
                &[(self.restart_interval >> 8) as u8, self.restart_interval as u8],
            ));
        }

        let mut sos = vec![components.len() as u8];
        for c in &components {
            sos.extend_from_slice(&[c.id, ((c.table as u8) << 4) | c.table as u8]);
        }
        sos.extend_from_slice(&[0, 63, 0]);
        out.extend(segment(SOS, &sos));
        out
    }

    /// Entropy-coded data for every MCU, including restart markers.
    pub fn scan_data(&self, mut block: impl FnMut(usize, usize, usize) -> [i32; 64]) -> Vec<u8> {
        let components = self.scan_components();
        let dc = [HuffmanEncoder::new(&LUMA_DC), HuffmanEncoder::new(&CHROMA_DC)];
        let ac = [HuffmanEncoder::new(&LUMA_AC), HuffmanEncoder::new(&CHROMA_AC)];
        let (mcus_x, mcus_y) = self.mcu_grid();
        let total = mcus_x * mcus_y;
        let interval = self.restart_interval as usize;

        let mut writer = BitWriter::new();
        let mut predictions = vec![0; components.len()];
        let mut restarts = 0u8;
        for mcu in 0..total {
            if interval > 0 && mcu > 0 && mcu % interval == 0 {
                writer.pad_to_byte();
                writer.marker(0xD0 + restarts % 8);
                restarts = restarts.wrapping_add(1);
                predictions.fill(0);
            }
            let (mx, my) = (mcu % mcus_x, mcu / mcus_x);
            for (index, c) in components.iter().enumerate() {
                for by in 0..c.v {
                    for bx in 0..c.h {
                        let coefficients = block(index, mx * c.h + bx, my * c.v + by);
                        let diff = coefficients[0] - predictions[index];
                        predictions[index] = coefficients[0];
                        assert!(magnitude_category(diff) <= 11);
                        dc[c.table].write_value(&mut writer, 0, diff);

                        let mut run = 0;
                        for &value in &coefficients[1..] {
                            if value == 0 {
                                run += 1;
                                continue;
                            }
                            while run > 15 {
                                ac[c.table].write_symbol(&mut writer, 0xF0);
                                run -= 16;
                            }
                            assert!(magnitude_category(value) <= 10);
                            ac[c.table].write_value(&mut writer, (run as u8) << 4, value);
                            run = 0;
                        }
                        if run > 0 {
                            ac[c.table].write_symbol(&mut writer, 0x00);
                        }
                    }
                }
            }
        }
        writer.finish()
    }

    /// A complete stream.
    pub fn encode(&self, block: impl FnMut(usize, usize, usize) -> [i32; 64]) -> Vec<u8> {
        let mut out = self.headers();
        out.extend(self.scan_data(block));
        if self.eoi {
            out.extend_from_slice(&[0xFF, EOI]);
        }
        out
    }

    /// A complete stream where every block of component `c` carries only the
    /// DC value `dc(c)`.
    pub fn encode_flat(&self, dc: impl Fn(usize) -> i32) -> Vec<u8> {
        self.encode(|c, _, _| {
            let mut block = [0; 64];
            block[0] = dc(c);
            block
        })
    }
}
