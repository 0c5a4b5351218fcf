// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Marker codes, i.e. the byte following `0xFF`.

pub const SOF0: u8 = 0xC0;
pub const SOF1: u8 = 0xC1;
pub const SOF2: u8 = 0xC2;
pub const SOF3: u8 = 0xC3;
pub const DHT: u8 = 0xC4;
pub const SOF15: u8 = 0xCF;
pub const JPG: u8 = 0xC8;
pub const DAC: u8 = 0xCC;
pub const RST0: u8 = 0xD0;
pub const RST7: u8 = 0xD7;
pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOS: u8 = 0xDA;
pub const DQT: u8 = 0xDB;
pub const DNL: u8 = 0xDC;
pub const DRI: u8 = 0xDD;
pub const APP0: u8 = 0xE0;
pub const APP15: u8 = 0xEF;
pub const COM: u8 = 0xFE;
pub const TEM: u8 = 0x01;

/// What a marker introduces, as far as the decoder cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Soi,
    Eoi,
    Sos,
    Dqt,
    Dht,
    Dri,
    /// Any start-of-frame marker; the code tells which process it uses.
    Sof(u8),
    Rst(u8),
    App(u8),
    Com,
    /// A marker that carries no length field and no payload.
    Standalone(u8),
    /// Any other marker with a length-prefixed payload.
    Other(u8),
}

impl Marker {
    pub fn from_code(code: u8) -> Marker {
        match code {
            SOI => Marker::Soi,
            EOI => Marker::Eoi,
            SOS => Marker::Sos,
            DQT => Marker::Dqt,
            DHT => Marker::Dht,
            DRI => Marker::Dri,
            JPG | DAC => Marker::Other(code),
            SOF0..=SOF15 => Marker::Sof(code),
            RST0..=RST7 => Marker::Rst(code - RST0),
            APP0..=APP15 => Marker::App(code - APP0),
            COM => Marker::Com,
            TEM => Marker::Standalone(code),
            _ => Marker::Other(code),
        }
    }

    /// Whether a two-byte length and a payload follow the marker.
    pub fn has_payload(self) -> bool {
        !matches!(
            self,
            Marker::Soi | Marker::Eoi | Marker::Rst(_) | Marker::Standalone(_)
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn classify() {
        assert_eq!(Marker::from_code(0xC0), Marker::Sof(SOF0));
        assert_eq!(Marker::from_code(0xC2), Marker::Sof(SOF2));
        assert_eq!(Marker::from_code(0xC4), Marker::Dht);
        assert_eq!(Marker::from_code(0xCC), Marker::Other(DAC));
        assert_eq!(Marker::from_code(0xD3), Marker::Rst(3));
        assert_eq!(Marker::from_code(0xE1), Marker::App(1));
        assert_eq!(Marker::from_code(0xFE), Marker::Com);
        assert_eq!(Marker::from_code(0x01), Marker::Standalone(TEM));
        assert_eq!(Marker::from_code(0xF0), Marker::Other(0xF0));
    }

    #[test]
    fn payloads() {
        for code in [SOI, EOI, RST0, RST7, TEM] {
            assert!(!Marker::from_code(code).has_payload(), "{code:02x}");
        }
        for code in [SOF0, DHT, SOS, DQT, DRI, APP0, COM, DNL] {
            assert!(Marker::from_code(code).has_payload(), "{code:02x}");
        }
    }
}
