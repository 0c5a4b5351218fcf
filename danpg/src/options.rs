// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Decoder configuration and resource limits.

use danpg_transforms::{FastIdct, InverseDct, ReferenceIdct};

/// Which inverse DCT implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdctKind {
    /// Separable AAN butterfly network.
    #[default]
    Fast,
    /// Direct evaluation of the double sum, mostly useful for testing.
    Reference,
}

impl IdctKind {
    pub fn create(self) -> Box<dyn InverseDct> {
        match self {
            IdctKind::Fast => Box::new(FastIdct::new()),
            IdctKind::Reference => Box::new(ReferenceIdct::new()),
        }
    }
}

/// Configurable limits for the decoder.
///
/// These protect against images that declare sizes large enough to exhaust
/// memory. By default every limit is `None` (unlimited); use
/// [`DecoderLimits::default_safe()`] for content of unknown origin.
///
/// ```
/// use danpg::options::DecoderLimits;
///
/// let limits = DecoderLimits::default_safe();
/// assert_eq!(limits.max_pixels, Some(1 << 28));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecoderLimits {
    /// Maximum total pixels allowed (width * height), checked before any
    /// pixel buffer is allocated.
    /// Default: `None` (unlimited).
    /// Recommended safe: `1 << 28` (about 268 million pixels).
    pub max_pixels: Option<usize>,
}

impl DecoderLimits {
    /// Returns limits suitable for general use.
    pub fn default_safe() -> Self {
        Self {
            max_pixels: Some(1 << 28),
        }
    }

    /// Returns limits with all restrictions disabled.
    pub fn unlimited() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    pub idct: IdctKind,
    pub limits: DecoderLimits,
}
