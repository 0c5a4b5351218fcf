// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Huffman table declares {0} symbols but only {1} bytes are available")]
    HuffmanTableTooShort(usize, usize),
    #[error("Huffman table has too many codes of length {0}")]
    HuffmanTableOversubscribed(usize),
    #[error("Quantization table truncated: {0} bytes available, 64 needed")]
    QuantTableTooShort(usize),
    #[error("Invalid table index {0}, must be in 0..=3")]
    InvalidTableIndex(u8),
    #[error("Invalid Huffman table class {0}")]
    InvalidTableClass(u8),
    #[error("{0} Huffman table {1} used before definition")]
    MissingHuffmanTable(&'static str, u8),
    #[error("Quantization table {0} used before definition")]
    MissingQuantTable(u8),
    #[error("Entropy-coded data ended before the scan was complete")]
    BitstreamExhausted,
    #[error("Unexpected marker ff{0:02x} in entropy-coded data at byte offset {1}")]
    UnexpectedMarker(u8, usize),
    #[error("Bits match no Huffman code")]
    HuffmanDecodeFailure,
    #[error("Invalid coefficient magnitude category {0}")]
    InvalidMagnitude(u8),
    #[error("AC run past the end of the block (coefficient {0})")]
    CoefficientOverflow(usize),
    #[error("Unsupported quantization table precision {0}, only 8 bit tables are supported")]
    UnsupportedQuantPrecision(u8),
    #[error("Unsupported frame type ff{0:02x}, only baseline sequential frames are supported")]
    UnsupportedFrameType(u8),
    #[error("Unsupported scan parameters Ss={0} Se={1} Ah={2} Al={3}")]
    UnsupportedScan(u8, u8, u8, u8),
    #[error("Unsupported sample precision {0}, only 8 bits are supported")]
    UnsupportedSamplePrecision(u8),
    #[error("Unsupported sampling factors {0}x{1} with maximum {2}x{3}")]
    UnsupportedSampling(u8, u8, u8, u8),
    #[error("Unsupported number of components: {0}")]
    UnsupportedComponentCount(usize),
    #[error("Only images with a single interleaved scan are supported")]
    MultipleScans,
    #[error("Invalid signature {0:02x}{1:02x}, expected ffd8")]
    InvalidSoi(u8, u8),
    #[error("Segment ff{0:02x} truncated")]
    SegmentTruncated(u8),
    #[error("Invalid length {1} for segment ff{0:02x}")]
    InvalidSegmentLength(u8, usize),
    #[error("Marker ff{0:02x} found before the frame header")]
    MissingFrameHeader(u8),
    #[error("Scan references component {0} not present in the frame")]
    UnknownScanComponent(u8),
    #[error("Component {0} listed more than once")]
    DuplicateComponent(u8),
    #[error("Scan does not contain every frame component")]
    IncompleteScan,
    #[error("No scan found before end of image")]
    MissingScan,
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(usize, usize),
    #[error("Image of {0} pixels exceeds the limit of {1}")]
    ImageSizeTooLarge(usize, usize),
    #[error("Rect out of bounds: {0}x{1}+{2}+{3} rect in {4}x{5} view")]
    RectOutOfBounds(usize, usize, usize, usize, usize, usize),
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("File not found: {0}")]
    FileNotFound(std::path::PathBuf),
    #[error("Failed to read input: {0}")]
    InputReadFailure(std::io::Error),
    #[error("Failed to write output: {0}")]
    OutputWriteFailure(std::io::Error),
    #[error("Output format not supported: {0}")]
    OutputFormatNotSupported(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Outcome of an entropy-decoding step that did not produce a value.
///
/// A restart marker is part of the protocol rather than a failure, so it
/// travels separately from [`Error`]. Only the MCU loop handles
/// [`Interrupt::Restart`]; everything above it sees plain [`Error`]s.
#[derive(Debug)]
pub enum Interrupt {
    /// A read crossed the restart marker `RSTn` with the given `n`.
    Restart(u8),
    Error(Error),
}

impl From<Error> for Interrupt {
    fn from(e: Error) -> Self {
        Interrupt::Error(e)
    }
}

pub type EntropyResult<T> = std::result::Result<T, Interrupt>;
