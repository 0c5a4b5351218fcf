// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::Path;

use danpg::{
    DecodedImage,
    error::{Error, Result},
};

pub mod pnm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Ppm,
    Pgm,
}

impl OutputFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<OutputFormat> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("ppm") => Ok(OutputFormat::Ppm),
            Some("pgm") => Ok(OutputFormat::Pgm),
            _ => Err(Error::OutputFormatNotSupported(
                path.to_string_lossy().into_owned(),
            )),
        }
    }
}

pub fn encode(image: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Ppm => Ok(pnm::to_ppm(image.pixels.as_rect())),
        OutputFormat::Pgm if image.components == 1 => Ok(pnm::to_pgm(image.pixels.as_rect())),
        OutputFormat::Pgm => Err(Error::OutputFormatNotSupported(format!(
            "PGM output of a {}-component image",
            image.components
        ))),
    }
}

pub fn save_image(image: &DecodedImage, path: &Path) -> Result<()> {
    let bytes = encode(image, OutputFormat::from_path(path)?)?;
    std::fs::write(path, bytes).map_err(Error::OutputWriteFailure)
}
