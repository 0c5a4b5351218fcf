// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use clap::Parser;
use danpg::error::Error;
use danpg::options::{DecoderLimits, DecoderOptions, IdctKind};
use danpg_cli::dec::decode_file;
use danpg_cli::enc::{OutputFormat, save_image};
use std::path::PathBuf;

#[derive(Parser)]
struct Opt {
    /// Input JPEG file
    input: PathBuf,

    /// Output image file, should end in .ppm, or .pgm for grayscale images
    output: PathBuf,

    /// Use the reference inverse DCT instead of the fast one
    #[clap(long)]
    reference_idct: bool,

    /// Refuse images with more pixels than this
    #[clap(long)]
    max_pixels: Option<usize>,
}

fn main() -> Result<(), Error> {
    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    // Fail before decoding if the output cannot be written.
    OutputFormat::from_path(&opt.output)?;

    let options = DecoderOptions {
        idct: if opt.reference_idct {
            IdctKind::Reference
        } else {
            IdctKind::Fast
        },
        limits: DecoderLimits {
            max_pixels: opt.max_pixels,
        },
    };
    let image = match decode_file(&opt.input, &options) {
        Ok(image) => image,
        Err(err) => {
            println!("Cannot decode {}: {err}", opt.input.display());
            return Err(err);
        }
    };
    println!("Image size: {} x {}", image.width, image.height);
    println!("Components: {}", image.components);
    save_image(&image, &opt.output)
}
