// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::{io::ErrorKind, path::Path};

use danpg::{
    DecodedImage, decode_with_options,
    error::{Error, Result},
    options::DecoderOptions,
};

pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::InputReadFailure(err),
    })
}

pub fn decode_file(path: &Path, options: &DecoderOptions) -> Result<DecodedImage> {
    let data = read_input(path)?;
    decode_with_options(&data, options)
}
