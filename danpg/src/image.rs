// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    color::{Rgb, Ycbcr},
    error::{Error, Result},
    util::tracing_wrappers::*,
};

mod private {
    pub trait Sealed {}
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DataTypeTag {
    Rgb,
    Ycbcr,
}

pub trait ImageDataType: private::Sealed + Copy + Default + 'static + Debug + PartialEq {
    /// ID of this data type. Different types *must* have different values.
    const DATA_TYPE_ID: DataTypeTag;
}

macro_rules! impl_image_data_type {
    ($ty: ty, $id: ident) => {
        impl private::Sealed for $ty {}
        impl ImageDataType for $ty {
            const DATA_TYPE_ID: DataTypeTag = DataTypeTag::$id;
        }
    };
}

impl_image_data_type!(Rgb, Rgb);
impl_image_data_type!(Ycbcr, Ycbcr);

/// An owned, row-major 2-D buffer. Sizes are `(width, height)`.
pub struct Image<T: ImageDataType> {
    size: (usize, usize),
    data: Vec<T>,
}

impl<T: ImageDataType> Debug for Image<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}x{}", T::DATA_TYPE_ID, self.size.0, self.size.1)
    }
}

#[derive(Clone, Copy)]
pub struct ImageRect<'a, T: ImageDataType> {
    origin: (usize, usize),
    size: (usize, usize),
    image: &'a Image<T>,
}

pub struct ImageRectMut<'a, T: ImageDataType> {
    origin: (usize, usize),
    size: (usize, usize),
    image: &'a mut Image<T>,
}

impl<T: ImageDataType> Debug for ImageRect<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} {}x{}+{}+{}",
            T::DATA_TYPE_ID,
            self.size.0,
            self.size.1,
            self.origin.0,
            self.origin.1
        )
    }
}

impl<T: ImageDataType> Debug for ImageRectMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mut {:?} {}x{}+{}+{}",
            T::DATA_TYPE_ID,
            self.size.0,
            self.size.1,
            self.origin.0,
            self.origin.1
        )
    }
}

impl<T: ImageDataType> Image<T> {
    #[instrument(err)]
    pub fn new(size: (usize, usize)) -> Result<Image<T>> {
        let (xsize, ysize) = size;
        if xsize == 0 || ysize == 0 {
            return Err(Error::InvalidImageSize(xsize, ysize));
        }
        let total_size = xsize
            .checked_mul(ysize)
            .ok_or(Error::ArithmeticOverflow)?;
        debug!("trying to allocate image");
        let mut data = vec![];
        data.try_reserve_exact(total_size)?;
        data.resize(total_size, T::default());
        Ok(Image {
            size: (xsize, ysize),
            data,
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&self, row: usize) -> &[T] {
        debug_assert!(row < self.size.1);
        let start = row * self.size.0;
        &self.data[start..start + self.size.0]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        debug_assert!(row < self.size.1);
        let start = row * self.size.0;
        &mut self.data[start..start + self.size.0]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.size.0 || y >= self.size.1 {
            return None;
        }
        Some(self.data[y * self.size.0 + x])
    }

    /// All values, row after row.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn as_rect(&self) -> ImageRect<'_, T> {
        ImageRect {
            origin: (0, 0),
            size: self.size,
            image: self,
        }
    }

    pub fn as_rect_mut(&mut self) -> ImageRectMut<'_, T> {
        ImageRectMut {
            origin: (0, 0),
            size: self.size,
            image: self,
        }
    }
}

fn rect_size_check(
    origin: (usize, usize),
    size: (usize, usize),
    ssize: (usize, usize),
) -> Result<()> {
    if origin
        .0
        .checked_add(size.0)
        .ok_or(Error::ArithmeticOverflow)?
        > ssize.0
        || origin
            .1
            .checked_add(size.1)
            .ok_or(Error::ArithmeticOverflow)?
            > ssize.1
    {
        Err(Error::RectOutOfBounds(
            size.0, size.1, origin.0, origin.1, ssize.0, ssize.1,
        ))
    } else {
        Ok(())
    }
}

impl<'a, T: ImageDataType> ImageRect<'a, T> {
    pub fn rect(self, origin: (usize, usize), size: (usize, usize)) -> Result<ImageRect<'a, T>> {
        rect_size_check(origin, size, self.size)?;
        Ok(ImageRect {
            origin: (origin.0 + self.origin.0, origin.1 + self.origin.1),
            size,
            image: self.image,
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&self, row: usize) -> &'a [T] {
        debug_assert!(row < self.size.1);
        let start = (row + self.origin.1) * self.image.size.0 + self.origin.0;
        &self.image.data[start..start + self.size.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.size.1).flat_map(|y| self.row(y).iter().cloned())
    }

    #[cfg(test)]
    pub fn check_equal(&self, other: ImageRect<T>) {
        assert_eq!(self.size, other.size);
        for y in 0..self.size.1 {
            for x in 0..self.size.0 {
                if self.row(y)[x] != other.row(y)[x] {
                    panic!(
                        "mismatch at position {x}x{y}, values {:?} and {:?}",
                        self.row(y)[x],
                        other.row(y)[x]
                    );
                }
            }
        }
    }
}

impl<'a, T: ImageDataType> PartialEq<ImageRect<'a, T>> for ImageRect<'a, T> {
    fn eq(&self, other: &ImageRect<'a, T>) -> bool {
        self.size == other.size && self.iter().zip(other.iter()).all(|(x, y)| x == y)
    }
}

impl<'a, T: ImageDataType + Eq> Eq for ImageRect<'a, T> {}

impl<'a, T: ImageDataType> ImageRectMut<'a, T> {
    pub fn into_rect(
        self,
        origin: (usize, usize),
        size: (usize, usize),
    ) -> Result<ImageRectMut<'a, T>> {
        rect_size_check(origin, size, self.size)?;
        Ok(ImageRectMut {
            origin: (origin.0 + self.origin.0, origin.1 + self.origin.1),
            size,
            image: self.image,
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    fn row_offset(&self, row: usize) -> usize {
        debug_assert!(row < self.size.1);
        (row + self.origin.1) * self.image.size.0 + self.origin.0
    }

    pub fn row(&mut self, row: usize) -> &mut [T] {
        let start = self.row_offset(row);
        trace!("{self:?} img size {:?} row {row} start {start}", self.image.size);
        &mut self.image.data[start..start + self.size.0]
    }
}
