// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Pitched image memory and the descriptors samplers bind.

A texture unit consumes an [`ImageDescriptor`]: a pointer, a width and height in pixels, and a
row pitch in bytes.  Rows start `pitch` bytes apart, and `pitch` is usually larger than
`width * BYTES_PER_PIXEL` because the hardware wants rows aligned.

[`PitchedImage`] is an owned allocation laid out that way.  It is the usual source of
descriptors, but any memory with a known layout can be described with
[`ImageDescriptor::from_raw_parts`].

# Example

```
use texture_samplers::bindings::coordinates::Texel;
use texture_samplers::bindings::image::PitchedImage;
use texture_samplers::pixel_formats::R32Float;

// A 5x3 image; rows are padded to the 32-byte default alignment
let mut image = PitchedImage::<R32Float>::new(5, 3, 0.0);
assert_eq!(image.pitch(), 32);

image[Texel { x: 4, y: 2 }] = 1.0;
assert_eq!(image[Texel { x: 4, y: 2 }], 1.0);
assert_eq!(image.descriptor().width(), 5);
```
*/

use crate::bindings::coordinates::Texel;
use crate::images::device::DEFAULT_PITCH_ALIGNMENT;
use crate::pixel_formats::PixelFormat;
use rayon::prelude::*;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Row length in elements such that the row pitch is a multiple of `alignment` bytes.
///
/// The pitch must also hold a whole number of pixels, so rows are rounded up to the least common
/// multiple of the alignment and the pixel size.
fn aligned_stride(width: u32, bytes_per_pixel: usize, alignment: usize) -> usize {
    let alignment = alignment.max(1);
    let granule = alignment / gcd(alignment, bytes_per_pixel) * bytes_per_pixel;
    let row_bytes = width as usize * bytes_per_pixel;
    row_bytes.div_ceil(granule) * granule / bytes_per_pixel
}

/// An owned 2D image whose rows are padded to a pitch.
///
/// Data is row-major; row `y` starts at element `y * stride`.
pub struct PitchedImage<Format: PixelFormat> {
    data: Vec<Format::CPixel>,
    width: u32,
    height: u32,
    stride: usize,
}

impl<Format: PixelFormat> Debug for PitchedImage<Format> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PitchedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch())
            .finish()
    }
}

impl<Format: PixelFormat> PitchedImage<Format> {
    /// Creates an image with every pixel set to `fill`, rows aligned to the default pitch alignment.
    pub fn new(width: u32, height: u32, fill: Format::CPixel) -> Self {
        Self::new_aligned(width, height, DEFAULT_PITCH_ALIGNMENT, fill)
    }

    /// Creates an image with every pixel set to `fill`, rows aligned to `alignment` bytes.
    pub fn new_aligned(width: u32, height: u32, alignment: usize, fill: Format::CPixel) -> Self {
        let stride = aligned_stride(width, Format::BYTES_PER_PIXEL as usize, alignment);
        Self::with_row_stride(width, height, stride, fill)
    }

    /// Creates an image with an explicit row stride, in elements.
    ///
    /// # Panics
    ///
    /// Panics if `stride < width`.
    pub fn with_row_stride(width: u32, height: u32, stride: usize, fill: Format::CPixel) -> Self {
        assert!(stride >= width as usize, "stride {stride} shorter than width {width}");
        Self {
            data: vec![fill; stride * height as usize],
            width,
            height,
            stride,
        }
    }

    /// Creates an image with pixels computed by `initialize_with`.
    ///
    /// Padding elements take the value of the last pixel of their row.
    ///
    /// ```
    /// use texture_samplers::bindings::coordinates::Texel;
    /// use texture_samplers::bindings::image::PitchedImage;
    /// use texture_samplers::pixel_formats::R32Float;
    ///
    /// let ramp = PitchedImage::<R32Float>::new_with(4, 2, |t| t.x as f32);
    /// assert_eq!(ramp[Texel { x: 3, y: 1 }], 3.0);
    /// ```
    pub fn new_with<F: Fn(Texel) -> Format::CPixel>(width: u32, height: u32, initialize_with: F) -> Self {
        let stride = aligned_stride(width, Format::BYTES_PER_PIXEL as usize, DEFAULT_PITCH_ALIGNMENT);
        let mut data = Vec::with_capacity(stride * height as usize);
        for y in 0..height {
            let row_start = data.len();
            for x in 0..width {
                data.push(initialize_with(Texel { x, y }))
            }
            if let Some(&last) = data[row_start..].last() {
                data.resize(row_start + stride, last);
            }
        }
        Self {
            data,
            width,
            height,
            stride,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance between row starts, in bytes.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.stride * Format::BYTES_PER_PIXEL as usize
    }

    /// Distance between row starts, in elements.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The visible pixels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[Format::CPixel] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    /// Every row as a mutable slice including its padding, for parallel writes.
    pub(crate) fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, Format::CPixel> {
        self.data.par_chunks_mut(self.stride.max(1))
    }

    /// Describes this image for binding.  The descriptor borrows the image.
    pub fn descriptor(&self) -> ImageDescriptor<'_, Format> {
        ImageDescriptor {
            ptr: self.data.as_ptr().cast::<u8>(),
            width: self.width,
            height: self.height,
            pitch: self.pitch(),
            _marker: PhantomData,
        }
    }
}

/// # Panics
///
/// Indexing panics if the texel lies outside `width × height`.
impl<Format: PixelFormat> Index<Texel> for PitchedImage<Format> {
    type Output = Format::CPixel;

    fn index(&self, index: Texel) -> &Self::Output {
        assert!(
            index.x < self.width && index.y < self.height,
            "texel {index:?} out of bounds for {}x{} image",
            self.width,
            self.height
        );
        &self.data[index.vec_offset(self.stride)]
    }
}

impl<Format: PixelFormat> IndexMut<Texel> for PitchedImage<Format> {
    fn index_mut(&mut self, index: Texel) -> &mut Self::Output {
        assert!(
            index.x < self.width && index.y < self.height,
            "texel {index:?} out of bounds for {}x{} image",
            self.width,
            self.height
        );
        &mut self.data[index.vec_offset(self.stride)]
    }
}

/**
A borrowed view of image memory, as handed to a texture unit.

Descriptors are `Copy` and carry the lifetime of the memory they describe, so nothing bound
through one can outlive the image.
*/
pub struct ImageDescriptor<'a, Format: PixelFormat> {
    ptr: *const u8,
    width: u32,
    height: u32,
    pitch: usize,
    _marker: PhantomData<&'a [Format::CPixel]>,
}

impl<Format: PixelFormat> Clone for ImageDescriptor<'_, Format> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<Format: PixelFormat> Copy for ImageDescriptor<'_, Format> {}

impl<Format: PixelFormat> Debug for ImageDescriptor<'_, Format> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDescriptor")
            .field("ptr", &self.ptr)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .finish()
    }
}

//safe because the descriptor only ever reads through a shared borrow, and CPixel is Sync
unsafe impl<Format: PixelFormat> Send for ImageDescriptor<'_, Format> {}
unsafe impl<Format: PixelFormat> Sync for ImageDescriptor<'_, Format> {}

impl<'a, Format: PixelFormat> ImageDescriptor<'a, Format> {
    /// Describes externally allocated image memory.
    ///
    /// The layout is not checked here; binding validates it against the device limits.
    ///
    /// # Safety
    ///
    /// Unless the descriptor is rejected at bind time, `ptr` must be valid for reads of
    /// `(height - 1) * pitch + width * BYTES_PER_PIXEL` bytes holding initialized pixels, and
    /// the memory must not be written for `'a`.
    pub unsafe fn from_raw_parts(ptr: *const u8, width: u32, height: u32, pitch: usize) -> Self {
        Self {
            ptr,
            width,
            height,
            pitch,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn ptr(&self) -> *const u8 {
        self.ptr
    }
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Reads the pixel at `(x, y)`.
    ///
    /// # Safety
    ///
    /// The descriptor must have passed bind validation and `x < width`, `y < height`.
    #[inline]
    pub(crate) unsafe fn read(&self, x: u32, y: u32) -> Format::CPixel {
        let offset = y as usize * self.pitch + x as usize * Format::BYTES_PER_PIXEL as usize;
        //unaligned, because raw descriptors promise nothing about address alignment
        unsafe { self.ptr.add(offset).cast::<Format::CPixel>().read_unaligned() }
    }
}

impl<'a, Format: PixelFormat> From<&'a PitchedImage<Format>> for ImageDescriptor<'a, Format> {
    fn from(image: &'a PitchedImage<Format>) -> Self {
        image.descriptor()
    }
}
