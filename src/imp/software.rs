// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Software texture unit.

Implements the fetch path a hardware texture unit provides for unnormalized coordinates with
clamp-to-edge addressing:

- Point filtering returns texel `(floor(x), floor(y))`.
- Linear filtering interpolates the 2x2 texels around `(x - 0.5, y - 0.5)`, so sampling a
  texel center returns that texel exactly.

Indices outside the image are clamped to the nearest edge texel before reading.
*/

use crate::bindings::image::ImageDescriptor;
use crate::bindings::sampler::FilterMode;
use crate::error::BindError;
use crate::images::device::Limits;
use crate::pixel_formats::PixelFormat;
use crate::pixel_formats::sealed::Sampleable;

/// Checks a descriptor against what the texture unit accepts.
pub(crate) fn validate<Format: PixelFormat>(
    image: &ImageDescriptor<'_, Format>,
    limits: &Limits,
) -> Result<(), BindError> {
    if image.ptr().is_null() {
        return Err(BindError::NullPointer);
    }
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(BindError::EmptyImage { width, height });
    }
    if width > limits.max_width || height > limits.max_height {
        return Err(BindError::TooLarge {
            width,
            height,
            max_width: limits.max_width,
            max_height: limits.max_height,
        });
    }
    let row_bytes = width as usize * Format::BYTES_PER_PIXEL as usize;
    let pitch = image.pitch();
    if pitch < row_bytes {
        return Err(BindError::PitchTooSmall { pitch, row_bytes });
    }
    if pitch > limits.max_pitch {
        return Err(BindError::PitchTooLarge {
            pitch,
            max_pitch: limits.max_pitch,
        });
    }
    if limits.pitch_alignment > 1 && pitch % limits.pitch_alignment != 0 {
        return Err(BindError::MisalignedPitch {
            pitch,
            alignment: limits.pitch_alignment,
        });
    }
    Ok(())
}

/// Clamp-to-edge addressing.  NaN lands on texel 0.
#[inline]
fn clamp_index(i: f32, len: u32) -> u32 {
    //float to int casts saturate, so huge and infinite coordinates clamp too
    (i as i64).clamp(0, len as i64 - 1) as u32
}

/// Fetches from a validated descriptor.
#[inline]
pub(crate) fn fetch<Format: PixelFormat>(
    image: &ImageDescriptor<'_, Format>,
    filter_mode: FilterMode,
    x: f32,
    y: f32,
) -> Format::CPixel {
    match filter_mode {
        FilterMode::Nearest => fetch_point(image, x, y),
        FilterMode::Linear => fetch_linear(image, x, y),
    }
}

#[inline]
fn fetch_point<Format: PixelFormat>(image: &ImageDescriptor<'_, Format>, x: f32, y: f32) -> Format::CPixel {
    let i = clamp_index(x.floor(), image.width());
    let j = clamp_index(y.floor(), image.height());
    //safety: the descriptor was validated and indices are clamped in bounds
    unsafe { image.read(i, j) }
}

#[inline]
fn fetch_linear<Format: PixelFormat>(image: &ImageDescriptor<'_, Format>, x: f32, y: f32) -> Format::CPixel {
    let xb = x - 0.5;
    let yb = y - 0.5;
    let x0f = xb.floor();
    let y0f = yb.floor();
    let alpha = if (xb - x0f).is_finite() { xb - x0f } else { 0.0 };
    let beta = if (yb - y0f).is_finite() { yb - y0f } else { 0.0 };

    let (w, h) = (image.width(), image.height());
    let i0 = clamp_index(x0f, w);
    let i1 = clamp_index(x0f + 1.0, w);
    let j0 = clamp_index(y0f, h);
    let j1 = clamp_index(y0f + 1.0, h);

    //safety: the descriptor was validated and indices are clamped in bounds
    let (v00, v10, v01, v11) = unsafe { (image.read(i0, j0), image.read(i1, j0), image.read(i0, j1), image.read(i1, j1)) };
    Format::CPixel::avg(&[
        ((1.0 - alpha) * (1.0 - beta), v00),
        (alpha * (1.0 - beta), v10),
        ((1.0 - alpha) * beta, v01),
        (alpha * beta, v11),
    ])
}
