// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Type-safe pixel format definitions for texture slots.
//!
//! Each pixel format encodes:
//!
//! - The concrete pixel type read from memory ([`sealed::PixelFormat::CPixel`])
//! - The channel-width category of the texture unit that can fetch it ([`Channels`])
//! - The slot the format occupies on a [`Device`](crate::images::Device) ([`SlotId`])
//!
//! # Design Philosophy
//!
//! Pixel formats are zero-sized types rather than enums.  A texture unit's fetch path is
//! statically typed, so the format has to be part of the sampler's type: a `Sampler<R32Float>`
//! returns `f32`, a `Sampler<ST32Float>` returns a [`StructureTensor`], and mixing them up is a
//! compile error instead of a driver error.
//!
//! # Available Formats
//!
//! ## Single Channel
//! - [`R32Float`] - 32-bit float
//! - [`R16Float`] - 16-bit half-precision float
//!
//! ## Four Channel
//! - [`RGBA32Float`] - 4-channel 32-bit float (16 bytes total)
//! - [`RGBA16Float`] - 4-channel 16-bit float (8 bytes total)
//!
//! ## Tensor Field
//! - [`ST32Float`] - structure tensor `(e, f, g, w)` in 32-bit floats
//!
//! # Examples
//!
//! ```
//! use texture_samplers::pixel_formats::{Channels, Float4, RGBA32Float, PixelFormat};
//!
//! assert_eq!(RGBA32Float::CHANNELS, Channels::Four);
//! let red = Float4 { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
//! assert_eq!(red.r, 1.0);
//! ```

use crate::pixel_formats::sealed::{ReprC, Sampleable};

pub use half::f16;
pub use sealed::PixelFormat;

/// Sealed traits for pixel format type safety.
///
/// Only the formats defined in this crate have a texture slot, so only they can be bound.
pub(crate) mod sealed {
    use std::fmt::Debug;

    /// Core trait for pixel format types.
    ///
    /// This trait is sealed and cannot be implemented outside this crate.
    pub trait PixelFormat: Debug + Send + Sync + 'static {
        /// Number of bytes per pixel for this format.
        const BYTES_PER_PIXEL: u8;

        /// Channel-width category of the texture unit that fetches this format.
        const CHANNELS: super::Channels;

        /// The device slot dedicated to this format.
        const SLOT: super::SlotId;

        /// The concrete pixel type with guaranteed C-compatible memory layout.
        type CPixel: Copy + Debug + PartialEq + Send + Sync + ReprC + Sampleable;
    }

    /// Marker trait indicating C-compatible memory layout.
    ///
    /// # Safety
    ///
    /// Implementors must have no padding and no uninitialized bytes, since texture fetches
    /// read them straight out of pitched byte memory.
    pub unsafe trait ReprC {}

    /// Pixel types the fetch unit can interpolate.
    pub trait Sampleable: Sized + Copy {
        /// Calculates a weighted average of samples.
        ///
        /// * `elements` - Slice of (weight, value) pairs where weights should sum to 1.0
        fn avg(elements: &[(f32, Self)]) -> Self;
    }
}

/// Channel-width category of a texture unit.
///
/// The fetch path of a texture unit is typed per category, so a slot only ever accepts
/// formats of its own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    /// One element per pixel.
    Single,
    /// Four elements per pixel (colors, vectors).
    Four,
    /// Structure-tensor field used by orientation-aware filters.
    Tensor,
}

/// Identifies one texture slot of a [`Device`](crate::images::Device).
///
/// There is exactly one slot per pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    R32Float,
    R16Float,
    RGBA32Float,
    RGBA16Float,
    ST32Float,
}

impl SlotId {
    /// Number of slots on a device.
    pub const COUNT: usize = 5;

    /// Every slot, in index order.
    pub const ALL: [SlotId; SlotId::COUNT] = [
        SlotId::R32Float,
        SlotId::R16Float,
        SlotId::RGBA32Float,
        SlotId::RGBA16Float,
        SlotId::ST32Float,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The channel-width category this slot serves.
    pub const fn channels(self) -> Channels {
        match self {
            SlotId::R32Float | SlotId::R16Float => Channels::Single,
            SlotId::RGBA32Float | SlotId::RGBA16Float => Channels::Four,
            SlotId::ST32Float => Channels::Tensor,
        }
    }
}

/// 32-bit single-precision float format with a single channel.
///
/// The usual choice for luminance, gradient magnitude and other scalar fields.
#[derive(Debug, Clone)]
pub struct R32Float;
impl PixelFormat for R32Float {
    const BYTES_PER_PIXEL: u8 = 4;
    const CHANNELS: Channels = Channels::Single;
    const SLOT: SlotId = SlotId::R32Float;
    type CPixel = f32;
}

unsafe impl ReprC for f32 {}
impl Sampleable for f32 {
    fn avg(elements: &[(f32, Self)]) -> Self {
        let mut avg = 0.0;
        for element in elements {
            avg += element.0 * element.1
        }
        avg
    }
}

/// 16-bit half-precision float format with a single channel.
///
/// Interpolation happens in f32 and the result is rounded back to half precision.
#[derive(Debug, Clone)]
pub struct R16Float;
impl PixelFormat for R16Float {
    const BYTES_PER_PIXEL: u8 = 2;
    const CHANNELS: Channels = Channels::Single;
    const SLOT: SlotId = SlotId::R16Float;
    type CPixel = f16;
}

unsafe impl ReprC for f16 {}
impl Sampleable for f16 {
    fn avg(elements: &[(f32, Self)]) -> Self {
        let mut avg = 0.0;
        for element in elements {
            avg += element.0 * element.1.to_f32()
        }
        f16::from_f32(avg)
    }
}

/// Four 32-bit float channels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Float4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Float4 {
    pub const ZERO: Float4 = Float4 { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Float4 {
    fn default() -> Self {
        Float4::ZERO
    }
}

unsafe impl ReprC for Float4 {}
impl Sampleable for Float4 {
    fn avg(elements: &[(f32, Self)]) -> Self {
        let mut avg = Float4::default();
        for element in elements {
            avg.r += element.0 * element.1.r;
            avg.g += element.0 * element.1.g;
            avg.b += element.0 * element.1.b;
            avg.a += element.0 * element.1.a;
        }
        avg
    }
}

/// 4-channel 32-bit float format (16 bytes per pixel).
#[derive(Debug, Clone)]
pub struct RGBA32Float;
impl PixelFormat for RGBA32Float {
    const BYTES_PER_PIXEL: u8 = 16;
    const CHANNELS: Channels = Channels::Four;
    const SLOT: SlotId = SlotId::RGBA32Float;
    type CPixel = Float4;
}

/// Four 16-bit float channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Half4 {
    pub r: f16,
    pub g: f16,
    pub b: f16,
    pub a: f16,
}

impl Half4 {
    pub fn from_floats(float4: Float4) -> Self {
        Self {
            r: f16::from_f32(float4.r),
            g: f16::from_f32(float4.g),
            b: f16::from_f32(float4.b),
            a: f16::from_f32(float4.a),
        }
    }
}

impl From<Half4> for Float4 {
    fn from(h: Half4) -> Self {
        Float4 {
            r: h.r.to_f32(),
            g: h.g.to_f32(),
            b: h.b.to_f32(),
            a: h.a.to_f32(),
        }
    }
}

unsafe impl ReprC for Half4 {}
impl Sampleable for Half4 {
    fn avg(elements: &[(f32, Self)]) -> Self {
        let mut avg = Float4::default();
        for element in elements {
            let v: Float4 = element.1.into();
            avg.r += element.0 * v.r;
            avg.g += element.0 * v.g;
            avg.b += element.0 * v.b;
            avg.a += element.0 * v.a;
        }
        Half4::from_floats(avg)
    }
}

/// 4-channel 16-bit float format (8 bytes per pixel).
#[derive(Debug, Clone)]
pub struct RGBA16Float;
impl PixelFormat for RGBA16Float {
    const BYTES_PER_PIXEL: u8 = 8;
    const CHANNELS: Channels = Channels::Four;
    const SLOT: SlotId = SlotId::RGBA16Float;
    type CPixel = Half4;
}

/**
A structure tensor sample.

The symmetric 2x2 tensor `[[e, f], [f, g]]` is stored as its three distinct components,
plus one auxiliary component `w` that filters use for whatever they derive alongside the
tensor (anisotropy, a confidence weight, ...).

Components interpolate linearly, which is what orientation-aware filters expect from a
smoothed tensor field.
*/
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct StructureTensor {
    pub e: f32,
    pub f: f32,
    pub g: f32,
    pub w: f32,
}

impl StructureTensor {
    pub const fn new(e: f32, f: f32, g: f32, w: f32) -> Self {
        Self { e, f, g, w }
    }

    /// The isotropic tensor, a neutral value where no orientation is known.
    pub const IDENTITY: StructureTensor = StructureTensor { e: 1.0, f: 0.0, g: 1.0, w: 0.0 };

    /// Eigenvalues `(major, minor)` of the symmetric tensor.
    pub fn eigenvalues(&self) -> (f32, f32) {
        let mean = 0.5 * (self.e + self.g);
        let d = (0.25 * (self.e - self.g) * (self.e - self.g) + self.f * self.f).sqrt();
        (mean + d, mean - d)
    }
}

unsafe impl ReprC for StructureTensor {}
impl Sampleable for StructureTensor {
    fn avg(elements: &[(f32, Self)]) -> Self {
        let mut avg = StructureTensor::default();
        for element in elements {
            avg.e += element.0 * element.1.e;
            avg.f += element.0 * element.1.f;
            avg.g += element.0 * element.1.g;
            avg.w += element.0 * element.1.w;
        }
        avg
    }
}

/// Structure-tensor field format, the tensor-category slot.
#[derive(Debug, Clone)]
pub struct ST32Float;
impl PixelFormat for ST32Float {
    const BYTES_PER_PIXEL: u8 = 16;
    const CHANNELS: Channels = Channels::Tensor;
    const SLOT: SlotId = SlotId::ST32Float;
    type CPixel = StructureTensor;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_match<Format: PixelFormat>() {
        assert_eq!(
            Format::BYTES_PER_PIXEL as usize,
            std::mem::size_of::<Format::CPixel>()
        );
        assert_eq!(Format::SLOT.channels(), Format::CHANNELS);
    }

    #[test]
    fn format_table_is_consistent() {
        bytes_match::<R32Float>();
        bytes_match::<R16Float>();
        bytes_match::<RGBA32Float>();
        bytes_match::<RGBA16Float>();
        bytes_match::<ST32Float>();
    }

    #[test]
    fn slot_indices_are_dense() {
        for (i, slot) in SlotId::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn weighted_averages() {
        let samples = [(0.25, 100.0f32), (0.75, 200.0f32)];
        assert_eq!(f32::avg(&samples), 175.0);

        let h = [(0.5, f16::from_f32(1.0)), (0.5, f16::from_f32(3.0))];
        assert_eq!(f16::avg(&h).to_f32(), 2.0);

        let t = [
            (0.5, StructureTensor::new(2.0, 0.0, 0.0, 1.0)),
            (0.5, StructureTensor::new(0.0, 2.0, 4.0, 1.0)),
        ];
        assert_eq!(StructureTensor::avg(&t), StructureTensor::new(1.0, 1.0, 2.0, 1.0));
    }

    #[test]
    fn tensor_eigenvalues() {
        let (major, minor) = StructureTensor::new(3.0, 0.0, 1.0, 0.0).eigenvalues();
        assert_eq!(major, 3.0);
        assert_eq!(minor, 1.0);
        let (major, minor) = StructureTensor::IDENTITY.eigenvalues();
        assert_eq!(major, minor);
    }
}
