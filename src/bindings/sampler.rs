// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Samplers: scoped bindings of images to texture slots.

A [`Sampler`] binds an image to the slot of its pixel format when it is constructed and unbinds
it when dropped.  In between, any number of threads may call [`Sample::sample`] on it.
[`Resampler`] does the same but scales coordinates first, and [`ConstantSampler`] stands in
where a kernel expects a sampler but no texture exists.

Kernels are generic over [`Sample`], so the choice between the three is made at compile time.

# Lifecycle

```text
Sampler::new ──▶ launch kernel ──▶ workers call sample(x, y) ──▶ join ──▶ drop
     bind                                                               unbind
```

A slot holds one binding at a time.  Binding a slot that another live sampler holds fails with
[`Error::SlotBusy`](crate::error::Error::SlotBusy).

# Example

```
use texture_samplers::bindings::image::PitchedImage;
use texture_samplers::bindings::sampler::{FilterMode, Sample, Sampler};
use texture_samplers::images::Device;
use texture_samplers::pixel_formats::R32Float;

let device = Device::shared();
let image = PitchedImage::<R32Float>::new_with(2, 1, |t| t.x as f32);
{
    let sampler = Sampler::new(device, &image, FilterMode::Linear)?;
    assert_eq!(sampler.sample(1.0, 0.5), 0.5);
}
assert!(!device.slot_state::<R32Float>().bound);
# Ok::<(), texture_samplers::error::Error>(())
```
*/

use crate::bindings::coordinates::Scale;
use crate::bindings::image::ImageDescriptor;
use crate::bindings::slot::TextureSlot;
use crate::error::Error;
use crate::images::Device;
use crate::imp;
use crate::pixel_formats::PixelFormat;
use std::fmt::{Debug, Formatter};

/// How a texture unit turns a coordinate into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Return the texel containing the coordinate.
    #[default]
    Nearest,
    /// Bilinearly interpolate the four texels around the coordinate.
    Linear,
}

/// Something that can be sampled at a floating-point pixel coordinate.
pub trait Sample {
    type Output;

    fn sample(&self, x: f32, y: f32) -> Self::Output;
}

impl<S: Sample + ?Sized> Sample for &S {
    type Output = S::Output;

    #[inline]
    fn sample(&self, x: f32, y: f32) -> Self::Output {
        (**self).sample(x, y)
    }
}

/// A live binding of one image to one slot.  Dropping it unbinds.
struct Binding<'a, Format: PixelFormat> {
    slot: &'a TextureSlot,
    image: ImageDescriptor<'a, Format>,
    filter_mode: FilterMode,
}

impl<'a, Format: PixelFormat> Binding<'a, Format> {
    fn bind(device: &'a Device, image: ImageDescriptor<'a, Format>, filter_mode: FilterMode) -> Result<Self, Error> {
        let slot = device.slot(Format::SLOT);
        if let Err(e) = imp::validate(&image, device.limits()) {
            logwise::warn_sync!(
                "Bind of texture slot {slot} rejected: {err}",
                slot = logwise::privacy::LogIt(&Format::SLOT),
                err = logwise::privacy::LogIt(&e)
            );
            return Err(e.into());
        }
        slot.acquire(filter_mode)?;
        Ok(Self {
            slot,
            image,
            filter_mode,
        })
    }

    #[inline]
    fn fetch(&self, x: f32, y: f32) -> Format::CPixel {
        imp::fetch(&self.image, self.filter_mode, x, y)
    }
}

impl<Format: PixelFormat> Drop for Binding<'_, Format> {
    fn drop(&mut self) {
        self.slot.release();
    }
}

impl<Format: PixelFormat> Debug for Binding<'_, Format> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("slot", &self.slot.id())
            .field("image", &self.image)
            .field("filter_mode", &self.filter_mode)
            .finish()
    }
}

/**
Samples an image at pixel coordinates.

The image stays bound to the slot of `Format` for as long as the sampler lives.

```
use texture_samplers::bindings::image::PitchedImage;
use texture_samplers::bindings::sampler::{Sample, Sampler};
use texture_samplers::images::Device;
use texture_samplers::pixel_formats::R32Float;

let device = Device::shared();
let image = PitchedImage::<R32Float>::new(1, 1, 7.0);
let sampler = Sampler::nearest(device, &image)?;
// clamp-to-edge: everything reads the only pixel
assert_eq!(sampler.sample(-3.0, 100.0), 7.0);
# Ok::<(), texture_samplers::error::Error>(())
```
*/
#[derive(Debug)]
pub struct Sampler<'a, Format: PixelFormat> {
    binding: Binding<'a, Format>,
}

impl<'a, Format: PixelFormat> Sampler<'a, Format> {
    /// Binds `image` to its slot on `device` with the given filter mode.
    pub fn new(
        device: &'a Device,
        image: impl Into<ImageDescriptor<'a, Format>>,
        filter_mode: FilterMode,
    ) -> Result<Self, Error> {
        Ok(Self {
            binding: Binding::bind(device, image.into(), filter_mode)?,
        })
    }

    /// Binds `image` with nearest-neighbor filtering.
    pub fn nearest(device: &'a Device, image: impl Into<ImageDescriptor<'a, Format>>) -> Result<Self, Error> {
        Self::new(device, image, FilterMode::Nearest)
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.binding.filter_mode
    }

    pub fn width(&self) -> u32 {
        self.binding.image.width()
    }

    pub fn height(&self) -> u32 {
        self.binding.image.height()
    }
}

impl<Format: PixelFormat> Sample for Sampler<'_, Format> {
    type Output = Format::CPixel;

    #[inline]
    fn sample(&self, x: f32, y: f32) -> Format::CPixel {
        self.binding.fetch(x, y)
    }
}

/**
Samples an image at scaled coordinates.

`sample(x, y)` reads the bound image at `(scale.x * x, scale.y * y)`.  Use it when the kernel's
grid and the texture have different resolutions.

```
use texture_samplers::bindings::coordinates::Scale;
use texture_samplers::bindings::image::PitchedImage;
use texture_samplers::bindings::sampler::{FilterMode, Resampler, Sample};
use texture_samplers::images::Device;
use texture_samplers::pixel_formats::R32Float;

let device = Device::shared();
// a 2x2 texture read from a 4x4 grid
let small = PitchedImage::<R32Float>::new_with(2, 2, |t| (t.y * 2 + t.x) as f32);
let resampler = Resampler::new(device, &small, Scale::between(4, 4, 2, 2), FilterMode::Nearest)?;
assert_eq!(resampler.sample(3.5, 0.5), 1.0);
assert_eq!(resampler.sample(0.5, 3.5), 2.0);
# Ok::<(), texture_samplers::error::Error>(())
```
*/
#[derive(Debug)]
pub struct Resampler<'a, Format: PixelFormat> {
    binding: Binding<'a, Format>,
    scale: Scale,
}

impl<'a, Format: PixelFormat> Resampler<'a, Format> {
    pub fn new(
        device: &'a Device,
        image: impl Into<ImageDescriptor<'a, Format>>,
        scale: Scale,
        filter_mode: FilterMode,
    ) -> Result<Self, Error> {
        Ok(Self {
            binding: Binding::bind(device, image.into(), filter_mode)?,
            scale,
        })
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.binding.filter_mode
    }
}

impl<Format: PixelFormat> Sample for Resampler<'_, Format> {
    type Output = Format::CPixel;

    #[inline]
    fn sample(&self, x: f32, y: f32) -> Format::CPixel {
        let (sx, sy) = self.scale.apply(x, y);
        self.binding.fetch(sx, sy)
    }
}

/**
Returns the same value for every coordinate.

Used for disabled inputs and default fields, such as an isotropic structure tensor where no
tensor field was computed.  It touches no slot.

```
use texture_samplers::bindings::sampler::{ConstantSampler, Sample};
use texture_samplers::pixel_formats::StructureTensor;

let st = ConstantSampler::new(StructureTensor::IDENTITY);
assert_eq!(st.sample(12.5, -4.0), StructureTensor::IDENTITY);
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSampler<T> {
    value: T,
}

impl<T: Copy> ConstantSampler<T> {
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> T {
        self.value
    }
}

impl<T: Copy> Sample for ConstantSampler<T> {
    type Output = T;

    #[inline]
    fn sample(&self, _x: f32, _y: f32) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::image::PitchedImage;
    use crate::error::BindError;
    use crate::images::device::Limits;
    use crate::pixel_formats::{Float4, R16Float, R32Float, RGBA32Float, ST32Float, StructureTensor, f16};

    fn ramp() -> PitchedImage<R32Float> {
        PitchedImage::new_with(4, 4, |t| (t.y * 4 + t.x) as f32)
    }

    fn assert_sync<T: Sync>(_: &T) {}

    #[test]
    fn drop_resets_filter_mode() {
        let device = Device::new(Limits::default());
        let image = ramp();
        for mode in [FilterMode::Nearest, FilterMode::Linear] {
            {
                let sampler = Sampler::new(&device, &image, mode).expect("bind");
                assert_eq!(sampler.filter_mode(), mode);
                assert_eq!(device.slot_state::<R32Float>().filter_mode, mode);
            }
            let state = device.slot_state::<R32Float>();
            assert_eq!(state.filter_mode, FilterMode::Nearest);
            assert!(!state.bound);
        }
        assert_eq!(device.slot_state::<R32Float>().binds, 2);
        assert_eq!(device.slot_state::<R32Float>().unbinds, 2);
    }

    #[test]
    fn nested_bind_of_same_slot_fails() {
        let device = Device::new(Limits::default());
        let a = ramp();
        let b = ramp();
        let first = Sampler::nearest(&device, &a).expect("bind");
        let second = Resampler::new(&device, &b, Scale::IDENTITY, FilterMode::Linear);
        assert_eq!(second.err(), Some(Error::SlotBusy { slot: crate::pixel_formats::SlotId::R32Float }));
        //first binding survives
        assert_eq!(first.sample(1.5, 0.5), 1.0);
        assert_eq!(device.slot_state::<R32Float>().filter_mode, FilterMode::Nearest);
        drop(first);
        let state = device.slot_state::<R32Float>();
        assert_eq!((state.binds, state.unbinds), (1, 1));
    }

    #[test]
    fn different_slots_bind_together() {
        let device = Device::new(Limits::default());
        let scalar = ramp();
        let half = PitchedImage::<R16Float>::new(2, 2, f16::from_f32(0.5));
        let color = PitchedImage::<RGBA32Float>::new(2, 2, Float4::new(1.0, 0.0, 0.0, 1.0));
        let tensor = PitchedImage::<ST32Float>::new(2, 2, StructureTensor::IDENTITY);

        let s1 = Sampler::nearest(&device, &scalar).expect("r32");
        let s2 = Sampler::new(&device, &half, FilterMode::Linear).expect("r16");
        let s4 = Sampler::nearest(&device, &color).expect("rgba32");
        let st = Resampler::new(&device, &tensor, Scale::uniform(0.5), FilterMode::Linear).expect("st");

        assert_eq!(s1.sample(0.5, 0.5), 0.0);
        assert_eq!(s2.sample(1.0, 1.0).to_f32(), 0.5);
        assert_eq!(s4.sample(1.0, 1.0).r, 1.0);
        assert_eq!(st.sample(3.0, 3.0), StructureTensor::IDENTITY);
    }

    #[test]
    fn rejected_bind_leaves_slot_untouched() {
        let device = Device::new(Limits::default());
        let tight = PitchedImage::<R32Float>::with_row_stride(3, 3, 3, 0.0);
        let err = Sampler::new(&device, &tight, FilterMode::Linear).expect_err("misaligned");
        assert_eq!(err, Error::Bind(BindError::MisalignedPitch { pitch: 12, alignment: 32 }));
        let state = device.slot_state::<R32Float>();
        assert!(!state.bound);
        assert_eq!(state.filter_mode, FilterMode::Nearest);
        assert_eq!((state.binds, state.unbinds), (0, 0));
    }

    #[test]
    fn device_limits_are_enforced() {
        let device = Device::new(Limits {
            pitch_alignment: 256,
            ..Limits::default()
        });
        let image = ramp();
        assert_eq!(
            Sampler::nearest(&device, &image).unwrap_err(),
            Error::Bind(BindError::MisalignedPitch { pitch: 32, alignment: 256 })
        );
        let aligned = PitchedImage::<R32Float>::new_aligned(4, 4, 256, 1.0);
        assert!(Sampler::nearest(&device, &aligned).is_ok());
    }

    #[test]
    fn one_by_one_image_clamps_everywhere() {
        let device = Device::new(Limits::default());
        let image = PitchedImage::<R32Float>::new(1, 1, 42.0);
        let sampler = Sampler::nearest(&device, &image).expect("bind");
        for &(x, y) in &[(0.0, 0.0), (0.5, 0.5), (0.99, 0.01), (-10.0, 3.0), (1e9, -1e9)] {
            assert_eq!(sampler.sample(x, y), 42.0);
        }
    }

    #[test]
    fn uniform_resample_matches_scaled_sample() {
        let device = Device::new(Limits::default());
        let image = ramp();
        let k = 0.5;
        let coords = [(0.5, 0.5), (3.0, 5.0), (7.5, 6.25), (1.0, 7.9)];
        for mode in [FilterMode::Nearest, FilterMode::Linear] {
            let expected: Vec<f32> = {
                let sampler = Sampler::new(&device, &image, mode).expect("bind");
                coords.iter().map(|&(x, y)| sampler.sample(k * x, k * y)).collect()
            };
            let resampler = Resampler::new(&device, &image, Scale::uniform(k), mode).expect("bind");
            let actual: Vec<f32> = coords.iter().map(|&(x, y)| resampler.sample(x, y)).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn asymmetric_scale_applies_per_axis() {
        let device = Device::new(Limits::default());
        let image = ramp();
        let resampler = Resampler::new(&device, &image, Scale::new(1.0, 0.25), FilterMode::Nearest).expect("bind");
        //x unscaled, y divided by four: (3.5, 12.5) reads texel (3, 3)
        assert_eq!(resampler.sample(3.5, 12.5), 15.0);
        //had y used the x factor, this would read texel (3, 0)
        assert_ne!(resampler.sample(3.5, 12.5), 3.0);
        assert_eq!(resampler.scale(), Scale::new(1.0, 0.25));
    }

    #[test]
    fn constant_sampler_has_no_slot_effects() {
        let device = Device::new(Limits::default());
        let before: Vec<_> = crate::pixel_formats::SlotId::ALL.iter().map(|&id| device.slot(id).state()).collect();
        let c = ConstantSampler::new(Float4::new(0.25, 0.5, 0.75, 1.0));
        for &(x, y) in &[(0.0, 0.0), (-1.0, 1e6), (f32::NAN, f32::INFINITY)] {
            assert_eq!(c.sample(x, y), Float4::new(0.25, 0.5, 0.75, 1.0));
        }
        let copy = c;
        assert_eq!(copy.value(), c.value());
        let after: Vec<_> = crate::pixel_formats::SlotId::ALL.iter().map(|&id| device.slot(id).state()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn samplers_are_shareable_across_workers() {
        let device = Device::new(Limits::default());
        let image = ramp();
        let sampler = Sampler::nearest(&device, &image).expect("bind");
        assert_sync(&sampler);
        let total: f32 = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|row| {
                    let sampler = &sampler;
                    s.spawn(move || (0..4).map(|x| sampler.sample(x as f32 + 0.5, row as f32 + 0.5)).sum::<f32>())
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("worker")).sum()
        });
        assert_eq!(total, (0..16).sum::<u32>() as f32);
    }

    #[test]
    fn generic_kernels_accept_any_sampler() {
        fn corner_sum<S: Sample<Output = f32>>(s: S) -> f32 {
            s.sample(0.5, 0.5) + s.sample(3.5, 3.5)
        }
        let device = Device::new(Limits::default());
        let image = ramp();
        let sampler = Sampler::nearest(&device, &image).expect("bind");
        assert_eq!(corner_sum(&sampler), 15.0);
        assert_eq!(corner_sum(ConstantSampler::new(2.0)), 4.0);
    }
}
