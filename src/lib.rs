/*! texture_samplers binds image memory to texture slots and samples it from per-pixel kernels.

Image filters built on texture hardware all do the same dance: bind an image to a texture unit,
launch a kernel whose work items fetch from that unit at floating-point coordinates, wait for
the kernel, unbind.  This crate packages the dance as a small family of samplers:

| Type                | Binds a slot | Coordinates          | Typical use                                    |
|---------------------|--------------|----------------------|------------------------------------------------|
| [`Sampler`]         | yes          | as given             | reading the input image of a filter            |
| [`Resampler`]       | yes          | scaled per axis      | reading a texture of a different resolution    |
| [`ConstantSampler`] | no           | ignored              | a disabled input, a neutral tensor field       |

All three implement [`Sample`], and kernels are generic over it.

# Slots

The process has one texture slot per pixel format, held by the shared
[`Device`](images::Device).  Formats fall into three channel-width categories,
single-channel ([`R32Float`](pixel_formats::R32Float), [`R16Float`](pixel_formats::R16Float)),
four-channel
([`RGBA32Float`](pixel_formats::RGBA32Float), [`RGBA16Float`](pixel_formats::RGBA16Float)) and
structure-tensor fields ([`ST32Float`](pixel_formats::ST32Float)), and the format in a sampler's
type picks its slot at compile time.

A slot holds one image at a time.  Constructing a sampler binds; dropping it unbinds and resets
the slot to nearest filtering.  Binding a slot that is already held is an error rather than a
silent rebind.

# Sampling

Coordinates are unnormalized pixel coordinates with pixel centers at `i + 0.5`.  Out-of-range
coordinates clamp to the edge.  Filtering is done by the texture unit, never by the sampler.

# Example

```
use texture_samplers::{FilterMode, Sample, Sampler};
use texture_samplers::bindings::image::PitchedImage;
use texture_samplers::images::{Device, kernel};
use texture_samplers::pixel_formats::R32Float;

let device = Device::shared();
let input = PitchedImage::<R32Float>::new_with(64, 64, |t| (t.x + t.y) as f32);

let blurred = {
    let src = Sampler::new(device, &input, FilterMode::Linear)?;
    kernel::launch::<R32Float, _>(64, 64, |t| {
        let (x, y) = t.center();
        // a 2x2 box filter for the price of one fetch
        src.sample(x + 0.5, y + 0.5)
    })
};
assert_eq!(blurred.row(0)[0], 1.0);
# Ok::<(), texture_samplers::error::Error>(())
```
*/

pub mod bindings;
pub mod error;
pub mod images;
pub mod pixel_formats;
mod imp;

pub use bindings::{ConstantSampler, FilterMode, Resampler, Sample, Sampler};
pub use error::{BindError, Error};
