// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Per-pixel kernel launches.

A launch runs a kernel once per texel of a grid on rayon's worker threads, one row per task,
and collects the results into a new [`PitchedImage`].  The launch returns only after every task
has finished, so samplers borrowed by the kernel are guaranteed to outlive every fetch:

```
use texture_samplers::bindings::image::PitchedImage;
use texture_samplers::bindings::sampler::{FilterMode, Sample, Sampler};
use texture_samplers::images::{Device, kernel};
use texture_samplers::pixel_formats::R32Float;

let device = Device::shared();
let src = PitchedImage::<R32Float>::new_with(8, 8, |t| t.x as f32);
let doubled = {
    let sampler = Sampler::new(device, &src, FilterMode::Nearest)?;
    kernel::launch::<R32Float, _>(8, 8, |t| {
        let (x, y) = t.center();
        2.0 * sampler.sample(x, y)
    })
};
assert_eq!(doubled.row(3)[5], 10.0);
# Ok::<(), texture_samplers::error::Error>(())
```
*/

use crate::bindings::coordinates::Texel;
use crate::bindings::image::PitchedImage;
use crate::error::Error;
use crate::pixel_formats::PixelFormat;
use rayon::prelude::*;
use std::num::NonZeroUsize;

/// Runs `kernel` for every texel of a `width × height` grid on the global rayon pool.
pub fn launch<Format, K>(width: u32, height: u32, kernel: K) -> PitchedImage<Format>
where
    Format: PixelFormat,
    Format::CPixel: Default,
    K: Fn(Texel) -> Format::CPixel + Sync,
{
    let mut output = PitchedImage::<Format>::new(width, height, Format::CPixel::default());
    if width == 0 || height == 0 {
        return output;
    }
    let threads = rayon::current_num_threads();
    logwise::trace_sync!(
        "launch {w}x{h} on {n} threads",
        w = logwise::privacy::LogIt(&width),
        h = logwise::privacy::LogIt(&height),
        n = logwise::privacy::LogIt(&threads)
    );
    output.par_rows_mut().enumerate().for_each(|(y, row)| {
        for (x, pixel) in row[..width as usize].iter_mut().enumerate() {
            *pixel = kernel(Texel {
                x: x as u32,
                y: y as u32,
            });
        }
    });
    output
}

/// Runs `kernel` for every texel of a `width × height` grid on a dedicated pool of `workers`
/// threads.
pub fn launch_with_workers<Format, K>(
    width: u32,
    height: u32,
    workers: NonZeroUsize,
    kernel: K,
) -> Result<PitchedImage<Format>, Error>
where
    Format: PixelFormat,
    Format::CPixel: Default,
    K: Fn(Texel) -> Format::CPixel + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.get())
        .thread_name(|i| format!("texture-kernel-{i}"))
        .build()
        .map_err(|e| {
            logwise::error_sync!(
                "Could not start kernel workers: {err}",
                err = logwise::privacy::LogIt(&e)
            );
            Error::Workers(e.to_string())
        })?;
    Ok(pool.install(|| launch(width, height, &kernel)))
}
