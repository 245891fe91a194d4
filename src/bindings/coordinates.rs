// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Coordinate types.

Samplers use unnormalized pixel coordinates, in which

```text
           x
      0 ────────▶
      │ ┌───────┐
    y │ │       │
      │ │       │
      │ │       │
      ▼ └───────┘
 ```

Pixel `(i, j)` covers the square `[i, i+1) × [j, j+1)`, so its center is at `(i + 0.5, j + 0.5)`.
*/

/// Integer pixel coordinates. The origin (0, 0) is at the top-left corner.
///
/// ```
/// use texture_samplers::bindings::coordinates::Texel;
///
/// let texel = Texel { x: 10, y: 20 };
/// assert_eq!(texel.center(), (10.5, 20.5));
/// assert_eq!(Texel::ZERO, Texel { x: 0, y: 0 });
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Texel {
    pub x: u32,
    pub y: u32,
}

impl Texel {
    pub const ZERO: Texel = Texel { x: 0, y: 0 };

    /// Converts texel coordinates to a linear element index for a row stride given in elements.
    #[inline]
    pub(crate) const fn vec_offset(&self, stride: usize) -> usize {
        stride * self.y as usize + self.x as usize
    }

    /// The floating-point coordinate of this texel's center.
    ///
    /// Sampling a texel's center returns that texel exactly in both filter modes.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x as f32 + 0.5, self.y as f32 + 0.5)
    }
}

/**
Per-axis coordinate scale applied by a [`Resampler`](crate::bindings::sampler::Resampler).

A kernel running over a `W × H` grid that reads a texture of size `w × h` uses
`Scale::new(w / W, h / H)` so that its own coordinates land on the matching
positions of the differently sized texture.

```
use texture_samplers::bindings::coordinates::Scale;

let half = Scale::uniform(0.5);
assert_eq!(half.apply(4.0, 8.0), (2.0, 4.0));

let stretched = Scale::new(2.0, 0.5);
assert_eq!(stretched.apply(1.0, 1.0), (2.0, 0.5));
```
*/
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The same factor on both axes.
    #[inline]
    pub const fn uniform(k: f32) -> Self {
        Self { x: k, y: k }
    }

    /// The scale mapping a `from_width × from_height` grid onto a `to_width × to_height` texture.
    pub fn between(from_width: u32, from_height: u32, to_width: u32, to_height: u32) -> Self {
        Self {
            x: to_width as f32 / from_width as f32,
            y: to_height as f32 / from_height as f32,
        }
    }

    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x * x, self.y * y)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::IDENTITY
    }
}
