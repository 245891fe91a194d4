// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The texture unit behind the samplers: descriptor validation and texel fetches.

mod software;

pub(crate) use software::*;
