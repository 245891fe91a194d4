/*! Defines binding types */

pub mod sampler;
pub mod slot;
pub mod image;
pub mod coordinates;

pub use sampler::{ConstantSampler, FilterMode, Resampler, Sample, Sampler};
