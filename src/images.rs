/*! The device-side component of texture_samplers: texture slot tables and kernel launches */

pub mod device;
pub mod kernel;

pub use device::{Device, Limits};
