// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Error types.
//!
//! Hardware rejections ([`BindError`]) and caller-contract violations
//! ([`Error::SlotBusy`], [`Error::AlreadyConfigured`]) are kept apart so callers can tell a
//! bad image from a bug in their own scoping.

use crate::pixel_formats::SlotId;

/// The texture unit refused to bind an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("image pointer is null")]
    NullPointer,
    #[error("image has zero extent ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("image {width}x{height} exceeds the device limit of {max_width}x{max_height}")]
    TooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("row pitch {pitch} is smaller than a row of {row_bytes} bytes")]
    PitchTooSmall { pitch: usize, row_bytes: usize },
    #[error("row pitch {pitch} is not a multiple of the {alignment}-byte pitch alignment")]
    MisalignedPitch { pitch: usize, alignment: usize },
    #[error("row pitch {pitch} exceeds the device limit of {max_pitch} bytes")]
    PitchTooLarge { pitch: usize, max_pitch: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("bind rejected: {0}")]
    Bind(#[from] BindError),
    /// Another sampler holds the slot.  Samplers of one slot must not overlap.
    #[error("texture slot {slot:?} is already bound")]
    SlotBusy { slot: SlotId },
    /// The shared device was configured after it had already been created.
    #[error("the shared device is already initialized")]
    AlreadyConfigured,
    /// A kernel launch could not start its worker threads.
    #[error("could not start kernel workers: {0}")]
    Workers(String),
}

impl Error {
    /// Whether this error reports a caller-contract violation rather than a runtime failure.
    pub fn is_logic_error(&self) -> bool {
        matches!(self, Error::SlotBusy { .. } | Error::AlreadyConfigured)
    }
}
