// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Texture slot state tracking.
//!
//! A texture slot is a single addressable texture unit.  Each [`Device`](crate::images::Device)
//! owns one slot per pixel format, and a slot can hold at most one bound image at a time.
//!
//! Slots transition between two states:
//! - `UNBOUND`: no image is bound; the filter mode is [`FilterMode::Nearest`]
//! - `BOUND`: a sampler holds the slot
//!
//! The transitions are atomic, so a second bind of a busy slot fails instead of silently
//! replacing the first binding.  No lock is taken on the sampling path.

use crate::bindings::sampler::FilterMode;
use crate::error::Error;
use crate::pixel_formats::SlotId;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

const NEAREST: u8 = 0;
const LINEAR: u8 = 1;

fn encode(mode: FilterMode) -> u8 {
    match mode {
        FilterMode::Nearest => NEAREST,
        FilterMode::Linear => LINEAR,
    }
}

fn decode(raw: u8) -> FilterMode {
    match raw {
        LINEAR => FilterMode::Linear,
        _ => FilterMode::Nearest,
    }
}

/// A point-in-time view of one slot, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotState {
    pub slot: SlotId,
    pub bound: bool,
    pub filter_mode: FilterMode,
    /// Successful binds since the device was created.
    pub binds: u64,
    /// Releases since the device was created.
    pub unbinds: u64,
}

#[derive(Debug)]
pub(crate) struct TextureSlot {
    id: SlotId,
    bound: AtomicBool,
    filter_mode: AtomicU8,
    binds: AtomicU64,
    unbinds: AtomicU64,
}

impl TextureSlot {
    pub(crate) const fn new(id: SlotId) -> Self {
        Self {
            id,
            bound: AtomicBool::new(false),
            filter_mode: AtomicU8::new(NEAREST),
            binds: AtomicU64::new(0),
            unbinds: AtomicU64::new(0),
        }
    }

    pub(crate) fn id(&self) -> SlotId {
        self.id
    }

    /// Claims the slot and sets its filter mode.
    pub(crate) fn acquire(&self, filter_mode: FilterMode) -> Result<(), Error> {
        if self
            .bound
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            logwise::warn_sync!(
                "Nested bind of texture slot {slot}",
                slot = logwise::privacy::LogIt(&self.id)
            );
            return Err(Error::SlotBusy { slot: self.id });
        }
        self.filter_mode.store(encode(filter_mode), Ordering::Relaxed);
        self.binds.fetch_add(1, Ordering::Relaxed);
        logwise::trace_sync!(
            "bound texture slot {slot} filter={filter}",
            slot = logwise::privacy::LogIt(&self.id),
            filter = logwise::privacy::LogIt(&filter_mode)
        );
        Ok(())
    }

    /// Resets the filter mode to nearest and frees the slot.
    pub(crate) fn release(&self) {
        self.filter_mode.store(NEAREST, Ordering::Relaxed);
        let was_bound = self.bound.swap(false, Ordering::Release);
        if !was_bound {
            logwise::error_sync!(
                "Released texture slot {slot} that was not bound",
                slot = logwise::privacy::LogIt(&self.id)
            );
            debug_assert!(was_bound, "released unbound texture slot {:?}", self.id);
            return;
        }
        self.unbinds.fetch_add(1, Ordering::Relaxed);
        logwise::trace_sync!(
            "unbound texture slot {slot}",
            slot = logwise::privacy::LogIt(&self.id)
        );
    }

    pub(crate) fn state(&self) -> SlotState {
        SlotState {
            slot: self.id,
            bound: self.bound.load(Ordering::Acquire),
            filter_mode: decode(self.filter_mode.load(Ordering::Relaxed)),
            binds: self.binds.load(Ordering::Relaxed),
            unbinds: self.unbinds.load(Ordering::Relaxed),
        }
    }
}
