// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The device: a table of texture slots plus the limits its texture units enforce.

Texture units are a process-wide resource, so there is exactly one device per process:
[`Device::shared`].  Every handle to it sees the same slots, and a slot bound through one handle
is busy through all of them.
*/

use crate::bindings::slot::{SlotState, TextureSlot};
use crate::error::Error;
use crate::pixel_formats::{PixelFormat, SlotId};
use std::sync::OnceLock;

/// Default row pitch alignment in bytes.
pub const DEFAULT_PITCH_ALIGNMENT: usize = 32;

/**
Limits a device's texture units place on bound images.

```
use texture_samplers::images::device::Limits;

let limits = Limits { pitch_alignment: 256, ..Limits::default() };
assert_eq!(limits.max_width, 65536);
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Widest bindable image, in pixels.
    pub max_width: u32,
    /// Tallest bindable image, in pixels.
    pub max_height: u32,
    /// Row pitches must be a multiple of this many bytes.
    pub pitch_alignment: usize,
    /// Largest accepted row pitch, in bytes.
    pub max_pitch: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_width: 65536,
            max_height: 65535,
            pitch_alignment: DEFAULT_PITCH_ALIGNMENT,
            max_pitch: 1 << 20,
        }
    }
}

#[derive(Debug)]
pub struct Device {
    limits: Limits,
    slots: [TextureSlot; SlotId::COUNT],
}

static SHARED: OnceLock<Device> = OnceLock::new();

impl Device {
    /// Builds a device with slots of its own.  Outside unit tests, only [`Device::shared`] calls this.
    pub(crate) fn new(limits: Limits) -> Self {
        logwise::info_sync!(
            "Creating texture device with limits {limits}",
            limits = logwise::privacy::LogIt(&limits)
        );
        Self {
            limits,
            slots: SlotId::ALL.map(TextureSlot::new),
        }
    }

    /// The process-wide device, created with default limits on first use.
    pub fn shared() -> &'static Device {
        SHARED.get_or_init(|| Device::new(Limits::default()))
    }

    /// Creates the process-wide device with `limits`.
    ///
    /// Fails with [`Error::AlreadyConfigured`] if the shared device already exists, whether it
    /// was configured earlier or created by [`Device::shared`].
    pub fn configure_shared(limits: Limits) -> Result<&'static Device, Error> {
        let mut created = false;
        let device = SHARED.get_or_init(|| {
            created = true;
            Device::new(limits)
        });
        if created {
            Ok(device)
        } else {
            logwise::warn_sync!("Ignoring configuration of the already initialized shared device");
            Err(Error::AlreadyConfigured)
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Snapshot of the slot that `Format` binds to.
    pub fn slot_state<Format: PixelFormat>(&self) -> SlotState {
        self.slot(Format::SLOT).state()
    }

    /// Snapshot of every slot, in [`SlotId::ALL`] order.
    pub fn slot_states(&self) -> [SlotState; SlotId::COUNT] {
        SlotId::ALL.map(|id| self.slot(id).state())
    }

    pub(crate) fn slot(&self, id: SlotId) -> &TextureSlot {
        &self.slots[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::sampler::FilterMode;
    use crate::pixel_formats::{R16Float, ST32Float};

    #[test]
    fn fresh_device_is_idle() {
        let device = Device::new(Limits::default());
        for (state, id) in device.slot_states().iter().zip(SlotId::ALL) {
            assert_eq!(state.slot, id);
            assert!(!state.bound);
            assert_eq!(state.filter_mode, FilterMode::Nearest);
            assert_eq!((state.binds, state.unbinds), (0, 0));
        }
    }

    #[test]
    fn slots_follow_formats() {
        let device = Device::new(Limits::default());
        assert_eq!(device.slot_state::<R16Float>().slot, SlotId::R16Float);
        assert_eq!(device.slot_state::<ST32Float>().slot, SlotId::ST32Float);
    }
}
