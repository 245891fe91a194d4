//! The process-wide device.  These tests share its slots, so they take turns.

use std::sync::Mutex;
use texture_samplers::bindings::image::PitchedImage;
use texture_samplers::images::device::Limits;
use texture_samplers::images::Device;
use texture_samplers::pixel_formats::{R16Float, R32Float, f16};
use texture_samplers::{Error, FilterMode, Sample, Sampler};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> std::sync::MutexGuard<'static, ()> {
    //a failed test poisons the lock; the slots are still consistent, so carry on
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

#[test]
fn shared_device_is_a_singleton() {
    let _turn = serial();
    let a = Device::shared();
    let b = Device::shared();
    assert!(std::ptr::eq(a, b));
    assert_eq!(Device::configure_shared(Limits::default()).unwrap_err(), Error::AlreadyConfigured);
}

#[test]
fn nested_binds_on_the_shared_device() {
    let _turn = serial();
    let device = Device::shared();
    let image = PitchedImage::<R32Float>::new(4, 4, 1.0);
    let before = device.slot_state::<R32Float>();

    let outer = Sampler::new(device, &image, FilterMode::Linear).expect("bind");
    let inner = Sampler::nearest(device, &image);
    assert!(matches!(inner, Err(Error::SlotBusy { .. })));

    //another format of the same channel width has a slot of its own
    let half = PitchedImage::<R16Float>::new(4, 4, f16::ONE);
    let other = Sampler::nearest(device, &half).expect("separate slot");
    assert_eq!(other.sample(2.0, 2.0), f16::ONE);
    assert_eq!(outer.sample(2.0, 2.0), 1.0);
    drop(other);
    drop(outer);

    let after = device.slot_state::<R32Float>();
    assert!(!after.bound);
    assert_eq!(after.filter_mode, FilterMode::Nearest);
    assert_eq!(after.binds - before.binds, 1);
    assert_eq!(after.unbinds - before.unbinds, 1);
}

#[test]
fn every_handle_sees_the_same_slots() {
    let _turn = serial();
    let image = PitchedImage::<R32Float>::new(2, 2, 3.0);
    let held = Sampler::nearest(Device::shared(), &image).expect("bind");

    //a fresh handle, on this thread and on another, finds the slot taken
    let again = Sampler::new(Device::shared(), &image, FilterMode::Linear);
    assert!(matches!(again, Err(Error::SlotBusy { .. })));
    let elsewhere = std::thread::scope(|s| {
        s.spawn(|| Sampler::nearest(Device::shared(), &image).map(|_| ()))
            .join()
            .expect("thread")
    });
    assert!(matches!(elsewhere, Err(Error::SlotBusy { .. })));
    assert_eq!(Device::shared().slot_state::<R32Float>().filter_mode, FilterMode::Nearest);

    assert_eq!(held.sample(0.5, 0.5), 3.0);
    drop(held);
    assert!(Sampler::nearest(Device::shared(), &image).is_ok());
}
