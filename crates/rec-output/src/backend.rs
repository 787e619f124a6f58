//! The `RecordingBackend` trait implemented by every output sink.

use rec_core::{Event, KernelContext, RecordingDevice};

use crate::OutputResult;
use crate::status::Dictionary;

/// The shape every recording backend has, so the kernel can drive all of them
/// the same way.
///
/// # Call order
///
/// ```text
/// prepare
/// pre_run_hook                      once per run, single-threaded
///   enroll  (per device)            setup phase, per thread
///   write   (per event)  ──┐        run phase, per thread
///   synchronize          ──┘ per step
/// post_run_hook                     single-threaded
/// cleanup                           teardown
/// ```
///
/// `write` has no return value: a recorder must never abort a running
/// simulation.  Backends latch write failures and report them from
/// `post_run_hook` or `cleanup`.
///
/// Hooks without work to do default to no-ops.
pub trait RecordingBackend {
    /// Bind `device` to this backend for the coming run.
    ///
    /// Every later `write` for the device supplies exactly
    /// `double_value_names.len()` doubles and `long_value_names.len()` longs.
    fn enroll(
        &mut self,
        kernel:             &KernelContext,
        device:             &dyn RecordingDevice,
        double_value_names: &[&str],
        long_value_names:   &[&str],
    ) -> OutputResult<()>;

    /// Record one event for `device`.
    fn write(
        &mut self,
        device:        &dyn RecordingDevice,
        event:         &Event,
        double_values: &[f64],
        long_values:   &[i64],
    );

    /// Called once before the first run after a kernel reset.
    fn prepare(&mut self) {}

    /// Called at the start of every run.
    fn pre_run_hook(&mut self, _kernel: &KernelContext) -> OutputResult<()> {
        Ok(())
    }

    /// Called at the end of every run.
    fn post_run_hook(&mut self) -> OutputResult<()> {
        Ok(())
    }

    /// Release every resource held for enrolled devices.  Idempotent.
    fn cleanup(&mut self) -> OutputResult<()> {
        Ok(())
    }

    /// Called once per time step for backends that need a barrier.
    fn synchronize(&mut self) {}

    /// Discard data recorded for `device`, where the backend keeps any.
    fn clear(&mut self, _device: &dyn RecordingDevice) {}

    /// Update backend-wide parameters from `d`.  All or nothing.
    fn set_status(&mut self, _d: &Dictionary) -> OutputResult<()> {
        Ok(())
    }

    /// Report backend-wide parameters into `d`.
    fn get_status(&self, _d: &mut Dictionary) {}

    /// Update per-device backend settings from `d`.
    fn set_device_status(
        &mut self,
        _device: &dyn RecordingDevice,
        _d:      &Dictionary,
    ) -> OutputResult<()> {
        Ok(())
    }

    /// Report per-device backend state into `d`.
    fn get_device_status(&self, _device: &dyn RecordingDevice, _d: &mut Dictionary) {}
}
