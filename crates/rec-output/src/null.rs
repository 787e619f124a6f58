//! A backend that records nothing.

use rec_core::{Event, KernelContext, RecordingDevice};

use crate::OutputResult;
use crate::backend::RecordingBackend;

/// A [`RecordingBackend`] that accepts every device and drops every event.
/// Use it when a kernel must be driven but no output is wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl RecordingBackend for NullBackend {
    fn enroll(
        &mut self,
        _kernel: &KernelContext,
        _device: &dyn RecordingDevice,
        _double: &[&str],
        _long:   &[&str],
    ) -> OutputResult<()> {
        Ok(())
    }

    #[inline]
    fn write(&mut self, _device: &dyn RecordingDevice, _event: &Event, _double: &[f64], _long: &[i64]) {}
}
