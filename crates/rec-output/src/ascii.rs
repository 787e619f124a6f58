//! Plain-text backend: one tab-separated file per device per thread.
//!
//! The backend owns the registry outright; there is no process-wide file
//! table.  Kernel settings come in through [`KernelContext`] on the calls that
//! need them.

use std::path::Path;

use rec_core::{Event, KernelContext, RecordingDevice, ThreadId};
use tracing::debug;

use crate::backend::RecordingBackend;
use crate::filename::FilenameBuilder;
use crate::params::AsciiParams;
use crate::registry::{EnrollContext, ThreadFiles, keep_first};
use crate::status::{Dictionary, append_property, names};
use crate::{OutputError, OutputResult};

/// Writes each enrolled device's events to its own text file.
///
/// # Parallel use
///
/// Enrollment and writing only touch the partition of the device's thread.
/// Worker threads can therefore drive their own partitions directly:
///
/// ```rust,ignore
/// let ctx = backend.enroll_context(&kernel);
/// std::thread::scope(|s| {
///     for files in backend.threads_mut() {
///         let (ctx, recorder) = (&ctx, &recorders[files.thread().index()]);
///         s.spawn(move || {
///             files.enroll(&ctx, recorder, &[], &["weight"]).ok();
///             files.write(recorder, &event, &[], &[42]);
///         });
///     }
/// });
/// ```
#[derive(Default)]
pub struct AsciiBackend {
    files:  Vec<ThreadFiles>,
    params: AsciiParams,
}

impl AsciiBackend {
    /// A backend with default parameters and no partitions; call
    /// [`pre_run_hook`][RecordingBackend::pre_run_hook] before enrolling.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &AsciiParams {
        &self.params
    }

    /// Snapshot of what enrollment needs for the current parameters and
    /// `kernel` settings.
    pub fn enroll_context(&self, kernel: &KernelContext) -> EnrollContext {
        EnrollContext {
            filenames:       FilenameBuilder::new(kernel, &self.params.file_extension),
            precision:       self.params.precision,
            overwrite_files: kernel.io.overwrite_files,
        }
    }

    /// All partitions, indexed by thread.
    pub fn threads_mut(&mut self) -> &mut [ThreadFiles] {
        &mut self.files
    }

    /// All partitions as a Rayon parallel iterator.
    #[cfg(feature = "parallel")]
    pub fn par_threads_mut(&mut self) -> rayon::slice::IterMut<'_, ThreadFiles> {
        use rayon::prelude::*;
        self.files.par_iter_mut()
    }

    pub fn thread_files(&self, thread: ThreadId) -> Option<&ThreadFiles> {
        self.files.get(thread.index())
    }

    pub fn thread_count(&self) -> usize {
        self.files.len()
    }

    /// Open files across all threads.
    pub fn open_file_count(&self) -> usize {
        self.files.iter().map(ThreadFiles::open_count).sum()
    }

    /// Resolved file name of `device`, once it has been enrolled (even if the
    /// enrollment failed).
    pub fn filename(&self, device: &dyn RecordingDevice) -> Option<&Path> {
        self.thread_files(device.thread())?.filename(device.node_id())
    }
}

impl RecordingBackend for AsciiBackend {
    fn enroll(
        &mut self,
        kernel:             &KernelContext,
        device:             &dyn RecordingDevice,
        double_value_names: &[&str],
        long_value_names:   &[&str],
    ) -> OutputResult<()> {
        let ctx = self.enroll_context(kernel);
        let threads = self.files.len();
        let files = self
            .files
            .get_mut(device.thread().index())
            .ok_or(OutputError::ThreadOutOfRange { thread: device.thread(), threads })?;
        files.enroll(&ctx, device, double_value_names, long_value_names)
    }

    #[inline]
    fn write(
        &mut self,
        device:        &dyn RecordingDevice,
        event:         &Event,
        double_values: &[f64],
        long_values:   &[i64],
    ) {
        if let Some(files) = self.files.get_mut(device.thread().index()) {
            files.write(device, event, double_values, long_values);
        }
    }

    /// Close everything from the previous run, then size the registry to the
    /// kernel's current thread count.
    fn pre_run_hook(&mut self, kernel: &KernelContext) -> OutputResult<()> {
        kernel.validate()?;
        let closed = keep_first(self.files.iter_mut().map(ThreadFiles::close_all));
        self.files = (0..kernel.num_threads).map(|t| ThreadFiles::new(ThreadId(t))).collect();
        debug!(threads = kernel.num_threads, "file registry reset");
        closed
    }

    fn post_run_hook(&mut self) -> OutputResult<()> {
        keep_first(self.files.iter_mut().map(ThreadFiles::flush_all))
    }

    fn cleanup(&mut self) -> OutputResult<()> {
        let open = self.open_file_count();
        let result = keep_first(self.files.iter_mut().map(ThreadFiles::close_all));
        if open > 0 {
            debug!(files = open, "closed device files");
        }
        result
    }

    fn set_status(&mut self, d: &Dictionary) -> OutputResult<()> {
        let mut tmp = self.params.clone();
        tmp.set(d)?;
        self.params = tmp;
        Ok(())
    }

    fn get_status(&self, d: &mut Dictionary) {
        self.params.get(d);
    }

    fn get_device_status(&self, device: &dyn RecordingDevice, d: &mut Dictionary) {
        if let Some(filename) = self.filename(device) {
            append_property(d, names::FILENAMES, filename.display().to_string());
        }
    }
}

impl Drop for AsciiBackend {
    fn drop(&mut self) {
        // Errors were already logged per file.
        let _ = self.cleanup();
    }
}
