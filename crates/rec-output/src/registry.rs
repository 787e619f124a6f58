//! Per-thread file registry.
//!
//! Each worker thread owns one [`ThreadFiles`] partition mapping device ids to
//! their file entry.  A thread only ever touches its own partition during
//! enrollment and writing, so partitions can be handed out as disjoint `&mut`
//! borrows with no locking.
//!
//! # Entry lifecycle
//!
//! ```text
//! (absent) ──enroll ok──▶ Open ──close──▶ Closed
//!     │
//!     └──enroll error──▶ Failed
//! ```
//!
//! Re-enrolling a device closes its current entry and starts over.  Writes
//! reach only `Open` entries; everything else is dropped silently.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use rec_core::{Event, NodeId, RecordingDevice, ThreadId};
use tracing::{debug, error};

use crate::filename::FilenameBuilder;
use crate::record_file::RecordFile;
use crate::{OutputError, OutputResult};

// ── FileEntry ─────────────────────────────────────────────────────────────────

/// State of one device's output file.
pub(crate) enum FileState<W: io::Write> {
    Open(RecordFile<W>),
    /// Enrollment failed; the file was never opened by this entry.
    Failed,
    Closed,
}

/// A registry slot: the resolved file name and the handle state.
pub(crate) struct FileEntry<W: io::Write> {
    filename: PathBuf,
    state:    FileState<W>,
}

impl<W: io::Write> FileEntry<W> {
    fn filename(&self) -> &Path {
        &self.filename
    }

    fn is_open(&self) -> bool {
        matches!(self.state, FileState::Open(_))
    }

    /// Report a latched row error, then flush.  Does not close.  A failed file
    /// reports nothing further.
    fn flush(&mut self) -> OutputResult<()> {
        let FileState::Open(file) = &mut self.state else {
            return Ok(());
        };
        if let Some(source) = file.take_error() {
            return Err(OutputError::Write { path: self.filename.clone(), source });
        }
        file.flush()
            .map_err(|source| OutputError::Flush { path: self.filename.clone(), source })
    }

    /// Flush, release the handle and move to `Closed`.  Idempotent.
    fn close(&mut self) -> OutputResult<()> {
        let FileState::Open(mut file) = std::mem::replace(&mut self.state, FileState::Closed)
        else {
            return Ok(());
        };
        if let Some(source) = file.take_error() {
            return Err(OutputError::Write { path: self.filename.clone(), source });
        }
        if file.has_failed() {
            // Already reported.  The csv writer still retries its buffer when
            // dropped; that result is discarded.
            return Ok(());
        }
        file.close()
            .map_err(|source| OutputError::Flush { path: self.filename.clone(), source })
    }
}

// ── EnrollContext ─────────────────────────────────────────────────────────────

/// Everything a partition needs to enroll devices, detached from the backend
/// so workers can enroll in parallel while the backend is mutably borrowed.
#[derive(Clone, Debug)]
pub struct EnrollContext {
    pub filenames:       FilenameBuilder,
    pub precision:       u32,
    pub overwrite_files: bool,
}

// ── ThreadFiles ───────────────────────────────────────────────────────────────

/// The registry partition of one worker thread.
///
/// Only devices living on this partition's thread are accepted; a device of
/// another thread is rejected at enrollment and its writes are dropped.
pub struct ThreadFiles<W: io::Write = File> {
    thread:  ThreadId,
    entries: HashMap<NodeId, FileEntry<W>>,
}

impl ThreadFiles {
    /// Bind `device` to a fresh file and write its header.
    ///
    /// On failure the device keeps a `Failed` entry (so its file name is still
    /// reported) and every later write for it is dropped.  A device of another
    /// thread leaves the partition untouched.
    pub fn enroll(
        &mut self,
        ctx:                &EnrollContext,
        device:             &dyn RecordingDevice,
        double_value_names: &[&str],
        long_value_names:   &[&str],
    ) -> OutputResult<()> {
        let gid = device.node_id();

        if device.thread() != self.thread {
            return Err(OutputError::WrongPartition {
                device:        gid,
                device_thread: device.thread(),
                partition:     self.thread,
            });
        }

        if let Some(mut old) = self.entries.remove(&gid) {
            if let Err(e) = old.close() {
                error!("closing previous file of device {gid} on re-enrollment: {e}");
            }
        }

        let filename = ctx.filenames.build(device);

        if filename.exists() && !ctx.overwrite_files {
            error!(
                "The device file '{}' exists already and will not be overwritten. \
                 Please change data_path, data_prefix or label, or set overwrite_files \
                 to true in the kernel I/O settings.",
                filename.display()
            );
            self.insert_failed(gid, filename.clone());
            return Err(OutputError::OverwriteDenied { path: filename });
        }

        let mut file = match RecordFile::create(&filename, ctx.precision) {
            Ok(f) => f,
            Err(source) => {
                error!(
                    "I/O error while opening file '{}': {source}. This may be caused by \
                     too many open files in networks with many recording devices and threads.",
                    filename.display()
                );
                self.insert_failed(gid, filename.clone());
                return Err(OutputError::Open { path: filename, source });
            }
        };

        if let Err(source) =
            file.write_header(device.time_mode(), double_value_names, long_value_names)
        {
            error!("I/O error while writing header of '{}': {source}", filename.display());
            self.insert_failed(gid, filename.clone());
            return Err(OutputError::Write { path: filename, source });
        }

        debug!(thread = %self.thread, device = %gid, "enrolled {}", filename.display());
        self.insert_open(gid, filename, file);
        Ok(())
    }
}

impl<W: io::Write> ThreadFiles<W> {
    pub fn new(thread: ThreadId) -> Self {
        Self { thread, entries: HashMap::new() }
    }

    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    /// Register an already opened file for `gid`, replacing any entry.
    pub(crate) fn insert_open(&mut self, gid: NodeId, filename: PathBuf, file: RecordFile<W>) {
        self.entries.insert(gid, FileEntry { filename, state: FileState::Open(file) });
    }

    fn insert_failed(&mut self, gid: NodeId, filename: PathBuf) {
        self.entries.insert(gid, FileEntry { filename, state: FileState::Failed });
    }

    /// Append one row for `device`.  No-op unless the device lives on this
    /// partition's thread and is enrolled with an open file.
    #[inline]
    pub fn write(
        &mut self,
        device:        &dyn RecordingDevice,
        event:         &Event,
        double_values: &[f64],
        long_values:   &[i64],
    ) {
        if device.thread() != self.thread {
            return;
        }
        if let Some(FileEntry { state: FileState::Open(file), .. }) =
            self.entries.get_mut(&device.node_id())
        {
            file.write_row(event, device.time_mode(), double_values, long_values);
        }
    }

    /// Flush every open file.  All files are attempted; the first error is
    /// returned and every error is logged.
    pub fn flush_all(&mut self) -> OutputResult<()> {
        first_error(self.entries.values_mut().map(FileEntry::flush))
    }

    /// Close every open file.  All files are attempted; the first error is
    /// returned and every error is logged.
    pub fn close_all(&mut self) -> OutputResult<()> {
        first_error(self.entries.values_mut().map(FileEntry::close))
    }

    pub fn filename(&self, gid: NodeId) -> Option<&Path> {
        self.entries.get(&gid).map(FileEntry::filename)
    }

    pub fn open_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_open()).count()
    }
}

/// Drain `results`, logging each error and keeping the first.
pub(crate) fn first_error(results: impl Iterator<Item = OutputResult<()>>) -> OutputResult<()> {
    let mut first = None;
    for result in results {
        if let Err(e) = result {
            error!("{e}");
            first.get_or_insert(e);
        }
    }
    first.map_or(Ok(()), Err)
}

/// Drain `results`, keeping the first error.  Errors are assumed to have been
/// logged where they were produced.
pub(crate) fn keep_first(results: impl Iterator<Item = OutputResult<()>>) -> OutputResult<()> {
    results.fold(Ok(()), |acc, r| acc.and(r))
}
