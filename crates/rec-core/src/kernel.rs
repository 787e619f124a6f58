//! Kernel-wide settings a recording backend reads.
//!
//! These replace global kernel managers: the caller owns one
//! `KernelContext` and passes it by reference to the backend operations that
//! need thread layout or I/O settings.

use std::path::PathBuf;

use crate::{CoreError, CoreResult, ThreadId, Vp};

// ── IoSettings ────────────────────────────────────────────────────────────────

/// Where recorders put their files and whether they may replace existing ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IoSettings {
    /// Directory for output files.  Empty means the working directory.
    pub data_path: PathBuf,

    /// Prepended to every output file name.
    pub data_prefix: String,

    /// Allow enrollment to truncate a file that already exists.
    pub overwrite_files: bool,
}

// ── KernelContext ─────────────────────────────────────────────────────────────

/// Thread layout, network size and I/O settings for the current run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KernelContext {
    /// Worker threads in this process.
    pub num_threads: u32,

    /// Number of cooperating processes (ranks).  1 for a single-process run.
    pub num_processes: u32,

    /// Total nodes in the network; sets the width of the id field in
    /// filenames.
    pub node_count: u64,

    pub io: IoSettings,
}

impl Default for KernelContext {
    fn default() -> Self {
        Self {
            num_threads:   1,
            num_processes: 1,
            node_count:    0,
            io:            IoSettings::default(),
        }
    }
}

impl KernelContext {
    /// Single-process context with `num_threads` workers.
    pub fn new(num_threads: u32, node_count: u64) -> Self {
        Self { num_threads, node_count, ..Self::default() }
    }

    /// Reject layouts no kernel could run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.num_threads == 0 {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        if self.num_processes == 0 {
            return Err(CoreError::Config("num_processes must be at least 1".into()));
        }
        if self.num_virtual_processes().is_none() {
            return Err(CoreError::Config(format!(
                "{} threads × {} processes overflows the virtual process count",
                self.num_threads, self.num_processes
            )));
        }
        Ok(())
    }

    /// Threads × processes, or `None` on overflow.
    #[inline]
    pub fn num_virtual_processes(&self) -> Option<u32> {
        self.num_threads.checked_mul(self.num_processes)
    }

    /// Virtual process served by `thread` on process `rank`.
    ///
    /// Virtual processes are dealt round-robin over ranks:
    /// `vp = thread * num_processes + rank`.
    pub fn vp_for(&self, thread: ThreadId, rank: u32) -> CoreResult<Vp> {
        if thread.0 >= self.num_threads {
            return Err(CoreError::ThreadOutOfRange { thread, threads: self.num_threads });
        }
        if rank >= self.num_processes {
            return Err(CoreError::RankOutOfRange { rank, processes: self.num_processes });
        }
        Ok(Vp(thread.0 * self.num_processes + rank))
    }

    /// Local thread that serves `vp`.
    pub fn thread_of_vp(&self, vp: Vp) -> CoreResult<ThreadId> {
        let total = self.num_virtual_processes().unwrap_or(u32::MAX);
        if vp.0 >= total {
            return Err(CoreError::VpOutOfRange { vp, vps: total });
        }
        Ok(ThreadId(vp.0 / self.num_processes))
    }
}
