//! Error types for rec-output.

use std::path::PathBuf;

use rec_core::{CoreError, NodeId, ThreadId};
use thiserror::Error;

/// Errors a recording backend reports to its caller.
///
/// Only enrollment, status updates and the lifecycle hooks return these.
/// `write` never does; write failures are latched per file and come back
/// from the next flush or close.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("device file '{}' exists already and will not be overwritten", path.display())]
    OverwriteDenied { path: PathBuf },

    #[error("I/O error while opening file '{}': {source}", path.display())]
    Open {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write error on file '{}': {source}", path.display())]
    Write {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error while flushing file '{}': {source}", path.display())]
    Flush {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad property '{key}': {reason}")]
    BadProperty { key: String, reason: String },

    #[error("device thread {thread} has no file registry ({threads} threads prepared)")]
    ThreadOutOfRange { thread: ThreadId, threads: usize },

    #[error("device {device} lives on thread {device_thread}, not on partition {partition}")]
    WrongPartition { device: NodeId, device_thread: ThreadId, partition: ThreadId },

    #[error("kernel context: {0}")]
    Kernel(#[from] CoreError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
