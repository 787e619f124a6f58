//! Error type for kernel-context validation.

use thiserror::Error;

use crate::{ThreadId, Vp};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("thread {thread} out of range ({threads} threads)")]
    ThreadOutOfRange { thread: ThreadId, threads: u32 },

    #[error("rank {rank} out of range ({processes} processes)")]
    RankOutOfRange { rank: u32, processes: u32 },

    #[error("virtual process {vp} out of range ({vps} virtual processes)")]
    VpOutOfRange { vp: Vp, vps: u32 },
}

/// Shorthand result type for `rec-core`.
pub type CoreResult<T> = Result<T, CoreError>;
