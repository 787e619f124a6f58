//! Output file naming.
//!
//! ```text
//! <data_path>/<data_prefix><label or name>-<gid>-<vp>.<extension>
//! ```
//!
//! `gid` is zero-padded to the number of digits in the network's node count
//! and `vp` to the number of digits in the virtual process count, so files of
//! one run sort naturally and names are stable across runs of the same size.

use std::path::PathBuf;

use rec_core::{KernelContext, RecordingDevice};

/// Builds file names for one enrollment phase.
///
/// Pure: holds a snapshot of the kernel settings and touches no files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilenameBuilder {
    data_path:   PathBuf,
    data_prefix: String,
    extension:   String,
    id_width:    usize,
    vp_width:    usize,
}

impl FilenameBuilder {
    pub fn new(kernel: &KernelContext, extension: &str) -> Self {
        let vps = kernel.num_virtual_processes().unwrap_or(u32::MAX);
        Self {
            data_path:   kernel.io.data_path.clone(),
            data_prefix: kernel.io.data_prefix.clone(),
            extension:   extension.to_owned(),
            id_width:    digits(kernel.node_count),
            vp_width:    digits(u64::from(vps)),
        }
    }

    /// Path of the file recording `device`.
    pub fn build(&self, device: &dyn RecordingDevice) -> PathBuf {
        let base = if device.label().is_empty() { device.name() } else { device.label() };
        let file = format!(
            "{prefix}{base}-{gid:0iw$}-{vp:0vw$}.{ext}",
            prefix = self.data_prefix,
            gid    = device.node_id().0,
            vp     = device.vp().0,
            ext    = self.extension,
            iw     = self.id_width,
            vw     = self.vp_width,
        );
        if self.data_path.as_os_str().is_empty() {
            PathBuf::from(file)
        } else {
            self.data_path.join(file)
        }
    }
}

/// Decimal digits in `n`, i.e. `floor(log10(n)) + 1`.  Zero counts as one
/// digit.
#[inline]
pub fn digits(n: u64) -> usize {
    n.max(1).ilog10() as usize + 1
}
