//! Recording devices and the events they hand to a backend.

use crate::{NodeId, SimTime, ThreadId, TimeMode, Vp};

// ── RecordingDevice ───────────────────────────────────────────────────────────

/// What a recording backend needs to know about the device it records for.
///
/// The kernel's device layer implements this; backends only read from it.
/// [`DeviceSpec`] is a plain-data implementation for kernels (and tests) that
/// do not have a richer device type.
pub trait RecordingDevice {
    /// Local worker thread the device lives on.
    fn thread(&self) -> ThreadId;

    /// Global id of the device itself.
    fn node_id(&self) -> NodeId;

    /// Virtual process the device is assigned to.
    fn vp(&self) -> Vp;

    /// User label; empty when none was set.
    fn label(&self) -> &str;

    /// Model name, e.g. `"spike_recorder"`.
    fn name(&self) -> &str;

    /// How event times are reported for this device.
    fn time_mode(&self) -> TimeMode;
}

// ── DeviceSpec ────────────────────────────────────────────────────────────────

/// Plain-data [`RecordingDevice`].
///
/// ```rust
/// use rec_core::{DeviceSpec, NodeId, ThreadId, TimeMode, Vp};
///
/// let dev = DeviceSpec::new("spike_recorder", NodeId(7))
///     .with_thread(ThreadId(1))
///     .with_vp(Vp(1))
///     .with_time_mode(TimeMode::Stepped);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceSpec {
    pub node_id:   NodeId,
    pub thread:    ThreadId,
    pub vp:        Vp,
    pub label:     String,
    pub name:      String,
    pub time_mode: TimeMode,
}

impl DeviceSpec {
    /// A device on thread 0 / vp 0, unlabeled, continuous time.
    pub fn new(name: impl Into<String>, node_id: NodeId) -> Self {
        Self {
            node_id,
            thread:    ThreadId(0),
            vp:        Vp(0),
            label:     String::new(),
            name:      name.into(),
            time_mode: TimeMode::Continuous,
        }
    }

    pub fn with_thread(mut self, thread: ThreadId) -> Self {
        self.thread = thread;
        self
    }

    pub fn with_vp(mut self, vp: Vp) -> Self {
        self.vp = vp;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }
}

impl RecordingDevice for DeviceSpec {
    fn thread(&self) -> ThreadId {
        self.thread
    }

    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn vp(&self) -> Vp {
        self.vp
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn time_mode(&self) -> TimeMode {
        self.time_mode
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One delivered event as seen by a recorder.
///
/// `sender` is the node that emitted the event (e.g. the spiking neuron), not
/// the recording device.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub sender: NodeId,
    pub stamp:  SimTime,
    /// Sub-step offset in ms, `0.0` for events on the grid.
    pub offset: f64,
}

impl Event {
    pub fn new(sender: NodeId, stamp: SimTime, offset: f64) -> Self {
        Self { sender, stamp, offset }
    }
}
