//! Simulation time as seen by a recording backend.
//!
//! The kernel advances time in integer steps of a fixed resolution.  An event
//! carries the step at which it was delivered plus a sub-step offset (ms) for
//! precise spike timing.  Backends report either the raw step and offset or a
//! single continuous millisecond value, depending on the device's
//! [`TimeMode`].

// ── SimTime ───────────────────────────────────────────────────────────────────

/// A point on the kernel's discrete time grid.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime {
    steps:         i64,
    resolution_ms: f64,
}

impl SimTime {
    /// Default kernel resolution: 0.1 ms per step.
    pub const DEFAULT_RESOLUTION_MS: f64 = 0.1;

    /// A time `steps` steps after zero on a grid of `resolution_ms`.
    pub fn from_steps(steps: i64, resolution_ms: f64) -> Self {
        Self { steps, resolution_ms }
    }

    /// Step count on the time grid.
    #[inline]
    pub fn steps(self) -> i64 {
        self.steps
    }

    /// Milliseconds per step.
    #[inline]
    pub fn resolution_ms(self) -> f64 {
        self.resolution_ms
    }

    /// Time in milliseconds.
    #[inline]
    pub fn ms(self) -> f64 {
        self.steps as f64 * self.resolution_ms
    }
}

// ── TimeMode ──────────────────────────────────────────────────────────────────

/// How a device wants event times reported.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeMode {
    /// `step` and `offset` as two separate columns.
    Stepped,
    /// One column: `ms - offset`.
    #[default]
    Continuous,
}
