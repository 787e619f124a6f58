//! `rec-core` — the kernel-facing vocabulary shared by all recording backends.
//!
//! The recording backends in `rec-output` never talk to the simulation kernel
//! directly.  Everything they need from it (thread layout, node count, the
//! global data path, the device being recorded, the event being written) is
//! expressed by the small set of types in this crate and passed in explicitly.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `ThreadId`, `Vp`                            |
//! | [`time`]        | `SimTime`, `TimeMode`                                 |
//! | [`device`]      | `RecordingDevice` trait, `DeviceSpec`, `Event`        |
//! | [`kernel`]      | `KernelContext`, `IoSettings`                         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod device;
pub mod error;
pub mod ids;
pub mod kernel;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use device::{DeviceSpec, Event, RecordingDevice};
pub use error::{CoreError, CoreResult};
pub use ids::{NodeId, ThreadId, Vp};
pub use kernel::{IoSettings, KernelContext};
pub use time::{SimTime, TimeMode};
