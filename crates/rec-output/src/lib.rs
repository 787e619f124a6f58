//! `rec-output` — recording backends for the rec simulation kernel.
//!
//! A recording backend receives timestamped events from recording devices
//! (spike recorders, voltmeters, …) and persists them.  Two backends are
//! provided:
//!
//! | Backend          | Output                                                  |
//! |------------------|---------------------------------------------------------|
//! | [`AsciiBackend`] | `<prefix><label>-<gid>-<vp>.dat`, one file per device   |
//! | [`NullBackend`]  | nothing                                                 |
//!
//! Both implement [`RecordingBackend`], the interface the kernel drives.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `AsciiBackend::par_threads_mut` over Rayon.              |
//!
//! # Usage
//!
//! ```rust,ignore
//! use rec_output::{AsciiBackend, RecordingBackend};
//!
//! let mut backend = AsciiBackend::new();
//! backend.pre_run_hook(&kernel)?;
//! backend.enroll(&kernel, &recorder, &[], &[])?;
//! for event in spikes {
//!     backend.write(&recorder, &event, &[], &[]);
//! }
//! backend.post_run_hook()?;
//! backend.cleanup()?;
//! ```

pub mod ascii;
pub mod backend;
pub mod error;
pub mod filename;
pub mod null;
pub mod params;
pub mod record_file;
pub mod registry;
pub mod status;


pub use ascii::AsciiBackend;
pub use backend::RecordingBackend;
pub use error::{OutputError, OutputResult};
pub use filename::FilenameBuilder;
pub use null::NullBackend;
pub use params::AsciiParams;
pub use registry::{EnrollContext, ThreadFiles};
pub use status::Dictionary;
