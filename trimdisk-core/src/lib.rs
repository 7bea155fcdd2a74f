//! The core, UI-agnostic library for the `trimdisk` utility.
//!
//! `trimdisk-core` discards (TRIMs) the whole byte range of a disk or
//! partition in a single operating-system call. It never prints: the outcome
//! of a run is a [`trim::Report`] or a [`TrimError`] naming the step that
//! failed, and the front-end decides how to show it.
//!
//! The library is structured into several key modules:
//! - [`device`]: The data model (`NodeKind`, `ByteRange`) and the
//!   `DiscardDevice` capability of an open device.
//! - [`platform`]: The per-OS implementation of that capability (`ioctl`s on
//!   FreeBSD and Linux, a fail-fast stub elsewhere).
//! - [`trim`]: The pipeline itself, generic over a `DeviceSystem`.
//! - [`error`]: The failure taxonomy.
//!
//! ## Example: Discarding a Device
//!
//! ```rust,no_run
//! use trimdisk_core::trim::{self, NativeSystem};
//! use std::path::Path;
//!
//! fn main() -> Result<(), trimdisk_core::TrimError> {
//!     // Everything on the device is gone after this call.
//!     let report = trim::run(&NativeSystem, Path::new("/dev/ada1"))?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod platform;
pub mod trim;

pub use error::TrimError;
