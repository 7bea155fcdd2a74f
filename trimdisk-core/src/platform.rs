//! Provides platform-specific functionality.
//!
//! The media-size query and the discard request are OS control operations
//! with no portable equivalent. Each submodule exposes the same API, an
//! [`open`] function returning a [`RawDevice`] that implements
//! [`DiscardDevice`](crate::device::DiscardDevice), and the correct one is
//! selected with conditional compilation (`#[cfg]`).
//!
//! Platforms without a submodule of their own get `unsupported`, which
//! fails every open with [`std::io::ErrorKind::Unsupported`].

#[cfg(target_os = "freebsd")]
mod freebsd;
#[cfg(target_os = "freebsd")]
pub use self::freebsd::*;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use self::linux::*;

#[cfg(not(any(target_os = "freebsd", target_os = "linux")))]
mod unsupported;
#[cfg(not(any(target_os = "freebsd", target_os = "linux")))]
pub use self::unsupported::*;
