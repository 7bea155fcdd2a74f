//! The failures a trim run can end with.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A terminal failure of one step of the trim pipeline.
///
/// Every variant is final: nothing is retried, and the process is expected
/// to report the error and exit with [`TrimError::exit_code`].
#[derive(Error, Debug)]
pub enum TrimError {
    /// The command line did not name exactly one device.
    #[error("trimdisk <device>")]
    Usage,

    #[error("Couldn't stat {}: {source}", path.display())]
    Stat { path: PathBuf, source: io::Error },

    #[error("{}: Not a character device", path.display())]
    NotCharDevice { path: PathBuf },

    #[error("Couldn't open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Couldn't get mediasize: {0}")]
    MediaSize(#[source] io::Error),

    /// The discard itself failed. `bytes` is the queried media size.
    #[error("Couldn't TRIM {bytes} bytes: {source}")]
    Discard { bytes: u64, source: io::Error },
}

impl TrimError {
    /// The process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type for trim operations.
pub type Result<T> = std::result::Result<T, TrimError>;
