use crate::device::{ByteRange, DiscardDevice};
use std::io;
use std::path::Path;

/// Placeholder device for platforms without discard support.
///
/// It can never be constructed: [`open`] always fails.
#[derive(Debug)]
pub enum RawDevice {}

/// Always fails with [`io::ErrorKind::Unsupported`].
pub fn open(_path: &Path) -> io::Result<RawDevice> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unsupported platform",
    ))
}

impl DiscardDevice for RawDevice {
    fn media_size(&mut self) -> io::Result<u64> {
        match *self {}
    }

    fn discard(&mut self, _range: ByteRange) -> io::Result<()> {
        match *self {}
    }
}
