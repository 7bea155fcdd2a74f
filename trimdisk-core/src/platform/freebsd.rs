use crate::device::{ByteRange, DiscardDevice};
use libc::off_t;
use nix::{ioctl_read, ioctl_write_ptr};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::Path;

// <sys/disk.h>
ioctl_read!(diocgmediasize, b'd', 129, off_t);
ioctl_write_ptr!(diocgdelete, b'd', 136, [off_t; 2]);

/// An open FreeBSD disk device, driven through the `DIOCG*` ioctls.
#[derive(Debug)]
pub struct RawDevice {
    file: File,
}

/// Opens `path` read-write for discarding.
pub fn open(path: &Path) -> io::Result<RawDevice> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    Ok(RawDevice { file })
}

fn to_off_t(value: u64) -> io::Result<off_t> {
    off_t::try_from(value).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))
}

impl DiscardDevice for RawDevice {
    fn media_size(&mut self) -> io::Result<u64> {
        let mut size_bytes: off_t = 0;
        unsafe {
            diocgmediasize(self.file.as_raw_fd(), &mut size_bytes)?;
        }
        u64::try_from(size_bytes).map_err(|_| io::Error::from(io::ErrorKind::InvalidData))
    }

    fn discard(&mut self, range: ByteRange) -> io::Result<()> {
        let span: [off_t; 2] = [to_off_t(range.offset())?, to_off_t(range.length())?];
        unsafe {
            diocgdelete(self.file.as_raw_fd(), &span)?;
        }
        Ok(())
    }
}
