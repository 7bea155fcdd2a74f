use crate::device::{ByteRange, DiscardDevice};
use nix::{ioctl_read, ioctl_write_ptr_bad, request_code_none};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::Path;

ioctl_read!(blkgetsize64, 0x12, 114, u64);
// BLKDISCARD is declared as _IO(0x12, 119) but takes a pointer to two u64s.
ioctl_write_ptr_bad!(blkdiscard, request_code_none!(0x12, 119), [u64; 2]);

/// An open Linux device node, driven through the `BLK*` ioctls.
#[derive(Debug)]
pub struct RawDevice {
    file: File,
}

/// Opens `path` read-write for discarding.
pub fn open(path: &Path) -> io::Result<RawDevice> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    Ok(RawDevice { file })
}

impl DiscardDevice for RawDevice {
    fn media_size(&mut self) -> io::Result<u64> {
        let mut size_bytes: u64 = 0;
        unsafe {
            blkgetsize64(self.file.as_raw_fd(), &mut size_bytes)?;
        }
        Ok(size_bytes)
    }

    fn discard(&mut self, range: ByteRange) -> io::Result<()> {
        let span: [u64; 2] = [range.offset(), range.length()];
        unsafe {
            blkdiscard(self.file.as_raw_fd(), &span)?;
        }
        Ok(())
    }
}
