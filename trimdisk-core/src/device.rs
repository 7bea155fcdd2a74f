use std::fmt;
use std::fs::FileType;
use std::io;

/// The kind of filesystem node a device path points at.
///
/// Only [`NodeKind::CharDevice`] is accepted as a discard target: a regular
/// file or a buffered block node has different semantics for the control
/// operations issued against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    CharDevice,
    BlockDevice,
    Directory,
    Regular,
    Other,
}

impl NodeKind {
    /// Classifies a node from the file type reported by its metadata.
    pub fn from_file_type(file_type: FileType) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;

            if file_type.is_char_device() {
                return NodeKind::CharDevice;
            }
            if file_type.is_block_device() {
                return NodeKind::BlockDevice;
            }
        }

        if file_type.is_dir() {
            NodeKind::Directory
        } else if file_type.is_file() {
            NodeKind::Regular
        } else {
            NodeKind::Other
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::CharDevice => "character device",
            NodeKind::BlockDevice => "block device",
            NodeKind::Directory => "directory",
            NodeKind::Regular => "regular file",
            NodeKind::Other => "special file",
        };
        f.write_str(name)
    }
}

/// A span of bytes to discard, always starting at offset zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteRange {
    offset: u64,
    length: u64,
}

impl ByteRange {
    /// The range covering a whole device of `size` bytes.
    pub fn whole(size: u64) -> Self {
        Self {
            offset: 0,
            length: size,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.offset, self.offset + self.length)
    }
}

/// The control interface of an open device.
///
/// Implementors own the underlying handle and release it on drop, which is
/// the only close the pipeline performs.
pub trait DiscardDevice {
    /// Returns the total addressable size of the media in bytes.
    fn media_size(&mut self) -> io::Result<u64>;

    /// Asks the device to discard every byte in `range`.
    ///
    /// This is destructive. The data in the range should be considered lost
    /// once the call returns, whether it succeeded or not.
    fn discard(&mut self, range: ByteRange) -> io::Result<()>;
}

impl<D: DiscardDevice + ?Sized> DiscardDevice for Box<D> {
    fn media_size(&mut self) -> io::Result<u64> {
        (**self).media_size()
    }

    fn discard(&mut self, range: ByteRange) -> io::Result<()> {
        (**self).discard(range)
    }
}
