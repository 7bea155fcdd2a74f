//! Contains the logic for discarding a whole device.
//!
//! [`run`] executes the pipeline in strict order:
//! 1.  Classify the node at the given path; only character devices pass.
//! 2.  Open it read-write.
//! 3.  Query the media size.
//! 4.  Discard `[0, size)` in a single call, timing it.
//!
//! The first failing step ends the run with its [`TrimError`]. The device
//! handle is closed when it goes out of scope, on success and on failure.
use crate::device::{ByteRange, DiscardDevice, NodeKind};
use crate::error::{Result, TrimError};
use crate::platform;
use std::fmt;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Access to the operating system facilities the pipeline needs.
pub trait DeviceSystem {
    type Device: DiscardDevice;

    /// Classifies the filesystem node at `path` from its metadata.
    fn node_kind(&self, path: &Path) -> io::Result<NodeKind>;

    /// Opens the device at `path` read-write.
    fn open(&self, path: &Path) -> io::Result<Self::Device>;
}

/// The real operating system, backed by [`crate::platform`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeSystem;

impl DeviceSystem for NativeSystem {
    type Device = platform::RawDevice;

    fn node_kind(&self, path: &Path) -> io::Result<NodeKind> {
        let metadata = std::fs::metadata(path)?;
        Ok(NodeKind::from_file_type(metadata.file_type()))
    }

    fn open(&self, path: &Path) -> io::Result<Self::Device> {
        platform::open(path)
    }
}

/// Start and end of the discard call.
#[derive(Clone, Copy, Debug)]
struct Measurement {
    start: Instant,
    end: Instant,
}

impl Measurement {
    fn time<T>(f: impl FnOnce() -> T) -> (T, Self) {
        let start = Instant::now();
        let value = f();
        let end = Instant::now();
        (value, Self { start, end })
    }

    fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }
}

/// The outcome of a successful discard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    /// Number of bytes discarded, equal to the queried media size.
    pub bytes: u64,
    /// Wall-clock duration of the discard call alone.
    pub elapsed: Duration,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TRIMed {} bytes in {:.6} seconds",
            self.bytes,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Discards the entire device at `path`.
///
/// This is destructive: every byte on the device should be considered lost
/// once the discard has been issued. The device must not be mounted or
/// otherwise in use; that is not checked here.
///
/// # Errors
///
/// Returns the [`TrimError`] of the first step that fails. When the size
/// query fails, no discard is attempted.
pub fn run<S: DeviceSystem>(system: &S, path: &Path) -> Result<Report> {
    let kind = system.node_kind(path).map_err(|source| TrimError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %kind, "classified device node");

    if kind != NodeKind::CharDevice {
        return Err(TrimError::NotCharDevice {
            path: path.to_path_buf(),
        });
    }

    let mut device = system.open(path).map_err(|source| TrimError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "opened device");

    let size = device.media_size().map_err(TrimError::MediaSize)?;
    debug!(size, "queried media size");

    let range = ByteRange::whole(size);
    debug!(%range, "issuing discard");
    let (result, measurement) = Measurement::time(|| device.discard(range));
    result.map_err(|source| TrimError::Discard {
        bytes: range.length(),
        source,
    })?;

    let elapsed = measurement.elapsed();
    debug!(?elapsed, "discard complete");

    Ok(Report {
        bytes: range.length(),
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::thread;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Stat,
        Open,
        MediaSize,
        Discard(ByteRange),
        Close,
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    /// A simulated device node with scripted outcomes for each step.
    struct FakeSystem {
        log: Log,
        kind: io::Result<NodeKind>,
        open_fails: bool,
        size: Option<u64>,
        discard_fails: bool,
        discard_takes: Duration,
    }

    impl FakeSystem {
        fn char_device(size: u64) -> Self {
            Self {
                log: Rc::default(),
                kind: Ok(NodeKind::CharDevice),
                open_fails: false,
                size: Some(size),
                discard_fails: false,
                discard_takes: Duration::ZERO,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.log.borrow().clone()
        }
    }

    struct FakeDevice {
        log: Log,
        size: Option<u64>,
        discard_fails: bool,
        discard_takes: Duration,
    }

    impl DeviceSystem for FakeSystem {
        type Device = FakeDevice;

        fn node_kind(&self, _path: &Path) -> io::Result<NodeKind> {
            self.log.borrow_mut().push(Call::Stat);
            match &self.kind {
                Ok(kind) => Ok(*kind),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }

        fn open(&self, _path: &Path) -> io::Result<FakeDevice> {
            self.log.borrow_mut().push(Call::Open);
            if self.open_fails {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            Ok(FakeDevice {
                log: self.log.clone(),
                size: self.size,
                discard_fails: self.discard_fails,
                discard_takes: self.discard_takes,
            })
        }
    }

    impl DiscardDevice for FakeDevice {
        fn media_size(&mut self) -> io::Result<u64> {
            self.log.borrow_mut().push(Call::MediaSize);
            self.size
                .ok_or_else(|| io::Error::from(io::ErrorKind::Unsupported))
        }

        fn discard(&mut self, range: ByteRange) -> io::Result<()> {
            self.log.borrow_mut().push(Call::Discard(range));
            thread::sleep(self.discard_takes);
            if self.discard_fails {
                return Err(io::Error::other("device rejected discard"));
            }
            Ok(())
        }
    }

    impl Drop for FakeDevice {
        fn drop(&mut self) {
            self.log.borrow_mut().push(Call::Close);
        }
    }

    const DEV: &str = "/dev/fake0";

    #[test]
    fn discards_the_whole_device_in_order() {
        let mut system = FakeSystem::char_device(1_048_576);
        system.discard_takes = Duration::from_millis(2);

        let report = run(&system, Path::new(DEV)).unwrap();

        assert_eq!(report.bytes, 1_048_576);
        assert!(report.elapsed >= Duration::from_millis(2));
        assert_eq!(
            system.calls(),
            vec![
                Call::Stat,
                Call::Open,
                Call::MediaSize,
                Call::Discard(ByteRange::whole(1_048_576)),
                Call::Close,
            ]
        );
    }

    #[test]
    fn report_line_uses_microsecond_precision() {
        let report = Report {
            bytes: 1_048_576,
            elapsed: Duration::from_millis(2),
        };
        assert_eq!(
            report.to_string(),
            "TRIMed 1048576 bytes in 0.002000 seconds"
        );
    }

    #[test]
    fn stat_failure_skips_open() {
        let mut system = FakeSystem::char_device(512);
        system.kind = Err(io::Error::from(io::ErrorKind::NotFound));

        let err = run(&system, Path::new(DEV)).unwrap_err();

        assert!(matches!(err, TrimError::Stat { .. }));
        assert!(err.to_string().starts_with("Couldn't stat /dev/fake0: "));
        assert_eq!(system.calls(), vec![Call::Stat]);
    }

    #[test]
    fn rejects_anything_but_a_character_device() {
        for kind in [
            NodeKind::Regular,
            NodeKind::BlockDevice,
            NodeKind::Directory,
            NodeKind::Other,
        ] {
            let mut system = FakeSystem::char_device(512);
            system.kind = Ok(kind);

            let err = run(&system, Path::new(DEV)).unwrap_err();

            assert_eq!(err.to_string(), "/dev/fake0: Not a character device");
            assert_eq!(system.calls(), vec![Call::Stat]);
        }
    }

    #[test]
    fn open_failure_is_reported() {
        let mut system = FakeSystem::char_device(512);
        system.open_fails = true;

        let err = run(&system, Path::new(DEV)).unwrap_err();

        assert!(matches!(err, TrimError::Open { .. }));
        assert_eq!(system.calls(), vec![Call::Stat, Call::Open]);
    }

    #[test]
    fn size_query_failure_skips_discard_and_closes() {
        let mut system = FakeSystem::char_device(0);
        system.size = None;

        let err = run(&system, Path::new(DEV)).unwrap_err();

        assert!(matches!(err, TrimError::MediaSize(_)));
        assert!(err.to_string().starts_with("Couldn't get mediasize: "));
        assert_eq!(
            system.calls(),
            vec![Call::Stat, Call::Open, Call::MediaSize, Call::Close]
        );
    }

    #[test]
    fn discard_failure_reports_the_queried_size() {
        let mut system = FakeSystem::char_device(8_192);
        system.discard_fails = true;

        let err = run(&system, Path::new(DEV)).unwrap_err();

        match &err {
            TrimError::Discard { bytes, .. } => assert_eq!(*bytes, 8_192),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Couldn't TRIM 8192 bytes: device rejected discard"
        );
        assert_eq!(system.calls().last(), Some(&Call::Close));
    }

    #[test]
    fn running_twice_succeeds_twice() {
        let system = FakeSystem::char_device(4_096);

        let first = run(&system, Path::new(DEV)).unwrap();
        let second = run(&system, Path::new(DEV)).unwrap();

        assert_eq!(first.bytes, second.bytes);
        assert_eq!(system.calls().len(), 10);
    }

    #[test]
    fn native_system_rejects_regular_files() {
        let exe = std::env::current_exe().unwrap();

        let err = run(&NativeSystem, &exe).unwrap_err();

        assert!(matches!(err, TrimError::NotCharDevice { .. }));
    }

    #[test]
    fn native_system_reports_missing_paths() {
        let err = run(&NativeSystem, Path::new("/nonexistent/trimdisk/dev")).unwrap_err();

        match err {
            TrimError::Stat { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
