//! An advisory filesystem lock, used to serialize writers against a single
//! STAC tree root when the pipeline runs more than one process.
//!
//! `mkdir` is atomic on every filesystem this pipeline targets: creating a
//! directory that already exists fails, so a lock directory doubles as a
//! mutex with no extra dependency. Grounded on the advisory-lock pattern in
//! `examples/original_source/pds_crawler/load/database.py`'s guard around
//! concurrent HDF5 writers, adapted to plain directories.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A held advisory lock; removes its lock directory on drop.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    /// Attempts to acquire the lock at `path`, retrying every `retry_delay`
    /// until `timeout` elapses.
    pub fn acquire(path: impl Into<PathBuf>, timeout: Duration, retry_delay: Duration) -> std::io::Result<LockGuard> {
        let path = path.into();
        let deadline = Instant::now() + timeout;
        loop {
            match std::fs::create_dir(&path) {
                Ok(()) => return Ok(LockGuard { path }),
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        return Err(std::io::Error::new(
                            std::io::ErrorKind::TimedOut,
                            format!("timed out waiting for lock at {}", path.display()),
                        ));
                    }
                    std::thread::sleep(retry_delay);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// The lock directory's path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let lock_path = tmp.path().join("stac.lock");
        {
            let _guard = LockGuard::acquire(&lock_path, Duration::from_secs(1), Duration::from_millis(10)).unwrap();
            assert!(lock_path.exists());
        }
        assert!(!lock_path.exists());
    }

    #[test]
    fn second_acquire_times_out_while_held() {
        let tmp = tempfile::tempdir().unwrap();
        let lock_path = tmp.path().join("stac.lock");
        let _held = LockGuard::acquire(&lock_path, Duration::from_secs(1), Duration::from_millis(10)).unwrap();
        let result = LockGuard::acquire(&lock_path, Duration::from_millis(50), Duration::from_millis(10));
        assert!(result.is_err());
    }
}
