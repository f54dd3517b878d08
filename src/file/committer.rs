use std::{
    fs::{File, OpenOptions},
    io::{ErrorKind, Write},
    path::Path,
    thread,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};
use rand::distr::{Distribution, Uniform};

use crate::{
    core::config::WriteMode,
    error::{Result, WriterError},
};

use super::lock::LockTarget;

/// Retry and timeout budgets for a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Lock attempts before giving up.
    pub lock_attempts: usize,
    /// Wall-clock budget for lock acquisition.
    pub lock_timeout: Duration,
    /// Consecutive non-progressing writes before giving up.
    pub write_attempts: usize,
    /// Wall-clock budget for the write loop.
    pub write_timeout: Duration,
    /// Lower bound of the randomized sleep between retries.
    pub backoff_min: Duration,
    /// Upper bound of the randomized sleep between retries.
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            lock_attempts: 10,
            lock_timeout: Duration::from_secs(10),
            write_attempts: 10,
            write_timeout: Duration::from_secs(60),
            backoff_min: Duration::from_millis(100),
            backoff_max: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Picks a random delay in `[backoff_min, backoff_max]`.
    pub fn backoff(&self) -> Duration {
        let min = u64::try_from(self.backoff_min.as_micros()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.backoff_max.as_micros()).unwrap_or(u64::MAX);
        let micros = Uniform::new_inclusive(min, max)
            .map(|range| range.sample(&mut rand::rng()))
            .unwrap_or(min);
        Duration::from_micros(micros)
    }
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

/// Writes rendered bytes to a file under an exclusive advisory lock.
///
/// A commit runs lock, write, unlock. The lock is released on every path that
/// acquired it, including write failures.
#[derive(Debug, Clone, Default)]
pub struct FileCommitter {
    policy: RetryPolicy,
}

impl FileCommitter {
    pub fn new(policy: RetryPolicy) -> Self {
        FileCommitter { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Opens `path` according to `mode` and commits `bytes` to it.
    ///
    /// Truncate mode does not truncate on open; the content is discarded only
    /// once the lock is held.
    pub fn commit(&self, path: &Path, mode: WriteMode, bytes: &[u8]) -> Result<usize> {
        let mut file = Self::open(path, mode)?;
        self.commit_to(&mut file, path, mode, bytes)
    }

    fn open(path: &Path, mode: WriteMode) -> Result<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Append => options.append(true),
            WriteMode::Truncate => options.write(true),
        };
        debug!("Opening {} in {} mode", path.display(), mode);
        Ok(options.open(path)?)
    }

    /// Commits `bytes` to an already opened target. `path` is used for
    /// logging and error reporting only.
    pub fn commit_to<T: LockTarget>(
        &self,
        target: &mut T,
        path: &Path,
        mode: WriteMode,
        bytes: &[u8],
    ) -> Result<usize> {
        self.acquire_lock(target, path)?;

        let result = self.write_locked(target, path, mode, bytes);

        match target.unlock() {
            Ok(()) => debug!("Released lock on {}", path.display()),
            Err(unlock_error) => match &result {
                Ok(_) => return Err(unlock_error.into()),
                Err(_) => warn!(
                    "Failed to release lock on {}: {}",
                    path.display(),
                    unlock_error
                ),
            },
        }

        if let Ok(written) = result {
            info!("Committed {} bytes to {}", written, path.display());
        }
        result
    }

    fn acquire_lock<T: LockTarget>(&self, target: &T, path: &Path) -> Result<usize> {
        let start = Instant::now();
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!("Lock attempt {} on {}", attempts, path.display());

            if target.try_lock_exclusive()? {
                return Ok(attempts);
            }

            let elapsed = start.elapsed();
            if attempts >= self.policy.lock_attempts || elapsed >= self.policy.lock_timeout {
                error!(
                    "Giving up on lock for {} after {} attempts",
                    path.display(),
                    attempts
                );
                return Err(WriterError::LockTimeout {
                    path: path.to_path_buf(),
                    attempts,
                    elapsed,
                });
            }

            let delay = self.policy.backoff();
            warn!(
                "{} is locked by another writer, retrying in {:?}",
                path.display(),
                delay
            );
            thread::sleep(delay);
        }
    }

    fn write_locked<T: LockTarget>(
        &self,
        target: &mut T,
        path: &Path,
        mode: WriteMode,
        bytes: &[u8],
    ) -> Result<usize> {
        if mode == WriteMode::Truncate {
            target.truncate()?;
        }
        let written = self.write_all(target, path, bytes)?;
        target.flush()?;
        Ok(written)
    }

    /// Loops until every byte is written.
    ///
    /// A short write lowers the failure count by one instead of clearing it.
    fn write_all<T: Write>(&self, target: &mut T, path: &Path, bytes: &[u8]) -> Result<usize> {
        let start = Instant::now();
        let mut written = 0;
        let mut failures = 0;

        while written < bytes.len() {
            if start.elapsed() >= self.policy.write_timeout {
                return Err(self.write_timeout(path, written, bytes.len(), failures));
            }

            match target.write(&bytes[written..]) {
                Ok(0) => {
                    failures += 1;
                    debug!("Write to {} made no progress", path.display());
                }
                Ok(count) => {
                    written += count;
                    if written < bytes.len() {
                        failures = failures.saturating_sub(1);
                        debug!(
                            "Short write to {}: {} of {} bytes",
                            path.display(),
                            written,
                            bytes.len()
                        );
                    }
                    continue;
                }
                Err(write_error) if is_transient(write_error.kind()) => {
                    failures += 1;
                    warn!("Write to {} failed: {}", path.display(), write_error);
                }
                Err(write_error) => return Err(write_error.into()),
            }

            if failures >= self.policy.write_attempts {
                return Err(self.write_timeout(path, written, bytes.len(), failures));
            }
            thread::sleep(self.policy.backoff());
        }

        Ok(written)
    }

    fn write_timeout(&self, path: &Path, written: usize, total: usize, attempts: usize) -> WriterError {
        error!(
            "Giving up on {} after writing {} of {} bytes",
            path.display(),
            written,
            total
        );
        WriterError::WriteTimeout {
            path: path.to_path_buf(),
            written,
            total,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use mockall::{Sequence, mock};

    use super::*;

    mock! {
        Target {}
        impl Write for Target {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
            fn flush(&mut self) -> io::Result<()>;
        }
        impl LockTarget for Target {
            fn try_lock_exclusive(&self) -> io::Result<bool>;
            fn unlock(&self) -> io::Result<()>;
            fn truncate(&mut self) -> io::Result<()>;
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            backoff_min: Duration::from_micros(10),
            backoff_max: Duration::from_micros(50),
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn backoff_stays_in_range() {
        let policy = RetryPolicy::default();
        for _ in 0..100 {
            let delay = policy.backoff();
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(500));
        }
    }

    #[test]
    fn lock_is_retried_until_available() {
        let mut target = MockTarget::new();
        let mut seq = Sequence::new();
        target
            .expect_try_lock_exclusive()
            .times(3)
            .in_sequence(&mut seq)
            .returning(|| Ok(false));
        target
            .expect_try_lock_exclusive()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(true));
        target.expect_write().returning(|buf| Ok(buf.len()));
        target.expect_flush().returning(|| Ok(()));
        target.expect_unlock().times(1).returning(|| Ok(()));

        let committer = FileCommitter::new(fast_policy());
        let written = committer
            .commit_to(&mut target, Path::new("mock.csv"), WriteMode::Append, b"a,b\n")
            .unwrap();
        assert_eq!(written, 4);
    }

    #[test]
    fn lock_gives_up_after_attempt_budget() {
        let mut target = MockTarget::new();
        target
            .expect_try_lock_exclusive()
            .times(10)
            .returning(|| Ok(false));
        target.expect_write().never();
        target.expect_unlock().never();

        let committer = FileCommitter::new(fast_policy());
        let result =
            committer.commit_to(&mut target, Path::new("mock.csv"), WriteMode::Append, b"x");
        assert!(matches!(
            result,
            Err(WriterError::LockTimeout { attempts: 10, .. })
        ));
    }

    #[test]
    fn lock_gives_up_after_time_budget() {
        let mut target = MockTarget::new();
        target.expect_try_lock_exclusive().returning(|| Ok(false));
        target.expect_unlock().never();

        let committer = FileCommitter::new(RetryPolicy {
            lock_attempts: usize::MAX,
            lock_timeout: Duration::from_millis(20),
            backoff_min: Duration::from_millis(5),
            backoff_max: Duration::from_millis(5),
            ..RetryPolicy::default()
        });
        let result =
            committer.commit_to(&mut target, Path::new("mock.csv"), WriteMode::Append, b"x");
        match result {
            Err(WriterError::LockTimeout { elapsed, attempts, .. }) => {
                assert!(elapsed >= Duration::from_millis(20));
                assert!(attempts > 1);
            }
            other => panic!("expected lock timeout, got {other:?}"),
        }
    }

    #[test]
    fn stalled_writes_give_up_after_time_budget() {
        let mut target = MockTarget::new();
        target.expect_try_lock_exclusive().returning(|| Ok(true));
        target.expect_write().returning(|_| Ok(0));
        target.expect_flush().never();
        target.expect_unlock().times(1).returning(|| Ok(()));

        let committer = FileCommitter::new(RetryPolicy {
            write_attempts: usize::MAX,
            write_timeout: Duration::from_millis(20),
            backoff_min: Duration::from_millis(5),
            backoff_max: Duration::from_millis(5),
            ..RetryPolicy::default()
        });
        let result =
            committer.commit_to(&mut target, Path::new("mock.csv"), WriteMode::Append, b"abc");
        match result {
            Err(WriterError::WriteTimeout { written, total, attempts, .. }) => {
                assert_eq!(written, 0);
                assert_eq!(total, 3);
                assert!(attempts > 1);
            }
            other => panic!("expected write timeout, got {other:?}"),
        }
    }

    #[test]
    fn oversized_backoff_bounds_do_not_wrap() {
        let policy = RetryPolicy {
            backoff_min: Duration::MAX,
            backoff_max: Duration::MAX,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(), Duration::from_micros(u64::MAX));
    }

    #[test]
    fn short_writes_advance_until_done() {
        let mut target = MockTarget::new();
        target.expect_try_lock_exclusive().returning(|| Ok(true));
        target
            .expect_write()
            .times(4)
            .returning(|buf| Ok(buf.len().min(3)));
        target.expect_flush().times(1).returning(|| Ok(()));
        target.expect_unlock().times(1).returning(|| Ok(()));

        let committer = FileCommitter::new(fast_policy());
        let written = committer
            .commit_to(
                &mut target,
                Path::new("mock.csv"),
                WriteMode::Append,
                b"abcdefghij",
            )
            .unwrap();
        assert_eq!(written, 10);
    }

    #[test]
    fn stalled_writes_time_out_and_release_the_lock() {
        let mut target = MockTarget::new();
        target.expect_try_lock_exclusive().returning(|| Ok(true));
        target.expect_write().times(10).returning(|_| Ok(0));
        target.expect_flush().never();
        target.expect_unlock().times(1).returning(|| Ok(()));

        let committer = FileCommitter::new(fast_policy());
        let result =
            committer.commit_to(&mut target, Path::new("mock.csv"), WriteMode::Append, b"abc");
        assert!(matches!(
            result,
            Err(WriterError::WriteTimeout {
                written: 0,
                total: 3,
                attempts: 10,
                ..
            })
        ));
    }

    #[test]
    fn progress_offsets_failures() {
        // Alternating stalls and one-byte writes never reach ten consecutive failures.
        let mut target = MockTarget::new();
        let mut stalled = false;
        target.expect_try_lock_exclusive().returning(|| Ok(true));
        target.expect_write().returning(move |_| {
            stalled = !stalled;
            if stalled {
                Err(io::Error::from(ErrorKind::Interrupted))
            } else {
                Ok(1)
            }
        });
        target.expect_flush().returning(|| Ok(()));
        target.expect_unlock().times(1).returning(|| Ok(()));

        let committer = FileCommitter::new(fast_policy());
        let written = committer
            .commit_to(
                &mut target,
                Path::new("mock.csv"),
                WriteMode::Append,
                b"0123456789abcdef",
            )
            .unwrap();
        assert_eq!(written, 16);
    }

    #[test]
    fn fatal_write_error_still_releases_the_lock() {
        let mut target = MockTarget::new();
        target.expect_try_lock_exclusive().returning(|| Ok(true));
        target
            .expect_write()
            .times(1)
            .returning(|_| Err(io::Error::from(ErrorKind::PermissionDenied)));
        target.expect_unlock().times(1).returning(|| Ok(()));

        let committer = FileCommitter::new(fast_policy());
        let result =
            committer.commit_to(&mut target, Path::new("mock.csv"), WriteMode::Append, b"abc");
        assert!(matches!(result, Err(WriterError::Io(_))));
    }

    #[test]
    fn truncate_happens_under_the_lock() {
        let mut target = MockTarget::new();
        let mut seq = Sequence::new();
        target
            .expect_try_lock_exclusive()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(true));
        target
            .expect_truncate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        target
            .expect_write()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|buf| Ok(buf.len()));
        target
            .expect_flush()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        target
            .expect_unlock()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let committer = FileCommitter::new(fast_policy());
        committer
            .commit_to(&mut target, Path::new("mock.csv"), WriteMode::Truncate, b"h\nr")
            .unwrap();
    }
}
