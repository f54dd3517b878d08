use std::{
    fs::{File, TryLockError},
    io::{self, Seek, SeekFrom, Write},
};

/// A writable handle that supports a cooperative exclusive lock.
///
/// [`File`] is the production implementation; the trait is the seam used to
/// exercise contention and short writes without a real filesystem.
pub trait LockTarget: Write {
    /// Attempts a non-blocking exclusive lock.
    ///
    /// Returns `Ok(false)` when another holder owns the lock.
    fn try_lock_exclusive(&self) -> io::Result<bool>;

    fn unlock(&self) -> io::Result<()>;

    /// Discards existing content and rewinds. Only called while locked.
    fn truncate(&mut self) -> io::Result<()>;
}

impl LockTarget for File {
    fn try_lock_exclusive(&self) -> io::Result<bool> {
        match File::try_lock(self) {
            Ok(()) => Ok(true),
            Err(TryLockError::WouldBlock) => Ok(false),
            Err(TryLockError::Error(error)) => Err(error),
        }
    }

    fn unlock(&self) -> io::Result<()> {
        File::unlock(self)
    }

    fn truncate(&mut self) -> io::Result<()> {
        self.set_len(0)?;
        self.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}
