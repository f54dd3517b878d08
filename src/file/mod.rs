/// Lock-protected, retrying commits of rendered text to a file.
///
/// A commit is a small state machine: acquire an exclusive advisory lock on the
/// target (retrying with a randomized backoff), write every byte (looping over
/// short writes), then release the lock. Both loops are bounded by an attempt
/// count and a wall-clock budget, described by [`committer::RetryPolicy`].
///
/// The lock is cooperative: it serializes writers that use this crate (or any
/// other `flock`-style locking) and does not stop unrelated processes from
/// writing to the file.
pub mod committer;

/// The lockable handle abstraction and its `std::fs::File` implementation.
pub mod lock;

/// Path normalization applied before a target path is used.
pub mod path;
