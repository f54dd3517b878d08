use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Result type alias for writer operations
pub type Result<T> = std::result::Result<T, WriterError>;

#[derive(Error, Debug)]
/// Writer error
pub enum WriterError {
    #[error("valid quote options are quote_all, quote_none, or quote_string, given {0}")]
    InvalidQuoteMode(String),

    #[error("quote escape mode must be back_slash, double, or none, given {0}")]
    InvalidEscapeMode(String),

    #[error("write mode must be append or truncate, given {0}")]
    InvalidWriteMode(String),

    #[error("header can only be one row but contained more")]
    MultiRowHeader,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("no target path configured")]
    MissingPath,

    /// The advisory lock could not be obtained within the retry budget.
    #[error("could not lock {} after {attempts} attempts in {elapsed:?}", .path.display())]
    LockTimeout {
        path: PathBuf,
        attempts: usize,
        elapsed: Duration,
    },

    /// The write loop ran out of retries before every byte was written.
    #[error("write to {} stalled after {written} of {total} bytes ({attempts} failed attempts)", .path.display())]
    WriteTimeout {
        path: PathBuf,
        written: usize,
        total: usize,
        attempts: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
