#![allow(dead_code)]

pub mod mocks;

use std::{env::temp_dir, path::PathBuf, time::Duration};

use rand::distr::{Alphanumeric, SampleString};
use sv_writer::file::committer::RetryPolicy;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A unique scratch file path under the system temp directory.
pub fn scratch_path(extension: &str) -> PathBuf {
    let file_name = Alphanumeric.sample_string(&mut rand::rng(), 16);
    temp_dir().join(format!("{}.{}", file_name, extension))
}

/// Default budgets with a sub-millisecond backoff.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        backoff_min: Duration::from_micros(10),
        backoff_max: Duration::from_micros(100),
        ..RetryPolicy::default()
    }
}
