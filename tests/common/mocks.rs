//! Mock version of a lockable file handle.
use mockall::mock;

use std::io::{self, Write};

use sv_writer::file::lock::LockTarget;

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
    impl LockTarget for File {
        fn try_lock_exclusive(&self) -> io::Result<bool>;
        fn unlock(&self) -> io::Result<()>;
        fn truncate(&mut self) -> io::Result<()>;
    }
}
