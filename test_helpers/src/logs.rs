//! In-memory capture of `tracing` output for assertions in tests.
//!
//! The capturing subscriber is installed only for the current thread while
//! the closure runs, so tests can inspect warnings and errors without a
//! process-wide subscriber and without interfering with each other.
//!
//! # Examples
//!
//! ```
//! use test_helpers::logs;
//!
//! let ((), output) = logs::capture(|| tracing::warn!("Unknown key 'bad'"));
//! assert!(output.contains("Unknown key 'bad'"));
//! ```

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;

/// Cloneable writer appending into a shared buffer.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Returns everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a thread-local subscriber and returns its result together
/// with the rendered log output.
///
/// Every level down to `TRACE` is captured, without ANSI colours or
/// timestamps.
pub fn capture<F, R>(f: F) -> (R, String)
where
    F: FnOnce() -> R,
{
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(Level::TRACE)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
