//! Sink trait definition

use crate::error::LogResult;

/// A destination for fully formatted log lines
///
/// Implementations:
/// - `DebugOutputSink`: the OS debug channel (stderr off Windows)
/// - `LogFile`: the per-host log file
/// - `MemorySink`: captures lines in memory
/// - `NoOpSink`: discards everything
///
/// Sinks are only ever called with the logger's lock held, so they need no
/// synchronization of their own.
pub trait Sink: Send {
    /// Short name that prefixes this sink's entries in `Log::last_failure`
    fn name(&self) -> &str;

    /// Write one line. `line` carries no terminator; the sink adds its own.
    ///
    /// Must not call back into the `Log` that owns the sink. A nested log call
    /// is dropped and counted as a failure; any other call (settings,
    /// `init`, `category_level`) blocks forever on the held lock.
    fn write_line(&mut self, line: &str) -> LogResult<()>;
}

/// Type alias for a boxed sink
pub type BoxedSink = Box<dyn Sink>;
