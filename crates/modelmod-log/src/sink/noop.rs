//! No-op sink implementation

use super::traits::Sink;
use crate::error::LogResult;

/// A sink that does nothing
///
/// Useful for hosts that want file output only but still need something in
/// the debug-output slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl NoOpSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for NoOpSink {
    fn name(&self) -> &str {
        "noop"
    }

    fn write_line(&mut self, _line: &str) -> LogResult<()> {
        Ok(())
    }
}
