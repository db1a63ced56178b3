//! In-memory sink

use std::sync::Arc;

use parking_lot::Mutex;

use super::traits::Sink;
use crate::error::LogResult;

/// Sink that keeps every line it receives
///
/// Clones share the same buffer, so one clone can be handed to a `Log` while
/// another is kept to inspect what was emitted.
///
/// # Example
///
/// ```
/// use modelmod_log::{Log, LogConfig, Level, MemorySink};
///
/// let captured = MemorySink::new();
/// let log = Log::with_debug_sink(
///     LogConfig::new().with_output_file(false),
///     Box::new(captured.clone()),
/// );
/// log.log(Level::Warn, "timeout", "net");
/// assert_eq!(captured.lines(), vec!["[net]: timeout".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write_line(&mut self, line: &str) -> LogResult<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}
