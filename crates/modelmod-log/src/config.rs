//! Logger configuration

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// What the file sink does with its handle after a write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePolicy {
    /// Close the file after every line so it survives an abrupt host exit
    #[default]
    ReopenEachWrite,
    /// Keep the handle open between writes. Lines may be lost if the host dies.
    KeepOpen,
}

/// Settings a `Log` starts with
///
/// # Example
///
/// ```
/// use modelmod_log::{FilePolicy, Level, LogConfig};
///
/// let config = LogConfig::new()
///     .with_level(Level::Debug)
///     .with_output_debug(false)
///     .with_file_policy(FilePolicy::KeepOpen);
/// assert_eq!(config.level, Level::Debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Global severity threshold
    pub level: Level,
    /// Send lines to the debug-output channel
    pub output_debug: bool,
    /// Send lines to the log file
    pub output_file: bool,
    /// Handle policy for the log file
    pub file_policy: FilePolicy,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            output_debug: true,
            output_file: true,
            file_policy: FilePolicy::ReopenEachWrite,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_output_debug(mut self, enabled: bool) -> Self {
        self.output_debug = enabled;
        self
    }

    pub fn with_output_file(mut self, enabled: bool) -> Self {
        self.output_file = enabled;
        self
    }

    pub fn with_file_policy(mut self, policy: FilePolicy) -> Self {
        self.file_policy = policy;
        self
    }
}
