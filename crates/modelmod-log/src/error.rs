//! Logger error types
//!
//! None of these ever reach a `log` caller. Sink failures are counted and kept
//! as the last failure message on the `Log` so a host can poll for them.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur inside the logger
#[derive(Error, Debug)]
pub enum LogError {
    /// The log directory could not be created
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file could not be opened
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be written to the log file
    #[error("failed to write log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A process-wide logger already exists
    #[error("process-wide logger is already installed")]
    AlreadyInstalled,

    /// Integer does not map to a severity level
    #[error("invalid log level: {0}")]
    InvalidLevel(i32),

    /// Name does not map to a severity level
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    /// A sink called back into the logger that is emitting through it
    #[error("nested log call from inside a sink was dropped: [{category}]: {message}")]
    Reentrant { category: String, message: String },

    /// Custom sink failure
    #[error("sink error: {0}")]
    Sink(String),
}

impl LogError {
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

pub type LogResult<T> = Result<T, LogError>;
