//! Log file sink
//!
//! The first successful open made by a `LogFile` truncates, every later open
//! appends. With `FilePolicy::ReopenEachWrite` the handle is closed again right
//! after each line, so whatever was logged is on disk even if the host process
//! is killed a moment later.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::traits::Sink;
use crate::config::FilePolicy;
use crate::error::{LogError, LogResult};
use crate::host::LogLocation;

/// File sink state: resolved path, open handle and first-open flag
#[derive(Debug)]
pub struct LogFile {
    path: Option<PathBuf>,
    handle: Option<File>,
    first_open: bool,
    policy: FilePolicy,
}

impl LogFile {
    /// Create a file sink with no path yet
    pub fn new(policy: FilePolicy) -> Self {
        Self {
            path: None,
            handle: None,
            first_open: true,
            policy,
        }
    }

    /// Path lines will be written to, once resolved
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn policy(&self) -> FilePolicy {
        self.policy
    }

    /// Change the handle policy; switching to reopen-per-write closes any open handle
    pub fn set_policy(&mut self, policy: FilePolicy) {
        self.policy = policy;
        if policy == FilePolicy::ReopenEachWrite {
            self.handle = None;
        }
    }

    /// Point the sink at a new location, creating its directory if needed
    ///
    /// The path is stored even if the directory can't be created; the error
    /// is returned for bookkeeping and the next write will fail to open.
    pub fn set_location(&mut self, location: LogLocation) -> LogResult<()> {
        self.handle = None;
        self.path = Some(location.file);

        if location.dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&location.dir).map_err(|e| LogError::create_dir(&location.dir, e))
    }

    fn open(&mut self, path: &Path) -> LogResult<File> {
        let mut options = OpenOptions::new();
        if self.first_open {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true).create(true);
        }
        let file = options.open(path).map_err(|e| LogError::open(path, e))?;
        self.first_open = false;
        Ok(file)
    }
}

impl Sink for LogFile {
    fn name(&self) -> &str {
        "file"
    }

    fn write_line(&mut self, line: &str) -> LogResult<()> {
        let path = match self.path.clone() {
            Some(path) => path,
            None => return Err(LogError::Sink("log file path is not resolved".to_string())),
        };

        let mut file = match self.handle.take() {
            Some(file) => file,
            None => self.open(&path)?,
        };

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())
            .map_err(|e| LogError::write(&path, e))?;

        if self.policy == FilePolicy::KeepOpen {
            self.handle = Some(file);
        }
        Ok(())
    }
}
