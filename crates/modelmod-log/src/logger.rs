//! The logger: filtering, rate limiting and sink routing
//!
//! Every call runs in this order:
//! 1. rate limit (keyed by exact message text)
//! 2. category override, if one exists for the category
//! 3. global threshold, only when there is no override
//! 4. format `[<category>]: <message><suffix>` and hand it to enabled sinks
//!
//! The rate limit counts attempts, so an attempt that is later filtered by
//! level still uses up a slot.
//!
//! The category and rate-limit tables only ever grow. They are keyed by
//! categories and message texts, which in practice come from a fixed set of
//! call sites, so their size is bounded by the code rather than by uptime.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::config::{FilePolicy, LogConfig};
use crate::error::LogError;
use crate::host::{CurrentProcess, HostModule, LogLocation};
use crate::level::Level;
use crate::sink::{BoxedSink, DebugOutputSink, LogFile, Sink};

/// Appended to the last occurrence of a rate-limited message
pub const LIMIT_SUFFIX: &str = " (Final message; log limit hit)";

/// Mutable state, all behind one lock
struct LogState {
    level: Level,
    output_debug: bool,
    output_file: bool,
    category_levels: HashMap<String, Level>,
    limited_messages: HashMap<String, u32>,
    debug_sink: BoxedSink,
    file: LogFile,
}

thread_local! {
    /// Address of the `Log` this thread is currently emitting through, or 0
    static EMITTING: Cell<usize> = const { Cell::new(0) };
}

/// Marks the current thread as inside `log` for one logger; restores on drop
struct EmitGuard {
    previous: usize,
}

impl EmitGuard {
    /// `None` if this thread is already inside `log` for the same logger
    fn enter(log: &Log) -> Option<Self> {
        let addr = log as *const Log as usize;
        EMITTING.with(|current| {
            let previous = current.get();
            if previous == addr {
                None
            } else {
                current.set(addr);
                Some(Self { previous })
            }
        })
    }
}

impl Drop for EmitGuard {
    fn drop(&mut self) {
        EMITTING.with(|current| current.set(self.previous));
    }
}

/// Outcome of the rate-limit step
enum Limit {
    Pass,
    Final,
    Suppress,
}

/// Thread-safe diagnostic logger
///
/// Most code goes through the process-wide instance from [`crate::get`], but a
/// `Log` is an ordinary value and can be built and owned directly.
///
/// # Example
///
/// ```no_run
/// use modelmod_log::{CurrentProcess, Level, Log, LogConfig};
///
/// let log = Log::new(LogConfig::default());
/// log.init(&CurrentProcess);
/// log.set_category_level("net", Level::Warn);
/// log.info("connected", "net"); // suppressed by the override
/// log.warn("timeout", "net");   // written as "[net]: timeout"
/// ```
pub struct Log {
    state: Mutex<LogState>,
    failures: AtomicU64,
    last_failure: Mutex<Option<String>>,
}

impl Default for Log {
    fn default() -> Self {
        Self::new(LogConfig::default())
    }
}

impl std::fmt::Debug for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Log")
            .field("level", &state.level)
            .field("output_debug", &state.output_debug)
            .field("output_file", &state.output_file)
            .field("file", &state.file)
            .field("failures", &self.failure_count())
            .finish()
    }
}

impl Log {
    /// Create a logger writing debug output to the OS debug channel
    pub fn new(config: LogConfig) -> Self {
        Self::with_debug_sink(config, Box::new(DebugOutputSink::new()))
    }

    /// Create a logger with a custom sink in the debug-output slot
    pub fn with_debug_sink(config: LogConfig, debug_sink: BoxedSink) -> Self {
        Self {
            state: Mutex::new(LogState {
                level: config.level,
                output_debug: config.output_debug,
                output_file: config.output_file,
                category_levels: HashMap::new(),
                limited_messages: HashMap::new(),
                debug_sink,
                file: LogFile::new(config.file_policy),
            }),
            failures: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    /// Resolve the log file location for `host`
    ///
    /// May be called any number of times; each call replaces the stored path.
    /// Nothing is reported to the caller. A directory that can't be created
    /// shows up later as lost lines and in [`Log::failure_count`].
    pub fn init(&self, host: &dyn HostModule) {
        let mut state = self.state.lock();
        self.init_locked(&mut state, host);
    }

    fn init_locked(&self, state: &mut LogState, host: &dyn HostModule) {
        let location = LogLocation::resolve(host);
        if let Err(e) = state.file.set_location(location) {
            self.record_failure(state.file.name(), e);
        }
    }

    /// Log a message with no rate limit
    pub fn log(&self, level: Level, message: &str, category: &str) {
        self.log_limited(level, message, category, 0);
    }

    /// Log a message that is emitted at most `limit` times (0 = unlimited)
    ///
    /// The `limit`-th emission carries [`LIMIT_SUFFIX`]; later ones are dropped.
    /// A call made from inside one of this logger's sinks is dropped and
    /// counted as a failure.
    pub fn log_limited(&self, level: Level, message: &str, category: &str, limit: u32) {
        let Some(_guard) = EmitGuard::enter(self) else {
            self.record_failure(
                "log",
                LogError::Reentrant {
                    category: category.to_string(),
                    message: message.to_string(),
                },
            );
            return;
        };
        let mut state = self.state.lock();

        let suffix = match Self::check_limit(&mut state, message, limit) {
            Limit::Suppress => return,
            Limit::Final => LIMIT_SUFFIX,
            Limit::Pass => "",
        };

        let threshold = state
            .category_levels
            .get(category)
            .copied()
            .unwrap_or(state.level);
        if level < threshold {
            return;
        }

        let line = format!("[{}]: {}{}", category, message, suffix);
        self.emit(&mut state, &line);
    }

    /// Log at `Level::Debug`
    pub fn debug(&self, message: &str, category: &str) {
        self.log(Level::Debug, message, category);
    }

    /// Log at `Level::Info`
    pub fn info(&self, message: &str, category: &str) {
        self.log(Level::Info, message, category);
    }

    /// Log at `Level::Warn`
    pub fn warn(&self, message: &str, category: &str) {
        self.log(Level::Warn, message, category);
    }

    /// Log at `Level::Error`
    pub fn error(&self, message: &str, category: &str) {
        self.log(Level::Error, message, category);
    }

    fn check_limit(state: &mut LogState, message: &str, limit: u32) -> Limit {
        if limit == 0 {
            return Limit::Pass;
        }

        let count = state
            .limited_messages
            .entry(message.to_string())
            .or_insert(0);
        let Some(next) = count.checked_add(1) else {
            *count = limit.saturating_add(1);
            return Limit::Suppress;
        };
        *count = next;

        if *count == limit {
            Limit::Final
        } else if *count > limit {
            Limit::Suppress
        } else {
            Limit::Pass
        }
    }

    fn emit(&self, state: &mut LogState, line: &str) {
        if state.output_debug {
            if let Err(e) = state.debug_sink.write_line(line) {
                self.record_failure(state.debug_sink.name(), e);
            }
        }

        if state.output_file {
            if state.file.path().is_none() {
                self.init_locked(state, &CurrentProcess);
            }
            if let Err(e) = state.file.write_line(line) {
                self.record_failure(state.file.name(), e);
            }
        }
    }

    fn record_failure(&self, source: &str, error: LogError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        *self.last_failure.lock() = Some(format!("{}: {}", source, error));
    }

    /// Set (or replace) the threshold for one category
    pub fn set_category_level(&self, category: &str, level: Level) {
        self.state
            .lock()
            .category_levels
            .insert(category.to_string(), level);
    }

    /// Threshold override for `category`, or `None` if it follows the global level
    pub fn category_level(&self, category: &str) -> Option<Level> {
        self.state.lock().category_levels.get(category).copied()
    }

    /// Global threshold
    pub fn level(&self) -> Level {
        self.state.lock().level
    }

    /// Replace the global threshold
    pub fn set_level(&self, level: Level) {
        self.state.lock().level = level;
    }

    /// Turn the debug-output sink on or off
    pub fn set_output_debug(&self, enabled: bool) {
        self.state.lock().output_debug = enabled;
    }

    /// Turn the file sink on or off
    pub fn set_output_file(&self, enabled: bool) {
        self.state.lock().output_file = enabled;
    }

    /// Switch between reopen-per-write and keep-open
    pub fn set_file_policy(&self, policy: FilePolicy) {
        self.state.lock().file.set_policy(policy);
    }

    /// Current settings
    pub fn config(&self) -> LogConfig {
        let state = self.state.lock();
        LogConfig {
            level: state.level,
            output_debug: state.output_debug,
            output_file: state.output_file,
            file_policy: state.file.policy(),
        }
    }

    /// Resolved log file path, if `init` (explicit or implicit) has run
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.state.lock().file.path().map(PathBuf::from)
    }

    /// Number of sink and directory failures since creation
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Most recent failure, prefixed with the sink that reported it
    pub fn last_failure(&self) -> Option<String> {
        self.last_failure.lock().clone()
    }
}
