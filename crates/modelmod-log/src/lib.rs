//! ModelMod diagnostic logger
//!
//! A synchronous text logger for code that runs inside someone else's process,
//! where there is no console to print to. Lines go to the OS debug channel and
//! to `<module-dir>/../Logs/modelmod.<exe-name>.log`.
//!
//! - Safe to call from any thread; one lock serializes all state.
//! - Never panics or returns errors to log callers. Failed writes are counted
//!   (see [`Log::failure_count`]) and the line is lost.
//! - Per-category thresholds override the global one.
//! - Individual message texts can be capped to a number of emissions.
//!
//! ```no_run
//! use modelmod_log::{CurrentProcess, Level};
//!
//! modelmod_log::init(&CurrentProcess);
//! modelmod_log::set_category_level("net", Level::Warn);
//!
//! let log = modelmod_log::get();
//! log.info("connected", "net");                     // suppressed
//! log.warn("timeout", "net");                       // "[net]: timeout"
//! log.log_limited(Level::Info, "tick", "sys", 2);   // at most twice
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod level;
pub mod sink;
mod global;
mod logger;

pub use config::{FilePolicy, LogConfig};
pub use error::{LogError, LogResult};
#[cfg(windows)]
pub use host::ModuleHandle;
pub use host::{CurrentProcess, FixedHost, HostModule, LogLocation};
pub use level::Level;
pub use logger::{Log, LIMIT_SUFFIX};
pub use sink::{DebugOutputSink, LogFile, MemorySink, NoOpSink, Sink};

pub use global::{
    category_level, get, init, install, is_installed, log, log_limited, set_category_level,
};
