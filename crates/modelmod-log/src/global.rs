//! Process-wide logger
//!
//! `get()` lazily creates the shared `Log` with default settings. A host that
//! wants different settings, or a different debug sink, builds its own `Log`
//! and hands it to `install()` before anything calls `get()`. Whichever comes
//! first wins; the instance is never replaced.
//!
//! Construction goes through a `OnceCell`, so racing first callers block until
//! the single instance exists instead of building two.

use once_cell::sync::OnceCell;

use crate::error::{LogError, LogResult};
use crate::host::HostModule;
use crate::level::Level;
use crate::logger::Log;

static GLOBAL: OnceCell<Log> = OnceCell::new();

/// The process-wide logger, created with defaults on first use
pub fn get() -> &'static Log {
    GLOBAL.get_or_init(Log::default)
}

/// Make `log` the process-wide logger
///
/// Fails with [`LogError::AlreadyInstalled`] if `get()` or `install()` already
/// ran; the existing instance is kept and `log` is dropped.
pub fn install(log: Log) -> LogResult<&'static Log> {
    GLOBAL
        .try_insert(log)
        .map_err(|_| LogError::AlreadyInstalled)
}

/// Whether the process-wide logger exists yet
pub fn is_installed() -> bool {
    GLOBAL.get().is_some()
}

/// Resolve the process-wide logger's file location for `host`
pub fn init(host: &dyn HostModule) {
    get().init(host);
}

/// Log through the process-wide logger
pub fn log(level: Level, message: &str, category: &str) {
    get().log(level, message, category);
}

/// Rate-limited log through the process-wide logger
pub fn log_limited(level: Level, message: &str, category: &str, limit: u32) {
    get().log_limited(level, message, category, limit);
}

pub fn set_category_level(category: &str, level: Level) {
    get().set_category_level(category, level);
}

pub fn category_level(category: &str) -> Option<Level> {
    get().category_level(category)
}

/// Convenience macros for logging through the process-wide logger
///
/// The category defaults to the calling module's path; pass
/// `category: "name";` first to choose one.
///
/// ```no_run
/// use modelmod_log::{info_log, warn_log};
///
/// info_log!("loaded {} mods", 3);
/// warn_log!(category: "hook"; "device {:p} not hooked", std::ptr::null::<u8>());
/// ```
#[macro_export]
macro_rules! debug_log {
    (category: $category:expr; $($arg:tt)*) => {
        $crate::get().debug(&format!($($arg)*), $category)
    };
    ($($arg:tt)*) => {
        $crate::get().debug(&format!($($arg)*), module_path!())
    };
}

#[macro_export]
macro_rules! info_log {
    (category: $category:expr; $($arg:tt)*) => {
        $crate::get().info(&format!($($arg)*), $category)
    };
    ($($arg:tt)*) => {
        $crate::get().info(&format!($($arg)*), module_path!())
    };
}

#[macro_export]
macro_rules! warn_log {
    (category: $category:expr; $($arg:tt)*) => {
        $crate::get().warn(&format!($($arg)*), $category)
    };
    ($($arg:tt)*) => {
        $crate::get().warn(&format!($($arg)*), module_path!())
    };
}

#[macro_export]
macro_rules! error_log {
    (category: $category:expr; $($arg:tt)*) => {
        $crate::get().error(&format!($($arg)*), $category)
    };
    ($($arg:tt)*) => {
        $crate::get().error(&format!($($arg)*), module_path!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogConfig;

    // Tests in this binary share the one global instance; none may install one.
    #[test]
    fn test_global_lifecycle() {
        let first = get();
        assert!(is_installed());
        assert!(std::ptr::eq(first, get()));

        let rejected = install(Log::new(LogConfig::new().with_level(Level::Error)));
        assert!(matches!(rejected, Err(LogError::AlreadyInstalled)));
        assert_eq!(get().level(), Level::Info);

        get().set_output_debug(false);
        get().set_output_file(false);

        assert_eq!(category_level("global-test"), None);
        set_category_level("global-test", Level::Error);
        assert_eq!(category_level("global-test"), Some(Level::Error));

        log(Level::Info, "dropped", "global-test");
        log_limited(Level::Error, "limited", "global-test", 1);
        crate::info_log!("formatted {}", 1);
        crate::error_log!(category: "global-test"; "formatted {}", 2);
        assert_eq!(get().failure_count(), 0);
    }

    #[test]
    fn test_concurrent_first_get_yields_one_instance() {
        let addrs: Vec<usize> = (0..8)
            .map(|_| std::thread::spawn(|| get() as *const Log as usize))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
