//! C ABI for the ModelMod logger
//!
//! Exposes the process-wide logger to code that can't link Rust directly: the
//! native hook layer and the managed side loaded into the same host. Every
//! entry point catches panics, and bad input (null pointers, unknown level
//! values) turns the call into a no-op.
//!
//! Levels are passed as integers: 0 = debug, 1 = info, 2 = warn, 3 = error.

use std::borrow::Cow;
use std::ffi::{c_char, c_void, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};

use modelmod_log::Level;

/// Returned by `mmlog_get_category_level` when there is no override
pub const MMLOG_NO_LEVEL: i32 = -1;

fn guard<T>(fallback: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or(fallback)
}

/// # Safety
/// `ptr` must be null or point to a NUL-terminated string valid for `'a`.
unsafe fn text<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy())
    }
}

/// Resolve the log file location
///
/// `module` is the calling module's handle (an `HMODULE` on Windows). Null
/// means the host executable itself. Off Windows the handle is ignored and the
/// current executable is used.
///
/// # Safety
/// On Windows a non-null `module` must be a module handle loaded in this process.
#[no_mangle]
pub unsafe extern "C" fn mmlog_init(module: *mut c_void) {
    guard((), || {
        #[cfg(windows)]
        modelmod_log::init(&modelmod_log::ModuleHandle::from_raw(module));

        #[cfg(not(windows))]
        {
            let _ = module;
            modelmod_log::init(&modelmod_log::CurrentProcess);
        }
    })
}

/// Log `message` under `category`; `limit <= 0` means unlimited
///
/// # Safety
/// `message` and `category` must be null or NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn mmlog_log(
    level: i32,
    message: *const c_char,
    category: *const c_char,
    limit: i32,
) {
    guard((), || {
        let Ok(level) = Level::try_from(level) else {
            return;
        };
        let (Some(message), Some(category)) = (text(message), text(category)) else {
            return;
        };
        let limit = u32::try_from(limit).unwrap_or(0);
        modelmod_log::log_limited(level, &message, &category, limit);
    })
}

/// Set the global threshold
#[no_mangle]
pub extern "C" fn mmlog_set_level(level: i32) {
    guard((), || {
        if let Ok(level) = Level::try_from(level) {
            modelmod_log::get().set_level(level);
        }
    })
}

/// Enable or disable the debug-output and file sinks (non-zero = enabled)
#[no_mangle]
pub extern "C" fn mmlog_set_outputs(debug: i32, file: i32) {
    guard((), || {
        let log = modelmod_log::get();
        log.set_output_debug(debug != 0);
        log.set_output_file(file != 0);
    })
}

/// # Safety
/// `category` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn mmlog_set_category_level(category: *const c_char, level: i32) {
    guard((), || {
        let Ok(level) = Level::try_from(level) else {
            return;
        };
        if let Some(category) = text(category) {
            modelmod_log::set_category_level(&category, level);
        }
    })
}

/// Override level for `category`, or `MMLOG_NO_LEVEL`
///
/// # Safety
/// `category` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn mmlog_get_category_level(category: *const c_char) -> i32 {
    guard(MMLOG_NO_LEVEL, || {
        text(category)
            .and_then(|category| modelmod_log::category_level(&category))
            .map(i32::from)
            .unwrap_or(MMLOG_NO_LEVEL)
    })
}

/// Number of write and directory failures the logger has swallowed
#[no_mangle]
pub extern "C" fn mmlog_failure_count() -> u64 {
    guard(0, || modelmod_log::get().failure_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelmod_log::{Log, LogConfig, MemorySink, LIMIT_SUFFIX};
    use std::ffi::CString;
    use std::ptr;
    use std::sync::OnceLock;

    static CAPTURED: OnceLock<MemorySink> = OnceLock::new();

    /// Installs the process-wide logger with a capturing debug sink. Every test
    /// calls this before touching the logger, so the install always wins.
    fn captured() -> &'static MemorySink {
        CAPTURED.get_or_init(|| {
            let sink = MemorySink::new();
            let log = Log::with_debug_sink(
                LogConfig::new().with_output_file(false),
                Box::new(sink.clone()),
            );
            assert!(modelmod_log::install(log).is_ok());
            sink
        })
    }

    /// Captured lines for one category; tests run in parallel on one logger
    fn lines_for(category: &str) -> Vec<String> {
        let prefix = format!("[{}]: ", category);
        captured()
            .lines()
            .into_iter()
            .filter(|l| l.starts_with(&prefix))
            .collect()
    }

    #[test]
    fn test_log_emits_line() {
        captured();
        let category = CString::new("ffi-emit").unwrap();
        let message = CString::new("device hooked").unwrap();
        unsafe {
            mmlog_log(3, message.as_ptr(), category.as_ptr(), 0);
        }
        assert_eq!(lines_for("ffi-emit"), vec!["[ffi-emit]: device hooked"]);
    }

    #[test]
    fn test_non_positive_limit_is_unlimited() {
        captured();
        let category = CString::new("ffi-unlimited").unwrap();
        let message = CString::new("frame").unwrap();
        unsafe {
            for _ in 0..4 {
                mmlog_log(3, message.as_ptr(), category.as_ptr(), -5);
            }
            mmlog_log(3, message.as_ptr(), category.as_ptr(), 0);
        }
        let lines = lines_for("ffi-unlimited");
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l == "[ffi-unlimited]: frame"));
    }

    #[test]
    fn test_positive_limit_caps_output() {
        captured();
        let category = CString::new("ffi-capped").unwrap();
        let message = CString::new("ffi capped message").unwrap();
        unsafe {
            for _ in 0..4 {
                mmlog_log(3, message.as_ptr(), category.as_ptr(), 2);
            }
        }
        assert_eq!(
            lines_for("ffi-capped"),
            vec![
                "[ffi-capped]: ffi capped message".to_string(),
                format!("[ffi-capped]: ffi capped message{}", LIMIT_SUFFIX),
            ]
        );
    }

    #[test]
    fn test_init_with_null_module_resolves_path() {
        captured();
        unsafe {
            mmlog_init(ptr::null_mut());
        }
        let path = modelmod_log::get().log_file_path().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("modelmod."));
        assert!(name.ends_with(".log"));
        assert_ne!(name, "modelmod.unknownexe.log");
        assert!(path.parent().unwrap().ends_with("Logs"));
    }

    #[test]
    fn test_category_level_round_trip() {
        captured();
        let category = CString::new("ffi-net").unwrap();
        let quiet = CString::new("connected").unwrap();
        let loud = CString::new("timeout").unwrap();
        unsafe {
            assert_eq!(mmlog_get_category_level(category.as_ptr()), MMLOG_NO_LEVEL);
            mmlog_set_category_level(category.as_ptr(), 2);
            assert_eq!(mmlog_get_category_level(category.as_ptr()), 2);

            mmlog_log(1, quiet.as_ptr(), category.as_ptr(), 0);
            mmlog_log(2, loud.as_ptr(), category.as_ptr(), 0);
        }
        assert_eq!(lines_for("ffi-net"), vec!["[ffi-net]: timeout"]);
    }

    #[test]
    fn test_invalid_input_is_ignored() {
        captured();
        let category = CString::new("ffi-bad").unwrap();
        let message = CString::new("hello").unwrap();
        unsafe {
            mmlog_set_category_level(category.as_ptr(), 42);
            assert_eq!(mmlog_get_category_level(category.as_ptr()), MMLOG_NO_LEVEL);

            mmlog_set_category_level(ptr::null(), 1);
            assert_eq!(mmlog_get_category_level(ptr::null()), MMLOG_NO_LEVEL);

            mmlog_log(7, message.as_ptr(), category.as_ptr(), 0);
            mmlog_log(-1, message.as_ptr(), category.as_ptr(), 0);
            mmlog_log(3, ptr::null(), category.as_ptr(), 0);
            mmlog_log(3, message.as_ptr(), ptr::null(), 0);
        }
        assert!(lines_for("ffi-bad").is_empty());
    }

    #[test]
    fn test_set_level() {
        captured();
        mmlog_set_level(3);
        assert_eq!(modelmod_log::get().level(), Level::Error);
        mmlog_set_level(99);
        assert_eq!(modelmod_log::get().level(), Level::Error);
        mmlog_set_level(1);
        assert_eq!(modelmod_log::get().level(), Level::Info);
    }

    #[test]
    fn test_set_outputs() {
        captured();
        // the debug slot holds the capture sink, so it stays on
        mmlog_set_outputs(1, 0);
        let config = modelmod_log::get().config();
        assert!(config.output_debug);
        assert!(!config.output_file);
        assert_eq!(mmlog_failure_count(), modelmod_log::get().failure_count());
    }

    #[test]
    fn test_lossy_strings() {
        captured();
        let category = [b'f', b'f', b'i', 0xff, 0];
        unsafe {
            mmlog_set_category_level(category.as_ptr().cast(), 0);
        }
        assert_eq!(modelmod_log::category_level("ffi\u{fffd}"), Some(Level::Debug));
    }
}
