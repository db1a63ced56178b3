//! Host module path resolution
//!
//! The logger only needs two things from the process it lives in: the path of
//! the module it was loaded from, and the path of the executable hosting it.
//! Everything else about the host is out of its hands.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Executable name used when the host's executable path can't be resolved
pub const UNKNOWN_EXE: &str = "unknownexe";

/// Name of the directory, next to the module's directory, that holds log files
pub const LOG_DIR_NAME: &str = "Logs";

/// Source of the paths the log file location is derived from
///
/// Implementations:
/// - `CurrentProcess`: the running executable is also the module
/// - `FixedHost`: explicit paths, for hosts that already know them
/// - `ModuleHandle` (Windows): a loaded DLL identified by its `HMODULE`
pub trait HostModule {
    /// Full path of the module (DLL or executable) doing the logging
    fn module_path(&self) -> Option<PathBuf>;

    /// Full path of the executable hosting the module
    fn executable_path(&self) -> Option<PathBuf>;
}

/// Host description for a module that is the executable itself
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentProcess;

impl HostModule for CurrentProcess {
    fn module_path(&self) -> Option<PathBuf> {
        std::env::current_exe().ok()
    }

    fn executable_path(&self) -> Option<PathBuf> {
        std::env::current_exe().ok()
    }
}

/// Host description with paths supplied up front
#[derive(Debug, Clone, Default)]
pub struct FixedHost {
    module_path: Option<PathBuf>,
    executable_path: Option<PathBuf>,
}

impl FixedHost {
    pub fn new(module_path: impl Into<PathBuf>, executable_path: impl Into<PathBuf>) -> Self {
        Self {
            module_path: Some(module_path.into()),
            executable_path: Some(executable_path.into()),
        }
    }

    /// A host where neither path resolves
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn with_module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_path = Some(path.into());
        self
    }

    pub fn with_executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = Some(path.into());
        self
    }
}

impl HostModule for FixedHost {
    fn module_path(&self) -> Option<PathBuf> {
        self.module_path.clone()
    }

    fn executable_path(&self) -> Option<PathBuf> {
        self.executable_path.clone()
    }
}

#[cfg(windows)]
pub use self::windows_host::ModuleHandle;

#[cfg(windows)]
mod windows_host {
    use std::ffi::{c_void, OsString};
    use std::os::windows::ffi::OsStringExt;
    use std::path::PathBuf;

    use windows::Win32::Foundation::HMODULE;
    use windows::Win32::System::LibraryLoader::GetModuleFileNameW;

    use super::HostModule;

    const MAX_MODULE_PATH: usize = 8192;

    /// A module loaded into the current process, identified by its `HMODULE`
    ///
    /// A null handle refers to the executable itself.
    #[derive(Debug, Clone, Copy)]
    pub struct ModuleHandle(HMODULE);

    impl ModuleHandle {
        /// Wrap a raw module handle as handed to `DllMain`
        pub fn from_raw(handle: *mut c_void) -> Self {
            Self(HMODULE(handle as isize))
        }

        pub fn executable() -> Self {
            Self(HMODULE::default())
        }
    }

    fn module_file_name(module: HMODULE) -> Option<PathBuf> {
        let mut buf = vec![0u16; MAX_MODULE_PATH];
        // SAFETY: the buffer is valid for its full length and the call writes at most that much
        let len = unsafe { GetModuleFileNameW(module, &mut buf) } as usize;
        if len == 0 {
            return None;
        }
        buf.truncate(len.min(MAX_MODULE_PATH));
        Some(PathBuf::from(OsString::from_wide(&buf)))
    }

    impl HostModule for ModuleHandle {
        fn module_path(&self) -> Option<PathBuf> {
            module_file_name(self.0)
        }

        fn executable_path(&self) -> Option<PathBuf> {
            module_file_name(HMODULE::default())
        }
    }
}

/// Where the log file for a host lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLocation {
    /// `<module-dir>/../Logs`
    pub dir: PathBuf,
    /// `<dir>/modelmod.<exe-name>.log`
    pub file: PathBuf,
}

impl LogLocation {
    /// Derive the log location from a host's module and executable paths
    pub fn resolve(host: &dyn HostModule) -> Self {
        let module_dir = host
            .module_path()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        let exe_name = host
            .executable_path()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| OsString::from(UNKNOWN_EXE));

        let dir = module_dir.join("..").join(LOG_DIR_NAME);

        let mut file_name = OsString::from("modelmod.");
        file_name.push(&exe_name);
        file_name.push(".log");

        let file = dir.join(file_name);
        Self { dir, file }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from_fixed_host() {
        let host = FixedHost::new("/games/mm/bin/ModelMod.dll", "/games/gw2/Gw2-64.exe");
        let location = LogLocation::resolve(&host);

        let expected_dir = Path::new("/games/mm/bin").join("..").join("Logs");
        assert_eq!(location.dir, expected_dir);
        assert_eq!(location.file, expected_dir.join("modelmod.Gw2-64.exe.log"));
    }

    #[test]
    fn test_unresolved_exe_falls_back() {
        let host = FixedHost::unresolved().with_module_path("/mm/bin/ModelMod.dll");
        let location = LogLocation::resolve(&host);
        assert!(location
            .file
            .ends_with(Path::new("Logs").join("modelmod.unknownexe.log")));
    }

    #[test]
    fn test_exe_path_without_file_name_falls_back() {
        let host = FixedHost::new("/mm/bin/ModelMod.dll", "/");
        let location = LogLocation::resolve(&host);
        assert_eq!(
            location.file.file_name().unwrap(),
            "modelmod.unknownexe.log"
        );
    }

    #[test]
    fn test_unresolved_module_is_relative() {
        let location = LogLocation::resolve(&FixedHost::unresolved());
        assert_eq!(location.dir, Path::new("..").join("Logs"));
    }

    #[test]
    fn test_current_process_resolves() {
        let location = LogLocation::resolve(&CurrentProcess);
        let name = location.file.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("modelmod."));
        assert!(name.ends_with(".log"));
        assert_ne!(name, "modelmod.unknownexe.log");
    }
}
