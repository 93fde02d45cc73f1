//! Platform-specific location of the hosts file.

use std::ffi::OsString;
use std::path::PathBuf;

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

use crate::error::{HostsError, Result};

/// Get the platform hosts file path.
pub fn resolve_hosts_path() -> Result<PathBuf> {
    #[cfg(unix)]
    return Ok(unix::hosts_path());

    #[cfg(windows)]
    return windows::hosts_path();

    #[cfg(not(any(unix, windows)))]
    return Err(HostsError::PathResolution(
        "no known hosts file location on this platform".to_string(),
    ));
}

/// `<SystemRoot>\System32\drivers\etc\hosts`. A missing or empty root is an error.
pub fn hosts_path_under_system_root(system_root: Option<OsString>) -> Result<PathBuf> {
    match system_root {
        Some(root) if !root.is_empty() => Ok(PathBuf::from(root)
            .join("System32")
            .join("drivers")
            .join("etc")
            .join("hosts")),
        _ => Err(HostsError::PathResolution(
            "SystemRoot environment variable is not set".to_string(),
        )),
    }
}
