//! Windows hosts file location, derived from %SystemRoot%.

use std::path::PathBuf;

use crate::error::Result;

pub fn hosts_path() -> Result<PathBuf> {
    super::hosts_path_under_system_root(std::env::var_os("SystemRoot"))
}
