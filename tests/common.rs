//! Shared test helpers.
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory used as HOSTEDIT_HOME and to hold the hosts file.
pub fn temp_home() -> TempDir {
    tempfile::Builder::new()
        .prefix("hostedit_test_")
        .tempdir()
        .expect("temp dir")
}

/// Write `content` to `<dir>/hosts` and return its path.
pub fn hosts_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("hosts");
    std::fs::write(&path, content).unwrap();
    path
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// hostedit binary pointed at `hosts` with config isolated to `home`.
pub fn hostedit(home: &Path, hosts: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hostedit").unwrap();
    cmd.env("HOSTEDIT_HOME", home)
        .env("HOSTEDIT_HOSTS_FILE", hosts)
        .env_remove("RUST_LOG");
    cmd
}
