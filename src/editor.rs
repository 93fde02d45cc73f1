//! Hosts file read/write against an explicit path.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{HostsError, Result};
use crate::hosts::{self, HostsFile, MatchMode};

/// What `add` does when the domain already has a matching line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Append anyway
    #[default]
    Allow,
    /// Fail and leave the file untouched
    Reject,
    /// Replace the matching lines instead of appending
    Upsert,
}

/// Result of a successful `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Appended,
    /// Upsert replaced this many existing lines.
    Updated(usize),
}

/// Trait for hosts file operations.
pub trait HostsEditor {
    /// All lines in file order.
    fn list(&self) -> Result<Vec<String>>;
    /// Append `<ip>\t<domain>` (subject to the duplicate policy).
    fn add(&self, domain: &str, ip: &str) -> Result<AddOutcome>;
    /// Replace matching lines with `<ip>\t<domain>`. Returns lines replaced.
    fn edit(&self, domain: &str, ip: &str) -> Result<usize>;
    /// Remove matching lines. Returns lines removed.
    fn delete(&self, domain: &str) -> Result<usize>;
}

/// HostsEditor that reads/writes the file at the given path.
#[derive(Debug, Clone)]
pub struct FileHostsEditor {
    path: PathBuf,
    match_mode: MatchMode,
    on_duplicate: DuplicatePolicy,
}

impl FileHostsEditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            match_mode: MatchMode::default(),
            on_duplicate: DuplicatePolicy::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.hosts_path)
            .with_match_mode(settings.match_mode)
            .with_duplicate_policy(settings.on_duplicate)
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file. A failure on any line fails the read.
    pub fn load(&self) -> Result<HostsFile> {
        let file = File::open(&self.path).map_err(|e| self.open_error(e))?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            lines.push(line.map_err(|e| self.read_error(e))?);
        }
        debug!(path = %self.path.display(), lines = lines.len(), "read hosts file");
        Ok(HostsFile::from_lines(lines))
    }

    /// Replace the file with `hosts` via a temp file in the same directory
    /// renamed over the target. When the target cannot be renamed over (a
    /// bind-mounted hosts file, as in containers) it is rewritten in place.
    pub fn store(&self, hosts: &HostsFile) -> Result<()> {
        let target = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let content = hosts.to_content();

        let mut tmp = tempfile::Builder::new()
            .prefix(".hosts.")
            .tempfile_in(&dir)
            .map_err(|e| self.write_error(e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| self.write_error(e))?;
        tmp.flush().map_err(|e| self.write_error(e))?;
        if let Ok(meta) = fs::metadata(&target) {
            fs::set_permissions(tmp.path(), meta.permissions())
                .map_err(|e| self.write_error(e))?;
        }
        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;

        match tmp.persist(&target) {
            Ok(_) => {}
            Err(e) if rename_blocked(&e.error) => {
                debug!(path = %target.display(), error = %e.error, "rename refused, rewriting in place");
                // Dropping the error removes the temp file.
                drop(e);
                self.store_in_place(hosts)?;
                return Ok(());
            }
            Err(e) => return Err(self.write_error(e.error)),
        }

        debug!(path = %target.display(), lines = hosts.len(), "rewrote hosts file");
        Ok(())
    }

    /// Truncate and rewrite the file itself, keeping its inode.
    pub fn store_in_place(&self, hosts: &HostsFile) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        file.write_all(hosts.to_content().as_bytes())
            .map_err(|e| self.write_error(e))?;
        file.sync_all().map_err(|e| self.write_error(e))?;
        debug!(path = %self.path.display(), lines = hosts.len(), "rewrote hosts file in place");
        Ok(())
    }

    fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.open_error(e))?;

        let mut text = String::new();
        if lacks_trailing_newline(&mut file).map_err(|e| self.read_error(e))? {
            text.push('\n');
        }
        text.push_str(line);
        text.push('\n');

        file.write_all(text.as_bytes())
            .map_err(|e| self.write_error(e))?;
        file.flush().map_err(|e| self.write_error(e))?;
        debug!(path = %self.path.display(), line, "appended entry");
        Ok(())
    }

    fn open_error(&self, source: io::Error) -> HostsError {
        HostsError::FileOpen {
            path: self.path.clone(),
            source,
        }
    }

    fn read_error(&self, source: io::Error) -> HostsError {
        HostsError::FileRead {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> HostsError {
        HostsError::FileWrite {
            path: self.path.clone(),
            source,
        }
    }
}

fn lacks_trailing_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Renaming over the target is refused: it is a mount point or lives on
/// another device.
pub fn rename_blocked(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ResourceBusy | io::ErrorKind::CrossesDevices
    )
}

fn check_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(HostsError::EmptyDomain);
    }
    Ok(())
}

impl HostsEditor for FileHostsEditor {
    fn list(&self) -> Result<Vec<String>> {
        let hosts = self.load()?;
        Ok(hosts.raw_lines().map(String::from).collect())
    }

    fn add(&self, domain: &str, ip: &str) -> Result<AddOutcome> {
        check_domain(domain)?;
        hosts::validate_ip(ip)?;

        match self.on_duplicate {
            DuplicatePolicy::Allow => {}
            DuplicatePolicy::Reject => {
                if self.load()?.count_matching(domain, self.match_mode) > 0 {
                    return Err(HostsError::DuplicateEntry(domain.to_string()));
                }
            }
            DuplicatePolicy::Upsert => {
                let mut hosts = self.load()?;
                let replaced = hosts.replace_matching(domain, ip, self.match_mode);
                if replaced > 0 {
                    self.store(&hosts)?;
                    info!(domain, ip, replaced, "updated existing entry");
                    return Ok(AddOutcome::Updated(replaced));
                }
            }
        }

        self.append_line(&hosts::format_entry(ip, domain))?;
        info!(domain, ip, "added entry");
        Ok(AddOutcome::Appended)
    }

    fn edit(&self, domain: &str, ip: &str) -> Result<usize> {
        check_domain(domain)?;
        hosts::validate_ip(ip)?;

        let mut hosts = self.load()?;
        let replaced = hosts.replace_matching(domain, ip, self.match_mode);
        self.store(&hosts)?;
        info!(domain, ip, replaced, "edited entries");
        Ok(replaced)
    }

    fn delete(&self, domain: &str) -> Result<usize> {
        check_domain(domain)?;

        let mut hosts = self.load()?;
        let removed = hosts.remove_matching(domain, self.match_mode);
        self.store(&hosts)?;
        info!(domain, removed, "deleted entries");
        Ok(removed)
    }
}
