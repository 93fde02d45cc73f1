//! Error kinds surfaced to the user, each with its own exit code.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostsError {
    #[error("cannot locate hosts file: {0}")]
    PathResolution(String),

    #[error("cannot open {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error writing {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid IP address: {0:?}")]
    InvalidIp(String),

    #[error("Insufficient number of arguments. Use 'hostedit [action] [domain] [ip]'.")]
    InvalidArgumentCount,

    #[error("domain must not be empty")]
    EmptyDomain,

    #[error("Invalid action {0:?}. Use 'add', 'list', 'edit', or 'del'.")]
    InvalidAction(String),

    #[error("an entry matching {0:?} already exists")]
    DuplicateEntry(String),
}

pub type Result<T> = std::result::Result<T, HostsError>;

impl HostsError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            HostsError::InvalidArgumentCount | HostsError::EmptyDomain => 2,
            HostsError::InvalidAction(_) => 3,
            HostsError::InvalidIp(_) => 4,
            HostsError::PathResolution(_) => 5,
            HostsError::FileOpen { .. } => 6,
            HostsError::FileRead { .. } => 7,
            HostsError::FileWrite { .. } => 8,
            HostsError::DuplicateEntry(_) => 9,
        }
    }
}

/// Exit code for errors that are not a `HostsError` (config, etc).
pub const EXIT_OTHER: i32 = 1;
