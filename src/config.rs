//! Configuration loading and settings resolution.
//!
//! Supports HOSTEDIT_HOME env var override for testing.

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::editor::DuplicatePolicy;
use crate::error::HostsError;
use crate::hosts::{MatchMode, DEFAULT_IP};

/// Environment variable overriding the hosts file path.
pub const HOSTS_FILE_ENV: &str = "HOSTEDIT_HOSTS_FILE";

/// Paths for hostedit's own files.
#[derive(Debug, Clone)]
pub struct HosteditPaths {
    pub config_file: PathBuf,
}

impl HosteditPaths {
    pub fn from_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.toml"),
        }
    }

    /// Paths for testing: use a temp dir as base.
    pub fn for_test(base: impl AsRef<Path>) -> Self {
        Self::from_base(base.as_ref().to_path_buf())
    }

    /// Get default paths (respects HOSTEDIT_HOME).
    pub fn default_paths() -> Self {
        let base = if let Ok(home) = std::env::var("HOSTEDIT_HOME") {
            PathBuf::from(home)
        } else if let Some(dirs) = directories::ProjectDirs::from("com", "hostedit", "hostedit") {
            dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from(".hostedit")
        };
        Self::from_base(base)
    }
}

/// config.toml structure. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub hosts_file: Option<PathBuf>,
    #[serde(default)]
    pub default_ip: Option<String>,
    #[serde(default)]
    pub match_mode: Option<MatchMode>,
    #[serde(default)]
    pub on_duplicate: Option<DuplicatePolicy>,
}

impl Config {
    /// Load config from path (with shared lock). A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.is_file() {
            return Ok(Config::default());
        }
        let mut file = fs::OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("open config {}", path.display()))?;
        fs2::FileExt::lock_shared(&file)?;
        let mut s = String::new();
        file.read_to_string(&mut s)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: Config =
            toml::from_str(&s).with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// IP used when the command line omits one.
    pub fn default_ip(&self) -> &str {
        self.default_ip.as_deref().unwrap_or(DEFAULT_IP)
    }
}

/// Values given on the command line (or via env through clap).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub hosts_file: Option<PathBuf>,
    pub match_mode: Option<MatchMode>,
    pub on_duplicate: Option<DuplicatePolicy>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub hosts_path: PathBuf,
    pub default_ip: String,
    pub match_mode: MatchMode,
    pub on_duplicate: DuplicatePolicy,
}

impl Settings {
    /// Overrides win over config; the platform path is only resolved when
    /// neither names a hosts file.
    pub fn resolve(config: &Config, overrides: &Overrides) -> std::result::Result<Self, HostsError> {
        let hosts_path = match overrides.hosts_file.as_ref().or(config.hosts_file.as_ref()) {
            Some(p) => p.clone(),
            None => crate::platform::resolve_hosts_path()?,
        };
        Ok(Self {
            hosts_path,
            default_ip: config.default_ip().to_string(),
            match_mode: overrides.match_mode.or(config.match_mode).unwrap_or_default(),
            on_duplicate: overrides
                .on_duplicate
                .or(config.on_duplicate)
                .unwrap_or_default(),
        })
    }
}
