//! CLI definitions and action routing.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::{Config, HosteditPaths, Overrides, Settings, HOSTS_FILE_ENV};
use crate::editor::{AddOutcome, DuplicatePolicy, FileHostsEditor, HostsEditor};
use crate::error::HostsError;
use crate::hosts::{self, MatchMode};

pub const USAGE: &str = "Usage: hostedit [action] [domain] [ip]";
pub const EXAMPLE: &str = "Example: hostedit add example.com 127.0.0.1";

#[derive(Parser)]
#[command(name = "hostedit", version)]
#[command(about = "Add, list, edit and delete entries in the system hosts file")]
pub struct Cli {
    /// Action to run: add, list, edit or del (omit to show the file)
    pub action: Option<String>,

    /// Domain the action applies to (read but unused by list)
    pub domain: Option<String>,

    /// IP address for the entry [default: 127.0.0.1]
    pub ip: Option<String>,

    /// Operate on this file instead of the system hosts file
    #[arg(long, value_name = "PATH", env = HOSTS_FILE_ENV)]
    pub hosts_file: Option<PathBuf>,

    /// Read settings from this config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How the domain is matched by edit, del and duplicate checks
    #[arg(long = "match", value_enum, value_name = "MODE")]
    pub match_mode: Option<MatchMode>,

    /// What add does when the domain is already present
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_duplicate: Option<DuplicatePolicy>,

    /// Log debug details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    List,
    Edit,
    Del,
}

impl Action {
    /// Whether the action writes the hosts file (and so needs a valid IP).
    pub fn mutates(self) -> bool {
        !matches!(self, Action::List)
    }
}

impl FromStr for Action {
    type Err = HostsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "add" => Ok(Action::Add),
            "list" => Ok(Action::List),
            "edit" => Ok(Action::Edit),
            "del" => Ok(Action::Del),
            other => Err(HostsError::InvalidAction(other.to_string())),
        }
    }
}

/// What the positional arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// No arguments: show the file and usage.
    Show,
    Run {
        action: Action,
        domain: String,
        ip: Option<String>,
    },
}

/// Check argument count, then the action keyword.
pub fn parse_invocation(
    action: Option<String>,
    domain: Option<String>,
    ip: Option<String>,
) -> std::result::Result<Invocation, HostsError> {
    match (action, domain) {
        (None, _) => Ok(Invocation::Show),
        (Some(_), None) => Err(HostsError::InvalidArgumentCount),
        (Some(action), Some(domain)) => Ok(Invocation::Run {
            action: action.parse()?,
            domain,
            ip,
        }),
    }
}

/// Run CLI and dispatch to handlers.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    let invocation = parse_invocation(cli.action, cli.domain, cli.ip)?;
    let config = load_config(cli.config.as_deref());
    let overrides = Overrides {
        hosts_file: cli.hosts_file,
        match_mode: cli.match_mode,
        on_duplicate: cli.on_duplicate,
    };

    match invocation {
        Invocation::Show => {
            let config = config.unwrap_or_else(|e| {
                eprintln!("Warning: {e:#}");
                Config::default()
            });
            cmd_show(&config, &overrides);
            Ok(())
        }
        Invocation::Run { action, domain, ip } => {
            let config = config?;
            let ip = ip.unwrap_or_else(|| config.default_ip().to_string());
            if action.mutates() {
                hosts::validate_ip(&ip)?;
            }
            let settings = Settings::resolve(&config, &overrides)?;
            let editor = FileHostsEditor::from_settings(&settings);
            debug!(hosts = %editor.path().display(), ?action, domain = %domain, ip = %ip, "running action");
            dispatch(&editor, action, &domain, &ip)
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            Config::load(path)
        }
        None => Config::load(&HosteditPaths::default_paths().config_file),
    };
    config.context("load configuration")
}

/// Best effort: failures are warnings and the exit status stays 0.
fn cmd_show(config: &Config, overrides: &Overrides) {
    match Settings::resolve(config, overrides) {
        Ok(settings) => show_content(&FileHostsEditor::from_settings(&settings)),
        Err(e) => eprintln!("Warning: {e}"),
    }
    println!("{USAGE}");
    println!("{EXAMPLE}");
}

/// Run one action against the editor. `ip` has already been validated for
/// mutating actions.
fn dispatch(editor: &dyn HostsEditor, action: Action, domain: &str, ip: &str) -> Result<()> {
    match action {
        Action::List => {
            let lines = editor.list()?;
            print_content(&lines);
        }
        Action::Add => {
            match editor.add(domain, ip)? {
                AddOutcome::Appended => println!("Entry added successfully."),
                AddOutcome::Updated(n) => println!("Entry updated successfully ({n} line(s))."),
            }
            show_content(editor);
        }
        Action::Edit => {
            let n = editor.edit(domain, ip)?;
            if n == 0 {
                warn!(domain, "no line matched; file left unchanged");
            }
            println!("Entry edited successfully.");
            show_content(editor);
        }
        Action::Del => {
            let n = editor.delete(domain)?;
            if n == 0 {
                warn!(domain, "no line matched; file left unchanged");
            }
            println!("Entry deleted successfully.");
            show_content(editor);
        }
    }
    Ok(())
}

fn print_content(lines: &[String]) {
    println!("Current hosts file content:");
    for line in lines {
        println!("{line}");
    }
}

fn show_content(editor: &dyn HostsEditor) {
    match editor.list() {
        Ok(lines) => print_content(&lines),
        Err(e) => eprintln!("Warning: could not display hosts file: {e}"),
    }
}
