//! Hosts file model: lines, entries, matching and line transforms.
//!
//! Lines are kept verbatim. Parsing an `Entry` out of a line is only used by
//! exact matching; everything that is not rewritten goes back to disk as read.

use std::net::IpAddr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{HostsError, Result};

/// IP used when none is given on the command line.
pub const DEFAULT_IP: &str = "127.0.0.1";

/// How a domain argument is matched against hosts file lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Line text contains the domain anywhere (comments and superstrings included)
    #[default]
    Substring,
    /// A hostname field of a mapping line equals the domain
    Exact,
}

/// True if `ip` is an IPv4 or IPv6 literal. No name resolution is done.
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// Parse an IP literal, failing with `InvalidIp`.
pub fn validate_ip(ip: &str) -> Result<IpAddr> {
    ip.parse::<IpAddr>()
        .map_err(|_| HostsError::InvalidIp(ip.to_string()))
}

/// Text of a record written by this tool.
pub fn format_entry(ip: &str, domain: &str) -> String {
    format!("{ip}\t{domain}")
}

/// One IP-to-hostnames mapping parsed from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub ip: IpAddr,
    pub hostnames: Vec<String>,
}

impl Entry {
    /// Parse `IP<ws>host [host...] [# comment]`. Comments, blank lines and
    /// lines whose first field is not an IP literal yield `None`.
    pub fn parse(line: &str) -> Option<Entry> {
        let data = match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        };
        let mut fields = data.split_whitespace();
        let ip = fields.next()?.parse::<IpAddr>().ok()?;
        let hostnames: Vec<String> = fields.map(String::from).collect();
        if hostnames.is_empty() {
            return None;
        }
        Some(Entry { ip, hostnames })
    }

    pub fn has_hostname(&self, domain: &str) -> bool {
        self.hostnames.iter().any(|h| h.eq_ignore_ascii_case(domain))
    }
}

/// A raw line plus its parsed mapping, if it is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsLine {
    raw: String,
    entry: Option<Entry>,
}

impl HostsLine {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let entry = Entry::parse(&raw);
        Self { raw, entry }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn entry(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    pub fn matches(&self, domain: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Substring => self.raw.contains(domain),
            MatchMode::Exact => self.entry.as_ref().is_some_and(|e| e.has_hostname(domain)),
        }
    }

    /// This line with every `domain` hostname field cut out. The IP text,
    /// remaining separators and any trailing comment are kept as written.
    /// `None` if the line is not a mapping or no hostname would remain.
    pub fn without_hostname(&self, domain: &str) -> Option<HostsLine> {
        let entry = self.entry.as_ref()?;
        if entry.hostnames.iter().all(|h| h.eq_ignore_ascii_case(domain)) {
            return None;
        }

        let data_end = self.raw.find('#').unwrap_or(self.raw.len());
        let spans = field_spans(&self.raw[..data_end]);
        let mut out = String::with_capacity(self.raw.len());
        let mut kept_from = 0;
        // spans[0] is the IP; each cut runs from the previous field's end.
        for pair in spans.windows(2) {
            let (prev_end, (start, end)) = (pair[0].1, pair[1]);
            if self.raw[start..end].eq_ignore_ascii_case(domain) {
                out.push_str(&self.raw[kept_from..prev_end]);
                kept_from = end;
            }
        }
        out.push_str(&self.raw[kept_from..]);
        Some(HostsLine::new(out))
    }
}

/// Byte ranges of the whitespace-separated fields of `s`.
fn field_spans(s: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(st)) => {
                spans.push((st, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(st) = start {
        spans.push((st, s.len()));
    }
    spans
}

/// Ordered lines of a hosts file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsFile {
    lines: Vec<HostsLine>,
}

impl HostsFile {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(HostsLine::new).collect(),
        }
    }

    pub fn raw_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(HostsLine::raw)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn count_matching(&self, domain: &str, mode: MatchMode) -> usize {
        self.lines.iter().filter(|l| l.matches(domain, mode)).count()
    }

    /// Point `domain` at `ip`. Returns the number of matching lines.
    ///
    /// Substring mode replaces each matching line with `<ip>\t<domain>`.
    /// Exact mode only moves the named hostname: it is cut from its line and
    /// a `<ip>\t<domain>` line follows; sibling hostnames stay where they were.
    pub fn replace_matching(&mut self, domain: &str, ip: &str, mode: MatchMode) -> usize {
        let mut replaced = 0;
        let mut out = Vec::with_capacity(self.lines.len());
        for line in std::mem::take(&mut self.lines) {
            if !line.matches(domain, mode) {
                out.push(line);
                continue;
            }
            replaced += 1;
            if mode == MatchMode::Exact {
                out.extend(line.without_hostname(domain));
            }
            out.push(HostsLine::new(format_entry(ip, domain)));
        }
        self.lines = out;
        replaced
    }

    /// Remove `domain`. Returns the number of matching lines.
    ///
    /// Substring mode drops whole lines. Exact mode drops only the hostname
    /// field, and the line only once it has no hostnames left.
    pub fn remove_matching(&mut self, domain: &str, mode: MatchMode) -> usize {
        let mut removed = 0;
        let mut out = Vec::with_capacity(self.lines.len());
        for line in std::mem::take(&mut self.lines) {
            if !line.matches(domain, mode) {
                out.push(line);
                continue;
            }
            removed += 1;
            if mode == MatchMode::Exact {
                out.extend(line.without_hostname(domain));
            }
        }
        self.lines = out;
        removed
    }

    /// File content with one `\n` after every line.
    pub fn to_content(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.raw);
            out.push('\n');
        }
        out
    }
}
