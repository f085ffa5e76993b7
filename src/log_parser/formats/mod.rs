pub mod mysql;
pub mod postgres;

use chrono::{DateTime, FixedOffset};
use regex::{Captures, Regex};
use serde::Serialize;

/// Database name used when the log line does not name one.
pub const NOT_SPECIFIED: &str = "指定なし";

/// Placeholder for values that could not be recovered from the line.
pub const UNKNOWN: &str = "不明";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    PostgreSql,
    MySql,
}

impl Engine {
    pub const ALL: [Engine; 2] = [Engine::PostgreSql, Engine::MySql];

    pub fn name(&self) -> &'static str {
        match self {
            Engine::PostgreSql => "PostgreSQL",
            Engine::MySql => "MySQL",
        }
    }

    pub fn profile(&self) -> &'static EngineProfile {
        match self {
            Engine::PostgreSql => &postgres::PROFILE,
            Engine::MySql => &mysql::PROFILE,
        }
    }

    /// Maps an RDS log group name (`/aws/rds/cluster/<id>/<log>`) to the
    /// engine that writes it.
    pub fn from_log_group(log_group: &str) -> Option<Engine> {
        match log_group.trim_end_matches('/').rsplit('/').next()? {
            "postgresql" => Some(Engine::PostgreSql),
            "general" => Some(Engine::MySql),
            _ => None,
        }
    }
}

/// A new client connection recovered from one log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionEvent {
    pub engine: Engine,
    /// Connection time in the display timezone.
    pub timestamp: DateTime<FixedOffset>,
    /// Set when the line's timestamp could not be parsed and the
    /// extraction time was substituted.
    pub timestamp_estimated: bool,
    pub user_name: String,
    pub database_name: String,
    pub client_ip: String,
    pub raw_message: String,
}

/// How a notification for an engine looks in the chat channel.
#[derive(Debug, Clone, Copy)]
pub struct DisplayStyle {
    pub username: &'static str,
    pub icon_emoji: &'static str,
    pub headline: &'static str,
    pub color: &'static str,
}

/// Group indexes of the fields a capture pattern recovers.
#[derive(Debug, Clone, Copy)]
pub struct CaptureLayout {
    pub timestamp: usize,
    pub address: usize,
    pub user: usize,
    pub database: Option<usize>,
}

/// The raw substrings a capture pattern pulled out of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCapture<'a> {
    pub timestamp: &'a str,
    pub address: &'a str,
    pub user: &'a str,
    pub database: Option<&'a str>,
}

/// One step of an extraction cascade.
///
/// A pattern only counts as matched when at least `min_groups` groups
/// (the whole match included) participated; otherwise the cascade moves on.
pub struct CapturePattern {
    pub name: &'static str,
    pub regex: &'static Regex,
    pub min_groups: usize,
    pub layout: CaptureLayout,
}

impl CapturePattern {
    pub fn captures<'a>(&self, line: &'a str) -> Option<RawCapture<'a>> {
        let caps = self.regex.captures(line)?;
        let participating = caps.iter().filter(|group| group.is_some()).count();
        if participating < self.min_groups {
            return None;
        }

        Some(RawCapture {
            timestamp: group(&caps, self.layout.timestamp)?,
            address: group(&caps, self.layout.address)?,
            user: group(&caps, self.layout.user)?,
            database: self.layout.database.and_then(|index| group(&caps, index)),
        })
    }
}

fn group<'a>(caps: &Captures<'a>, index: usize) -> Option<&'a str> {
    caps.get(index).map(|m| m.as_str())
}

/// Everything that distinguishes one engine's connection log from another.
pub struct EngineProfile {
    pub engine: Engine,
    /// Cheap test for "this line is about a connection at all".
    pub gate: &'static Regex,
    /// Shape of an ordinary line from this engine, used for detection.
    pub line_prefix: &'static Regex,
    pub system_accounts: &'static [&'static str],
    /// Substrings that identify a system account somewhere in a line.
    pub exclusion_markers: fn(&str) -> Vec<String>,
    /// Tried in order; the first pattern that matches wins.
    pub cascade: Vec<CapturePattern>,
    /// chrono format of the captured timestamp, which is always UTC.
    pub timestamp_format: &'static str,
    pub style: DisplayStyle,
}

impl EngineProfile {
    /// Returns the system account a line refers to, if any.
    pub fn system_account_in(&self, line: &str) -> Option<&'static str> {
        self.system_accounts.iter().copied().find(|account| {
            (self.exclusion_markers)(account)
                .iter()
                .any(|marker| line.contains(marker.as_str()))
        })
    }
}
