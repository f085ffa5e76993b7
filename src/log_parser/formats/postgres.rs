//! Aurora PostgreSQL connection logging (`log_connections = on`).
//!
//! Lines carry the RDS `log_line_prefix` `%t:%r:%u@%d:[%p]:`, e.g.
//! `2025-08-31 06:31:53 UTC:10.0.128.64(35340):yuta@postgres:[2599]:LOG:  connection authorized: user=yuta database=postgres`.

use super::{CaptureLayout, CapturePattern, DisplayStyle, Engine, EngineProfile};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref GATE_PATTERN: Regex = Regex::new(r"connection\s+(received|authorized)").unwrap();

    pub static ref LINE_PREFIX_PATTERN: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}\s+UTC:[^:]*:[^@]*@[^:]*:\[\d+\]:[A-Z]+:").unwrap();

    pub static ref AUTHORIZED_PATTERN: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s+UTC:([^:]+):\s*([^@]+)@([^:]+):\[(\d+)\]:LOG:\s+connection\s+(authorized|received):\s+user=(\w+)\s+database=(\w+)"
    )
    .unwrap();

    pub static ref PREFIX_PATTERN: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s+UTC:([^:]+):\s*([^@]+)@([^:]+):"
    )
    .unwrap();

    pub static ref PROFILE: EngineProfile = EngineProfile {
        engine: Engine::PostgreSql,
        gate: &GATE_PATTERN,
        line_prefix: &LINE_PREFIX_PATTERN,
        system_accounts: &SYSTEM_ACCOUNTS,
        exclusion_markers,
        cascade: vec![
            // user= and database= from the message body
            CapturePattern {
                name: "authorized",
                regex: &AUTHORIZED_PATTERN,
                min_groups: 9,
                layout: CaptureLayout {
                    timestamp: 1,
                    address: 2,
                    user: 7,
                    database: Some(8),
                },
            },
            // user@database from the line prefix only
            CapturePattern {
                name: "prefix",
                regex: &PREFIX_PATTERN,
                min_groups: 5,
                layout: CaptureLayout {
                    timestamp: 1,
                    address: 2,
                    user: 3,
                    database: Some(4),
                },
            },
        ],
        timestamp_format: "%Y-%m-%d %H:%M:%S",
        style: DisplayStyle {
            username: "Aurora DB Monitor",
            icon_emoji: ":shark:",
            headline: "🔗 Aurora PostgreSQLへの新しい接続が検出されました",
            color: "good",
        },
    };
}

/// RDS-managed roles that connect continuously in the background.
pub const SYSTEM_ACCOUNTS: [&str; 2] = ["rdsadmin", "rdshm"];

fn exclusion_markers(account: &str) -> Vec<String> {
    vec![
        format!(r#"identity="{}""#, account),
        format!("user={}", account),
        format!("{}@", account),
    ]
}
