//! Aurora MySQL general query log.
//!
//! Connect records look like
//! `2025-09-07T06:41:11.701820Z\t  252 Connect\ttest28@10.0.139.222 on appdb using TCP/IP`,
//! with nothing between `on` and `using` when the client did not pick a schema.

use super::{CaptureLayout, CapturePattern, DisplayStyle, Engine, EngineProfile};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref GATE_PATTERN: Regex = Regex::new(r"Connect").unwrap();

    pub static ref LINE_PREFIX_PATTERN: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+Z\s+\d+\s+[A-Z][a-z]+").unwrap();

    pub static ref WITH_DATABASE_PATTERN: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+Z)\s+\d+\s+Connect\s+([^@]+)@([^\s]+)\s+on\s+(\w+)\s+using"
    )
    .unwrap();

    pub static ref WITHOUT_DATABASE_PATTERN: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+Z)\s+\d+\s+Connect\s+([^@]+)@([^\s]+)\s+on\s+\s+using"
    )
    .unwrap();

    pub static ref FLEXIBLE_PATTERN: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+Z)\s+\d+\s+Connect\s+([^@]+)@([^\s]+)\s+on\s+([^\s]*)\s*using"
    )
    .unwrap();

    pub static ref PROFILE: EngineProfile = EngineProfile {
        engine: Engine::MySql,
        gate: &GATE_PATTERN,
        line_prefix: &LINE_PREFIX_PATTERN,
        system_accounts: &SYSTEM_ACCOUNTS,
        exclusion_markers,
        cascade: vec![
            CapturePattern {
                name: "with-database",
                regex: &WITH_DATABASE_PATTERN,
                min_groups: 5,
                layout: CaptureLayout {
                    timestamp: 1,
                    address: 3,
                    user: 2,
                    database: Some(4),
                },
            },
            CapturePattern {
                name: "without-database",
                regex: &WITHOUT_DATABASE_PATTERN,
                min_groups: 4,
                layout: CaptureLayout {
                    timestamp: 1,
                    address: 3,
                    user: 2,
                    database: None,
                },
            },
            CapturePattern {
                name: "flexible",
                regex: &FLEXIBLE_PATTERN,
                min_groups: 5,
                layout: CaptureLayout {
                    timestamp: 1,
                    address: 3,
                    user: 2,
                    database: Some(4),
                },
            },
        ],
        timestamp_format: "%Y-%m-%dT%H:%M:%S%.fZ",
        style: DisplayStyle {
            username: "Aurora MySQL Monitor",
            icon_emoji: ":dolphin:",
            headline: "🔗 Aurora MySQLへの新しい接続が検出されました",
            color: "#FF6B35",
        },
    };
}

pub const SYSTEM_ACCOUNTS: [&str; 4] = ["rdsadmin", "mysql.session", "mysql.sys", "root"];

fn exclusion_markers(account: &str) -> Vec<String> {
    vec![format!("{}@", account)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_parser::formats::{ConnectionEvent, NOT_SPECIFIED};
    use crate::log_parser::parser::ConnectionExtractor;

    fn extract(line: &str) -> Option<ConnectionEvent> {
        ConnectionExtractor::new(Engine::MySql).extract(line)
    }

    fn assert_fields(line: &str, user: &str, database: &str, ip: &str) {
        let event = extract(line).unwrap_or_else(|| panic!("no event for {:?}", line));
        assert_eq!(event.user_name, user);
        assert_eq!(event.database_name, database);
        assert_eq!(event.client_ip, ip);
        assert_eq!(event.raw_message, line);
    }

    #[test]
    fn test_connect_with_database() {
        assert_fields(
            "2025-09-07T06:41:11.701820Z\t  252 Connect\ttest28@10.0.139.222 on appdb using TCP/IP",
            "test28",
            "appdb",
            "10.0.139.222",
        );
        assert_fields(
            "2024-01-01T12:00:00.123456Z\t    1 Connect\tmyuser@192.168.1.100 on mydb using TCP/IP",
            "myuser",
            "mydb",
            "192.168.1.100",
        );
    }

    #[test]
    fn test_connect_without_database() {
        assert_fields(
            "2025-09-07T06:40:32.160890Z\t  249 Connect\ttest28@10.0.139.222 on  using TCP/IP",
            "test28",
            NOT_SPECIFIED,
            "10.0.139.222",
        );
        assert_fields(
            "2024-01-01T12:00:00.123456Z\t    1 Connect\tadmin@172.16.0.1 on  using TCP/IP",
            "admin",
            NOT_SPECIFIED,
            "172.16.0.1",
        );
    }

    #[test]
    fn test_flexible_pattern_handles_missing_space() {
        // A single space between "on" and "using" defeats the first two patterns.
        assert_fields(
            "2025-09-07T06:40:32.160890Z\t  249 Connect\ttest28@10.0.139.222 on using Socket",
            "test28",
            NOT_SPECIFIED,
            "10.0.139.222",
        );
        // Schema names with dashes are not \w+.
        assert_fields(
            "2025-09-07T06:40:32.160890Z\t  250 Connect\treporter@10.0.139.7 on sales-eu using TCP/IP",
            "reporter",
            "sales-eu",
            "10.0.139.7",
        );
    }

    #[test]
    fn test_timestamps_are_shown_in_jst() {
        let event = extract(
            "2025-09-07T06:41:11.701820Z\t  252 Connect\ttest28@10.0.139.222 on appdb using TCP/IP",
        )
        .unwrap();
        assert!(!event.timestamp_estimated);
        assert_eq!(
            event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2025-09-07 15:41:11"
        );
        assert_eq!(
            event.timestamp.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2025-09-07 06:41:11"
        );
    }

    #[test]
    fn test_unparseable_timestamp_is_estimated() {
        let event = extract(
            "2025-09-07T29:41:11.701820Z\t  252 Connect\ttest28@10.0.139.222 on appdb using TCP/IP",
        )
        .unwrap();
        assert!(event.timestamp_estimated);
        assert_eq!(event.user_name, "test28");
    }

    #[test]
    fn test_system_accounts_are_ignored() {
        let lines = [
            "2024-01-01T12:00:00.123456Z\t    1 Connect\trdsadmin@localhost on mysql using TCP/IP",
            "2024-01-01T12:00:00.123456Z\t    2 Connect\tmysql.session@localhost on  using Socket",
            "2024-01-01T12:00:00.123456Z\t    3 Connect\tmysql.sys@localhost on sys using Socket",
            "2024-01-01T12:00:00.123456Z\t    4 Connect\troot@10.0.0.5 on appdb using TCP/IP",
        ];

        for line in lines {
            assert!(extract(line).is_none(), "{}", line);
        }
    }

    #[test]
    fn test_non_connect_lines_are_ignored() {
        let lines = [
            "2024-01-01T12:00:00.123456Z\t    1 Query\tSELECT * FROM users",
            "2024-01-01T12:00:00.123456Z\t    1 Quit\t",
            "/rdsdbbin/oscar/bin/mysqld, Version: 8.0.32 (Source distribution). started with:",
        ];

        for line in lines {
            assert!(extract(line).is_none(), "{}", line);
        }
    }

    #[test]
    fn test_access_denied_connect_is_a_miss() {
        let line = "2024-01-01T12:00:00.123456Z\t    7 Connect\tAccess denied for user 'bob'@'10.0.0.9' (using password: YES)";
        assert!(extract(line).is_none());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let line =
            "2025-09-07T06:41:11.701820Z\t  252 Connect\ttest28@10.0.139.222 on appdb using TCP/IP";
        assert_eq!(extract(line), extract(line));
    }
}
