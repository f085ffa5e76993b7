use super::formats::{
    CapturePattern, ConnectionEvent, Engine, EngineProfile, RawCapture, NOT_SPECIFIED,
};
use super::patterns::{clean_client_address, clean_field, parse_utc_timestamp, to_display_time};
use chrono::Utc;
use tracing::{debug, warn};

/// Turns raw log lines from one engine into [`ConnectionEvent`]s.
///
/// A line becomes an event only if it passes the engine's gate, names no
/// system account, and matches one of the capture patterns in the cascade.
#[derive(Clone, Copy)]
pub struct ConnectionExtractor {
    profile: &'static EngineProfile,
}

impl ConnectionExtractor {
    pub fn new(engine: Engine) -> Self {
        Self {
            profile: engine.profile(),
        }
    }

    pub fn engine(&self) -> Engine {
        self.profile.engine
    }

    pub fn is_candidate(&self, line: &str) -> bool {
        self.profile.gate.is_match(line)
    }

    pub fn extract(&self, line: &str) -> Option<ConnectionEvent> {
        if !self.is_candidate(line) {
            return None;
        }

        if let Some(account) = self.profile.system_account_in(line) {
            debug!(
                engine = self.engine().name(),
                account, "skipping system account connection"
            );
            return None;
        }

        for pattern in &self.profile.cascade {
            if let Some(capture) = pattern.captures(line) {
                return self.build_event(line, pattern, capture);
            }
        }

        debug!(
            engine = self.engine().name(),
            line, "connection line matched no capture pattern"
        );
        None
    }

    fn build_event(
        &self,
        line: &str,
        pattern: &CapturePattern,
        capture: RawCapture<'_>,
    ) -> Option<ConnectionEvent> {
        let Some(user_name) = clean_field(capture.user) else {
            debug!(
                engine = self.engine().name(),
                pattern = pattern.name,
                "capture had an empty user name"
            );
            return None;
        };

        let database_name = capture
            .database
            .and_then(clean_field)
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());

        let (timestamp, timestamp_estimated) =
            match parse_utc_timestamp(capture.timestamp, self.profile.timestamp_format) {
                Some(timestamp) => (timestamp, false),
                None => {
                    warn!(
                        engine = self.engine().name(),
                        raw = capture.timestamp,
                        "could not parse connection timestamp, using current time"
                    );
                    (to_display_time(Utc::now()), true)
                }
            };

        debug!(
            engine = self.engine().name(),
            pattern = pattern.name,
            user = %user_name,
            "extracted connection event"
        );

        Some(ConnectionEvent {
            engine: self.engine(),
            timestamp,
            timestamp_estimated,
            user_name,
            database_name,
            client_ip: clean_client_address(capture.address),
            raw_message: line.to_string(),
        })
    }

    /// How much `line` looks like it came from this engine, from 0.0 to 1.0.
    pub fn confidence(&self, line: &str) -> f32 {
        let mut score = 0.0;

        if self.profile.line_prefix.is_match(line) {
            score += 0.6;
        }

        if self.is_candidate(line) {
            score += 0.1;
            if self
                .profile
                .cascade
                .iter()
                .any(|pattern| pattern.captures(line).is_some())
            {
                score += 0.3;
            }
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_parser::formats::{mysql, postgres};

    const PG_LINE: &str = "2025-08-31 06:31:53 UTC:10.0.128.64(35340):yuta@postgres:[2599]:LOG:  connection authorized: user=yuta database=postgres application_name=psql SSL enabled";
    const MYSQL_LINE: &str =
        "2025-09-07T06:41:11.701820Z\t  252 Connect\ttest28@10.0.139.222 on appdb using TCP/IP";

    #[test]
    fn test_lines_without_gate_marker_are_rejected() {
        let pg = ConnectionExtractor::new(Engine::PostgreSql);
        let my = ConnectionExtractor::new(Engine::MySql);

        assert!(!pg.is_candidate(MYSQL_LINE));
        assert!(pg.extract(MYSQL_LINE).is_none());
        assert!(!my.is_candidate(PG_LINE));
        assert!(my.extract(PG_LINE).is_none());
    }

    #[test]
    fn test_every_system_account_is_excluded() {
        let pg = ConnectionExtractor::new(Engine::PostgreSql);
        for account in postgres::SYSTEM_ACCOUNTS {
            let line = PG_LINE.replace("yuta", account);
            assert!(pg.extract(&line).is_none(), "{}", line);
        }

        let my = ConnectionExtractor::new(Engine::MySql);
        for account in mysql::SYSTEM_ACCOUNTS {
            let line = MYSQL_LINE.replace("test28", account);
            assert!(my.extract(&line).is_none(), "{}", line);
        }
    }

    #[test]
    fn test_cascade_order_prefers_first_pattern() {
        let pg = ConnectionExtractor::new(Engine::PostgreSql);
        let line = PG_LINE.replace("yuta@postgres", "someone@elsewhere");
        let event = pg.extract(&line).unwrap();

        assert_eq!(event.user_name, "yuta");
        assert_eq!(event.database_name, "postgres");
    }

    #[test]
    fn test_whitespace_user_is_a_miss() {
        let pg = ConnectionExtractor::new(Engine::PostgreSql);
        let line = "2024-01-01 12:00:00 UTC:10.0.1.50(54321):   @postgres:[1]:LOG: connection received";
        assert!(pg.extract(line).is_none());
    }

    #[test]
    fn test_confidence() {
        let pg = ConnectionExtractor::new(Engine::PostgreSql);
        let my = ConnectionExtractor::new(Engine::MySql);

        assert!(pg.confidence(PG_LINE) > 0.99);
        assert!(my.confidence(MYSQL_LINE) > 0.99);
        assert!(pg.confidence(MYSQL_LINE) < 0.3);
        assert!(my.confidence(PG_LINE) < 0.3);
        assert!(
            my.confidence("2024-01-01T12:00:00.123456Z\t    1 Query\tSELECT * FROM users") > 0.5
        );
    }
}
