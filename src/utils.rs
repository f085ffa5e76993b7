//! Helpers for the command line driver:
//! - Input loading (raw lines or subscription envelopes)
//! - Engine selection
//! - Output formatting (plain text and JSON)
//! - A notifier that prints instead of posting

use crate::cli::{EngineArg, OutputFormat};
use crate::dispatcher::BatchSummary;
use crate::envelope;
use crate::log_parser::detector::detect_engine;
use crate::log_parser::{ConnectionEvent, Engine};
use crate::notify::{NotificationPayload, Notifier, SendError};
use anyhow::{anyhow, Context, Result};
use serde_json::json;
use std::fs;

/// Lines to process plus, for envelopes, the log group they came from.
pub struct BatchInput {
    pub lines: Vec<String>,
    pub log_group: Option<String>,
}

pub fn read_input(path: &str, is_envelope: bool) -> Result<BatchInput> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read input file {}", path))?;

    if is_envelope {
        let data = envelope::decode_subscription_event(&content)
            .context("Failed to decode subscription event")?;
        return Ok(BatchInput {
            lines: data.messages().into_iter().map(str::to_string).collect(),
            log_group: Some(data.log_group),
        });
    }

    Ok(BatchInput {
        lines: content.lines().map(str::to_string).collect(),
        log_group: None,
    })
}

/// Picks the engine: the explicit choice, else the log group name, else
/// whatever the lines look like.
pub fn resolve_engine(arg: EngineArg, log_group: Option<&str>, lines: &[String]) -> Result<Engine> {
    match arg {
        EngineArg::Postgresql => return Ok(Engine::PostgreSql),
        EngineArg::Mysql => return Ok(Engine::MySql),
        EngineArg::Auto => {}
    }

    if let Some(engine) = log_group.and_then(Engine::from_log_group) {
        return Ok(engine);
    }

    let detection = detect_engine(lines);
    detection.engine.ok_or_else(|| {
        anyhow!(
            "Could not detect the database engine (confidence {:.2}); pass --engine",
            detection.confidence
        )
    })
}

pub fn output_summary(summary: &BatchSummary, format: Option<&OutputFormat>) -> Result<()> {
    match format {
        Some(OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        Some(OutputFormat::Plain) | None => {
            println!(
                "Processed {} lines: {} connections, {} notified, {} failed",
                summary.total, summary.matched, summary.delivered, summary.failed
            );
        }
    }
    Ok(())
}

pub fn output_event(event: Option<&ConnectionEvent>, format: Option<&OutputFormat>) -> Result<()> {
    match (format, event) {
        (Some(OutputFormat::Json), event) => {
            let output = json!({
                "event": event,
                "success": event.is_some()
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        (_, Some(event)) => {
            println!("engine:    {}", event.engine.name());
            println!("user:      {}", event.user_name);
            println!("database:  {}", event.database_name);
            println!("client ip: {}", event.client_ip);
            let estimated = if event.timestamp_estimated { " (estimated)" } else { "" };
            println!("time:      {}{}", event.timestamp.to_rfc3339(), estimated);
        }
        (_, None) => {
            println!("no connection event");
        }
    }
    Ok(())
}

/// Prints each payload to stdout; used for `--dry-run`.
pub struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn send(&self, payload: &NotificationPayload) -> Result<(), SendError> {
        println!("{}", serde_json::to_string_pretty(payload)?);
        Ok(())
    }
}
