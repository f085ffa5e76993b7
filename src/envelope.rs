//! CloudWatch Logs subscription envelopes.
//!
//! A subscription delivers `{"awslogs": {"data": "..."}}` where `data` is
//! base64 of a gzip-compressed JSON batch of log events.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

const CONTROL_MESSAGE: &str = "CONTROL_MESSAGE";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed subscription event: {0}")]
    Json(#[from] serde_json::Error),

    #[error("subscription data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to decompress subscription data: {0}")]
    Decompress(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct SubscriptionEvent {
    awslogs: AwsLogs,
}

#[derive(Debug, Deserialize)]
struct AwsLogs {
    data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsData {
    pub message_type: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub log_group: String,
    #[serde(default)]
    pub log_stream: String,
    #[serde(default)]
    pub subscription_filters: Vec<String>,
    #[serde(default)]
    pub log_events: Vec<LogEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    pub message: String,
}

impl LogsData {
    /// CloudWatch sends a control message when a subscription is created
    /// to check the destination is reachable. It carries no real events.
    pub fn is_control_message(&self) -> bool {
        self.message_type == CONTROL_MESSAGE
    }

    pub fn messages(&self) -> Vec<&str> {
        if self.is_control_message() {
            return Vec::new();
        }
        self.log_events
            .iter()
            .map(|event| event.message.as_str())
            .collect()
    }
}

/// Decodes a raw subscription event as delivered to the handler.
pub fn decode_subscription_event(raw: &str) -> Result<LogsData, EnvelopeError> {
    let event: SubscriptionEvent = serde_json::from_str(raw)?;
    decode_data(&event.awslogs.data)
}

/// Decodes the base64, gzip-compressed `awslogs.data` payload.
pub fn decode_data(data: &str) -> Result<LogsData, EnvelopeError> {
    let compressed = STANDARD.decode(data.trim())?;

    let mut json = String::new();
    GzDecoder::new(compressed.as_slice()).read_to_string(&mut json)?;

    Ok(serde_json::from_str(&json)?)
}
