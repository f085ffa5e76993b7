//! Process configuration.
//!
//! Built once per invocation, before any line is processed. A missing or
//! malformed webhook URL fails the whole invocation.

use crate::log_parser::formats::UNKNOWN;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Incoming-webhook URL notifications are posted to. Required.
pub const WEBHOOK_URL_ENV: &str = "SLACK_WEBHOOK_URL";

/// Cluster name shown in notifications. Optional.
pub const CLUSTER_ID_ENV: &str = "AURORA_CLUSTER_ID";

/// Per-request delivery timeout in seconds. Optional.
pub const TIMEOUT_ENV: &str = "SLACK_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SLACK_WEBHOOK_URL is not set")]
    MissingWebhookUrl,

    #[error("invalid webhook URL `{value}`: {reason}")]
    InvalidWebhookUrl { value: String, reason: String },

    #[error("invalid SLACK_TIMEOUT_SECS `{value}`: expected a positive number of seconds")]
    InvalidTimeout { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub webhook_url: Url,
    pub cluster_id: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(webhook_url: &str, cluster_id: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            webhook_url: parse_webhook_url(webhook_url)?,
            cluster_id: cluster_id_or_unknown(cluster_id),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the configuration through `lookup`, which maps an environment
    /// variable name to its value (`|key| std::env::var(key).ok()` for the
    /// process environment).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_url = lookup(WEBHOOK_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingWebhookUrl)?;

        let config = Self::new(&webhook_url, lookup(CLUSTER_ID_ENV).as_deref())?;

        match lookup(TIMEOUT_ENV) {
            Some(value) => Ok(config.with_timeout(parse_timeout(&value)?)),
            None => Ok(config),
        }
    }
}

/// The cluster name to display, or [`UNKNOWN`] when none is configured.
pub fn cluster_id_or_unknown(cluster_id: Option<&str>) -> String {
    cluster_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn parse_webhook_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidWebhookUrl {
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme `{}`", other))),
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: value.to_string(),
        }),
    }
}
