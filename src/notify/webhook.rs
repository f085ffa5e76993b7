use super::message::NotificationPayload;
use crate::config::Config;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook returned {status}: {body}")]
    Endpoint { status: u16, body: String },
}

/// Something that can deliver a notification.
pub trait Notifier {
    fn send(&self, payload: &NotificationPayload) -> Result<(), SendError>;
}

/// Posts notifications to an incoming-webhook URL.
///
/// One attempt per notification, bounded by the client timeout. Anything
/// other than `200 OK` is an [`SendError::Endpoint`].
pub struct WebhookNotifier {
    client: Client,
    endpoint: Url,
}

impl WebhookNotifier {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, SendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &Config) -> Result<Self, SendError> {
        Self::new(config.webhook_url.clone(), config.timeout)
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, payload: &NotificationPayload) -> Result<(), SendError> {
        let body = serde_json::to_vec(payload)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable>".to_string());
            return Err(SendError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
