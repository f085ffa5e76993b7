//! Chat notifications for extracted connection events.
//!
//! [`format_notification`] builds the incoming-webhook payload and a
//! [`Notifier`] delivers it.

pub mod message;
pub mod webhook;

pub use message::{format_notification, Attachment, Field, NotificationPayload};
pub use webhook::{Notifier, SendError, WebhookNotifier};
