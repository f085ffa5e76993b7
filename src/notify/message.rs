use crate::log_parser::patterns::DISPLAY_TZ;
use crate::log_parser::ConnectionEvent;
use serde::Serialize;

const ATTACHMENT_TITLE: &str = "データベース接続情報";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S JST";
const ESTIMATED_SUFFIX: &str = " (推定)";

/// Incoming-webhook message body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub text: String,
    pub username: String,
    pub icon_emoji: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub color: String,
    pub title: String,
    pub fields: Vec<Field>,
    /// Unix seconds; the chat client renders it in the reader's timezone.
    pub ts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Field {
    fn new(title: &str, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short,
        }
    }
}

/// Builds the notification for one connection.
///
/// Fields are always user, database, client IP, cluster and connection time,
/// in that order. The engine decides only the styling.
pub fn format_notification(event: &ConnectionEvent, cluster_id: &str) -> NotificationPayload {
    let style = event.engine.profile().style;

    let mut connected_at = event
        .timestamp
        .with_timezone(&*DISPLAY_TZ)
        .format(TIME_FORMAT)
        .to_string();
    if event.timestamp_estimated {
        connected_at.push_str(ESTIMATED_SUFFIX);
    }

    NotificationPayload {
        text: style.headline.to_string(),
        username: style.username.to_string(),
        icon_emoji: style.icon_emoji.to_string(),
        attachments: vec![Attachment {
            color: style.color.to_string(),
            title: ATTACHMENT_TITLE.to_string(),
            fields: vec![
                Field::new("ユーザー名", event.user_name.as_str(), true),
                Field::new("データベース名", event.database_name.as_str(), true),
                Field::new("クライアントIP", event.client_ip.as_str(), true),
                Field::new("クラスターID", cluster_id, true),
                Field::new("接続時刻", connected_at, false),
            ],
            ts: event.timestamp.timestamp(),
        }],
    }
}
