use crate::config::Config;
use crate::log_parser::{ConnectionExtractor, Engine};
use crate::notify::{format_notification, Notifier, SendError, WebhookNotifier};
use serde::Serialize;
use tracing::{info, warn};

/// Counts for one processed batch.
///
/// `delivered + failed == matched` and `matched <= total` always hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Runs every line of a batch through extraction and notification.
///
/// Lines are handled one at a time and independently: a failed delivery is
/// logged and counted, and processing moves on to the next line.
pub struct BatchDispatcher<N> {
    extractor: ConnectionExtractor,
    notifier: N,
    cluster_id: String,
}

impl BatchDispatcher<WebhookNotifier> {
    pub fn from_config(engine: Engine, config: &Config) -> Result<Self, SendError> {
        Ok(Self::new(
            engine,
            WebhookNotifier::from_config(config)?,
            config.cluster_id.clone(),
        ))
    }
}

impl<N: Notifier> BatchDispatcher<N> {
    pub fn new(engine: Engine, notifier: N, cluster_id: impl Into<String>) -> Self {
        Self {
            extractor: ConnectionExtractor::new(engine),
            notifier,
            cluster_id: cluster_id.into(),
        }
    }

    pub fn engine(&self) -> Engine {
        self.extractor.engine()
    }

    pub fn process<I, S>(&self, lines: I) -> BatchSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = BatchSummary::default();

        for line in lines {
            summary.total += 1;

            let Some(event) = self.extractor.extract(line.as_ref()) else {
                continue;
            };
            summary.matched += 1;

            let payload = format_notification(&event, &self.cluster_id);
            match self.notifier.send(&payload) {
                Ok(()) => {
                    summary.delivered += 1;
                    info!(
                        engine = self.engine().name(),
                        user = %event.user_name,
                        database = %event.database_name,
                        client_ip = %event.client_ip,
                        "sent connection notification"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        engine = self.engine().name(),
                        user = %event.user_name,
                        error = %e,
                        "failed to send connection notification"
                    );
                }
            }
        }

        info!(
            engine = self.engine().name(),
            total = summary.total,
            matched = summary.matched,
            delivered = summary.delivered,
            failed = summary.failed,
            "batch processed"
        );

        summary
    }
}
