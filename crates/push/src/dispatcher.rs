//! Notification dispatch: validation, payload policy, envelope building,
//! the provider call, and the audit trail.
//!
//! The dispatcher surfaces failures to its caller — an explicit admin/test
//! send fails loudly. Batch orchestration that wants to keep going on
//! individual failures wraps these calls itself. Audit persistence is
//! best-effort: a logging failure is warned about and never replaces the
//! send outcome.

use std::collections::HashMap;
use std::sync::Arc;

use toastlab_core::payload::sanitize_data;
use toastlab_core::topic::{normalize_topic, HqTopic, TopicError};
use toastlab_core::types::AppType;
use toastlab_db::models::send_log::{CreateSendLog, SendOutcome, SendTarget};
use toastlab_db::repositories::SendLogRepo;
use toastlab_db::DbPool;

use crate::envelope::{
    NotificationContent, PushEnvelope, PushTarget, WebPushHeaders, WebPushNotification,
    WebPushOptions,
};
use crate::provider::{ProviderError, PushProvider};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Web-push presentation and transport defaults applied to every envelope.
#[derive(Debug, Clone)]
pub struct WebPushSettings {
    /// Push-service retention TTL in seconds.
    pub ttl_secs: u64,
    /// Delivery urgency: `very-low` | `low` | `normal` | `high`.
    pub urgency: String,
    /// Browser notification icon path.
    pub icon: String,
    /// Badge/mono icon path.
    pub badge: String,
    /// Deep link used when the data payload has no usable `link`.
    pub default_link: String,
}

impl Default for WebPushSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            urgency: "high".to_string(),
            icon: "/admin/images/push/toastlab.png".to_string(),
            badge: "/admin/images/push/badge-72.png".to_string(),
            default_link: "/admin".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for dispatch failures.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No delivery channel is configured; nothing was attempted.
    #[error("Push delivery channel is disabled (no gateway configured)")]
    ChannelDisabled,

    /// The topic name failed normalization or the allow-list.
    #[error(transparent)]
    TopicRejected(#[from] TopicError),

    /// The template code has no row.
    #[error("No template: {0}")]
    TemplateNotFound(String),

    /// The external provider refused or failed the send.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A database error outside the best-effort audit path.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Sends notifications through the configured provider and records every
/// attempt in the audit trail.
pub struct Dispatcher {
    provider: Option<Arc<dyn PushProvider>>,
    pool: DbPool,
    restrict_topics: bool,
    webpush: WebPushSettings,
}

impl Dispatcher {
    /// Create a dispatcher. `provider: None` models the disabled channel:
    /// every send fails fast with [`DispatchError::ChannelDisabled`].
    pub fn new(
        provider: Option<Arc<dyn PushProvider>>,
        pool: DbPool,
        restrict_topics: bool,
        webpush: WebPushSettings,
    ) -> Self {
        Self {
            provider,
            pool,
            restrict_topics,
            webpush,
        }
    }

    /// Whether a delivery channel is configured.
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    fn ensure_channel(&self) -> Result<&Arc<dyn PushProvider>, DispatchError> {
        self.provider.as_ref().ok_or(DispatchError::ChannelDisabled)
    }

    /// Send a notification to a single device token.
    ///
    /// Returns the provider message id. Every attempt that reaches the
    /// provider produces one audit row.
    pub async fn send_to_token(
        &self,
        app_type: AppType,
        token: &str,
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> Result<String, DispatchError> {
        let provider = self.ensure_channel()?;
        let target = SendTarget::Token(token.to_string());
        let envelope = self.build_envelope(PushTarget::Token(token.to_string()), title, body, data);
        self.deliver(provider, app_type, target, envelope).await
    }

    /// Send a notification to a broadcast topic.
    ///
    /// The topic is normalized and checked against the grammar (and, in
    /// restrict mode, the HQ allow-list). A rejected topic is audited as a
    /// failed attempt and surfaced to the caller.
    pub async fn send_to_topic(
        &self,
        app_type: AppType,
        topic: &str,
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> Result<String, DispatchError> {
        let provider = self.ensure_channel()?;

        let topic = match normalize_topic(topic, self.restrict_topics) {
            Ok(normalized) => normalized,
            Err(e) => {
                tracing::warn!(topic, error = %e, "Rejected push topic");
                self.persist_log(CreateSendLog {
                    app_type: app_type.as_str().to_string(),
                    target: SendTarget::Topic(topic.to_string()),
                    title: title.to_string(),
                    body: body.to_string(),
                    data_json: None,
                    outcome: SendOutcome::Failed(e.to_string()),
                    store_id: None,
                    member_id: None,
                    staff_id: None,
                })
                .await;
                return Err(e.into());
            }
        };

        let target = SendTarget::Topic(topic.clone());
        let envelope = self.build_envelope(PushTarget::Topic(topic), title, body, data);
        self.deliver(provider, app_type, target, envelope).await
    }

    /// Send to one of the fixed HQ topics.
    pub async fn send_to_hq_topic(
        &self,
        app_type: AppType,
        topic: HqTopic,
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> Result<String, DispatchError> {
        self.send_to_topic(app_type, topic.as_str(), title, body, data)
            .await
    }

    /// Invoke the provider and record the attempt either way.
    async fn deliver(
        &self,
        provider: &Arc<dyn PushProvider>,
        app_type: AppType,
        target: SendTarget,
        envelope: PushEnvelope,
    ) -> Result<String, DispatchError> {
        let data_json = serde_json::to_string(&envelope.data).ok();
        let title = envelope.notification.title.clone();
        let body = envelope.notification.body.clone();

        match provider.send(&envelope).await {
            Ok(message_id) => {
                self.persist_log(CreateSendLog {
                    app_type: app_type.as_str().to_string(),
                    target,
                    title,
                    body,
                    data_json,
                    outcome: SendOutcome::Delivered(message_id.clone()),
                    store_id: None,
                    member_id: None,
                    staff_id: None,
                })
                .await;
                Ok(message_id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Push send failed");
                self.persist_log(CreateSendLog {
                    app_type: app_type.as_str().to_string(),
                    target,
                    title,
                    body,
                    data_json,
                    outcome: SendOutcome::Failed(e.to_string()),
                    store_id: None,
                    member_id: None,
                    staff_id: None,
                })
                .await;
                Err(e.into())
            }
        }
    }

    /// Build the delivery envelope, applying the payload size policy and
    /// the deep-link fallback.
    fn build_envelope(
        &self,
        target: PushTarget,
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> PushEnvelope {
        let safe_data = sanitize_data(data);

        let link = safe_data
            .get("link")
            .filter(|link| !link.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| self.webpush.default_link.clone());

        PushEnvelope {
            target,
            notification: NotificationContent {
                title: title.to_string(),
                body: body.to_string(),
            },
            data: safe_data,
            webpush: WebPushOptions {
                headers: WebPushHeaders {
                    ttl: self.webpush.ttl_secs.to_string(),
                    urgency: self.webpush.urgency.clone(),
                },
                notification: WebPushNotification {
                    icon: self.webpush.icon.clone(),
                    badge: self.webpush.badge.clone(),
                },
                link,
            },
        }
    }

    /// Append an audit row, swallowing persistence failures.
    async fn persist_log(&self, entry: CreateSendLog) {
        if let Err(e) = SendLogRepo::insert(&self.pool, &entry).await {
            tracing::warn!(error = %e, "Failed to persist send log");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use crate::provider::BatchOutcome;

    use super::*;

    /// Records envelopes instead of delivering them.
    struct FakeProvider {
        fail: bool,
        sent: Mutex<Vec<PushEnvelope>>,
    }

    impl FakeProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PushProvider for FakeProvider {
        async fn send(&self, envelope: &PushEnvelope) -> Result<String, ProviderError> {
            self.sent.lock().unwrap().push(envelope.clone());
            if self.fail {
                Err(ProviderError::HttpStatus(500))
            } else {
                Ok(format!("msg-{}", self.sent.lock().unwrap().len()))
            }
        }

        async fn subscribe_batch(
            &self,
            tokens: &[String],
            _topic: &str,
        ) -> Result<BatchOutcome, ProviderError> {
            Ok(BatchOutcome {
                success_count: tokens.len() as u64,
                failure_count: 0,
            })
        }

        async fn unsubscribe_batch(
            &self,
            tokens: &[String],
            _topic: &str,
        ) -> Result<BatchOutcome, ProviderError> {
            Ok(BatchOutcome {
                success_count: tokens.len() as u64,
                failure_count: 0,
            })
        }
    }

    /// A pool that never connects; audit writes fail and are swallowed.
    fn unreachable_pool() -> DbPool {
        sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy("postgres://nobody@127.0.0.1:1/audit")
            .expect("lazy pool")
    }

    fn dispatcher(provider: Option<Arc<dyn PushProvider>>) -> Dispatcher {
        Dispatcher::new(provider, unreachable_pool(), true, WebPushSettings::default())
    }

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn disabled_channel_fails_fast() {
        let d = dispatcher(None);
        let result = d
            .send_to_topic(AppType::Hq, "hq-all", "t", "b", &HashMap::new())
            .await;
        assert_matches!(result, Err(DispatchError::ChannelDisabled));
    }

    #[tokio::test]
    async fn invalid_topic_is_rejected_before_the_provider() {
        let fake = FakeProvider::new(false);
        let d = dispatcher(Some(fake.clone()));
        let result = d
            .send_to_topic(AppType::Hq, "HQ-Alerts!", "t", "b", &HashMap::new())
            .await;
        assert_matches!(result, Err(DispatchError::TopicRejected(_)));
        assert!(fake.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn topic_send_returns_provider_message_id() {
        let fake = FakeProvider::new(false);
        let d = dispatcher(Some(fake.clone()));
        let id = d
            .send_to_hq_topic(AppType::Hq, HqTopic::StockLow, "t", "b", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(id, "msg-1");

        let sent = fake.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].target, PushTarget::Topic("hq-stock-low".into()));
    }

    #[tokio::test]
    async fn provider_failure_is_surfaced() {
        let fake = FakeProvider::new(true);
        let d = dispatcher(Some(fake));
        let result = d
            .send_to_token(AppType::Hq, "tok-1", "t", "b", &HashMap::new())
            .await;
        assert_matches!(
            result,
            Err(DispatchError::Provider(ProviderError::HttpStatus(500)))
        );
    }

    #[tokio::test]
    async fn oversized_payload_is_reduced_before_delivery() {
        let fake = FakeProvider::new(false);
        let d = dispatcher(Some(fake.clone()));
        let filler = "x".repeat(2000);
        let payload = data(&[
            ("type", "HQ_STOCK_LOW"),
            ("link", "/admin/inventory/list"),
            ("filler", filler.as_str()),
        ]);
        d.send_to_token(AppType::Hq, "tok-1", "t", "b", &payload)
            .await
            .unwrap();

        let sent = fake.sent.lock().unwrap();
        assert_eq!(
            sent[0].data,
            data(&[("type", "HQ_STOCK_LOW"), ("link", "/admin/inventory/list")])
        );
    }

    #[tokio::test]
    async fn deep_link_falls_back_when_absent_or_blank() {
        let d = dispatcher(None);

        let envelope = d.build_envelope(
            PushTarget::Token("tok".into()),
            "t",
            "b",
            &data(&[("link", "  ")]),
        );
        assert_eq!(envelope.webpush.link, "/admin");

        let envelope = d.build_envelope(PushTarget::Token("tok".into()), "t", "b", &HashMap::new());
        assert_eq!(envelope.webpush.link, "/admin");

        let envelope = d.build_envelope(
            PushTarget::Token("tok".into()),
            "t",
            "b",
            &data(&[("link", "/admin/inventory/list")]),
        );
        assert_eq!(envelope.webpush.link, "/admin/inventory/list");
    }
}
