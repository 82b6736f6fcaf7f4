//! Topic subscription management for a member's device tokens.
//!
//! The provider caps how many tokens one membership call may carry, so the
//! token list is sliced into fixed-size batches up front and each batch is
//! submitted independently: one failing batch is logged and counted, and
//! the remaining batches still go out.

use std::sync::Arc;

use toastlab_core::topic::normalize_topic;
use toastlab_core::types::{AppType, DbId};
use toastlab_db::repositories::DeviceTokenRepo;
use toastlab_db::DbPool;

use crate::dispatcher::DispatchError;
use crate::provider::{BatchOutcome, PushProvider};

/// Maximum tokens per provider membership call.
pub const SUBSCRIPTION_BATCH_SIZE: usize = 1000;

/// Which direction a membership change goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopicAction {
    Subscribe,
    Unsubscribe,
}

impl TopicAction {
    fn as_str(&self) -> &'static str {
        match self {
            TopicAction::Subscribe => "subscribe",
            TopicAction::Unsubscribe => "unsubscribe",
        }
    }
}

/// Manages topic membership for recipients' active device tokens.
pub struct SubscriptionManager {
    provider: Option<Arc<dyn PushProvider>>,
    pool: DbPool,
    restrict_topics: bool,
}

impl SubscriptionManager {
    /// Create a manager. `provider: None` models the disabled channel.
    pub fn new(
        provider: Option<Arc<dyn PushProvider>>,
        pool: DbPool,
        restrict_topics: bool,
    ) -> Self {
        Self {
            provider,
            pool,
            restrict_topics,
        }
    }

    /// Subscribe all of a member's active tokens to `topic`.
    ///
    /// A member with no active tokens is a no-op, not an error.
    pub async fn subscribe(
        &self,
        app_type: AppType,
        topic: &str,
        member_id: DbId,
    ) -> Result<BatchOutcome, DispatchError> {
        self.apply(TopicAction::Subscribe, app_type, topic, member_id)
            .await
    }

    /// Remove all of a member's active tokens from `topic`.
    pub async fn unsubscribe(
        &self,
        app_type: AppType,
        topic: &str,
        member_id: DbId,
    ) -> Result<BatchOutcome, DispatchError> {
        self.apply(TopicAction::Unsubscribe, app_type, topic, member_id)
            .await
    }

    async fn apply(
        &self,
        action: TopicAction,
        app_type: AppType,
        topic: &str,
        member_id: DbId,
    ) -> Result<BatchOutcome, DispatchError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(DispatchError::ChannelDisabled)?;
        let topic = normalize_topic(topic, self.restrict_topics)?;

        let tokens =
            DeviceTokenRepo::find_active_for_member(&self.pool, app_type.as_str(), member_id)
                .await?;
        if tokens.is_empty() {
            tracing::info!(
                action = action.as_str(),
                member_id,
                topic,
                "Topic membership skipped (no active tokens)"
            );
            return Ok(BatchOutcome::default());
        }

        Ok(fan_out(provider.as_ref(), action, &tokens, &topic).await)
    }
}

/// Submit `tokens` in fixed-size batches, aggregating outcomes.
///
/// A batch that errors is logged, its tokens are counted as failures, and
/// the remaining batches are still submitted.
async fn fan_out(
    provider: &dyn PushProvider,
    action: TopicAction,
    tokens: &[String],
    topic: &str,
) -> BatchOutcome {
    let mut total = BatchOutcome::default();

    for batch in tokens.chunks(SUBSCRIPTION_BATCH_SIZE) {
        let result = match action {
            TopicAction::Subscribe => provider.subscribe_batch(batch, topic).await,
            TopicAction::Unsubscribe => provider.unsubscribe_batch(batch, topic).await,
        };
        match result {
            Ok(outcome) => {
                tracing::info!(
                    action = action.as_str(),
                    topic,
                    success = outcome.success_count,
                    failure = outcome.failure_count,
                    "Topic membership batch applied"
                );
                total.merge(outcome);
            }
            Err(e) => {
                tracing::warn!(
                    action = action.as_str(),
                    topic,
                    batch_size = batch.len(),
                    error = %e,
                    "Topic membership batch failed"
                );
                total.merge(BatchOutcome {
                    success_count: 0,
                    failure_count: batch.len() as u64,
                });
            }
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::envelope::PushEnvelope;
    use crate::provider::ProviderError;

    use super::*;

    /// Records batch sizes; fails the batches whose index is listed.
    struct FakeProvider {
        fail_batches: Vec<usize>,
        calls: Mutex<Vec<usize>>,
    }

    impl FakeProvider {
        fn new(fail_batches: Vec<usize>) -> Self {
            Self {
                fail_batches,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, batch_len: usize) -> usize {
            let mut calls = self.calls.lock().unwrap();
            calls.push(batch_len);
            calls.len() - 1
        }
    }

    #[async_trait]
    impl PushProvider for FakeProvider {
        async fn send(&self, _envelope: &PushEnvelope) -> Result<String, ProviderError> {
            unreachable!("subscription tests never send")
        }

        async fn subscribe_batch(
            &self,
            tokens: &[String],
            _topic: &str,
        ) -> Result<BatchOutcome, ProviderError> {
            let index = self.record(tokens.len());
            if self.fail_batches.contains(&index) {
                Err(ProviderError::HttpStatus(503))
            } else {
                Ok(BatchOutcome {
                    success_count: tokens.len() as u64,
                    failure_count: 0,
                })
            }
        }

        async fn unsubscribe_batch(
            &self,
            tokens: &[String],
            topic: &str,
        ) -> Result<BatchOutcome, ProviderError> {
            self.subscribe_batch(tokens, topic).await
        }
    }

    fn tokens(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("tok-{i}")).collect()
    }

    #[tokio::test]
    async fn tokens_are_sliced_into_provider_sized_batches() {
        let provider = FakeProvider::new(vec![]);
        let outcome = fan_out(
            &provider,
            TopicAction::Subscribe,
            &tokens(2500),
            "hq-all",
        )
        .await;

        assert_eq!(*provider.calls.lock().unwrap(), vec![1000, 1000, 500]);
        assert_eq!(outcome.success_count, 2500);
        assert_eq!(outcome.failure_count, 0);
    }

    #[tokio::test]
    async fn failed_batch_does_not_abort_remaining_batches() {
        let provider = FakeProvider::new(vec![1]);
        let outcome = fan_out(
            &provider,
            TopicAction::Unsubscribe,
            &tokens(2500),
            "hq-all",
        )
        .await;

        // All three batches were attempted; the middle one counts as failures.
        assert_eq!(provider.calls.lock().unwrap().len(), 3);
        assert_eq!(outcome.success_count, 1500);
        assert_eq!(outcome.failure_count, 1000);
    }

    #[tokio::test]
    async fn single_short_batch_goes_out_as_is() {
        let provider = FakeProvider::new(vec![]);
        let outcome = fan_out(&provider, TopicAction::Subscribe, &tokens(3), "hq-all").await;

        assert_eq!(*provider.calls.lock().unwrap(), vec![3]);
        assert_eq!(outcome.success_count, 3);
    }
}
