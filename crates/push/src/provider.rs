//! The push provider seam.
//!
//! Everything that talks to the external gateway goes through
//! [`PushProvider`], so the dispatcher and subscription manager can be
//! exercised against an in-process fake.

use async_trait::async_trait;

use crate::envelope::PushEnvelope;

/// Error type for provider call failures.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Push gateway returned HTTP {0}")]
    HttpStatus(u16),

    /// The gateway answered 2xx but the body was not the expected shape.
    #[error("Push gateway response was malformed: {0}")]
    Malformed(String),
}

/// Aggregated result of a batched topic-membership call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub success_count: u64,
    pub failure_count: u64,
}

impl BatchOutcome {
    /// Fold another outcome into this one.
    pub fn merge(&mut self, other: BatchOutcome) {
        self.success_count += other.success_count;
        self.failure_count += other.failure_count;
    }
}

/// External push delivery service.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Deliver one envelope; returns the provider's message id.
    async fn send(&self, envelope: &PushEnvelope) -> Result<String, ProviderError>;

    /// Subscribe a batch of device tokens to a topic.
    async fn subscribe_batch(
        &self,
        tokens: &[String],
        topic: &str,
    ) -> Result<BatchOutcome, ProviderError>;

    /// Remove a batch of device tokens from a topic.
    async fn unsubscribe_batch(
        &self,
        tokens: &[String],
        topic: &str,
    ) -> Result<BatchOutcome, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_accumulates_counts() {
        let mut total = BatchOutcome::default();
        total.merge(BatchOutcome {
            success_count: 3,
            failure_count: 1,
        });
        total.merge(BatchOutcome {
            success_count: 2,
            failure_count: 0,
        });
        assert_eq!(total.success_count, 5);
        assert_eq!(total.failure_count, 1);
    }

    #[test]
    fn provider_error_display_http_status() {
        let err = ProviderError::HttpStatus(502);
        assert_eq!(err.to_string(), "Push gateway returned HTTP 502");
    }
}
