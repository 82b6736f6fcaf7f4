//! Push delivery infrastructure for the HQ alerting pipeline.
//!
//! This crate provides everything between "we have a rendered notification"
//! and "the external push gateway accepted (or refused) it":
//!
//! - [`provider`] — the [`PushProvider`] seam the rest of the system is
//!   written against, so dispatch and subscription management are testable
//!   without a live gateway.
//! - [`gateway`] — the HTTP implementation of the seam.
//! - [`envelope`] — the delivery envelope (target, notification block,
//!   data map, web-push options).
//! - [`dispatcher`] — validation, payload policy, envelope building, the
//!   provider call, and the best-effort audit row.
//! - [`subscription`] — batched topic subscribe/unsubscribe for a member's
//!   active device tokens.
//! - [`template`] — DB-backed template rendering and idempotent seeding.

pub mod dispatcher;
pub mod envelope;
pub mod gateway;
pub mod provider;
pub mod subscription;
pub mod template;

pub use dispatcher::{DispatchError, Dispatcher, WebPushSettings};
pub use envelope::{PushEnvelope, PushTarget};
pub use gateway::HttpPushGateway;
pub use provider::{BatchOutcome, ProviderError, PushProvider};
pub use subscription::SubscriptionManager;
pub use template::TemplateRenderer;
