//! Morning reminder to the HQ-wide topic.

use std::collections::HashMap;

use toastlab_core::topic::HqTopic;
use toastlab_core::types::AppType;
use toastlab_push::dispatcher::Dispatcher;

/// Send the daily reminder prompting the inventory/notice review.
///
/// Failures are logged and swallowed — a missed reminder is not worth
/// surfacing to the trigger.
pub async fn send_morning_reminder(dispatcher: &Dispatcher) {
    let data = HashMap::from([
        ("type".to_string(), "HQ_REMINDER".to_string()),
        ("link".to_string(), "/admin/dashboard".to_string()),
    ]);

    let result = dispatcher
        .send_to_hq_topic(
            AppType::Hq,
            HqTopic::HqAll,
            "[HQ] Morning reminder",
            "Please review today's inventory and notices.",
            &data,
        )
        .await;

    if let Err(e) = result {
        tracing::warn!(error = %e, "Failed to send morning reminder");
    }
}
