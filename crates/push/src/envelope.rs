//! The delivery envelope handed to the push provider.

use std::collections::HashMap;

use serde::Serialize;

/// Where a message is addressed: a broadcast topic or a single device token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PushTarget {
    Topic(String),
    Token(String),
}

/// The user-visible notification block.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

/// Transport headers understood by web push services.
#[derive(Debug, Clone, Serialize)]
pub struct WebPushHeaders {
    /// Push-service retention, in seconds, as a header string.
    #[serde(rename = "TTL")]
    pub ttl: String,
    /// Delivery urgency: `very-low` | `low` | `normal` | `high`.
    #[serde(rename = "Urgency")]
    pub urgency: String,
}

/// The browser notification presentation block.
#[derive(Debug, Clone, Serialize)]
pub struct WebPushNotification {
    pub icon: String,
    pub badge: String,
}

/// Web-push specific options carried alongside the notification.
#[derive(Debug, Clone, Serialize)]
pub struct WebPushOptions {
    pub headers: WebPushHeaders,
    pub notification: WebPushNotification,
    /// Deep link opened when the notification is clicked.
    pub link: String,
}

/// A complete delivery envelope.
#[derive(Debug, Clone, Serialize)]
pub struct PushEnvelope {
    #[serde(flatten)]
    pub target: PushTarget,
    pub notification: NotificationContent,
    pub data: HashMap<String, String>,
    pub webpush: WebPushOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_serializes_as_single_key() {
        let topic = serde_json::to_value(PushTarget::Topic("hq-all".into())).unwrap();
        assert_eq!(topic, serde_json::json!({"topic": "hq-all"}));

        let token = serde_json::to_value(PushTarget::Token("tok-1".into())).unwrap();
        assert_eq!(token, serde_json::json!({"token": "tok-1"}));
    }

    #[test]
    fn envelope_flattens_target_and_keeps_header_names() {
        let envelope = PushEnvelope {
            target: PushTarget::Topic("hq-stock-low".into()),
            notification: NotificationContent {
                title: "t".into(),
                body: "b".into(),
            },
            data: HashMap::new(),
            webpush: WebPushOptions {
                headers: WebPushHeaders {
                    ttl: "3600".into(),
                    urgency: "high".into(),
                },
                notification: WebPushNotification {
                    icon: "/i.png".into(),
                    badge: "/b.png".into(),
                },
                link: "/admin".into(),
            },
        };

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["topic"], "hq-stock-low");
        assert_eq!(value["webpush"]["headers"]["TTL"], "3600");
        assert_eq!(value["webpush"]["headers"]["Urgency"], "high");
        assert_eq!(value["webpush"]["link"], "/admin");
    }
}
