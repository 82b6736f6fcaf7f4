//! Topic name policy for HQ push delivery.
//!
//! Topic names are normalized (trimmed, lower-cased) and must match the
//! provider's topic grammar. When restrict mode is on, only the fixed HQ
//! topics are accepted.

use std::sync::LazyLock;

use regex::Regex;

/// Grammar accepted by the push provider for topic names.
pub const TOPIC_PATTERN: &str = r"^[a-z0-9-]{1,64}$";

/// Compiled topic grammar. Compiled once, reused forever.
static TOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOPIC_PATTERN).expect("valid regex"));

/// Error type for topic validation failures.
#[derive(Debug, thiserror::Error)]
pub enum TopicError {
    /// The name does not match the provider's topic grammar.
    #[error("Invalid topic name: {0}")]
    InvalidPattern(String),

    /// Restrict mode is on and the name is not a known HQ topic.
    #[error("Topic not allowed in HQ: {0}")]
    NotAllowed(String),
}

/// The fixed broadcast topics used by the HQ back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HqTopic {
    /// All HQ staff.
    HqAll,
    /// Stock-low alert subscribers.
    StockLow,
    /// Expiration alert subscribers.
    ExpireSoon,
}

impl HqTopic {
    /// The wire-level topic name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HqTopic::HqAll => "hq-all",
            HqTopic::StockLow => "hq-stock-low",
            HqTopic::ExpireSoon => "hq-expire-soon",
        }
    }

    /// Whether `topic` (already normalized) is one of the fixed HQ topics.
    pub fn is_allowed(topic: &str) -> bool {
        [HqTopic::HqAll, HqTopic::StockLow, HqTopic::ExpireSoon]
            .iter()
            .any(|t| t.as_str() == topic)
    }
}

impl std::fmt::Display for HqTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize and validate a topic name.
///
/// Trims and lower-cases the input, then checks it against
/// [`TOPIC_PATTERN`]. With `restrict` set, the normalized name must also be
/// one of the fixed [`HqTopic`]s. Returns the normalized name.
pub fn normalize_topic(raw: &str, restrict: bool) -> Result<String, TopicError> {
    let topic = raw.trim().to_lowercase();
    if !TOPIC_RE.is_match(&topic) {
        return Err(TopicError::InvalidPattern(topic));
    }
    if restrict && !HqTopic::is_allowed(&topic) {
        return Err(TopicError::NotAllowed(topic));
    }
    Ok(topic)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_topic("  HQ-ALL ", false).unwrap(), "hq-all");
    }

    #[test]
    fn rejects_punctuation_regardless_of_restrict_mode() {
        assert_matches!(
            normalize_topic("HQ-Alerts!", false),
            Err(TopicError::InvalidPattern(_))
        );
        assert_matches!(
            normalize_topic("HQ-Alerts!", true),
            Err(TopicError::InvalidPattern(_))
        );
    }

    #[test]
    fn rejects_empty_and_overlong_names() {
        assert_matches!(
            normalize_topic("   ", false),
            Err(TopicError::InvalidPattern(_))
        );
        let long = "a".repeat(65);
        assert_matches!(
            normalize_topic(&long, false),
            Err(TopicError::InvalidPattern(_))
        );
    }

    #[test]
    fn restrict_mode_rejects_unknown_topic() {
        assert_matches!(
            normalize_topic("hq-custom", true),
            Err(TopicError::NotAllowed(_))
        );
    }

    #[test]
    fn non_restrict_mode_accepts_unknown_topic() {
        assert_eq!(normalize_topic("hq-custom", false).unwrap(), "hq-custom");
    }

    #[test]
    fn fixed_topics_pass_restrict_mode() {
        for topic in ["hq-all", "hq-stock-low", "hq-expire-soon"] {
            assert_eq!(normalize_topic(topic, true).unwrap(), topic);
        }
    }
}
