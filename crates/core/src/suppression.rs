//! Already-alerted marker cache.
//!
//! Scans are stateless, so the same unresolved condition would be re-alerted
//! on every pass and by any overlapping manual trigger. The orchestrator
//! consults this cache before dispatching: a key that was marked within the
//! TTL is suppressed. Entries expire after the TTL and are pruned on access.

use std::collections::HashMap;
use std::time::Duration;

use crate::types::Timestamp;

/// In-memory TTL cache of alert marker keys.
///
/// Keys are free-form `rule:candidate` strings, e.g. `stock-low:42`.
/// The clock is injected per call so the cache is deterministic under test.
#[derive(Debug)]
pub struct SuppressionCache {
    ttl: chrono::Duration,
    marked: HashMap<String, Timestamp>,
}

impl SuppressionCache {
    /// Create a cache whose markers live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
            marked: HashMap::new(),
        }
    }

    /// Whether `key` was marked within the TTL (the caller should skip the
    /// alert). Expired entries are pruned here so the cache stays bounded
    /// by the set of keys seen within one TTL.
    pub fn contains(&mut self, key: &str, now: Timestamp) -> bool {
        let cutoff = now - self.ttl;
        self.marked.retain(|_, marked_at| *marked_at > cutoff);
        self.marked.contains_key(key)
    }

    /// Record that `key` was alerted at `now`.
    ///
    /// Called after a successful dispatch only, so a failed alert is
    /// retried on the next scan rather than silenced for a full TTL.
    pub fn mark(&mut self, key: &str, now: Timestamp) {
        self.marked.insert(key.to_string(), now);
    }

    /// [`contains`](Self::contains) and, when not suppressed,
    /// [`mark`](Self::mark) in one step.
    pub fn check_and_mark(&mut self, key: &str, now: Timestamp) -> bool {
        if self.contains(key, now) {
            return true;
        }
        self.mark(key, now);
        false
    }

    /// Number of live markers (after pruning against `now`).
    pub fn len(&mut self, now: Timestamp) -> usize {
        let cutoff = now - self.ttl;
        self.marked.retain(|_, marked_at| *marked_at > cutoff);
        self.marked.len()
    }

    pub fn is_empty(&mut self, now: Timestamp) -> bool {
        self.len(now) == 0
    }
}

/// Marker key for a stock-low candidate.
pub fn stock_low_key(material_id: i64) -> String {
    format!("stock-low:{material_id}")
}

/// Marker key for an expire-soon candidate. Lots of the same material are
/// tracked separately.
pub fn expire_soon_key(material_id: i64, lot_code: Option<&str>) -> String {
    match lot_code {
        Some(lot) => format!("expire-soon:{material_id}:{lot}"),
        None => format!("expire-soon:{material_id}"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn first_sight_is_not_suppressed() {
        let mut cache = SuppressionCache::new(Duration::from_secs(60));
        assert!(!cache.check_and_mark("stock-low:1", at(0)));
    }

    #[test]
    fn repeat_within_ttl_is_suppressed() {
        let mut cache = SuppressionCache::new(Duration::from_secs(60));
        assert!(!cache.check_and_mark("stock-low:1", at(0)));
        assert!(cache.check_and_mark("stock-low:1", at(30)));
    }

    #[test]
    fn marker_expires_after_ttl() {
        let mut cache = SuppressionCache::new(Duration::from_secs(60));
        assert!(!cache.check_and_mark("stock-low:1", at(0)));
        assert!(!cache.check_and_mark("stock-low:1", at(61)));
    }

    #[test]
    fn keys_are_independent() {
        let mut cache = SuppressionCache::new(Duration::from_secs(60));
        assert!(!cache.check_and_mark("stock-low:1", at(0)));
        assert!(!cache.check_and_mark("stock-low:2", at(1)));
        assert!(!cache.check_and_mark("expire-soon:1:L-1", at(2)));
    }

    #[test]
    fn expired_entries_are_pruned() {
        let mut cache = SuppressionCache::new(Duration::from_secs(60));
        cache.check_and_mark("a", at(0));
        cache.check_and_mark("b", at(10));
        assert_eq!(cache.len(at(10)), 2);
        assert_eq!(cache.len(at(65)), 1);
        assert!(cache.is_empty(at(200)));
    }

    #[test]
    fn mark_without_check_suppresses_later_lookups() {
        let mut cache = SuppressionCache::new(Duration::from_secs(60));
        cache.mark("stock-low:7", at(0));
        assert!(cache.contains("stock-low:7", at(30)));
        assert!(!cache.contains("stock-low:7", at(90)));
    }

    #[test]
    fn key_builders() {
        assert_eq!(stock_low_key(42), "stock-low:42");
        assert_eq!(expire_soon_key(42, Some("L-7")), "expire-soon:42:L-7");
        assert_eq!(expire_soon_key(42, None), "expire-soon:42");
    }
}
