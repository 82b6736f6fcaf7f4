//! Size policy for notification data payloads.
//!
//! Push providers cap the free-form data block; oversized payloads are
//! reduced to the entries the client actually needs for routing.

use std::collections::HashMap;

/// Maximum serialized size of a data payload, in bytes.
pub const MAX_DATA_BYTES: usize = 1024;

/// Keys preserved when a payload has to be reduced.
const ESSENTIAL_KEYS: [&str; 2] = ["type", "link"];

/// Apply the payload size policy.
///
/// If the JSON-serialized map fits in [`MAX_DATA_BYTES`] it is returned
/// unchanged. Otherwise only the `type` and `link` entries (when present)
/// survive. Serialization trouble passes the original map through — this
/// step is best-effort and must never block a send.
pub fn sanitize_data(data: &HashMap<String, String>) -> HashMap<String, String> {
    if data.is_empty() {
        return HashMap::new();
    }
    match serde_json::to_vec(data) {
        Ok(raw) if raw.len() <= MAX_DATA_BYTES => data.clone(),
        Ok(_) => ESSENTIAL_KEYS
            .iter()
            .filter_map(|key| {
                data.get(*key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect(),
        Err(_) => data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn small_payloads_pass_through() {
        let data = map(&[("type", "HQ_STOCK_LOW"), ("materialName", "Flour")]);
        assert_eq!(sanitize_data(&data), data);
    }

    #[test]
    fn oversized_payloads_keep_only_essential_keys() {
        let filler = "x".repeat(2000);
        let data = map(&[
            ("type", "HQ_STOCK_LOW"),
            ("link", "/admin/inventory/list"),
            ("filler", filler.as_str()),
        ]);
        let out = sanitize_data(&data);
        assert_eq!(
            out,
            map(&[("type", "HQ_STOCK_LOW"), ("link", "/admin/inventory/list")])
        );
    }

    #[test]
    fn oversized_payload_without_essential_keys_becomes_empty() {
        let filler = "x".repeat(2000);
        let data = map(&[("filler", filler.as_str())]);
        assert!(sanitize_data(&data).is_empty());
    }

    #[test]
    fn empty_payload_stays_empty() {
        assert!(sanitize_data(&HashMap::new()).is_empty());
    }
}
