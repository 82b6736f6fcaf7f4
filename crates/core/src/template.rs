//! `{placeholder}` substitution for notification templates.
//!
//! Rendering is a single left-to-right scan over the template. Each
//! `{identifier}` span is looked up in the variable map exactly once;
//! replacement values are emitted verbatim and never re-scanned, so a value
//! containing `{...}` text cannot trigger a second substitution. Identifiers
//! absent from the variable map are left as literal text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Regex matching `{placeholder}` tokens in templates.
pub const PLACEHOLDER_PATTERN: &str = r"\{([A-Za-z0-9_]+)\}";

/// Compiled placeholder regex. Compiled once, reused forever.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

/// Render a template string against a variable map.
///
/// Every `{key}` occurrence whose `key` exists in `vars` is replaced with
/// the mapped value; all other text (including unknown placeholders) is
/// copied through unchanged.
pub fn render_str(template: &str, vars: &HashMap<String, String>) -> String {
    if vars.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let span = caps.get(0).expect("capture 0 always present");
        let key = &caps[1];
        out.push_str(&template[last..span.start()]);
        match vars.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(span.as_str()),
        }
        last = span.end();
    }
    out.push_str(&template[last..]);
    out
}

/// Extract all placeholder names from a template.
///
/// Returns a de-duplicated, sorted list of identifiers (without braces).
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = PLACEHOLDER_RE
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_every_occurrence() {
        let out = render_str(
            "{name} stock {qty} (threshold: {qty})",
            &vars(&[("name", "Flour"), ("qty", "5")]),
        );
        assert_eq!(out, "Flour stock 5 (threshold: 5)");
    }

    #[test]
    fn unknown_keys_stay_literal() {
        let out = render_str("{name} expires in {days} days", &vars(&[("name", "Milk")]));
        assert_eq!(out, "Milk expires in {days} days");
    }

    #[test]
    fn unused_variables_are_ignored() {
        let out = render_str("fixed text", &vars(&[("name", "Milk")]));
        assert_eq!(out, "fixed text");
    }

    #[test]
    fn replacement_values_are_not_rescanned() {
        // A value containing a placeholder-shaped string must come through
        // verbatim, even when the embedded key is itself in the map.
        let out = render_str("{a}", &vars(&[("a", "{b}"), ("b", "boom")]));
        assert_eq!(out, "{b}");
    }

    #[test]
    fn rendering_is_idempotent_for_fixed_inputs() {
        let v = vars(&[("name", "Milk"), ("days", "3")]);
        let first = render_str("[Expiring soon] {name}: {days}d", &v);
        let second = render_str("[Expiring soon] {name}: {days}d", &v);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_variable_map_returns_template() {
        assert_eq!(render_str("{x} {y}", &HashMap::new()), "{x} {y}");
    }

    #[test]
    fn extracts_sorted_unique_placeholders() {
        assert_eq!(
            extract_placeholders("{qty} of {name}, again {qty}"),
            vec!["name".to_string(), "qty".to_string()]
        );
    }
}
