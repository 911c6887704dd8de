//! Targeted text substitution inside a snippet's source.
//!
//! Overrides are captured in the editor as `original -> value` pairs keyed
//! by `"<fieldId>-<ordinal>"`. Application walks the overrides in ordinal
//! order and replaces, for each, the first remaining occurrence of the
//! literal `original` in the accumulated text. Because a replaced substring
//! no longer matches, repeated identical originals are consumed
//! left-to-right, one occurrence per override, matching capture order.
//!
//! The routine is a pure fold over the text: no indices into a mutable
//! buffer, no side effects, and a missing `original` is a silent no-op.

use std::collections::BTreeMap;

use crate::utils::escape_text_content;
use crate::TextOverride;

/// Ordinal suffix of an override key. Keys without a parseable suffix sort
/// after all keyed overrides, in stable key order.
fn ordinal_of(key: &str) -> u64 {
    key.rsplit_once('-')
        .and_then(|(_, suffix)| suffix.parse::<u64>().ok())
        .unwrap_or(u64::MAX)
}

/// Apply a set of text overrides to snippet source, returning the rewritten
/// text. Replacement values are escaped for embedding as literal text
/// content (`&`, `<`, `>`).
pub fn apply_text_overrides(source: &str, overrides: &BTreeMap<String, TextOverride>) -> String {
    let mut ordered: Vec<(&String, &TextOverride)> = overrides.iter().collect();
    // BTreeMap iteration is key-sorted, so equal ordinals keep a stable order.
    ordered.sort_by_key(|(key, _)| ordinal_of(key));

    let mut text = source.to_string();
    for (_, over) in ordered {
        let Some(value) = over.value.as_deref() else {
            continue;
        };
        if value == over.original || over.original.is_empty() {
            continue;
        }
        text = text.replacen(&over.original, &escape_text_content(value), 1);
    }
    text
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn over(original: &str, value: &str) -> TextOverride {
        TextOverride {
            original: original.to_string(),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn replaces_single_occurrence() {
        let mut overrides = BTreeMap::new();
        overrides.insert("text-0".to_string(), over("Click me", "Buy now"));
        let out = apply_text_overrides("<button>Click me</button>", &overrides);
        assert_eq!(out, "<button>Buy now</button>");
    }

    #[test]
    fn repeated_originals_consume_left_to_right() {
        let mut overrides = BTreeMap::new();
        overrides.insert("text-0".to_string(), over("Item", "First"));
        overrides.insert("text-1".to_string(), over("Item", "Second"));
        let out = apply_text_overrides("<li>Item</li><li>Item</li>", &overrides);
        assert_eq!(out, "<li>First</li><li>Second</li>");
    }

    #[test]
    fn ordinal_order_wins_over_key_order() {
        let mut overrides = BTreeMap::new();
        // Key "a-10" sorts before "b-2" lexically but must apply after it.
        overrides.insert("a-10".to_string(), over("slot", "tenth"));
        overrides.insert("b-2".to_string(), over("slot", "second"));
        let out = apply_text_overrides("slot slot", &overrides);
        assert_eq!(out, "second tenth");
    }

    #[test]
    fn missing_original_is_a_no_op() {
        let mut overrides = BTreeMap::new();
        overrides.insert("text-0".to_string(), over("Absent", "Whatever"));
        let source = "<p>Present</p>";
        assert_eq!(apply_text_overrides(source, &overrides), source);
    }

    #[test]
    fn undefined_value_is_skipped() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "text-0".to_string(),
            TextOverride {
                original: "Keep".to_string(),
                value: None,
            },
        );
        assert_eq!(apply_text_overrides("Keep me", &overrides), "Keep me");
    }

    #[test]
    fn identical_value_is_skipped() {
        let mut overrides = BTreeMap::new();
        overrides.insert("text-0".to_string(), over("Same", "Same"));
        assert_eq!(apply_text_overrides("Same old", &overrides), "Same old");
    }

    #[test]
    fn replacement_is_escaped_for_text_content() {
        let mut overrides = BTreeMap::new();
        overrides.insert("text-0".to_string(), over("Hello", "Fish & <Chips>"));
        let out = apply_text_overrides("<span>Hello</span>", &overrides);
        assert_eq!(out, "<span>Fish &amp; &lt;Chips&gt;</span>");
    }

    #[test]
    fn reapplying_same_overrides_is_stable() {
        let mut overrides = BTreeMap::new();
        overrides.insert("text-0".to_string(), over("Click me", "Buy now"));
        let once = apply_text_overrides("<button>Click me</button>", &overrides);
        let twice = apply_text_overrides(&once, &overrides);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_override_set_returns_source() {
        let overrides = BTreeMap::new();
        assert_eq!(apply_text_overrides("unchanged", &overrides), "unchanged");
    }
}
