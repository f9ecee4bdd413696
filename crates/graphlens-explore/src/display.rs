//! Display styling for normalized nodes: names, colors, visual weights.
//!
//! All derivations are table-driven; unknown types fall back to the
//! defaults rather than failing.

use serde_json::{Map, Value};

use crate::normalize::scalar_string;

/// Display names longer than this are truncated with an ellipsis.
const MAX_NAME_LEN: usize = 50;

/// Static type → color table.
const NODE_COLORS: &[(&str, &str)] = &[
    ("Verse", "#4299E1"),
    ("Topic", "#F6AD55"),
    ("Tafsir", "#68D391"),
    ("Translation", "#9F7AEA"),
    ("Word", "#FC8181"),
    ("Chapter", "#F6E05E"),
    ("Surah", "#F6E05E"),
];

const DEFAULT_COLOR: &str = "#A0AEC0";

/// Relative visual weight per type.
const NODE_WEIGHTS: &[(&str, f64)] = &[("Verse", 0.8), ("Topic", 1.2)];

const DEFAULT_WEIGHT: f64 = 1.0;

pub fn node_color(label: &str) -> String {
    NODE_COLORS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, c)| (*c).to_string())
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}

pub fn node_weight(label: &str) -> f64 {
    NODE_WEIGHTS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, w)| *w)
        .unwrap_or(DEFAULT_WEIGHT)
}

/// Derive a display name from a node's properties.
///
/// Per-type candidate ladder: natural key, then a numeric identifier, then
/// truncated text, then a type + internal-identity fallback.
pub fn node_display_name(label: &str, props: &Map<String, Value>) -> String {
    if matches!(label, "Translation" | "Tafsir") {
        if let Some(text) = props.get("text").and_then(Value::as_str) {
            return truncate(text);
        }
    }

    if label == "Verse" {
        if let Some(key) = non_empty_str(props, "verse_key") {
            return key;
        }
        if let Some(pair) = surah_ayah(props) {
            return pair;
        }
        return fallback(label, props);
    }

    if label == "Topic" {
        if let Some(name) = non_empty_str(props, "name") {
            return name;
        }
        if let Some(id) = present(props, "topic_id") {
            return format!("Topic {}", scalar_string(id));
        }
        return fallback(label, props);
    }

    non_empty_str(props, "name")
        .or_else(|| non_empty_str(props, "verse_key"))
        .or_else(|| present(props, "topic_id").map(scalar_string))
        .or_else(|| surah_ayah(props))
        .unwrap_or_else(|| fallback(label, props))
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_NAME_LEN {
        let head: String = text.chars().take(MAX_NAME_LEN - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn non_empty_str(props: &Map<String, Value>, key: &str) -> Option<String> {
    props
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn present<'a>(props: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    props.get(key).filter(|v| !v.is_null())
}

fn surah_ayah(props: &Map<String, Value>) -> Option<String> {
    let surah = present(props, "surah_number")?;
    let ayah = present(props, "ayah_number")?;
    Some(format!("{}:{}", scalar_string(surah), scalar_string(ayah)))
}

fn fallback(label: &str, props: &Map<String, Value>) -> String {
    let offset = props
        .get("_id")
        .and_then(Value::as_object)
        .and_then(|id| id.get("offset"))
        .map(scalar_string)
        .unwrap_or_default();
    format!("{label}-{offset}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_verse_prefers_verse_key() {
        let p = props(json!({ "verse_key": "2:255", "surah_number": 2, "ayah_number": 255 }));
        assert_eq!(node_display_name("Verse", &p), "2:255");
    }

    #[test]
    fn test_verse_falls_back_to_surah_ayah() {
        let p = props(json!({ "surah_number": 1, "ayah_number": 7 }));
        assert_eq!(node_display_name("Verse", &p), "1:7");
    }

    #[test]
    fn test_topic_name_then_id() {
        let named = props(json!({ "name": "Mercy", "topic_id": 7 }));
        assert_eq!(node_display_name("Topic", &named), "Mercy");

        let unnamed = props(json!({ "topic_id": 7 }));
        assert_eq!(node_display_name("Topic", &unnamed), "Topic 7");

        // Zero is a valid identifier, not an absent one.
        let zero = props(json!({ "topic_id": 0 }));
        assert_eq!(node_display_name("Topic", &zero), "Topic 0");
    }

    #[test]
    fn test_text_nodes_truncate() {
        let long = "a".repeat(80);
        let p = props(json!({ "text": long }));
        let name = node_display_name("Tafsir", &p);
        assert_eq!(name.chars().count(), MAX_NAME_LEN);
        assert!(name.ends_with("..."));

        let short = props(json!({ "text": "In the name of God" }));
        assert_eq!(node_display_name("Translation", &short), "In the name of God");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let arabic = "\u{0628}".repeat(80);
        let p = props(json!({ "text": arabic }));
        // Must not panic on a multi-byte boundary.
        let name = node_display_name("Tafsir", &p);
        assert!(name.ends_with("..."));
    }

    #[test]
    fn test_unknown_type_falls_back_to_internal_identity() {
        let p = props(json!({ "_id": { "offset": 42, "table": 3 } }));
        assert_eq!(node_display_name("Root", &p), "Root-42");
    }

    #[test]
    fn test_color_and_weight_tables() {
        assert_eq!(node_color("Verse"), "#4299E1");
        assert_eq!(node_color("Unknown"), DEFAULT_COLOR);
        assert!((node_weight("Topic") - 1.2).abs() < f64::EPSILON);
        assert!((node_weight("Unknown") - 1.0).abs() < f64::EPSILON);
    }
}
