//! Known historical shapes of raw reply values.
//!
//! Each enum lists the shapes generated replies have been observed to use for
//! one kind of field, plus a catch-all `Other` arm. Values are classified with
//! serde's untagged matching and then handled with an exhaustive `match`.

use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// A list element, or a bilingual value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemShape {
    /// `"Digital transformation"`
    Plain(String),
    /// `{"name_en": "...", "priority": "high"}` or `{"en": "...", "ar": "..."}`
    Record(Map<String, Value>),
    Other(Value),
}

/// A scalar that should end up as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ScalarShape {
    Text(String),
    Number(Number),
    Flag(bool),
    Other(Value),
}

/// A probability-like value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PercentShape {
    /// `35`, `35.5`
    Number(f64),
    /// `"35"`, `"35%"`, `" 35 % "`
    Text(String),
    Other(Value),
}

/// A sequence that may have been flattened into a single string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum SequenceShape {
    /// `["Team lead", {"role": "Director"}]`
    List(Vec<ItemShape>),
    /// `"Team lead; Director"` or `"Team lead\nDirector"`
    Delimited(String),
    /// A lone object standing in for a one-element list.
    Single(Map<String, Value>),
    Other(Value),
}

/// Classify `value` as `T`. Every shape enum has a catch-all arm, so this
/// only returns `None` for shapes serde cannot represent at all.
pub(crate) fn classify<'a, T: Deserialize<'a>>(value: &'a Value) -> Option<T> {
    T::deserialize(value).ok()
}

/// Split a delimited list on newlines and semicolons.
///
/// Leading list markers (`1.`, `2)`, `-`, `*`, `•`) are stripped and empty
/// segments dropped.
pub(crate) fn split_list(text: &str) -> Vec<String> {
    text.split(['\n', ';'])
        .map(strip_marker)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a delimited path: newlines and semicolons first, then arrows
/// (`->`, `→`, `>`) when that yields at most one segment.
pub(crate) fn split_path(text: &str) -> Vec<String> {
    let mut segments = split_list(text);
    if segments.len() != 1 {
        return segments;
    }
    segments
        .remove(0)
        .replace("->", "→")
        .split(['→', '>'])
        .map(strip_marker)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_marker(segment: &str) -> &str {
    let s = segment.trim();
    let s = s.trim_start_matches(['-', '*', '•']).trim_start();
    let digits = s.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &s[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return stripped.trim();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn classifies_item_shapes() {
        assert!(matches!(
            classify::<ItemShape>(&json!("x")),
            Some(ItemShape::Plain(s)) if s == "x"
        ));
        assert!(matches!(
            classify::<ItemShape>(&json!({"en": "x"})),
            Some(ItemShape::Record(_))
        ));
        assert!(matches!(
            classify::<ItemShape>(&json!(3)),
            Some(ItemShape::Other(_))
        ));
    }

    #[test]
    fn classifies_percent_shapes() {
        assert!(matches!(classify::<PercentShape>(&json!(35)), Some(PercentShape::Number(n)) if n == 35.0));
        assert!(matches!(classify::<PercentShape>(&json!("35%")), Some(PercentShape::Text(_))));
        assert!(matches!(classify::<PercentShape>(&json!(null)), Some(PercentShape::Other(_))));
    }

    #[test]
    fn classifies_sequence_shapes() {
        assert!(matches!(
            classify::<SequenceShape>(&json!(["a", {"role": "b"}])),
            Some(SequenceShape::List(items)) if items.len() == 2
        ));
        assert!(matches!(
            classify::<SequenceShape>(&json!("a; b")),
            Some(SequenceShape::Delimited(_))
        ));
        assert!(matches!(
            classify::<SequenceShape>(&json!({"role": "a"})),
            Some(SequenceShape::Single(_))
        ));
        assert!(matches!(
            classify::<SequenceShape>(&json!(12)),
            Some(SequenceShape::Other(_))
        ));
    }

    #[test]
    fn split_list_handles_newlines_semicolons_and_markers() {
        assert_eq!(
            split_list("1. Team lead\n2) Director; - CEO;;  "),
            vec!["Team lead", "Director", "CEO"]
        );
    }

    #[test]
    fn split_path_falls_back_to_arrows() {
        assert_eq!(
            split_path("Team lead -> Director → CEO"),
            vec!["Team lead", "Director", "CEO"]
        );
        assert_eq!(split_path("Team lead; Director"), vec!["Team lead", "Director"]);
        assert_eq!(split_path("Solo"), vec!["Solo"]);
        assert!(split_path("  ").is_empty());
        assert!(split_path(" ; \n ").is_empty());
    }

    #[test]
    fn strip_marker_leaves_numbers_without_punctuation() {
        assert_eq!(strip_marker("2030 vision"), "2030 vision");
        assert_eq!(strip_marker("• Bullet"), "Bullet");
    }
}
