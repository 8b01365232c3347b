//! Field resolution over a raw reply object.
//!
//! [`Fields`] wraps one JSON object and answers typed questions about it:
//! "the first non-empty text under any of these names", "the bilingual value
//! for this base name", "the list under any of these names". Every lookup
//! takes a prioritized alias list; the first present, non-empty candidate
//! wins. Nothing here fails: unusable values resolve to `None` or a
//! documented default and are logged at `debug`.

use std::str::FromStr;
use std::sync::LazyLock;

use serde_json::{Map, Value};
use stratplan_model::{BilingualText, EscalationStep};
use tracing::debug;

use super::shapes::{
    ItemShape, PercentShape, ScalarShape, SequenceShape, classify, split_list, split_path,
};

static EMPTY: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);

/// Keys accepted for the primary language inside a bilingual object.
const PRIMARY_KEYS: &[&str] = &["en", "english", "primary"];
/// Keys accepted for the secondary language inside a bilingual object.
const SECONDARY_KEYS: &[&str] = &["ar", "arabic", "secondary"];

/// Typed, alias-aware view of a raw JSON object.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// View `value` as an object; anything else behaves as an empty object.
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Self { map },
            _ => Self::empty(),
        }
    }

    pub(crate) fn from_map(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub(crate) fn empty() -> Self {
        Self { map: &EMPTY }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// First candidate that is present and not null/blank.
    pub(crate) fn get(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find(|v| !is_blank(v))
    }

    /// Nested object under any alias.
    pub(crate) fn object(&self, aliases: &[&str]) -> Option<Fields<'a>> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(|v| v.as_object().map(Fields::from_map))
    }

    // -----------------------------------------------------------------------
    // Text
    // -----------------------------------------------------------------------

    /// First non-empty scalar under any alias, rendered as trimmed text.
    pub(crate) fn text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(scalar_text)
    }

    /// Resolve a bilingual field.
    ///
    /// Candidates are checked per name in order: the value at `name` itself
    /// (string or language object), then `name_en` / `name_ar`. The base name
    /// comes first, then each alias. Each language is filled by the first
    /// candidate that supplies it, so a language present anywhere is kept.
    pub(crate) fn bilingual(&self, base: &str, aliases: &[&str]) -> BilingualText {
        let mut text = BilingualText::default();
        for name in std::iter::once(base).chain(aliases.iter().copied()) {
            if let Some(value) = self.map.get(name) {
                text.fill_from(&bilingual_value(value));
            }
            if let Some(en) = self.map.get(&format!("{name}_en")).and_then(scalar_text) {
                text.fill_from(&BilingualText::en(en));
            }
            if let Some(ar) = self.map.get(&format!("{name}_ar")).and_then(scalar_text) {
                text.fill_from(&BilingualText::new(String::new(), ar));
            }
        }
        text
    }

    /// Numeric-or-text value rendered as text (`10` → `"10"`).
    pub(crate) fn number_text(&self, aliases: &[&str]) -> Option<String> {
        self.text(aliases)
    }

    // -----------------------------------------------------------------------
    // Enumerations and numbers
    // -----------------------------------------------------------------------

    /// Parse a closed enum, falling back to its default when absent or
    /// unrecognized.
    pub(crate) fn choice<E>(&self, aliases: &[&str]) -> E
    where
        E: FromStr + Default,
    {
        self.choice_opt(aliases).unwrap_or_default()
    }

    /// Parse a closed enum when present; `None` when absent. Present but
    /// unrecognized values resolve to the default.
    pub(crate) fn choice_opt<E>(&self, aliases: &[&str]) -> Option<E>
    where
        E: FromStr + Default,
    {
        let raw = self.text(aliases)?;
        match raw.parse::<E>() {
            Ok(value) => Some(value),
            Err(_) => {
                debug!(field = aliases[0], value = %raw, "unrecognized enum value, using default");
                Some(E::default())
            }
        }
    }

    /// A four-digit calendar year from a number or from text such as
    /// `"FY2030"` or `"Q4 2030"`.
    pub(crate) fn year(&self, aliases: &[&str]) -> Option<i32> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(|value| match classify::<ScalarShape>(value)? {
                ScalarShape::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().map(|f| f.round() as i64))
                    .and_then(plausible_year),
                ScalarShape::Text(s) => year_in_text(&s),
                ScalarShape::Flag(_) | ScalarShape::Other(_) => None,
            })
    }

    /// A non-negative count, from a number or leading digits of text.
    pub(crate) fn count(&self, aliases: &[&str]) -> Option<u32> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(|value| match classify::<ScalarShape>(value)? {
                ScalarShape::Number(n) => n
                    .as_u64()
                    .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
                    .and_then(|n| u32::try_from(n).ok()),
                ScalarShape::Text(s) => leading_number(&s).and_then(|n| u32::try_from(n).ok()),
                ScalarShape::Flag(_) | ScalarShape::Other(_) => None,
            })
    }

    /// A positional reference: zero-based under `zero_based` names, or
    /// one-based under `one_based` names. Never bounds-checked.
    pub(crate) fn index(&self, zero_based: &[&str], one_based: &[&str]) -> Option<usize> {
        let as_int = |value: &Value| -> Option<i64> {
            match classify::<ScalarShape>(value)? {
                ScalarShape::Number(n) => n.as_i64(),
                ScalarShape::Text(s) => s.trim().parse::<i64>().ok(),
                ScalarShape::Flag(_) | ScalarShape::Other(_) => None,
            }
        };
        let zero = zero_based
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(as_int)
            .and_then(|n| usize::try_from(n).ok());
        zero.or_else(|| {
            one_based
                .iter()
                .filter_map(|key| self.map.get(*key))
                .find_map(as_int)
                .filter(|n| *n >= 1)
                .and_then(|n| usize::try_from(n - 1).ok())
        })
    }

    /// A percentage clamped to `0..=100`. `None` when absent or unparsable.
    pub(crate) fn percent(&self, aliases: &[&str]) -> Option<u8> {
        let value = self.get(aliases)?;
        let parsed = match classify::<PercentShape>(value)? {
            PercentShape::Number(n) => Some(n),
            PercentShape::Text(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
            PercentShape::Other(_) => None,
        };
        match parsed.filter(|n| n.is_finite()) {
            Some(n) => Some(n.round().clamp(0.0, 100.0) as u8),
            None => {
                debug!(field = aliases[0], value = %value, "unparsable percentage");
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Sequences
    // -----------------------------------------------------------------------

    /// The list under the first alias that carries one.
    ///
    /// Accepts an array, a delimited string (split on newline/semicolon), or a
    /// lone object standing in for one element. `None` when no alias carries
    /// anything list-like; an explicit empty array yields `Some(vec![])`.
    /// Blank strings, and strings holding only separators, count as absent.
    pub(crate) fn items(&self, aliases: &[&str]) -> Option<Vec<Item<'a>>> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .filter(|v| !is_blank(v))
            .find_map(Item::sequence)
    }

    /// Escalation path in any of its three historical shapes.
    pub(crate) fn escalation(&self, aliases: &[&str]) -> Option<Vec<EscalationStep>> {
        let value = aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find(|v| !is_blank(v))?;
        let items: Vec<Item<'a>> = match classify::<SequenceShape>(value)? {
            SequenceShape::List(_) | SequenceShape::Single(_) => Item::sequence(value)?,
            SequenceShape::Delimited(text) => {
                let segments = split_path(&text);
                if segments.is_empty() {
                    debug!(field = aliases[0], "escalation path has no steps");
                    return None;
                }
                segments.into_iter().map(Item::Plain).collect()
            }
            SequenceShape::Other(other) => {
                debug!(field = aliases[0], value = %other, "unusable escalation path");
                return None;
            }
        };
        Some(escalation_steps(items))
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One element of a polymorphic list.
#[derive(Debug, Clone)]
pub(crate) enum Item<'a> {
    /// A bare string, possibly split out of a delimited string.
    Plain(String),
    /// A partially or fully populated object.
    Record(Fields<'a>),
}

impl<'a> Item<'a> {
    fn sequence(value: &'a Value) -> Option<Vec<Item<'a>>> {
        match classify::<SequenceShape>(value)? {
            SequenceShape::List(_) => {
                let elements = value.as_array()?;
                Some(elements.iter().filter_map(Item::element).collect())
            }
            SequenceShape::Delimited(text) => {
                let segments = split_list(&text);
                (!segments.is_empty()).then(|| segments.into_iter().map(Item::Plain).collect())
            }
            SequenceShape::Single(_) => value.as_object().map(|m| vec![Item::Record(Fields::from_map(m))]),
            SequenceShape::Other(_) => None,
        }
    }

    fn element(value: &'a Value) -> Option<Item<'a>> {
        match classify::<ItemShape>(value)? {
            ItemShape::Plain(s) if s.trim().is_empty() => None,
            ItemShape::Plain(s) => Some(Item::Plain(s.trim().to_string())),
            ItemShape::Record(_) => value.as_object().map(|m| Item::Record(Fields::from_map(m))),
            ItemShape::Other(other) => {
                debug!(value = %other, "dropping list element of unexpected shape");
                None
            }
        }
    }

    /// The item's main bilingual text: the whole string for a plain item,
    /// otherwise the bilingual field `base` (with aliases). A record that is
    /// itself a language object (`{"en": .., "ar": ..}`) also counts.
    pub(crate) fn headline(&self, base: &str, aliases: &[&str]) -> BilingualText {
        match self {
            Item::Plain(s) => BilingualText::from_plain(s),
            Item::Record(fields) => {
                let mut text = fields.bilingual(base, aliases);
                text.fill_from(&language_object(fields.map));
                text
            }
        }
    }

    /// Remaining fields; empty for a plain item.
    pub(crate) fn fields(&self) -> Fields<'a> {
        match self {
            Item::Plain(_) => Fields::empty(),
            Item::Record(fields) => *fields,
        }
    }
}

fn escalation_steps(items: Vec<Item<'_>>) -> Vec<EscalationStep> {
    let mut steps = Vec::with_capacity(items.len());
    for item in items {
        let position = steps.len() as u32 + 1;
        let step = match item {
            Item::Plain(role) => EscalationStep {
                level: position,
                role,
                trigger: String::new(),
            },
            Item::Record(f) => {
                let Some(role) = f.text(&["role", "title", "name", "step", "owner", "escalate_to"])
                else {
                    continue;
                };
                EscalationStep {
                    level: f.count(&["level", "step_number", "order", "tier"]).unwrap_or(position),
                    role,
                    trigger: f.text(&["trigger", "condition", "when", "threshold"]).unwrap_or_default(),
                }
            }
        };
        steps.push(step);
    }
    steps
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Render a scalar as trimmed, non-empty text. Language objects render as
/// their primary text, falling back to the secondary one.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match classify::<ScalarShape>(value)? {
        ScalarShape::Text(s) => s.trim().to_string(),
        ScalarShape::Number(n) => n.to_string(),
        ScalarShape::Flag(b) => b.to_string(),
        ScalarShape::Other(Value::Object(map)) => {
            let t = language_object(&map);
            if t.en.is_empty() { t.ar } else { t.en }
        }
        ScalarShape::Other(_) => String::new(),
    };
    (!text.is_empty()).then_some(text)
}

/// Interpret any value as bilingual text.
fn bilingual_value(value: &Value) -> BilingualText {
    match classify::<ItemShape>(value) {
        Some(ItemShape::Plain(s)) => BilingualText::from_plain(&s),
        Some(ItemShape::Record(map)) => language_object(&map),
        Some(ItemShape::Other(other)) => scalar_text(&other)
            .map(|s| BilingualText::from_plain(&s))
            .unwrap_or_default(),
        None => BilingualText::default(),
    }
}

/// `{"en": .., "ar": ..}` and its historical spellings.
fn language_object(map: &Map<String, Value>) -> BilingualText {
    let fields = Fields::from_map(map);
    BilingualText::new(
        fields.text(PRIMARY_KEYS).unwrap_or_default(),
        fields.text(SECONDARY_KEYS).unwrap_or_default(),
    )
}

fn plausible_year(n: i64) -> Option<i32> {
    (1900..=2200).contains(&n).then_some(n as i32)
}

fn year_in_text(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if bytes[start].is_ascii_digit() {
            let end = start
                + bytes[start..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
            if end - start == 4 {
                if let Some(year) = text[start..end].parse::<i64>().ok().and_then(plausible_year) {
                    return Some(year);
                }
            }
            start = end;
        } else {
            start += 1;
        }
    }
    None
}

fn leading_number(text: &str) -> Option<u64> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stratplan_model::{Level, Priority};

    use super::*;

    #[test]
    fn first_present_alias_wins() {
        let v = json!({"legacy": "old", "current": "new"});
        let f = Fields::of(&v);
        assert_eq!(f.text(&["current", "legacy"]).as_deref(), Some("new"));
        assert_eq!(f.text(&["missing", "legacy"]).as_deref(), Some("old"));
    }

    #[test]
    fn blank_values_are_absent() {
        let v = json!({"a": "  ", "b": null, "c": "value"});
        let f = Fields::of(&v);
        assert_eq!(f.text(&["a", "b", "c"]).as_deref(), Some("value"));
        assert!(f.get(&["a", "b"]).is_none());
    }

    #[test]
    fn numbers_and_flags_render_as_text() {
        let v = json!({"n": 10, "f": 10.5, "b": true});
        let f = Fields::of(&v);
        assert_eq!(f.text(&["n"]).as_deref(), Some("10"));
        assert_eq!(f.text(&["f"]).as_deref(), Some("10.5"));
        assert_eq!(f.text(&["b"]).as_deref(), Some("true"));
    }

    #[test]
    fn non_object_behaves_as_empty() {
        let v = json!([1, 2]);
        let f = Fields::of(&v);
        assert!(f.is_empty());
        assert!(f.text(&["x"]).is_none());
    }

    #[test]
    fn bilingual_from_suffixed_fields() {
        let v = json!({"name_en": "Adoption", "name_ar": "التبني"});
        let t = Fields::of(&v).bilingual("name", &[]);
        assert_eq!(t, BilingualText::new("Adoption", "التبني"));
    }

    #[test]
    fn bilingual_from_language_object() {
        let v = json!({"name": {"english": "Adoption", "arabic": "التبني"}});
        let t = Fields::of(&v).bilingual("name", &[]);
        assert_eq!(t, BilingualText::new("Adoption", "التبني"));
    }

    #[test]
    fn bilingual_partial_sources_combine() {
        let v = json!({"title": "Growth", "name_ar": "نمو"});
        let t = Fields::of(&v).bilingual("name", &["title"]);
        assert_eq!(t, BilingualText::new("Growth", "نمو"));
    }

    #[test]
    fn bilingual_missing_language_defaults_empty() {
        let v = json!({"name": {"en": "Only English"}});
        let t = Fields::of(&v).bilingual("name", &[]);
        assert_eq!(t, BilingualText::new("Only English", ""));
    }

    #[test]
    fn choice_defaults_when_absent_or_unknown() {
        let v = json!({"impact": "HIGH", "priority": "whenever"});
        let f = Fields::of(&v);
        assert_eq!(f.choice::<Level>(&["impact"]), Level::High);
        assert_eq!(f.choice::<Priority>(&["priority"]), Priority::Medium);
        assert_eq!(f.choice::<Level>(&["likelihood"]), Level::Medium);
        assert!(f.choice_opt::<Level>(&["likelihood"]).is_none());
    }

    #[test]
    fn year_from_number_or_text() {
        let v = json!({"a": 2030, "b": "FY2028", "c": "Q4 2027", "d": "soon", "e": 12});
        let f = Fields::of(&v);
        assert_eq!(f.year(&["a"]), Some(2030));
        assert_eq!(f.year(&["b"]), Some(2028));
        assert_eq!(f.year(&["c"]), Some(2027));
        assert_eq!(f.year(&["d"]), None);
        assert_eq!(f.year(&["e"]), None);
    }

    #[test]
    fn index_accepts_zero_and_one_based() {
        let v = json!({"objective_index": "2", "objective_number": 1, "neg": -1});
        let f = Fields::of(&v);
        assert_eq!(f.index(&["objective_index"], &[]), Some(2));
        assert_eq!(f.index(&[], &["objective_number"]), Some(0));
        assert_eq!(f.index(&["neg"], &[]), None);
        assert_eq!(f.index(&["missing"], &["missing"]), None);
    }

    #[test]
    fn index_is_not_bounds_checked() {
        let v = json!({"objective_index": 999});
        assert_eq!(Fields::of(&v).index(&["objective_index"], &[]), Some(999));
    }

    #[test]
    fn percent_clamps_and_parses() {
        let v = json!({"a": "150%", "b": "-5", "c": "abc", "d": 35.4, "e": " 40 % "});
        let f = Fields::of(&v);
        assert_eq!(f.percent(&["a"]), Some(100));
        assert_eq!(f.percent(&["b"]), Some(0));
        assert_eq!(f.percent(&["c"]), None);
        assert_eq!(f.percent(&["d"]), Some(35));
        assert_eq!(f.percent(&["e"]), Some(40));
    }

    #[test]
    fn count_from_number_or_text() {
        let v = json!({"a": 3, "b": "4 FTE", "c": -2});
        let f = Fields::of(&v);
        assert_eq!(f.count(&["a"]), Some(3));
        assert_eq!(f.count(&["b"]), Some(4));
        assert_eq!(f.count(&["c"]), None);
    }

    #[test]
    fn items_accept_three_shapes() {
        let v = json!({
            "list": ["A", {"name_en": "B"}, 7, "  "],
            "delimited": "A; B\nC",
            "single": {"name": "Solo"},
            "empty": [],
        });
        let f = Fields::of(&v);
        assert_eq!(f.items(&["list"]).unwrap().len(), 2);
        assert_eq!(f.items(&["delimited"]).unwrap().len(), 3);
        assert_eq!(f.items(&["single"]).unwrap().len(), 1);
        assert!(f.items(&["empty"]).unwrap().is_empty());
        assert!(f.items(&["missing"]).is_none());
    }

    #[test]
    fn blank_or_separator_only_strings_are_not_lists() {
        let v = json!({"a": "", "b": "  ", "c": " ; \n ", "d": ["x"]});
        let f = Fields::of(&v);
        assert!(f.items(&["a"]).is_none());
        assert!(f.items(&["b"]).is_none());
        assert!(f.items(&["c"]).is_none());
        assert_eq!(f.items(&["a", "d"]).unwrap().len(), 1);
        assert!(f.escalation(&["a"]).is_none());
        assert!(f.escalation(&["c"]).is_none());
    }

    #[test]
    fn headline_from_plain_and_record() {
        let v = json!({"list": ["Plain", {"title_en": "Titled"}, {"en": "Lang", "ar": "لغة"}]});
        let items = Fields::of(&v).items(&["list"]).unwrap();
        assert_eq!(items[0].headline("name", &["title"]).en, "Plain");
        assert_eq!(items[1].headline("name", &["title"]).en, "Titled");
        assert_eq!(
            items[2].headline("name", &["title"]),
            BilingualText::new("Lang", "لغة")
        );
    }

    #[test]
    fn escalation_shapes_converge() {
        let structured = json!({"p": [{"level": 1, "role": "Team lead"}, {"role": "Director"}]});
        let bare = json!({"p": ["Team lead", "Director"]});
        let delimited = json!({"p": "Team lead;\nDirector"});

        let expected = vec![
            EscalationStep { level: 1, role: "Team lead".into(), trigger: String::new() },
            EscalationStep { level: 2, role: "Director".into(), trigger: String::new() },
        ];
        for v in [&structured, &bare, &delimited] {
            assert_eq!(Fields::of(v).escalation(&["p"]).unwrap(), expected);
        }
    }

    #[test]
    fn escalation_keeps_explicit_levels_and_triggers() {
        let v = json!({"p": [{"tier": 3, "escalate_to": "CEO", "when": "score >= 6"}]});
        let steps = Fields::of(&v).escalation(&["p"]).unwrap();
        assert_eq!(steps[0].level, 3);
        assert_eq!(steps[0].role, "CEO");
        assert_eq!(steps[0].trigger, "score >= 6");
    }

    #[test]
    fn escalation_absent_or_unusable_is_none() {
        let v = json!({"p": 12});
        assert!(Fields::of(&v).escalation(&["p"]).is_none());
        assert!(Fields::of(&v).escalation(&["q"]).is_none());
    }
}
