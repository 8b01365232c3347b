//! Bilingual text values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A text value carried in both plan languages.
///
/// `en` is the primary language and `ar` the secondary one. Either side may
/// be empty; normalization guarantees that a language supplied by a reply is
/// never dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BilingualText {
    pub en: String,
    pub ar: String,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Primary-language text only.
    pub fn en(en: impl Into<String>) -> Self {
        Self::new(en, String::new())
    }

    /// Build from a single untagged string, placing it on the side whose
    /// script it is written in.
    pub fn from_plain(text: &str) -> Self {
        let text = text.trim();
        if is_arabic_script(text) {
            Self::new(String::new(), text)
        } else {
            Self::en(text)
        }
    }

    /// `true` when neither language carries text.
    pub fn is_empty(&self) -> bool {
        self.en.trim().is_empty() && self.ar.trim().is_empty()
    }

    /// Fill each empty language from `other`, keeping languages already set.
    pub fn fill_from(&mut self, other: &BilingualText) {
        if self.en.trim().is_empty() && !other.en.trim().is_empty() {
            self.en = other.en.trim().to_string();
        }
        if self.ar.trim().is_empty() && !other.ar.trim().is_empty() {
            self.ar = other.ar.trim().to_string();
        }
    }

    /// Overlay `incoming` on top of `self`: a non-empty incoming language
    /// replaces the current one, an empty one leaves it alone.
    pub fn overlay(&self, incoming: &BilingualText) -> BilingualText {
        let pick = |current: &str, new: &str| {
            if new.trim().is_empty() {
                current.to_string()
            } else {
                new.trim().to_string()
            }
        };
        BilingualText {
            en: pick(&self.en, &incoming.en),
            ar: pick(&self.ar, &incoming.ar),
        }
    }
}

impl fmt::Display for BilingualText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.en.is_empty(), self.ar.is_empty()) {
            (false, false) => write!(f, "{} / {}", self.en, self.ar),
            (false, true) => f.write_str(&self.en),
            (true, false) => f.write_str(&self.ar),
            (true, true) => Ok(()),
        }
    }
}

/// `true` when the majority of alphabetic characters are Arabic script.
fn is_arabic_script(text: &str) -> bool {
    let (mut arabic, mut other) = (0usize, 0usize);
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        if matches!(c, '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{FB50}'..='\u{FDFF}' | '\u{FE70}'..='\u{FEFF}') {
            arabic += 1;
        } else {
            other += 1;
        }
    }
    arabic > other
}
