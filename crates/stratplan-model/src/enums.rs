//! Closed enumerations used across the plan document.
//!
//! Every enum has a documented default (returned by [`Default`]) and a
//! tolerant [`FromStr`] implementation: input is trimmed, lowercased, and
//! `-`/space are folded to `_` before matching, and each variant accepts a
//! small set of synonyms seen in generated replies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fold free text into the canonical `snake_case` match key.
///
/// `" Very-High "` becomes `"very_high"`, `"Semi Annual"` becomes
/// `"semi_annual"`, `"Learning & Growth"` becomes `"learning_and_growth"`.
pub fn fold_key(s: &str) -> String {
    let s = s.trim().replace('&', " and ");
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let c = if c == '-' || c.is_whitespace() { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.extend(c.to_lowercase());
    }
    out.trim_matches('_').to_string()
}

/// Declare a closed enum with `Display`, tolerant `FromStr`, a default
/// variant, and a dedicated parse error type.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident / $err:ident ($label:literal), default $default:ident {
            $( $variant:ident => $text:literal $(| $syn:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical string form (same as `Display`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = $err;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match fold_key(s).as_str() {
                    $($text $(| $syn)* => Ok(Self::$variant),)+
                    _ => Err($err(s.to_owned())),
                }
            }
        }

        #[doc = concat!("Error returned when parsing an invalid [`", stringify!($name), "`] string.")]
        #[derive(Debug, Clone)]
        pub struct $err(pub String);

        impl fmt::Display for $err {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!("invalid ", $label, ": {:?}"), self.0)
            }
        }

        impl std::error::Error for $err {}
    };
}

// ---------------------------------------------------------------------------
// Ordinal scales
// ---------------------------------------------------------------------------

closed_enum! {
    /// Three-point ordinal scale shared by impact, likelihood, influence,
    /// interest, criticality, readiness, and alignment strength.
    pub enum Level / LevelParseError ("level"), default Medium {
        Low => "low" | "minor" | "very_low",
        Medium => "medium" | "med" | "moderate" | "mid",
        High => "high" | "very_high" | "severe" | "major",
    }
}

impl Level {
    /// Ordinal weight used by derived scores: low 1, medium 2, high 3.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

closed_enum! {
    /// Priority of an objective, action, or SWOT item.
    pub enum Priority / PriorityParseError ("priority"), default Medium {
        Low => "low",
        Medium => "medium" | "med" | "moderate" | "normal",
        High => "high",
        Critical => "critical" | "urgent" | "very_high" | "top",
    }
}

closed_enum! {
    /// Direction a PESTEL factor is moving in.
    pub enum Trend / TrendParseError ("trend"), default Stable {
        Increasing => "increasing" | "rising" | "growing" | "up",
        Stable => "stable" | "steady" | "flat" | "unchanged",
        Decreasing => "decreasing" | "declining" | "falling" | "down",
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

closed_enum! {
    /// Stakeholder grouping.
    pub enum StakeholderCategory / StakeholderCategoryParseError ("stakeholder category"), default External {
        Internal => "internal" | "employees" | "staff",
        External => "external",
        Government => "government" | "governmental" | "public_sector" | "ministry",
        Partner => "partner" | "partners" | "private_sector",
        Community => "community" | "public" | "citizens" | "society",
        Regulator => "regulator" | "regulatory",
    }
}

closed_enum! {
    /// Stakeholder engagement level (IAP2 spectrum).
    pub enum EngagementLevel / EngagementLevelParseError ("engagement level"), default Consult {
        Inform => "inform" | "monitor",
        Consult => "consult" | "keep_informed",
        Involve => "involve" | "keep_satisfied",
        Collaborate => "collaborate" | "partner",
        Empower => "empower" | "manage_closely",
    }
}

closed_enum! {
    /// Risk register category.
    pub enum RiskCategory / RiskCategoryParseError ("risk category"), default Operational {
        Strategic => "strategic",
        Operational => "operational",
        Financial => "financial",
        Compliance => "compliance" | "legal" | "regulatory",
        Reputational => "reputational" | "reputation",
        Technological => "technological" | "technology" | "technical" | "cyber",
    }
}

closed_enum! {
    /// Kind of dependency the plan relies on.
    pub enum DependencyType / DependencyTypeParseError ("dependency type"), default Internal {
        Internal => "internal",
        External => "external",
        Technical => "technical" | "technology",
        Regulatory => "regulatory" | "legal",
        Financial => "financial" | "funding",
    }
}

closed_enum! {
    /// Balanced-scorecard perspective of an objective.
    pub enum Perspective / PerspectiveParseError ("perspective"), default InternalProcess {
        Financial => "financial",
        Customer => "customer" | "beneficiary" | "stakeholder",
        InternalProcess => "internal_process" | "internal_processes" | "process" | "internal",
        LearningGrowth => "learning_growth" | "learning_and_growth" | "learning" | "people",
    }
}

closed_enum! {
    /// Measurement, meeting, or review cadence.
    pub enum Frequency / FrequencyParseError ("frequency"), default Quarterly {
        Weekly => "weekly",
        Monthly => "monthly",
        Quarterly => "quarterly",
        SemiAnnual => "semi_annual" | "semiannual" | "biannual" | "half_yearly",
        Annual => "annual" | "annually" | "yearly",
    }
}

closed_enum! {
    /// Desired direction of a KPI.
    pub enum Direction / DirectionParseError ("direction"), default Increase {
        Increase => "increase" | "higher_is_better" | "up",
        Decrease => "decrease" | "lower_is_better" | "down" | "reduce",
        Maintain => "maintain" | "stable" | "keep",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_key_normalizes_case_and_separators() {
        assert_eq!(fold_key("  Very-High "), "very_high");
        assert_eq!(fold_key("Semi  Annual"), "semi_annual");
        assert_eq!(fold_key("internal_process"), "internal_process");
        assert_eq!(fold_key(""), "");
        assert_eq!(fold_key("Learning & Growth"), "learning_and_growth");
        assert_eq!(fold_key("R&D"), "r_and_d");
    }

    #[test]
    fn level_parses_synonyms() {
        assert_eq!("HIGH".parse::<Level>().unwrap(), Level::High);
        assert_eq!("Moderate".parse::<Level>().unwrap(), Level::Medium);
        assert_eq!("very high".parse::<Level>().unwrap(), Level::High);
        assert!("extreme".parse::<Level>().is_err());
    }

    #[test]
    fn level_ordinals() {
        assert_eq!(Level::Low.ordinal(), 1);
        assert_eq!(Level::Medium.ordinal(), 2);
        assert_eq!(Level::High.ordinal(), 3);
    }

    #[test]
    fn defaults_are_documented_values() {
        assert_eq!(Level::default(), Level::Medium);
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Trend::default(), Trend::Stable);
        assert_eq!(StakeholderCategory::default(), StakeholderCategory::External);
        assert_eq!(EngagementLevel::default(), EngagementLevel::Consult);
        assert_eq!(RiskCategory::default(), RiskCategory::Operational);
        assert_eq!(DependencyType::default(), DependencyType::Internal);
        assert_eq!(Perspective::default(), Perspective::InternalProcess);
        assert_eq!(Frequency::default(), Frequency::Quarterly);
        assert_eq!(Direction::default(), Direction::Increase);
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for f in Frequency::ALL {
            assert_eq!(f.to_string().parse::<Frequency>().unwrap(), *f);
        }
        for p in Perspective::ALL {
            assert_eq!(p.to_string().parse::<Perspective>().unwrap(), *p);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Frequency::SemiAnnual).unwrap();
        assert_eq!(json, "\"semi_annual\"");
        let p: Perspective = serde_json::from_str("\"learning_growth\"").unwrap();
        assert_eq!(p, Perspective::LearningGrowth);
    }

    #[test]
    fn parse_error_message_names_the_enum() {
        let err = "sideways".parse::<Trend>().unwrap_err();
        assert_eq!(err.to_string(), "invalid trend: \"sideways\"");
    }

    #[test]
    fn perspective_accepts_learning_and_growth() {
        assert_eq!(
            "Learning & Growth".parse::<Perspective>().unwrap(),
            Perspective::LearningGrowth
        );
        assert_eq!(
            "learning&growth".parse::<Perspective>().unwrap(),
            Perspective::LearningGrowth
        );
    }
}
