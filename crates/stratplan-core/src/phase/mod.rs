//! Planning phases.
//!
//! Seventeen phases, each producing exactly one branch of the document.
//! [`PhaseId`] names a phase; [`registry`] holds the static description of
//! each one; [`schema`] holds the advisory reply schema per phase.

pub mod registry;
pub mod schema;

use std::fmt;
use std::str::FromStr;

use stratplan_model::CanonicalKey;

pub use registry::{PhaseSpec, by_key, by_number, list, lookup};

/// Identifier of one planning phase, in phase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseId {
    Context,
    Vision,
    Stakeholders,
    Pestel,
    Swot,
    Scenarios,
    Risks,
    Dependencies,
    Objectives,
    NationalAlignment,
    Kpis,
    Actions,
    ResourcePlan,
    Timeline,
    Governance,
    CommunicationPlan,
    ChangeManagement,
}

impl PhaseId {
    pub const ALL: [PhaseId; 17] = [
        Self::Context,
        Self::Vision,
        Self::Stakeholders,
        Self::Pestel,
        Self::Swot,
        Self::Scenarios,
        Self::Risks,
        Self::Dependencies,
        Self::Objectives,
        Self::NationalAlignment,
        Self::Kpis,
        Self::Actions,
        Self::ResourcePlan,
        Self::Timeline,
        Self::Governance,
        Self::CommunicationPlan,
        Self::ChangeManagement,
    ];

    /// Kebab-case phase id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Vision => "vision",
            Self::Stakeholders => "stakeholders",
            Self::Pestel => "pestel",
            Self::Swot => "swot",
            Self::Scenarios => "scenarios",
            Self::Risks => "risks",
            Self::Dependencies => "dependencies",
            Self::Objectives => "objectives",
            Self::NationalAlignment => "national-alignment",
            Self::Kpis => "kpis",
            Self::Actions => "actions",
            Self::ResourcePlan => "resource-plan",
            Self::Timeline => "timeline",
            Self::Governance => "governance",
            Self::CommunicationPlan => "communication-plan",
            Self::ChangeManagement => "change-management",
        }
    }

    /// 1-based ordinal.
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn from_number(n: u8) -> Option<Self> {
        let index = usize::from(n).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// The branch this phase writes.
    pub fn canonical_key(&self) -> CanonicalKey {
        CanonicalKey::ALL[*self as usize]
    }

    pub fn from_canonical_key(key: CanonicalKey) -> Self {
        Self::ALL[key as usize]
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseId {
    type Err = PhaseIdParseError;

    /// Accepts the kebab-case id, the snake_case canonical key, or the
    /// ordinal number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(id) = Self::ALL.into_iter().find(|p| p.as_str() == trimmed) {
            return Ok(id);
        }
        if let Ok(key) = trimmed.parse::<CanonicalKey>() {
            return Ok(Self::from_canonical_key(key));
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| PhaseIdParseError(s.to_owned()))
    }
}

/// Error returned when parsing an invalid [`PhaseId`] string.
#[derive(Debug, Clone)]
pub struct PhaseIdParseError(pub String);

impl fmt::Display for PhaseIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid phase id: {:?}", self.0)
    }
}

impl std::error::Error for PhaseIdParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_through_display() {
        for id in PhaseId::ALL {
            assert_eq!(id.to_string().parse::<PhaseId>().unwrap(), id);
        }
    }

    #[test]
    fn numbers_are_one_based_and_ordered() {
        assert_eq!(PhaseId::Context.number(), 1);
        assert_eq!(PhaseId::ChangeManagement.number(), 17);
        assert_eq!(PhaseId::from_number(11), Some(PhaseId::Kpis));
        assert_eq!(PhaseId::from_number(0), None);
        assert_eq!(PhaseId::from_number(18), None);
    }

    #[test]
    fn accepts_canonical_key_and_number() {
        assert_eq!(
            "national_alignment".parse::<PhaseId>().unwrap(),
            PhaseId::NationalAlignment
        );
        assert_eq!("7".parse::<PhaseId>().unwrap(), PhaseId::Risks);
    }

    #[test]
    fn rejects_unknown() {
        assert!("phase-99".parse::<PhaseId>().is_err());
        assert!("".parse::<PhaseId>().is_err());
        assert!("Kpis".parse::<PhaseId>().is_err());
    }

    #[test]
    fn canonical_keys_line_up() {
        assert_eq!(PhaseId::Kpis.canonical_key(), CanonicalKey::Kpis);
        assert_eq!(
            PhaseId::ResourcePlan.canonical_key(),
            CanonicalKey::ResourcePlan
        );
        for key in CanonicalKey::ALL {
            assert_eq!(PhaseId::from_canonical_key(key).canonical_key(), key);
        }
    }
}
