//! Phase registry -- the static description of every planning phase.
//!
//! The registry is built once on first use and never changes afterwards.
//! Lookups accept the kebab-case phase id, the canonical key, or the ordinal
//! number (see [`PhaseId`]'s `FromStr`).

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;
use stratplan_model::{CanonicalKey, CanonicalKey as K, Document};

use super::PhaseId;
use super::schema;
use crate::error::EngineError;
use crate::prompt;

/// Static description of one phase.
pub struct PhaseSpec {
    pub id: PhaseId,
    pub number: u8,
    pub title: &'static str,
    pub canonical_key: CanonicalKey,
    /// What the generator is asked to produce.
    pub instructions: &'static str,
    /// Prior branches included as context in the prompt.
    pub inputs: &'static [CanonicalKey],
    pub build_prompt: fn(&PhaseSpec, &Document) -> String,
    pub build_schema: fn() -> Value,
}

impl PhaseSpec {
    pub fn prompt(&self, document: &Document) -> String {
        (self.build_prompt)(self, document)
    }

    pub fn schema(&self) -> Value {
        (self.build_schema)()
    }
}

impl std::fmt::Debug for PhaseSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseSpec")
            .field("id", &self.id)
            .field("number", &self.number)
            .field("title", &self.title)
            .field("canonical_key", &self.canonical_key)
            .finish()
    }
}

struct Registry {
    phases: HashMap<PhaseId, PhaseSpec>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::build);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Look up a phase by id, canonical key, or number.
pub fn lookup(phase_id: &str) -> Result<&'static PhaseSpec, EngineError> {
    phase_id
        .parse::<PhaseId>()
        .ok()
        .and_then(|id| REGISTRY.phases.get(&id))
        .ok_or_else(|| EngineError::UnknownPhase(phase_id.to_string()))
}

/// All phases in ordinal order.
pub fn list() -> Vec<&'static PhaseSpec> {
    PhaseId::ALL.iter().filter_map(|id| REGISTRY.phases.get(id)).collect()
}

pub fn by_number(number: u8) -> Option<&'static PhaseSpec> {
    PhaseId::from_number(number).and_then(|id| REGISTRY.phases.get(&id))
}

pub fn by_key(key: CanonicalKey) -> &'static PhaseSpec {
    &REGISTRY.phases[&PhaseId::from_canonical_key(key)]
}

// ---------------------------------------------------------------------------
// Phase table
// ---------------------------------------------------------------------------

struct Entry {
    id: PhaseId,
    title: &'static str,
    instructions: &'static str,
    inputs: &'static [CanonicalKey],
    build_schema: fn() -> Value,
}

const ENTRIES: [Entry; 17] = [
    Entry {
        id: PhaseId::Context,
        title: "Organizational Context",
        instructions: "Describe the organization: its name, sector, mandate, current state, \
                       the planning horizon (start and end year), and its key challenges.",
        inputs: &[],
        build_schema: schema::context,
    },
    Entry {
        id: PhaseId::Vision,
        title: "Vision, Mission & Values",
        instructions: "Propose a vision statement, a mission statement, core values with short \
                       descriptions, and three to six strategic themes.",
        inputs: &[K::Context],
        build_schema: schema::vision,
    },
    Entry {
        id: PhaseId::Stakeholders,
        title: "Stakeholder Analysis",
        instructions: "List the key stakeholders with their category, influence, interest, \
                       recommended engagement level, and expectations.",
        inputs: &[K::Context, K::Vision],
        build_schema: schema::stakeholders,
    },
    Entry {
        id: PhaseId::Pestel,
        title: "PESTEL Analysis",
        instructions: "Identify external factors in each PESTEL category (political, economic, \
                       social, technological, environmental, legal) with impact and trend.",
        inputs: &[K::Context],
        build_schema: schema::pestel,
    },
    Entry {
        id: PhaseId::Swot,
        title: "SWOT Analysis",
        instructions: "List strengths, weaknesses, opportunities, and threats, each with a \
                       priority.",
        inputs: &[K::Context, K::Stakeholders, K::Pestel],
        build_schema: schema::swot,
    },
    Entry {
        id: PhaseId::Scenarios,
        title: "Scenario Planning",
        instructions: "Describe a best case, a most likely, and a worst case scenario with a \
                       narrative, a probability percentage, assumptions, and implications.",
        inputs: &[K::Context, K::Pestel, K::Swot],
        build_schema: schema::scenarios,
    },
    Entry {
        id: PhaseId::Risks,
        title: "Risk Register",
        instructions: "List the major risks with category, likelihood, impact, mitigation, \
                       owner, and an escalation path.",
        inputs: &[K::Context, K::Swot, K::Scenarios],
        build_schema: schema::risks,
    },
    Entry {
        id: PhaseId::Dependencies,
        title: "Dependencies",
        instructions: "List internal and external dependencies the plan relies on, with type, \
                       criticality, and owner.",
        inputs: &[K::Context, K::Stakeholders, K::Risks],
        build_schema: schema::dependencies,
    },
    Entry {
        id: PhaseId::Objectives,
        title: "Strategic Objectives",
        instructions: "Define strategic objectives, each linked to a strategic theme by \
                       position, with a balanced-scorecard perspective and a priority.",
        inputs: &[K::Vision, K::Swot, K::Risks],
        build_schema: schema::objectives,
    },
    Entry {
        id: PhaseId::NationalAlignment,
        title: "National Alignment",
        instructions: "Link each objective (by position) to the national goals and programs it \
                       supports, with alignment strength and rationale.",
        inputs: &[K::Context, K::Objectives],
        build_schema: schema::national_alignment,
    },
    Entry {
        id: PhaseId::Kpis,
        title: "Key Performance Indicators",
        instructions: "Define KPIs for the objectives with unit, baseline value, target value, \
                       target year, measurement frequency, and direction.",
        inputs: &[K::Context, K::Objectives],
        build_schema: schema::kpis,
    },
    Entry {
        id: PhaseId::Actions,
        title: "Action Plan",
        instructions: "List initiatives and actions per objective with owner, priority, start \
                       and end dates, and deliverables.",
        inputs: &[K::Objectives, K::Kpis],
        build_schema: schema::actions,
    },
    Entry {
        id: PhaseId::ResourcePlan,
        title: "Resource Plan",
        instructions: "Estimate the total budget with currency, budget items by category and \
                       year, staffing needs, and funding sources.",
        inputs: &[K::Context, K::Actions],
        build_schema: schema::resource_plan,
    },
    Entry {
        id: PhaseId::Timeline,
        title: "Implementation Timeline",
        instructions: "Lay out implementation phases with start and end years, and milestones \
                       with target year and quarter.",
        inputs: &[K::Context, K::Objectives, K::Actions],
        build_schema: schema::timeline,
    },
    Entry {
        id: PhaseId::Governance,
        title: "Governance",
        instructions: "Describe the governance model, governing bodies with mandate and \
                       meeting frequency, the review cycle, decision rights, and the \
                       escalation path.",
        inputs: &[K::Context, K::Stakeholders, K::Risks],
        build_schema: schema::governance,
    },
    Entry {
        id: PhaseId::CommunicationPlan,
        title: "Communication Plan",
        instructions: "State the communication objective, key messages, and activities per \
                       audience with channel, frequency, and owner.",
        inputs: &[K::Vision, K::Stakeholders],
        build_schema: schema::communication_plan,
    },
    Entry {
        id: PhaseId::ChangeManagement,
        title: "Change Management",
        instructions: "Describe the change approach, organizational readiness, resistance \
                       points with mitigation, training needs, and quick wins.",
        inputs: &[K::Stakeholders, K::Governance, K::CommunicationPlan],
        build_schema: schema::change_management,
    },
];

impl Registry {
    fn build() -> Self {
        let phases = ENTRIES
            .iter()
            .map(|e| {
                let spec = PhaseSpec {
                    id: e.id,
                    number: e.id.number(),
                    title: e.title,
                    canonical_key: e.id.canonical_key(),
                    instructions: e.instructions,
                    inputs: e.inputs,
                    build_prompt: prompt::build_prompt,
                    build_schema: e.build_schema,
                };
                (e.id, spec)
            })
            .collect();
        Self { phases }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_every_phase_in_order() {
        let phases = list();
        assert_eq!(phases.len(), 17);
        for (i, spec) in phases.iter().enumerate() {
            assert_eq!(usize::from(spec.number), i + 1);
            assert_eq!(spec.id, PhaseId::ALL[i]);
            assert_eq!(spec.canonical_key, CanonicalKey::ALL[i]);
        }
    }

    #[test]
    fn lookup_by_id_key_and_number() {
        assert_eq!(lookup("national-alignment").unwrap().number, 10);
        assert_eq!(lookup("resource_plan").unwrap().id, PhaseId::ResourcePlan);
        assert_eq!(lookup("11").unwrap().canonical_key, CanonicalKey::Kpis);
    }

    #[test]
    fn lookup_unknown_phase_fails() {
        let err = lookup("phase-99").unwrap_err();
        assert!(matches!(err, EngineError::UnknownPhase(ref id) if id == "phase-99"));
    }

    #[test]
    fn by_number_and_by_key() {
        assert_eq!(by_number(1).unwrap().id, PhaseId::Context);
        assert!(by_number(0).is_none());
        assert!(by_number(18).is_none());
        assert_eq!(by_key(CanonicalKey::Timeline).number, 14);
    }

    #[test]
    fn inputs_only_reference_earlier_phases() {
        for spec in list() {
            for input in spec.inputs {
                assert!(
                    *input < spec.canonical_key,
                    "{} depends on later branch {}",
                    spec.id,
                    input
                );
            }
        }
    }

    #[test]
    fn every_schema_is_an_object() {
        for spec in list() {
            assert_eq!(spec.schema()["type"], "object", "{}", spec.id);
        }
    }

    #[test]
    fn debug_omits_function_pointers() {
        let debug = format!("{:?}", lookup("kpis").unwrap());
        assert!(debug.contains("Kpis"));
        assert!(!debug.contains("build_prompt"));
    }
}
