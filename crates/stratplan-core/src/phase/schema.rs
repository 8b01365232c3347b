//! Advisory reply schemas, one per phase.
//!
//! These are included in prompts to steer the generator toward the canonical
//! field names. They are never used to validate replies; the normalizer
//! accepts far more than they describe.

use serde_json::{Map, Value, json};
use stratplan_model::{
    DependencyType, Direction, EngagementLevel, Frequency, Level, Perspective, Priority,
    RiskCategory, StakeholderCategory, Trend,
};

use super::PhaseId;
use super::registry::by_key;

/// The advisory schema for `phase`.
pub fn response_schema(phase: PhaseId) -> Value {
    by_key(phase.canonical_key()).schema()
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn object(properties: &[(&str, Value)]) -> Value {
    let props: Map<String, Value> = properties
        .iter()
        .map(|(name, schema)| ((*name).to_string(), schema.clone()))
        .collect();
    json!({"type": "object", "properties": props})
}

fn array(items: Value) -> Value {
    json!({"type": "array", "items": items})
}

fn text() -> Value {
    json!({"type": "string"})
}

fn bilingual() -> Value {
    object(&[("en", text()), ("ar", text())])
}

fn integer() -> Value {
    json!({"type": "integer"})
}

fn year() -> Value {
    json!({"type": "integer", "minimum": 1900, "maximum": 2200})
}

fn position() -> Value {
    json!({"type": "integer", "minimum": 0, "description": "zero-based position"})
}

fn number_or_text() -> Value {
    json!({"type": ["number", "string"]})
}

fn one_of(values: &[&str]) -> Value {
    json!({"type": "string", "enum": values})
}

fn statements() -> Value {
    array(object(&[("text", bilingual())]))
}

fn escalation_path() -> Value {
    array(object(&[
        ("level", integer()),
        ("role", text()),
        ("trigger", text()),
    ]))
}

macro_rules! choices {
    ($ty:ty) => {
        one_of(&<$ty>::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>())
    };
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

pub fn context() -> Value {
    object(&[
        ("organization_name", bilingual()),
        ("sector", text()),
        ("mandate", bilingual()),
        ("current_state", bilingual()),
        ("start_year", year()),
        ("end_year", year()),
        ("challenges", statements()),
    ])
}

pub fn vision() -> Value {
    let named = object(&[("name", bilingual()), ("description", bilingual())]);
    object(&[
        ("vision", bilingual()),
        ("mission", bilingual()),
        ("values", array(named.clone())),
        ("strategic_themes", array(named)),
    ])
}

pub fn stakeholders() -> Value {
    object(&[(
        "stakeholders",
        array(object(&[
            ("name", bilingual()),
            ("category", choices!(StakeholderCategory)),
            ("influence", choices!(Level)),
            ("interest", choices!(Level)),
            ("engagement", choices!(EngagementLevel)),
            ("expectations", bilingual()),
        ])),
    )])
}

pub fn pestel() -> Value {
    let factors = array(object(&[
        ("factor", bilingual()),
        ("impact", choices!(Level)),
        ("trend", choices!(Trend)),
    ]));
    object(&[
        ("political", factors.clone()),
        ("economic", factors.clone()),
        ("social", factors.clone()),
        ("technological", factors.clone()),
        ("environmental", factors.clone()),
        ("legal", factors),
    ])
}

pub fn swot() -> Value {
    let items = array(object(&[
        ("text", bilingual()),
        ("priority", choices!(Priority)),
    ]));
    object(&[
        ("strengths", items.clone()),
        ("weaknesses", items.clone()),
        ("opportunities", items.clone()),
        ("threats", items),
    ])
}

pub fn scenarios() -> Value {
    let scenario = object(&[
        ("name", bilingual()),
        ("narrative", bilingual()),
        ("probability", json!({"type": "number", "minimum": 0, "maximum": 100})),
        ("assumptions", statements()),
        ("implications", statements()),
    ]);
    object(&[
        ("best_case", scenario.clone()),
        ("most_likely", scenario.clone()),
        ("worst_case", scenario),
    ])
}

pub fn risks() -> Value {
    object(&[(
        "risks",
        array(object(&[
            ("title", bilingual()),
            ("description", bilingual()),
            ("category", choices!(RiskCategory)),
            ("likelihood", choices!(Level)),
            ("impact", choices!(Level)),
            ("mitigation", bilingual()),
            ("owner", text()),
            ("escalation_path", escalation_path()),
        ])),
    )])
}

pub fn dependencies() -> Value {
    object(&[(
        "dependencies",
        array(object(&[
            ("name", bilingual()),
            ("description", bilingual()),
            ("dependency_type", choices!(DependencyType)),
            ("criticality", choices!(Level)),
            ("owner", text()),
            ("related_objective", position()),
        ])),
    )])
}

pub fn objectives() -> Value {
    object(&[(
        "objectives",
        array(object(&[
            ("title", bilingual()),
            ("description", bilingual()),
            ("perspective", choices!(Perspective)),
            ("priority", choices!(Priority)),
            ("theme_index", position()),
            ("owner", text()),
        ])),
    )])
}

pub fn national_alignment() -> Value {
    object(&[(
        "national_alignment",
        array(object(&[
            ("objective_index", position()),
            ("national_goal", bilingual()),
            ("program", bilingual()),
            ("strength", choices!(Level)),
            ("rationale", bilingual()),
        ])),
    )])
}

pub fn kpis() -> Value {
    object(&[(
        "kpis",
        array(object(&[
            ("name", bilingual()),
            ("objective_index", position()),
            ("unit", text()),
            ("baseline_value", number_or_text()),
            ("target_value", number_or_text()),
            ("target_year", year()),
            ("frequency", choices!(Frequency)),
            ("direction", choices!(Direction)),
            ("data_source", text()),
            ("owner", text()),
        ])),
    )])
}

pub fn actions() -> Value {
    object(&[(
        "actions",
        array(object(&[
            ("title", bilingual()),
            ("description", bilingual()),
            ("objective_index", position()),
            ("owner", text()),
            ("priority", choices!(Priority)),
            ("start_date", text()),
            ("end_date", text()),
            ("deliverables", statements()),
        ])),
    )])
}

pub fn resource_plan() -> Value {
    object(&[
        ("summary", bilingual()),
        ("total_budget", number_or_text()),
        ("currency", text()),
        (
            "budget_items",
            array(object(&[
                ("category", bilingual()),
                ("amount", number_or_text()),
                ("year", year()),
                ("notes", bilingual()),
            ])),
        ),
        (
            "staffing",
            array(object(&[
                ("role", bilingual()),
                ("headcount", integer()),
                ("skills", bilingual()),
            ])),
        ),
        ("funding_sources", statements()),
    ])
}

pub fn timeline() -> Value {
    object(&[
        ("summary", bilingual()),
        (
            "phases",
            array(object(&[
                ("name", bilingual()),
                ("start_year", year()),
                ("end_year", year()),
                ("focus", bilingual()),
            ])),
        ),
        (
            "milestones",
            array(object(&[
                ("title", bilingual()),
                ("target_year", year()),
                ("quarter", one_of(&["Q1", "Q2", "Q3", "Q4"])),
                ("objective_index", position()),
            ])),
        ),
    ])
}

pub fn governance() -> Value {
    object(&[
        ("model", bilingual()),
        (
            "bodies",
            array(object(&[
                ("name", bilingual()),
                ("mandate", bilingual()),
                ("chair", text()),
                ("meeting_frequency", choices!(Frequency)),
            ])),
        ),
        ("review_cycle", choices!(Frequency)),
        ("decision_rights", statements()),
        ("escalation_path", escalation_path()),
    ])
}

pub fn communication_plan() -> Value {
    object(&[
        ("objective", bilingual()),
        ("key_messages", statements()),
        (
            "activities",
            array(object(&[
                ("audience", bilingual()),
                ("channel", text()),
                ("message", bilingual()),
                ("frequency", choices!(Frequency)),
                ("owner", text()),
            ])),
        ),
    ])
}

pub fn change_management() -> Value {
    object(&[
        ("approach", bilingual()),
        ("readiness", choices!(Level)),
        (
            "resistance_points",
            array(object(&[
                ("source", bilingual()),
                ("mitigation", bilingual()),
                ("likelihood", choices!(Level)),
            ])),
        ),
        (
            "training",
            array(object(&[
                ("topic", bilingual()),
                ("audience", bilingual()),
                ("timing", text()),
            ])),
        ),
        ("quick_wins", statements()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kpi_schema_uses_canonical_names() {
        let schema = kpis();
        let item = &schema["properties"]["kpis"]["items"]["properties"];
        assert!(item.get("baseline_value").is_some());
        assert!(item.get("target_value").is_some());
        assert!(item.get("baseline").is_none());
    }

    #[test]
    fn enum_fields_list_their_variants() {
        let schema = risks();
        let likelihood = &schema["properties"]["risks"]["items"]["properties"]["likelihood"];
        assert_eq!(likelihood["enum"], json!(["low", "medium", "high"]));
    }

    #[test]
    fn response_schema_matches_phase_function() {
        assert_eq!(response_schema(PhaseId::Kpis), kpis());
        assert_eq!(response_schema(PhaseId::ChangeManagement), change_management());
    }

    #[test]
    fn scenario_schema_names_all_three_cases() {
        let props = &scenarios()["properties"];
        for case in ["best_case", "most_likely", "worst_case"] {
            assert_eq!(props[case]["type"], "object");
        }
    }
}
