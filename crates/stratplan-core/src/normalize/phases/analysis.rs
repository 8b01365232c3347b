//! Phases 4-8: PESTEL, SWOT, scenarios, risks, dependencies.

use serde_json::Value;
use stratplan_model::enums::fold_key;
use stratplan_model::{
    Dependency, Level, PestelBranch, PestelFactor, Risk, Scenario, ScenarioSet, SwotBranch,
    SwotItem,
};

use tracing::debug;

use super::Pass;
use crate::normalize::fields::{Fields, Item};

/// Keys a flat list uses to say which category an item belongs to.
const CATEGORY_FIELDS: &[&str] = &["category", "type", "dimension", "quadrant", "kind"];

// ---------------------------------------------------------------------------
// Category maps
// ---------------------------------------------------------------------------

/// Whether the reply carries a list for any of `categories`.
fn carries_any(reply: &Fields<'_>, categories: &[&[&str]]) -> bool {
    categories.iter().any(|aliases| reply.items(aliases).is_some())
}

/// Items for one category: the list under the category's own aliases, or
/// else the items of a flat list tagged with that category. An absent
/// category is empty.
fn category<'r>(reply: &Fields<'r>, flat: &[Item<'r>], aliases: &[&str]) -> Vec<Item<'r>> {
    if let Some(items) = reply.items(aliases) {
        return items;
    }
    flat.iter()
        .filter(|item| {
            item.fields()
                .text(CATEGORY_FIELDS)
                .is_some_and(|c| aliases.contains(&fold_key(&c).as_str()))
        })
        .cloned()
        .collect()
}

const POLITICAL: &[&str] = &["political", "politics"];
const ECONOMIC: &[&str] = &["economic", "economy", "economical"];
const SOCIAL: &[&str] = &["social", "society", "socio_cultural", "sociocultural"];
const TECHNOLOGICAL: &[&str] = &["technological", "technology", "tech"];
const ENVIRONMENTAL: &[&str] = &["environmental", "environment", "ecological"];
const LEGAL: &[&str] = &["legal", "law", "regulatory"];

/// A reply with no PESTEL content at all keeps the current branch. Once any
/// category is present, the missing ones are empty.
pub(crate) fn pestel(reply: &Fields<'_>, pass: &Pass<'_>) -> PestelBranch {
    let flat = reply.items(&["pestel", "factors", "items"]);
    if flat.is_none()
        && !carries_any(reply, &[POLITICAL, ECONOMIC, SOCIAL, TECHNOLOGICAL, ENVIRONMENTAL, LEGAL])
    {
        debug!("no PESTEL categories in reply, keeping current");
        let current = &pass.document.pestel;
        return PestelBranch {
            political: pass.carry(&current.political, "pol"),
            economic: pass.carry(&current.economic, "eco"),
            social: pass.carry(&current.social, "soc"),
            technological: pass.carry(&current.technological, "tec"),
            environmental: pass.carry(&current.environmental, "env"),
            legal: pass.carry(&current.legal, "leg"),
        };
    }
    let flat = flat.unwrap_or_default();
    let build = |aliases: &[&str], tag: &str| {
        pass.records(category(reply, &flat, aliases), tag, pestel_factor)
    };
    PestelBranch {
        political: build(POLITICAL, "pol"),
        economic: build(ECONOMIC, "eco"),
        social: build(SOCIAL, "soc"),
        technological: build(TECHNOLOGICAL, "tec"),
        environmental: build(ENVIRONMENTAL, "env"),
        legal: build(LEGAL, "leg"),
    }
}

fn pestel_factor(item: &Item<'_>) -> Option<PestelFactor> {
    let factor = item.headline("factor", &["name", "title", "description", "text"]);
    if factor.is_empty() {
        return None;
    }
    let f = item.fields();
    Some(PestelFactor {
        id: String::new(),
        factor,
        impact: f.choice(&["impact", "severity", "level"]),
        trend: f.choice(&["trend", "direction"]),
    })
}

const STRENGTHS: &[&str] = &["strengths", "strength"];
const WEAKNESSES: &[&str] = &["weaknesses", "weakness"];
const OPPORTUNITIES: &[&str] = &["opportunities", "opportunity"];
const THREATS: &[&str] = &["threats", "threat"];

/// Same carry rule as [`pestel`].
pub(crate) fn swot(reply: &Fields<'_>, pass: &Pass<'_>) -> SwotBranch {
    let flat = reply.items(&["swot", "items"]);
    if flat.is_none() && !carries_any(reply, &[STRENGTHS, WEAKNESSES, OPPORTUNITIES, THREATS]) {
        debug!("no SWOT categories in reply, keeping current");
        let current = &pass.document.swot;
        return SwotBranch {
            strengths: pass.carry(&current.strengths, "str"),
            weaknesses: pass.carry(&current.weaknesses, "wea"),
            opportunities: pass.carry(&current.opportunities, "opp"),
            threats: pass.carry(&current.threats, "thr"),
        };
    }
    let flat = flat.unwrap_or_default();
    let build = |aliases: &[&str], tag: &str| {
        pass.records(category(reply, &flat, aliases), tag, swot_item)
    };
    SwotBranch {
        strengths: build(STRENGTHS, "str"),
        weaknesses: build(WEAKNESSES, "wea"),
        opportunities: build(OPPORTUNITIES, "opp"),
        threats: build(THREATS, "thr"),
    }
}

fn swot_item(item: &Item<'_>) -> Option<SwotItem> {
    let text = item.headline("text", &["item", "point", "description", "name", "title"]);
    if text.is_empty() {
        return None;
    }
    Some(SwotItem {
        id: String::new(),
        text,
        priority: item.fields().choice(&["priority", "importance"]),
    })
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

const BEST_CASE: &[&str] = &["best_case", "optimistic", "best", "best_scenario"];
const MOST_LIKELY: &[&str] = &[
    "most_likely",
    "baseline",
    "base_case",
    "realistic",
    "likely",
    "most_likely_case",
];
const WORST_CASE: &[&str] = &["worst_case", "pessimistic", "worst", "worst_scenario"];
/// Keys a scenario list uses to name which case an entry is.
const SCENARIO_TYPE: &[&str] = &["type", "case", "scenario_type", "kind"];

pub(crate) fn scenarios(reply: &Fields<'_>, pass: &Pass<'_>) -> ScenarioSet {
    let listed = reply.items(&["scenarios", "items"]).unwrap_or_default();
    let typed = listed
        .iter()
        .any(|item| item.fields().text(SCENARIO_TYPE).is_some());

    let pick = |aliases: &[&str], position: usize, default: u8, tag: &str| -> Scenario {
        if let Some(f) = reply.object(aliases) {
            return scenario(&f, default, pass, tag);
        }
        if reply.get(aliases).is_some_and(Value::is_string) {
            return Scenario {
                narrative: reply.bilingual(aliases[0], &aliases[1..]),
                ..Scenario::with_probability(default)
            };
        }
        let found = if typed {
            listed.iter().find(|item| {
                item.fields()
                    .text(SCENARIO_TYPE)
                    .is_some_and(|t| aliases.contains(&fold_key(&t).as_str()))
            })
        } else {
            listed.get(position)
        };
        match found {
            Some(item) => scenario(&item.fields(), default, pass, tag),
            None => Scenario::with_probability(default),
        }
    };

    ScenarioSet {
        best_case: pick(BEST_CASE, 0, ScenarioSet::BEST_CASE_PROBABILITY, "best"),
        most_likely: pick(MOST_LIKELY, 1, ScenarioSet::MOST_LIKELY_PROBABILITY, "likely"),
        worst_case: pick(WORST_CASE, 2, ScenarioSet::WORST_CASE_PROBABILITY, "worst"),
    }
}

fn scenario(f: &Fields<'_>, default_probability: u8, pass: &Pass<'_>, tag: &str) -> Scenario {
    let assumptions = f.items(&["assumptions", "key_assumptions"]).unwrap_or_default();
    let implications = f
        .items(&["implications", "impacts", "consequences"])
        .unwrap_or_default();
    Scenario {
        name: f.bilingual("name", &["title"]),
        narrative: f.bilingual("narrative", &["description", "summary", "story"]),
        probability: f
            .percent(&["probability", "likelihood", "probability_percent"])
            .unwrap_or(default_probability),
        assumptions: pass.statements(assumptions, &format!("{tag}-asm")),
        implications: pass.statements(implications, &format!("{tag}-imp")),
    }
}

// ---------------------------------------------------------------------------
// Registers
// ---------------------------------------------------------------------------

pub(crate) fn risks(reply: &Fields<'_>, pass: &Pass<'_>) -> Vec<Risk> {
    pass.list_or(
        reply,
        &["risks", "risk_register", "items"],
        &pass.document.risks,
        "rsk",
        |item| {
            let title = item.headline("title", &["risk", "name", "risk_title"]);
            if title.is_empty() {
                return None;
            }
            let f = item.fields();
            let likelihood: Level = f.choice(&["likelihood", "probability"]);
            let impact: Level = f.choice(&["impact", "severity", "consequence"]);
            Some(Risk {
                id: String::new(),
                title,
                description: f.bilingual("description", &["details", "risk_description"]),
                category: f.choice(&["category", "type", "risk_category"]),
                likelihood,
                impact,
                score: likelihood.ordinal() * impact.ordinal(),
                mitigation: f.bilingual(
                    "mitigation",
                    &["mitigation_strategy", "response", "treatment"],
                ),
                owner: f.text(&["owner", "risk_owner", "responsible"]).unwrap_or_default(),
                escalation_path: f
                    .escalation(&["escalation_path", "escalation", "escalation_steps"])
                    .unwrap_or_default(),
            })
        },
    )
}

pub(crate) fn dependencies(reply: &Fields<'_>, pass: &Pass<'_>) -> Vec<Dependency> {
    pass.list_or(
        reply,
        &["dependencies", "items"],
        &pass.document.dependencies,
        "dep",
        |item| {
            let name = item.headline("name", &["dependency", "title"]);
            if name.is_empty() {
                return None;
            }
            let f = item.fields();
            Some(Dependency {
                id: String::new(),
                name,
                description: f.bilingual("description", &["details"]),
                dependency_type: f.choice(&["dependency_type", "type", "category"]),
                criticality: f.choice(&["criticality", "importance", "impact"]),
                owner: f.text(&["owner", "responsible"]).unwrap_or_default(),
                related_objective: f.index(
                    &["related_objective", "objective_index"],
                    &["objective_number"],
                ),
            })
        },
    )
}
