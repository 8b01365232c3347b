//! Phases 13-17: resources, timeline, governance, communication, change.
//!
//! All five branches are objects. Each starts from the current branch and
//! overlays what the reply supplies; nested lists are replaced when the reply
//! carries them and kept otherwise.

use serde_json::Value;
use stratplan_model::{
    BudgetItem, ChangeManagement, CommunicationActivity, CommunicationPlan, Governance,
    GovernanceBody, Milestone, ResistancePoint, ResourcePlan, StaffingNeed, Timeline,
    TimelinePhase, TrainingNeed,
};

use super::{Pass, keep_or};
use crate::normalize::fields::Fields;

/// Headcount assumed for a staffing need that names a role but no count.
const DEFAULT_HEADCOUNT: u32 = 1;

/// Keys for the budget breakdown. `budget` is also the total's alias, so it
/// only names the breakdown when it holds an array.
const BUDGET_ITEMS: &[&str] = &["budget_items", "budget_breakdown", "items"];
const BUDGET_ITEMS_OR_LIST: &[&str] = &["budget_items", "budget_breakdown", "budget", "items"];

pub(crate) fn resource_plan(reply: &Fields<'_>, pass: &Pass<'_>) -> ResourcePlan {
    let current = &pass.document.resource_plan;
    let budget_items = if reply.get(&["budget"]).is_some_and(Value::is_array) {
        BUDGET_ITEMS_OR_LIST
    } else {
        BUDGET_ITEMS
    };
    ResourcePlan {
        summary: current
            .summary
            .overlay(&reply.bilingual("summary", &["overview", "description"])),
        total_budget: keep_or(
            reply.number_text(&["total_budget", "budget", "total"]),
            &current.total_budget,
        ),
        currency: keep_or(reply.text(&["currency"]), &current.currency),
        budget_items: pass.list_or(
            reply,
            budget_items,
            &current.budget_items,
            "bud",
            |item| {
                let category = item.headline("category", &["item", "name", "title"]);
                if category.is_empty() {
                    return None;
                }
                let f = item.fields();
                Some(BudgetItem {
                    id: String::new(),
                    category,
                    amount: f.number_text(&["amount", "cost", "value"]).unwrap_or_default(),
                    year: f.year(&["year", "fiscal_year"]),
                    notes: f.bilingual("notes", &["description", "details"]),
                })
            },
        ),
        staffing: pass.list_or(
            reply,
            &["staffing", "staffing_needs", "human_resources", "staff"],
            &current.staffing,
            "stf",
            |item| {
                let role = item.headline("role", &["position", "title", "name"]);
                if role.is_empty() {
                    return None;
                }
                let f = item.fields();
                Some(StaffingNeed {
                    id: String::new(),
                    role,
                    headcount: f
                        .count(&["headcount", "count", "number", "fte"])
                        .unwrap_or(DEFAULT_HEADCOUNT),
                    skills: f.bilingual("skills", &["competencies", "requirements"]),
                })
            },
        ),
        funding_sources: pass.statements_or(
            reply,
            &["funding_sources", "funding", "sources_of_funding"],
            &current.funding_sources,
            "fnd",
        ),
    }
}

/// Milestones without a parseable target year inherit the plan horizon.
pub(crate) fn timeline(reply: &Fields<'_>, pass: &Pass<'_>) -> Timeline {
    let current = &pass.document.timeline;
    let horizon = pass.document.context.end_year;
    Timeline {
        summary: current
            .summary
            .overlay(&reply.bilingual("summary", &["overview", "description"])),
        phases: pass.list_or(
            reply,
            &["phases", "implementation_phases", "waves", "stages"],
            &current.phases,
            "phs",
            |item| {
                let name = item.headline("name", &["phase", "title", "wave"]);
                if name.is_empty() {
                    return None;
                }
                let f = item.fields();
                Some(TimelinePhase {
                    id: String::new(),
                    name,
                    start_year: f.year(&["start_year", "start", "from"]),
                    end_year: f.year(&["end_year", "end", "to"]),
                    focus: f.bilingual("focus", &["description", "activities"]),
                })
            },
        ),
        milestones: pass.list_or(
            reply,
            &["milestones", "key_milestones"],
            &current.milestones,
            "mst",
            |item| {
                let title = item.headline("title", &["milestone", "name"]);
                if title.is_empty() {
                    return None;
                }
                let f = item.fields();
                Some(Milestone {
                    id: String::new(),
                    title,
                    target_year: f.year(&["target_year", "year", "date", "due"]).or(horizon),
                    quarter: f.text(&["quarter"]).map(|q| quarter(&q)).unwrap_or_default(),
                    objective_index: f.index(&["objective_index"], &["objective_number"]),
                })
            },
        ),
    }
}

/// `"q3"`, `"Q3 2027"` and `"3"` become `"Q3"`; anything else is kept as is.
fn quarter(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    let digit = match upper.find('Q') {
        Some(i) => upper[i + 1..].chars().next(),
        None if upper.len() == 1 => upper.chars().next(),
        None => None,
    };
    match digit {
        Some(d @ '1'..='4') => format!("Q{d}"),
        _ => raw.trim().to_string(),
    }
}

pub(crate) fn governance(reply: &Fields<'_>, pass: &Pass<'_>) -> Governance {
    let current = &pass.document.governance;
    Governance {
        model: current.model.overlay(&reply.bilingual(
            "model",
            &["governance_model", "structure", "overview"],
        )),
        bodies: pass.list_or(
            reply,
            &["bodies", "governance_bodies", "committees"],
            &current.bodies,
            "gov",
            |item| {
                let name = item.headline("name", &["body", "committee", "title"]);
                if name.is_empty() {
                    return None;
                }
                let f = item.fields();
                Some(GovernanceBody {
                    id: String::new(),
                    name,
                    mandate: f.bilingual("mandate", &["role", "responsibilities", "purpose"]),
                    chair: f.text(&["chair", "chaired_by", "lead"]).unwrap_or_default(),
                    meeting_frequency: f.choice(&["meeting_frequency", "frequency", "meets"]),
                })
            },
        ),
        review_cycle: keep_or(
            reply.choice_opt(&["review_cycle", "review_frequency", "reporting_cycle"]),
            &current.review_cycle,
        ),
        decision_rights: pass.statements_or(
            reply,
            &["decision_rights", "decision_authority", "authorities"],
            &current.decision_rights,
            "drt",
        ),
        escalation_path: keep_or(
            reply.escalation(&["escalation_path", "escalation", "escalation_steps"]),
            &current.escalation_path,
        ),
    }
}

pub(crate) fn communication_plan(reply: &Fields<'_>, pass: &Pass<'_>) -> CommunicationPlan {
    let current = &pass.document.communication_plan;
    CommunicationPlan {
        objective: current.objective.overlay(&reply.bilingual(
            "objective",
            &["communication_objective", "goal", "purpose"],
        )),
        key_messages: pass.statements_or(
            reply,
            &["key_messages", "messages", "core_messages"],
            &current.key_messages,
            "msg",
        ),
        activities: pass.list_or(
            reply,
            &["activities", "communication_activities", "channels"],
            &current.activities,
            "com",
            |item| {
                let audience = item.headline("audience", &["target_audience", "stakeholder"]);
                let f = item.fields();
                let message = f.bilingual("message", &["content", "description"]);
                let channel = f.text(&["channel", "medium"]).unwrap_or_default();
                if audience.is_empty() && message.is_empty() && channel.is_empty() {
                    return None;
                }
                Some(CommunicationActivity {
                    id: String::new(),
                    audience,
                    channel,
                    message,
                    frequency: f.choice(&["frequency", "cadence"]),
                    owner: f.text(&["owner", "responsible"]).unwrap_or_default(),
                })
            },
        ),
    }
}

pub(crate) fn change_management(reply: &Fields<'_>, pass: &Pass<'_>) -> ChangeManagement {
    let current = &pass.document.change_management;
    ChangeManagement {
        approach: current.approach.overlay(&reply.bilingual(
            "approach",
            &["change_approach", "strategy", "framework"],
        )),
        readiness: keep_or(
            reply.choice_opt(&["readiness", "readiness_level", "change_readiness"]),
            &current.readiness,
        ),
        resistance_points: pass.list_or(
            reply,
            &["resistance_points", "resistance", "sources_of_resistance"],
            &current.resistance_points,
            "res",
            |item| {
                let source = item.headline("source", &["resistance", "description", "point"]);
                if source.is_empty() {
                    return None;
                }
                let f = item.fields();
                Some(ResistancePoint {
                    id: String::new(),
                    source,
                    mitigation: f.bilingual("mitigation", &["response", "mitigation_strategy"]),
                    likelihood: f.choice(&["likelihood", "level", "probability"]),
                })
            },
        ),
        training: pass.list_or(
            reply,
            &["training", "training_needs", "training_plan"],
            &current.training,
            "trn",
            |item| {
                let topic = item.headline("topic", &["training", "name", "title", "skill"]);
                if topic.is_empty() {
                    return None;
                }
                let f = item.fields();
                Some(TrainingNeed {
                    id: String::new(),
                    topic,
                    audience: f.bilingual("audience", &["target_audience", "participants"]),
                    timing: f.text(&["timing", "when", "schedule"]).unwrap_or_default(),
                })
            },
        ),
        quick_wins: pass.statements_or(
            reply,
            &["quick_wins", "early_wins"],
            &current.quick_wins,
            "qwn",
        ),
    }
}
