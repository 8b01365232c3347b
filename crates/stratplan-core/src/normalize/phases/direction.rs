//! Phases 9-12: objectives, national alignment, KPIs, actions.

use stratplan_model::{Action, AlignmentLink, Kpi, Objective};

use super::Pass;
use crate::normalize::fields::Fields;

const OBJECTIVE_INDEX: &[&str] = &["objective_index", "objective"];
const OBJECTIVE_NUMBER: &[&str] = &["objective_number"];

pub(crate) fn objectives(reply: &Fields<'_>, pass: &Pass<'_>) -> Vec<Objective> {
    pass.list_or(
        reply,
        &["objectives", "strategic_objectives", "items"],
        &pass.document.objectives,
        "obj",
        |item| {
            let title = item.headline("title", &["objective", "name"]);
            if title.is_empty() {
                return None;
            }
            let f = item.fields();
            Some(Objective {
                id: String::new(),
                title,
                description: f.bilingual("description", &["details", "summary"]),
                perspective: f.choice(&["perspective", "bsc_perspective", "scorecard_perspective"]),
                priority: f.choice(&["priority"]),
                theme_index: f.index(&["theme_index", "theme"], &["theme_number"]),
                owner: f.text(&["owner", "responsible", "lead"]).unwrap_or_default(),
            })
        },
    )
}

pub(crate) fn national_alignment(reply: &Fields<'_>, pass: &Pass<'_>) -> Vec<AlignmentLink> {
    pass.list_or(
        reply,
        &["national_alignment", "alignments", "alignment", "links", "items"],
        &pass.document.national_alignment,
        "aln",
        |item| {
            let national_goal =
                item.headline("national_goal", &["goal", "national_objective", "vision_goal"]);
            let f = item.fields();
            let program = f.bilingual("program", &["programme", "initiative", "vision_program"]);
            if national_goal.is_empty() && program.is_empty() {
                return None;
            }
            Some(AlignmentLink {
                id: String::new(),
                objective_index: f.index(OBJECTIVE_INDEX, OBJECTIVE_NUMBER),
                national_goal,
                program,
                strength: f.choice(&["strength", "alignment_strength", "alignment_level", "level"]),
                rationale: f.bilingual("rationale", &["justification", "explanation", "description"]),
            })
        },
    )
}

/// KPIs without a parseable target year inherit the plan horizon from the
/// context branch.
pub(crate) fn kpis(reply: &Fields<'_>, pass: &Pass<'_>) -> Vec<Kpi> {
    let horizon = pass.document.context.end_year;
    pass.list_or(
        reply,
        &["kpis", "key_performance_indicators", "indicators", "items"],
        &pass.document.kpis,
        "kpi",
        |item| {
            let name = item.headline("name", &["kpi", "title", "indicator"]);
            if name.is_empty() {
                return None;
            }
            let f = item.fields();
            Some(Kpi {
                id: String::new(),
                name,
                objective_index: f.index(OBJECTIVE_INDEX, OBJECTIVE_NUMBER),
                unit: f.text(&["unit", "unit_of_measure", "measure"]).unwrap_or_default(),
                baseline_value: f
                    .number_text(&["baseline_value", "baseline", "current_value"])
                    .unwrap_or_default(),
                target_value: f.number_text(&["target_value", "target"]).unwrap_or_default(),
                target_year: f.year(&["target_year", "year", "deadline"]).or(horizon),
                frequency: f.choice(&["frequency", "measurement_frequency", "reporting_frequency"]),
                direction: f.choice(&["direction", "polarity"]),
                data_source: f.text(&["data_source", "source"]).unwrap_or_default(),
                owner: f.text(&["owner", "responsible"]).unwrap_or_default(),
            })
        },
    )
}

/// Deliverable ids carry their action's position (`dlv0-..`, `dlv1-..`) so
/// they stay unique across the whole branch.
pub(crate) fn actions(reply: &Fields<'_>, pass: &Pass<'_>) -> Vec<Action> {
    let mut actions = pass.list_or(
        reply,
        &["actions", "initiatives", "action_plan", "items"],
        &pass.document.actions,
        "act",
        |item| {
            let title = item.headline("title", &["action", "initiative", "name"]);
            if title.is_empty() {
                return None;
            }
            let f = item.fields();
            let deliverables = f.items(&["deliverables", "outputs"]).unwrap_or_default();
            Some(Action {
                id: String::new(),
                title,
                description: f.bilingual("description", &["details"]),
                objective_index: f.index(OBJECTIVE_INDEX, OBJECTIVE_NUMBER),
                owner: f.text(&["owner", "responsible", "lead"]).unwrap_or_default(),
                priority: f.choice(&["priority"]),
                start_date: f.text(&["start_date", "start", "from"]).unwrap_or_default(),
                end_date: f.text(&["end_date", "end", "due_date", "to"]).unwrap_or_default(),
                deliverables: pass.statements(deliverables, "dlv"),
            })
        },
    );
    for (position, action) in actions.iter_mut().enumerate() {
        pass.reassign(&mut action.deliverables, &format!("dlv{position}"));
    }
    actions
}
