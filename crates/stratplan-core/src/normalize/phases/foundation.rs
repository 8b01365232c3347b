//! Phases 1-3: context, vision, stakeholders.

use stratplan_model::{BilingualText, ContextBranch, CoreValue, Stakeholder, Theme, VisionBranch};

use super::{Pass, keep_or};
use crate::normalize::fields::{Fields, Item};

const THEMES: &[&str] = &[
    "strategic_themes",
    "suggested_themes",
    "themes",
    "strategic_pillars",
    "pillars",
];

pub(crate) fn context(reply: &Fields<'_>, pass: &Pass<'_>) -> ContextBranch {
    let current = &pass.document.context;
    ContextBranch {
        organization_name: current.organization_name.overlay(&reply.bilingual(
            "organization_name",
            &["organization", "entity_name", "entity", "name"],
        )),
        sector: keep_or(reply.text(&["sector", "industry", "domain"]), &current.sector),
        mandate: current
            .mandate
            .overlay(&reply.bilingual("mandate", &["purpose", "role"])),
        current_state: current.current_state.overlay(&reply.bilingual(
            "current_state",
            &["current_situation", "situation", "background"],
        )),
        start_year: reply
            .year(&["start_year", "plan_start", "from_year"])
            .or(current.start_year),
        end_year: reply
            .year(&["end_year", "plan_end", "horizon_year", "target_year", "horizon"])
            .or(current.end_year),
        challenges: pass.statements_or(
            reply,
            &["challenges", "key_challenges", "current_challenges"],
            &current.challenges,
            "chl",
        ),
    }
}

pub(crate) fn vision(reply: &Fields<'_>, pass: &Pass<'_>) -> VisionBranch {
    let current = &pass.document.vision;
    VisionBranch {
        vision: current
            .vision
            .overlay(&reply.bilingual("vision", &["vision_statement"])),
        mission: current
            .mission
            .overlay(&reply.bilingual("mission", &["mission_statement"])),
        values: pass.list_or(reply, &["values", "core_values"], &current.values, "val", |item| {
            named(item).map(|(name, description)| CoreValue {
                id: String::new(),
                name,
                description,
            })
        }),
        strategic_themes: pass.list_or(reply, THEMES, &current.strategic_themes, "thm", |item| {
            named(item).map(|(name, description)| Theme {
                id: String::new(),
                name,
                description,
            })
        }),
    }
}

/// Name and description of a value or theme; `None` without a name.
fn named(item: &Item<'_>) -> Option<(BilingualText, BilingualText)> {
    let name = item.headline("name", &["title", "value", "theme"]);
    if name.is_empty() {
        return None;
    }
    let description = item
        .fields()
        .bilingual("description", &["desc", "details", "summary"]);
    Some((name, description))
}

pub(crate) fn stakeholders(reply: &Fields<'_>, pass: &Pass<'_>) -> Vec<Stakeholder> {
    pass.list_or(
        reply,
        &["stakeholders", "stakeholder_map", "items"],
        &pass.document.stakeholders,
        "stk",
        |item| {
            let name = item.headline("name", &["stakeholder", "title", "entity"]);
            if name.is_empty() {
                return None;
            }
            let f = item.fields();
            Some(Stakeholder {
                id: String::new(),
                name,
                category: f.choice(&["category", "type", "group"]),
                influence: f.choice(&["influence", "power"]),
                interest: f.choice(&["interest"]),
                engagement: f.choice(&["engagement", "engagement_level", "strategy"]),
                expectations: f.bilingual("expectations", &["needs", "concerns"]),
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stratplan_model::{Document, EngagementLevel, Level, StakeholderCategory};

    use super::*;
    use crate::normalize::identity::{IdAssigner, IdSeed};

    fn pass(document: &Document) -> Pass<'_> {
        Pass {
            document,
            ids: IdAssigner::new(IdSeed::new(1)),
        }
    }

    #[test]
    fn context_overlays_present_fields_only() {
        let mut doc = Document::default();
        doc.context.mandate = BilingualText::new("Regulate", "تنظيم");
        doc.context.end_year = Some(2030);

        let raw = json!({"organization_name_en": "Authority", "mandate": "", "sector": "Health"});
        let ctx = context(&Fields::of(&raw), &pass(&doc));
        assert_eq!(ctx.organization_name.en, "Authority");
        assert_eq!(ctx.mandate, BilingualText::new("Regulate", "تنظيم"));
        assert_eq!(ctx.sector, "Health");
        assert_eq!(ctx.end_year, Some(2030));
    }

    #[test]
    fn context_parses_years_and_challenges() {
        let doc = Document::default();
        let raw = json!({"plan_start": "2025", "horizon": "FY2030", "key_challenges": "Skills gap; Funding"});
        let ctx = context(&Fields::of(&raw), &pass(&doc));
        assert_eq!(ctx.start_year, Some(2025));
        assert_eq!(ctx.end_year, Some(2030));
        assert_eq!(ctx.challenges.len(), 2);
        assert_eq!(ctx.challenges[1].text.en, "Funding");
        assert_eq!(ctx.challenges[1].id, "chl-1-1");
    }

    #[test]
    fn theme_aliases_are_equivalent() {
        let doc = Document::default();
        let a = vision(&Fields::of(&json!({"strategic_themes": ["A"]})), &pass(&doc));
        let b = vision(&Fields::of(&json!({"suggested_themes": ["A"]})), &pass(&doc));
        let c = vision(&Fields::of(&json!({"themes": ["A"]})), &pass(&doc));
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.strategic_themes[0].name.en, "A");
    }

    #[test]
    fn current_theme_name_wins_over_legacy() {
        let doc = Document::default();
        let raw = json!({"strategic_themes": ["New"], "suggested_themes": ["Old"]});
        let v = vision(&Fields::of(&raw), &pass(&doc));
        assert_eq!(v.strategic_themes.len(), 1);
        assert_eq!(v.strategic_themes[0].name.en, "New");
    }

    #[test]
    fn vision_values_accept_mixed_shapes() {
        let doc = Document::default();
        let raw = json!({
            "vision": {"en": "A leading authority", "ar": "هيئة رائدة"},
            "core_values": [
                "Integrity",
                {"name_en": "Innovation", "description": "New ideas"},
                {"name": {"en": "Service", "ar": "الخدمة"}},
                {"description": "no name"},
            ]
        });
        let v = vision(&Fields::of(&raw), &pass(&doc));
        assert_eq!(v.vision.ar, "هيئة رائدة");
        assert_eq!(v.values.len(), 3);
        assert_eq!(v.values[1].description.en, "New ideas");
        assert_eq!(v.values[2].name.ar, "الخدمة");
        assert_eq!(v.values[2].id, "val-1-2");
    }

    #[test]
    fn stakeholders_default_enum_fields() {
        let doc = Document::default();
        let raw = json!({"stakeholders": [
            {"name": "Citizens", "category": "community", "influence": "HIGH", "engagement": "involve"},
            "Suppliers",
        ]});
        let list = stakeholders(&Fields::of(&raw), &pass(&doc));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].category, StakeholderCategory::Community);
        assert_eq!(list[0].influence, Level::High);
        assert_eq!(list[0].interest, Level::Medium);
        assert_eq!(list[0].engagement, EngagementLevel::Involve);
        assert_eq!(list[1].category, StakeholderCategory::External);
        assert_eq!(list[1].engagement, EngagementLevel::Consult);
    }

    #[test]
    fn missing_stakeholder_list_keeps_current() {
        let mut doc = Document::default();
        doc.stakeholders.push(Stakeholder {
            id: "stk-0-0".into(),
            name: BilingualText::en("Board"),
            ..Stakeholder::default()
        });
        let list = stakeholders(&Fields::of(&json!({})), &pass(&doc));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, doc.stakeholders[0].name);
        assert_eq!(list[0].id, "stk-1-0");

        let list = stakeholders(&Fields::of(&json!({"stakeholders": []})), &pass(&doc));
        assert!(list.is_empty());
    }
}
