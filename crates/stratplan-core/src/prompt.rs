//! Prompt construction for one planning phase.
//!
//! Pure and deterministic: the same phase and document always produce the
//! same prompt. The prompt carries the phase instructions, the advisory reply
//! schema, and the prior branches the phase builds on.

use stratplan_model::{CanonicalKey, Document};

use crate::phase::PhaseSpec;

const RESPONSE_RULES: &str = "\
## Response Format

- Reply with a single JSON object and nothing else.
- Use the field names from the schema below.
- Provide every text field in English (`en`) and Arabic (`ar`).
- Refer to objectives and themes by their zero-based position in the lists \
shown under Prior Work.
";

/// Build the generation prompt for `spec` against the current `document`.
pub fn build_prompt(spec: &PhaseSpec, document: &Document) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "# Phase {} of 17: {}\n\n",
        spec.number, spec.title
    ));
    if !document.meta.title.is_empty() {
        prompt.push_str(&format!("Plan: {}\n\n", document.meta.title));
    }
    prompt.push_str(spec.instructions);
    prompt.push_str("\n\n");

    if let Some(end_year) = document.context.end_year {
        prompt.push_str(&format!(
            "The plan horizon ends in {end_year}; use it as the default target year.\n\n"
        ));
    }

    prompt.push_str(RESPONSE_RULES);
    prompt.push('\n');

    prompt.push_str("## Schema\n\n```json\n");
    prompt.push_str(&pretty(&spec.schema()));
    prompt.push_str("\n```\n");

    if !spec.inputs.is_empty() {
        prompt.push_str("\n## Prior Work\n");
        for key in spec.inputs {
            prompt.push_str(&prior_section(document, *key));
        }
    }

    prompt
}

fn prior_section(document: &Document, key: CanonicalKey) -> String {
    if !document.is_completed(key) {
        return format!("\n### {key}\n\n(not yet authored)\n");
    }
    let branch = serde_json::to_value(document.branch(key))
        .map(|mut tagged| tagged["value"].take())
        .unwrap_or_default();
    format!("\n### {key}\n\n```json\n{branch}\n```\n")
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use stratplan_model::BilingualText;

    use super::*;
    use crate::phase::lookup;

    fn doc() -> Document {
        let mut doc = Document::new("Ministry Plan");
        doc.context.organization_name = BilingualText::new("Ministry of Planning", "وزارة التخطيط");
        doc.context.end_year = Some(2030);
        doc.meta.completed.insert(CanonicalKey::Context);
        doc
    }

    #[test]
    fn prompt_contains_title_instructions_and_schema() {
        let spec = lookup("kpis").unwrap();
        let prompt = build_prompt(spec, &doc());
        assert!(prompt.starts_with("# Phase 11 of 17: Key Performance Indicators"));
        assert!(prompt.contains(spec.instructions));
        assert!(prompt.contains("\"baseline_value\""));
        assert!(prompt.contains("## Response Format"));
    }

    #[test]
    fn prompt_includes_completed_inputs() {
        let prompt = build_prompt(lookup("kpis").unwrap(), &doc());
        assert!(prompt.contains("### context"));
        assert!(prompt.contains("Ministry of Planning"));
        assert!(prompt.contains("### objectives\n\n(not yet authored)"));
    }

    #[test]
    fn prompt_mentions_horizon() {
        let prompt = build_prompt(lookup("timeline").unwrap(), &doc());
        assert!(prompt.contains("ends in 2030"));
    }

    #[test]
    fn first_phase_has_no_prior_work() {
        let prompt = build_prompt(lookup("context").unwrap(), &Document::default());
        assert!(!prompt.contains("## Prior Work"));
        assert!(!prompt.contains("Plan:"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let d = doc();
        let spec = lookup("risks").unwrap();
        assert_eq!(build_prompt(spec, &d), build_prompt(spec, &d));
        assert_eq!(spec.prompt(&d), build_prompt(spec, &d));
    }
}
