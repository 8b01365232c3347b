//! Response normalization: raw generator reply + current document → update
//! for exactly one branch.
//!
//! The normalizer is pure. It never mutates its inputs, and identical
//! `(phase, reply, document, seed)` always produce identical output. It only
//! fails for an unknown phase; every data-shape problem in the reply is
//! recovered locally (see [`fields`]) and logged at `debug`.
//!
//! # Reply envelopes
//!
//! Before the phase normalizer runs, the reply is unwrapped:
//!
//! - a JSON string is decoded as JSON text, optionally inside a Markdown code
//!   fence;
//! - `{"<key or phase id>": {...}}` with a single entry is unwrapped to the
//!   inner object, unless the inner object is a bare language pair or, for a
//!   list phase, a lone record;
//! - a bare array becomes `{"<canonical key>": [...]}`;
//! - anything else that is not an object is treated as `{}`.

pub(crate) mod fields;
pub mod identity;
mod phases;
pub(crate) mod shapes;

use serde::Serialize;
use serde_json::{Map, Value};
use stratplan_model::{BranchValue, CanonicalKey, Document};
use tracing::{debug, debug_span};

use crate::error::EngineError;
use crate::phase::{PhaseId, PhaseSpec, lookup};
use fields::Fields;
use identity::{IdAssigner, IdSeed};
use phases::{Pass, analysis, delivery, direction, foundation};

/// The normalizer's result: a replacement value for one branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedUpdate {
    pub canonical_key: CanonicalKey,
    pub update: BranchValue,
}

/// Normalize `raw` for the phase named by `phase_id` against `document`.
pub fn normalize(
    phase_id: &str,
    raw: &Value,
    document: &Document,
    seed: IdSeed,
) -> Result<NormalizedUpdate, EngineError> {
    let spec = lookup(phase_id)?;
    let _span = debug_span!("normalize", phase = %spec.id, seed = %seed).entered();

    let payload = unwrap_envelope(raw, spec);
    let reply = Fields::of(&payload);
    let pass = Pass {
        document,
        ids: IdAssigner::new(seed),
    };

    let update = match spec.id {
        PhaseId::Context => BranchValue::Context(foundation::context(&reply, &pass)),
        PhaseId::Vision => BranchValue::Vision(foundation::vision(&reply, &pass)),
        PhaseId::Stakeholders => {
            BranchValue::Stakeholders(foundation::stakeholders(&reply, &pass))
        }
        PhaseId::Pestel => BranchValue::Pestel(analysis::pestel(&reply, &pass)),
        PhaseId::Swot => BranchValue::Swot(analysis::swot(&reply, &pass)),
        PhaseId::Scenarios => BranchValue::Scenarios(analysis::scenarios(&reply, &pass)),
        PhaseId::Risks => BranchValue::Risks(analysis::risks(&reply, &pass)),
        PhaseId::Dependencies => BranchValue::Dependencies(analysis::dependencies(&reply, &pass)),
        PhaseId::Objectives => BranchValue::Objectives(direction::objectives(&reply, &pass)),
        PhaseId::NationalAlignment => {
            BranchValue::NationalAlignment(direction::national_alignment(&reply, &pass))
        }
        PhaseId::Kpis => BranchValue::Kpis(direction::kpis(&reply, &pass)),
        PhaseId::Actions => BranchValue::Actions(direction::actions(&reply, &pass)),
        PhaseId::ResourcePlan => BranchValue::ResourcePlan(delivery::resource_plan(&reply, &pass)),
        PhaseId::Timeline => BranchValue::Timeline(delivery::timeline(&reply, &pass)),
        PhaseId::Governance => BranchValue::Governance(delivery::governance(&reply, &pass)),
        PhaseId::CommunicationPlan => {
            BranchValue::CommunicationPlan(delivery::communication_plan(&reply, &pass))
        }
        PhaseId::ChangeManagement => {
            BranchValue::ChangeManagement(delivery::change_management(&reply, &pass))
        }
    };

    debug!(records = update.record_count(), "normalized reply");
    Ok(NormalizedUpdate {
        canonical_key: spec.canonical_key,
        update,
    })
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

fn unwrap_envelope(raw: &Value, spec: &PhaseSpec) -> Value {
    let decoded = match raw {
        Value::String(text) => decode_text(text),
        other => other.clone(),
    };
    match decoded {
        Value::Object(map) => unwrap_keyed(map, spec),
        Value::Array(items) => {
            let mut map = Map::new();
            map.insert(spec.canonical_key.to_string(), Value::Array(items));
            Value::Object(map)
        }
        Value::Null => Value::Object(Map::new()),
        other => {
            debug!(reply = %other, "reply is not an object, treating as empty");
            Value::Object(Map::new())
        }
    }
}

fn unwrap_keyed(mut map: Map<String, Value>, spec: &PhaseSpec) -> Value {
    if map.len() == 1 {
        let list_phase = is_list_phase(spec.id);
        let key = spec.canonical_key.as_str();
        let id = spec.id.as_str();
        let wrapper = [key, id]
            .into_iter()
            .find(|k| map.get(*k).is_some_and(|v| is_envelope_body(v, list_phase)));
        if let Some(inner) = wrapper.and_then(|k| map.remove(k)) {
            return inner;
        }
    }
    Value::Object(map)
}

fn is_list_phase(id: PhaseId) -> bool {
    matches!(
        id,
        PhaseId::Stakeholders
            | PhaseId::Risks
            | PhaseId::Dependencies
            | PhaseId::Objectives
            | PhaseId::NationalAlignment
            | PhaseId::Kpis
            | PhaseId::Actions
    )
}

/// Whether `value` is a wrapped payload rather than branch content.
///
/// A bare `{en, ar}` language pair is content. For list phases a lone object
/// is a single record unless it carries a list of its own.
fn is_envelope_body(value: &Value, list_phase: bool) -> bool {
    const LANGUAGE_KEYS: &[&str] = &["en", "ar", "english", "arabic", "primary", "secondary"];
    let Some(inner) = value.as_object() else {
        return false;
    };
    if inner.keys().all(|k| LANGUAGE_KEYS.contains(&k.as_str())) {
        return false;
    }
    !list_phase || inner.values().any(Value::is_array)
}

/// Decode a reply delivered as text: plain JSON, or JSON inside a fenced
/// code block. Undecodable text becomes `null`.
fn decode_text(text: &str) -> Value {
    let text = text.trim();
    if let Ok(value) = serde_json::from_str(text) {
        return value;
    }
    let Some(body) = fenced_body(text) else {
        debug!("reply text is not JSON and has no code fence");
        return Value::Null;
    };
    match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "fenced reply is not JSON");
            Value::Null
        }
    }
}

/// The trimmed contents of the first code fence, without its info string.
/// The fence may be on one line.
fn fenced_body(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let inner = &after[..after.find("```").unwrap_or(after.len())];
    let info = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let body = if inner[info..].starts_with(char::is_whitespace) {
        &inner[info..]
    } else {
        inner
    };
    Some(body.trim())
}
