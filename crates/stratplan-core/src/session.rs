//! Session driver: one pass of lookup → prompt → generate → normalize →
//! apply.
//!
//! The driver owns no state. Each call takes the current document and
//! returns a new one; the caller decides whether to keep it.

use std::time::Duration;

use serde_json::Value;
use stratplan_model::{CanonicalKey, Document};
use tracing::{info, warn};

use crate::error::{EngineError, GenerationError};
use crate::generator::Generator;
use crate::merge::{apply_update, changed_branches};
use crate::normalize::identity::IdSeed;
use crate::normalize::{NormalizedUpdate, normalize};
use crate::phase::lookup;

/// Upper bound on a single generation call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Result of running one phase.
#[derive(Debug, Clone)]
pub struct PhaseOutcome {
    /// The document after the update was applied.
    pub document: Document,
    pub update: NormalizedUpdate,
    /// Branches whose content differs from the input document.
    pub changed: Vec<CanonicalKey>,
}

/// Run `phase_id` against `document` using `generator`.
pub async fn run_phase(
    generator: &dyn Generator,
    phase_id: &str,
    document: &Document,
    seed: IdSeed,
) -> Result<PhaseOutcome, EngineError> {
    run_phase_with_timeout(generator, phase_id, document, seed, DEFAULT_TIMEOUT).await
}

/// [`run_phase`] with an explicit bound on the generation call.
pub async fn run_phase_with_timeout(
    generator: &dyn Generator,
    phase_id: &str,
    document: &Document,
    seed: IdSeed,
    timeout: Duration,
) -> Result<PhaseOutcome, EngineError> {
    let spec = lookup(phase_id)?;
    let prompt = spec.prompt(document);
    let schema = spec.schema();

    info!(
        phase = %spec.id,
        generator = generator.name(),
        prompt_bytes = prompt.len(),
        "requesting generation"
    );
    let raw = match tokio::time::timeout(timeout, generator.generate(&prompt, &schema)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            warn!(phase = %spec.id, generator = generator.name(), error = %e, "generation failed");
            return Err(e.into());
        }
        Err(_) => {
            warn!(
                phase = %spec.id,
                generator = generator.name(),
                seconds = timeout.as_secs(),
                "generation timed out"
            );
            return Err(GenerationError::Timeout {
                generator: generator.name().to_string(),
                seconds: timeout.as_secs(),
            }
            .into());
        }
    };

    apply_reply(spec.id.as_str(), &raw, document, seed)
}

/// Normalize an already-obtained reply and apply it.
pub fn apply_reply(
    phase_id: &str,
    raw: &Value,
    document: &Document,
    seed: IdSeed,
) -> Result<PhaseOutcome, EngineError> {
    let update = normalize(phase_id, raw, document, seed)?;
    let next = apply_update(document, &update)?;
    let changed = changed_branches(document, &next);
    info!(
        branch = %update.canonical_key,
        changed = changed.len(),
        "phase complete"
    );
    Ok(PhaseOutcome {
        document: next,
        update,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    struct Slow;

    #[async_trait]
    impl Generator for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<Value, GenerationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(json!({}))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generator_times_out() {
        let doc = Document::default();
        let err = run_phase_with_timeout(&Slow, "risks", &doc, IdSeed::new(1), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Generation(GenerationError::Timeout { seconds: 5, .. })
        ));
    }

    #[test]
    fn apply_reply_reports_changed_branch() {
        let doc = Document::default();
        let raw = json!({"risks": [{"title": "Budget cuts"}]});
        let outcome = apply_reply("risks", &raw, &doc, IdSeed::new(1)).unwrap();
        assert_eq!(outcome.changed, vec![CanonicalKey::Risks]);
        assert_eq!(outcome.document.risks[0].id, "rsk-1-0");
    }

    #[test]
    fn apply_reply_unknown_phase_fails() {
        let doc = Document::default();
        let err = apply_reply("phase-99", &json!({}), &doc, IdSeed::new(1)).unwrap_err();
        assert!(err.is_caller_error());
    }
}
