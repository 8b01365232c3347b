use serde_json::json;
use stratplan_core::session::run_phase_with_timeout;
use stratplan_core::{EngineError, GenerationError, IdSeed, PhaseId, ReplayGenerator, run_phase};
use stratplan_model::CanonicalKey;
use stratplan_test_utils::{FailingGenerator, FixedGenerator, sample_document};

#[tokio::test]
async fn run_phase_prompts_generator_and_applies_reply() {
    let doc = sample_document();
    let generator = FixedGenerator::for_phase(PhaseId::Kpis);

    let outcome = run_phase(&generator, "kpis", &doc, IdSeed::new(7)).await.unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Phase 11 of 17"));
    assert!(prompts[0].contains("Digital Government Strategy"));
    assert_eq!(outcome.changed, vec![CanonicalKey::Kpis]);
    assert_eq!(outcome.document.kpis.len(), 2);
    assert_eq!(outcome.document.kpis[0].id, "kpi-7-0");
    assert!(outcome.document.is_completed(CanonicalKey::Kpis));
}

#[tokio::test]
async fn run_phase_accepts_phase_number_and_key() {
    let doc = sample_document();
    let generator = FixedGenerator::for_phase(PhaseId::NationalAlignment);
    for id in ["10", "national-alignment", "national_alignment"] {
        let outcome = run_phase(&generator, id, &doc, IdSeed::new(1)).await.unwrap();
        assert_eq!(outcome.update.canonical_key, CanonicalKey::NationalAlignment);
    }
    assert_eq!(generator.prompts().len(), 3);
}

#[tokio::test]
async fn unknown_phase_never_reaches_generator() {
    let doc = sample_document();
    let generator = FixedGenerator::new(json!({}));
    let err = run_phase(&generator, "budget", &doc, IdSeed::new(1)).await.unwrap_err();
    assert!(matches!(err, EngineError::UnknownPhase(_)));
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn generator_failure_surfaces_as_generation_error() {
    let doc = sample_document();
    let err = run_phase(&FailingGenerator, "vision", &doc, IdSeed::new(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Generation(GenerationError::Unavailable { .. })
    ));
    assert!(!err.is_caller_error());
}

#[tokio::test]
async fn replay_generator_feeds_a_saved_reply() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swot.json");
    std::fs::write(&path, r#"{"strengths": ["Leadership"], "threats": "Cyber attacks"}"#).unwrap();

    let outcome = run_phase_with_timeout(
        &ReplayGenerator::new(&path),
        "swot",
        &sample_document(),
        IdSeed::new(1),
        std::time::Duration::from_secs(5),
    )
    .await
    .unwrap();

    assert_eq!(outcome.document.swot.strengths[0].text.en, "Leadership");
    assert_eq!(outcome.document.swot.threats[0].id, "thr-1-0");
    assert!(outcome.document.swot.weaknesses.is_empty());
}
