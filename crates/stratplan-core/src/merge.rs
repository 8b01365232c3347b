//! Applying normalized updates to a document.
//!
//! An update replaces exactly one branch, wholesale. Every other branch is
//! carried over untouched. Applying the same update twice yields the same
//! document as applying it once.

use stratplan_model::{BranchValue, CanonicalKey, Document};
use tracing::info;

use crate::error::EngineError;
use crate::normalize::NormalizedUpdate;

/// Replace the branch named by `key` with `update`, returning a new document.
///
/// Fails with [`EngineError::UpdateKeyMismatch`] when `update` belongs to a
/// different branch; `document` is never modified.
pub fn apply(
    document: &Document,
    key: CanonicalKey,
    update: &BranchValue,
) -> Result<Document, EngineError> {
    if update.key() != key {
        return Err(EngineError::UpdateKeyMismatch {
            key,
            found: update.key(),
        });
    }

    let mut next = document.clone();
    match update.clone() {
        BranchValue::Context(v) => next.context = v,
        BranchValue::Vision(v) => next.vision = v,
        BranchValue::Stakeholders(v) => next.stakeholders = v,
        BranchValue::Pestel(v) => next.pestel = v,
        BranchValue::Swot(v) => next.swot = v,
        BranchValue::Scenarios(v) => next.scenarios = v,
        BranchValue::Risks(v) => next.risks = v,
        BranchValue::Dependencies(v) => next.dependencies = v,
        BranchValue::Objectives(v) => next.objectives = v,
        BranchValue::NationalAlignment(v) => next.national_alignment = v,
        BranchValue::Kpis(v) => next.kpis = v,
        BranchValue::Actions(v) => next.actions = v,
        BranchValue::ResourcePlan(v) => next.resource_plan = v,
        BranchValue::Timeline(v) => next.timeline = v,
        BranchValue::Governance(v) => next.governance = v,
        BranchValue::CommunicationPlan(v) => next.communication_plan = v,
        BranchValue::ChangeManagement(v) => next.change_management = v,
    }
    next.meta.completed.insert(key);

    info!(
        branch = %key,
        records = update.record_count(),
        "applied update"
    );
    Ok(next)
}

/// [`apply`] using the key carried by the normalizer result.
pub fn apply_update(document: &Document, update: &NormalizedUpdate) -> Result<Document, EngineError> {
    apply(document, update.canonical_key, &update.update)
}

/// Branches whose content differs between `old` and `new`, in phase order.
pub fn changed_branches(old: &Document, new: &Document) -> Vec<CanonicalKey> {
    CanonicalKey::ALL
        .into_iter()
        .filter(|key| old.branch(*key) != new.branch(*key))
        .collect()
}

#[cfg(test)]
mod tests {
    use stratplan_model::{BilingualText, Kpi, Risk};

    use super::*;

    fn risk(title: &str) -> Risk {
        Risk {
            id: "risk-1-0".into(),
            title: BilingualText::en(title),
            ..Risk::default()
        }
    }

    #[test]
    fn replaces_only_the_named_branch() {
        let mut doc = Document::new("Plan");
        doc.kpis.push(Kpi::default());
        let update = BranchValue::Risks(vec![risk("Budget cuts")]);

        let next = apply(&doc, CanonicalKey::Risks, &update).unwrap();
        assert_eq!(next.risks.len(), 1);
        assert_eq!(next.kpis, doc.kpis);
        assert_eq!(changed_branches(&doc, &next), vec![CanonicalKey::Risks]);
        assert!(next.is_completed(CanonicalKey::Risks));
        assert!(!doc.is_completed(CanonicalKey::Risks));
    }

    #[test]
    fn replacement_is_wholesale() {
        let mut doc = Document::default();
        doc.risks = vec![risk("A"), risk("B"), risk("C")];
        let next = apply(&doc, CanonicalKey::Risks, &BranchValue::Risks(vec![risk("D")])).unwrap();
        assert_eq!(next.risks.len(), 1);
        assert_eq!(next.risks[0].title.en, "D");
    }

    #[test]
    fn apply_is_idempotent() {
        let doc = Document::new("Plan");
        let update = BranchValue::Risks(vec![risk("Budget cuts")]);
        let once = apply(&doc, CanonicalKey::Risks, &update).unwrap();
        let twice = apply(&once, CanonicalKey::Risks, &update).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn mismatched_key_is_rejected() {
        let doc = Document::default();
        let err = apply(&doc, CanonicalKey::Kpis, &BranchValue::Risks(vec![])).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UpdateKeyMismatch {
                key: CanonicalKey::Kpis,
                found: CanonicalKey::Risks,
            }
        ));
    }

    #[test]
    fn changed_branches_is_empty_for_identical_documents() {
        let doc = Document::new("Plan");
        assert!(changed_branches(&doc, &doc.clone()).is_empty());
    }
}
