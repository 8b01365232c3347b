//! Phase-facing CLI handlers.
//!
//! Implements:
//! - `stratplan phases`                          -- list the seventeen phases
//! - `stratplan prompt <doc> <phase>`            -- print the generation prompt
//! - `stratplan schema <phase>`                  -- print the advisory reply schema
//! - `stratplan apply <doc> <phase> --reply <f>` -- normalize a reply and apply it

use std::path::Path;

use anyhow::{Context, Result};
use stratplan_core::phase::{self, schema};
use stratplan_core::session::run_phase;
use stratplan_core::{IdSeed, ReplayGenerator};
use stratplan_model::Document;

use crate::store::{DocumentStore, check_identity, write_document};

// -----------------------------------------------------------------------
// stratplan phases
// -----------------------------------------------------------------------

pub fn run_phases(document: Option<&Document>) -> Result<()> {
    println!("{:>3}  {:<20} {:<20} {:<40}", "#", "ID", "KEY", "TITLE");
    println!("{}", "-".repeat(86));
    for spec in phase::list() {
        let mark = match document {
            Some(doc) if doc.is_completed(spec.canonical_key) => "+",
            Some(_) => ".",
            None => " ",
        };
        println!(
            "{:>3}{} {:<20} {:<20} {:<40}",
            spec.number, mark, spec.id, spec.canonical_key, spec.title
        );
    }
    Ok(())
}

// -----------------------------------------------------------------------
// stratplan prompt / schema
// -----------------------------------------------------------------------

pub fn run_prompt(store: &DocumentStore, doc_ref: &str, phase_id: &str) -> Result<()> {
    let spec = phase::lookup(phase_id)?;
    let stored = store.resolve(doc_ref)?;
    print!("{}", spec.prompt(&stored.document));
    Ok(())
}

pub fn run_schema(phase_id: &str) -> Result<()> {
    let spec = phase::lookup(phase_id)?;
    let rendered = serde_json::to_string_pretty(&schema::response_schema(spec.id))
        .context("failed to render schema")?;
    println!("{rendered}");
    Ok(())
}

// -----------------------------------------------------------------------
// stratplan apply
// -----------------------------------------------------------------------

/// Options for `stratplan apply`.
#[derive(Debug)]
pub struct ApplyOptions<'a> {
    pub reply: &'a Path,
    /// Print the normalized update instead of saving.
    pub dry_run: bool,
}

/// Feed a saved reply through the session driver and save the result back
/// to the document's snapshot.
pub async fn run_apply(
    store: &DocumentStore,
    doc_ref: &str,
    phase_id: &str,
    seed: IdSeed,
    options: &ApplyOptions<'_>,
) -> Result<()> {
    let stored = store.resolve(doc_ref)?;
    check_identity(&stored)?;

    let generator = ReplayGenerator::new(options.reply);
    let outcome = run_phase(&generator, phase_id, &stored.document, seed)
        .await
        .with_context(|| format!("failed to apply {} to phase {phase_id}", options.reply.display()))?;

    if options.dry_run {
        let rendered =
            serde_json::to_string_pretty(&outcome.update).context("failed to render update")?;
        println!("{rendered}");
        return Ok(());
    }

    write_document(&stored.path, &outcome.document)?;

    println!("Applied {} to {}.", outcome.update.canonical_key, stored.path.display());
    println!("  Records: {}", outcome.update.update.record_count());
    if outcome.changed.is_empty() {
        println!("  Changed: (none)");
    } else {
        let changed: Vec<&str> = outcome.changed.iter().map(|k| k.as_str()).collect();
        println!("  Changed: {}", changed.join(", "));
    }
    println!("  Seed:    {seed}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use stratplan_model::CanonicalKey;
    use stratplan_test_utils::sample_document;

    use super::*;

    #[tokio::test]
    async fn apply_writes_back_to_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let doc = sample_document();
        store.insert(&doc).unwrap();

        let reply = dir.path().join("risks-reply.txt");
        std::fs::write(&reply, r#"{"risks": [{"title": "Budget cuts"}]}"#).unwrap();

        let options = ApplyOptions {
            reply: &reply,
            dry_run: false,
        };
        run_apply(&store, &doc.meta.id.to_string(), "7", IdSeed::new(3), &options)
            .await
            .unwrap();

        let saved = store.resolve(&doc.meta.id.to_string()).unwrap().document;
        assert_eq!(saved.risks.len(), 1);
        assert_eq!(saved.risks[0].id, "rsk-3-0");
        assert!(saved.is_completed(CanonicalKey::Risks));
    }

    #[tokio::test]
    async fn dry_run_leaves_snapshot_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let doc = sample_document();
        store.insert(&doc).unwrap();

        let reply = dir.path().join("reply.txt");
        std::fs::write(&reply, r#"{"kpis": [{"name": "Adoption"}]}"#).unwrap();

        let options = ApplyOptions {
            reply: &reply,
            dry_run: true,
        };
        run_apply(&store, &doc.meta.id.to_string(), "kpis", IdSeed::new(3), &options)
            .await
            .unwrap();

        let saved = store.resolve(&doc.meta.id.to_string()).unwrap().document;
        assert_eq!(saved, doc);
    }

    #[tokio::test]
    async fn unknown_phase_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let doc = sample_document();
        store.insert(&doc).unwrap();
        let reply = dir.path().join("reply.txt");
        std::fs::write(&reply, "{}").unwrap();

        let options = ApplyOptions {
            reply: &reply,
            dry_run: false,
        };
        let err = run_apply(&store, &doc.meta.id.to_string(), "budget", IdSeed::new(1), &options)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("unknown phase"));
    }

    #[test]
    fn schema_and_phases_render() {
        run_phases(None).unwrap();
        run_phases(Some(&sample_document())).unwrap();
        run_schema("resource-plan").unwrap();
        assert!(run_schema("phase-zero").is_err());
    }
}
