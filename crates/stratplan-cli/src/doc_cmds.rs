//! Document-facing CLI handlers: `new`, `show`, `status`, `diff`.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use stratplan_core::changed_branches;
use stratplan_core::phase;
use stratplan_model::{CanonicalKey, Document};

use crate::store::DocumentStore;

// -----------------------------------------------------------------------
// stratplan new <title>
// -----------------------------------------------------------------------

pub fn run_new(store: &DocumentStore, title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        bail!("document title must not be empty");
    }
    let document = Document::new(title);
    let path = store.insert(&document)?;

    println!("Document created.");
    println!();
    println!("  ID:    {}", document.meta.id);
    println!("  Title: {}", document.meta.title);
    println!("  Path:  {}", path.display());
    println!();
    println!("Next: `stratplan prompt {} context`", document.meta.id);
    Ok(())
}

// -----------------------------------------------------------------------
// stratplan show <doc> [--branch <key>]
// -----------------------------------------------------------------------

pub fn run_show(store: &DocumentStore, doc_ref: &str, branch: Option<&str>) -> Result<()> {
    let stored = store.resolve(doc_ref)?;
    let value: Value = match branch {
        Some(name) => {
            let key = phase::lookup(name)?.canonical_key;
            // Branch values serialize as `{"key": .., "value": ..}`.
            let mut tagged = serde_json::to_value(stored.document.branch(key))?;
            tagged["value"].take()
        }
        None => serde_json::to_value(&stored.document)?,
    };
    let rendered = serde_json::to_string_pretty(&value).context("failed to render document")?;
    println!("{rendered}");
    Ok(())
}

// -----------------------------------------------------------------------
// stratplan status [doc]
// -----------------------------------------------------------------------

/// With a document, show per-phase progress; without, list every stored
/// document with a progress summary.
pub fn run_status(store: &DocumentStore, doc_ref: Option<&str>) -> Result<()> {
    match doc_ref {
        Some(doc_ref) => run_document_status(store, doc_ref),
        None => run_store_status(store),
    }
}

fn run_document_status(store: &DocumentStore, doc_ref: &str) -> Result<()> {
    let stored = store.resolve(doc_ref)?;
    let doc = &stored.document;

    println!("Document: {} ({})", doc.meta.title, doc.meta.id);
    println!("Created: {}", doc.meta.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let (Some(start), Some(end)) = (doc.context.start_year, doc.context.end_year) {
        println!("Horizon: {start}-{end}");
    } else if let Some(end) = doc.context.end_year {
        println!("Horizon: to {end}");
    }
    println!("Fingerprint: {}", short(&doc.fingerprint()?));
    println!();
    println!(
        "Progress: {}/{} phases",
        doc.meta.completed.len(),
        CanonicalKey::ALL.len()
    );
    println!();

    println!("Phases:");
    for spec in phase::list() {
        let key = spec.canonical_key;
        let icon = if doc.is_completed(key) { "+" } else { "." };
        let records = doc.branch(key).record_count();
        println!(
            "  [{icon}] {:>2}. {} ({records} {})",
            spec.number,
            spec.title,
            if records == 1 { "record" } else { "records" }
        );
    }
    Ok(())
}

fn run_store_status(store: &DocumentStore) -> Result<()> {
    let stored = store.list()?;
    if stored.is_empty() {
        println!(
            "No documents in {}. Use `stratplan new <title>` to create one.",
            store.dir().display()
        );
        return Ok(());
    }

    println!("{:<38} {:<30} {:>10}", "ID", "TITLE", "PROGRESS");
    println!("{}", "-".repeat(80));
    for s in &stored {
        let doc = &s.document;
        let title = if doc.meta.title.chars().count() > 28 {
            format!("{}...", doc.meta.title.chars().take(25).collect::<String>())
        } else {
            doc.meta.title.clone()
        };
        let progress = format!("{}/{}", doc.meta.completed.len(), CanonicalKey::ALL.len());
        println!("{:<38} {:<30} {:>10}", doc.meta.id, title, progress);
    }
    Ok(())
}

// -----------------------------------------------------------------------
// stratplan diff <a> <b>
// -----------------------------------------------------------------------

pub fn run_diff(store: &DocumentStore, left: &str, right: &str) -> Result<()> {
    let a = store.resolve(left)?.document;
    let b = store.resolve(right)?.document;

    let changed = changed_branches(&a, &b);
    if changed.is_empty() {
        println!("No branch differs (fingerprint {}).", short(&a.fingerprint()?));
        return Ok(());
    }

    println!("{} of {} branches differ:", changed.len(), CanonicalKey::ALL.len());
    for key in changed {
        let before = a.branch(key).record_count();
        let after = b.branch(key).record_count();
        println!("  {:<20} {before} -> {after} records", key.as_str());
    }
    Ok(())
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

#[cfg(test)]
mod tests {
    use stratplan_test_utils::sample_document;

    use super::*;

    #[test]
    fn new_rejects_blank_title() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        assert!(run_new(&store, "   ").is_err());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn new_creates_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        run_new(&store, "Health Strategy 2030").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].document.meta.title, "Health Strategy 2030");
        assert!(listed[0].document.meta.completed.is_empty());
    }

    #[test]
    fn show_and_status_accept_stored_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let doc = sample_document();
        store.insert(&doc).unwrap();
        let id = doc.meta.id.to_string();

        run_show(&store, &id, None).unwrap();
        run_show(&store, &id, Some("context")).unwrap();
        run_show(&store, &id, Some("11")).unwrap();
        assert!(run_show(&store, &id, Some("budget")).is_err());
        run_status(&store, Some(&id)).unwrap();
        run_status(&store, None).unwrap();
    }

    #[test]
    fn diff_compares_two_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let a = sample_document();
        let mut b = a.clone();
        b.meta.id = uuid::Uuid::new_v4();
        b.context.sector = "Health".into();
        store.insert(&a).unwrap();
        store.insert(&b).unwrap();

        run_diff(&store, &a.meta.id.to_string(), &b.meta.id.to_string()).unwrap();
        run_diff(&store, &a.meta.id.to_string(), &a.meta.id.to_string()).unwrap();
        assert_eq!(changed_branches(&a, &b), vec![CanonicalKey::Context]);
    }

    #[test]
    fn short_fingerprint_truncates() {
        assert_eq!(short("0123456789abcdef"), "0123456789ab");
        assert_eq!(short("abc"), "abc");
    }
}
