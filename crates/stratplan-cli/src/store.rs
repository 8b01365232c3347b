//! Document snapshots on disk.
//!
//! Each document is stored as pretty JSON at `<documents_dir>/<uuid>.json`.
//! [`DocumentStore::resolve`] accepts either a document UUID or a path to a
//! snapshot file, so documents can also live outside the store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use stratplan_model::Document;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

/// A loaded document and where it came from.
#[derive(Debug)]
pub struct Stored {
    pub path: PathBuf,
    pub document: Document,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot path for a document id.
    pub fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Save `document` under its own id, creating the store as needed.
    pub fn insert(&self, document: &Document) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create documents dir {}", self.dir.display()))?;
        let path = self.path_for(document.meta.id);
        write_document(&path, document)?;
        Ok(path)
    }

    /// Load a document by UUID or by snapshot path.
    ///
    /// Heuristic: input ending in `.json` or containing a path separator is a
    /// path. Otherwise it must parse as a UUID, unless a file by that name
    /// exists.
    pub fn resolve(&self, reference: &str) -> Result<Stored> {
        let path = if looks_like_file_path(reference) {
            PathBuf::from(reference)
        } else {
            match Uuid::parse_str(reference) {
                Ok(id) => self.path_for(id),
                Err(uuid_err) => {
                    if Path::new(reference).is_file() {
                        PathBuf::from(reference)
                    } else {
                        return Err(uuid_err).with_context(|| {
                            format!("invalid document: {reference:?} (not a UUID and not a file)")
                        });
                    }
                }
            }
        };
        let document = read_document(&path)?;
        Ok(Stored { path, document })
    }

    /// Every readable document in the store, oldest first.
    ///
    /// Unreadable files are skipped with a debug log.
    pub fn list(&self) -> Result<Vec<Stored>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read documents dir {}", self.dir.display()))?;

        let mut stored = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match read_document(&path) {
                Ok(document) => stored.push(Stored { path, document }),
                Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable snapshot"),
            }
        }
        stored.sort_by_key(|s| s.document.meta.created_at);
        Ok(stored)
    }
}

fn looks_like_file_path(input: &str) -> bool {
    input.ends_with(".json") || input.contains('/')
}

/// Read a snapshot file.
pub fn read_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse document {}", path.display()))
}

/// Write a snapshot file, replacing any previous content.
pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    let mut content = serde_json::to_string_pretty(document).context("failed to serialize document")?;
    content.push('\n');
    std::fs::write(path, content)
        .with_context(|| format!("failed to write document {}", path.display()))
}

/// Reject a snapshot whose content claims a different id than its file name.
pub fn check_identity(stored: &Stored) -> Result<()> {
    let Some(stem) = stored.path.file_stem().and_then(|s| s.to_str()) else {
        return Ok(());
    };
    if let Ok(id) = Uuid::parse_str(stem) {
        if id != stored.document.meta.id {
            bail!(
                "{} holds document {}, not {id}",
                stored.path.display(),
                stored.document.meta.id
            );
        }
    }
    Ok(())
}
